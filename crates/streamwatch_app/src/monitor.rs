//! Monitoring controller and the per-context reconciliation loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use streamwatch_core::{reconcile, Action, BroadcastCandidate, LiveSet, StreamFilter};
use streamwatch_engine::{
    CatalogError, CatalogSource, NotificationSink, RetractError, StreamNotification, StreamRecord,
};
use tokio::sync::Mutex;
use watch_logging::{watch_error, watch_info, watch_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

/// Per-context monitoring session: the running gate, the live set, and the
/// loop-task bookkeeping. The live set survives stop/start, so notifications
/// posted before a stop are retracted once monitoring resumes and the streams
/// have ended.
///
/// Each started loop owns its own cancellation flag. `cancel` holds the flag
/// of the current loop; stop trips it and clears the slot. A later start hands
/// the new loop a fresh flag, so a loop from an earlier generation can never
/// be revived by restarting.
struct MonitorSession {
    running: AtomicBool,
    cancel: Mutex<Option<Arc<AtomicBool>>>,
    live: Mutex<LiveSet>,
    tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl MonitorSession {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            cancel: Mutex::new(None),
            live: Mutex::new(LiveSet::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }
}

/// Owns the lifecycle of exactly one reconciliation loop.
///
/// `running` acts as a mutual-exclusion gate, not a lock: a second concurrent
/// start is rejected rather than queued, and stop only prevents the next
/// iteration from beginning. An in-flight poll or sleep always completes.
pub struct MonitorController {
    session: Arc<MonitorSession>,
    source: Arc<dyn CatalogSource>,
    sink: Arc<dyn NotificationSink>,
    filter: StreamFilter,
    poll_interval: Duration,
}

impl MonitorController {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        sink: Arc<dyn NotificationSink>,
        filter: StreamFilter,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session: Arc::new(MonitorSession::new()),
            source,
            sink,
            filter,
            poll_interval,
        }
    }

    /// Launches the loop unless one is already active for this session.
    pub async fn start(&self) -> StartOutcome {
        if self.session.running.swap(true, Ordering::SeqCst) {
            return StartOutcome::AlreadyRunning;
        }

        let cancel = Arc::new(AtomicBool::new(false));
        *self.session.cancel.lock().await = Some(cancel.clone());
        let handle = tokio::spawn(run_loop(
            self.session.clone(),
            self.source.clone(),
            self.sink.clone(),
            self.filter.clone(),
            self.poll_interval,
            cancel,
        ));
        self.session.tasks.lock().await.push(handle);
        watch_info!("Monitoring started");
        StartOutcome::Started
    }

    /// Signals the current loop to exit before its next iteration. Live
    /// notifications are intentionally left in place; stopping does not clean
    /// up history.
    pub async fn stop(&self) -> StopOutcome {
        if !self.session.running.swap(false, Ordering::SeqCst) {
            return StopOutcome::NotRunning;
        }
        if let Some(cancel) = self.session.cancel.lock().await.take() {
            cancel.store(true, Ordering::SeqCst);
        }
        watch_info!("Monitoring stop requested");
        StopOutcome::Stopped
    }

    pub fn is_running(&self) -> bool {
        self.session.running.load(Ordering::SeqCst)
    }

    /// Waits for every loop task started so far to finish. Used by tests and
    /// orderly shutdown; returns immediately when no loop was ever started.
    pub async fn join(&self) {
        let handles: Vec<_> = self.session.tasks.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
    }
}

async fn run_loop(
    session: Arc<MonitorSession>,
    source: Arc<dyn CatalogSource>,
    sink: Arc<dyn NotificationSink>,
    filter: StreamFilter,
    poll_interval: Duration,
    cancel: Arc<AtomicBool>,
) {
    watch_info!("Monitoring loop started (poll interval {poll_interval:?})");
    let mut tick: u64 = 0;

    while !cancel.load(Ordering::SeqCst) {
        tick += 1;

        {
            let mut live = session.live.lock().await;
            if let Err(err) =
                run_iteration(&mut live, source.as_ref(), sink.as_ref(), &filter).await
            {
                watch_error!("Poll {tick} skipped, live set untouched: {err}");
                // Reported once per iteration, into the same channel the
                // alerts go to. A failed report is only logged.
                let report = format!("❌ Error during monitoring: {err}");
                if let Err(report_err) = sink.post_text(&report).await {
                    watch_warn!("Could not report monitoring error: {report_err}");
                }
            }
        }

        tokio::time::sleep(poll_interval).await;
    }

    watch_info!("Monitoring loop stopped after {tick} polls");
}

/// One poll: fetch, filter, reconcile, apply.
///
/// A catalog failure aborts the iteration wholesale and leaves the live set
/// untouched. Sink failures are contained per action: a failed post is not
/// recorded (so it retries next poll as newly-live); a failed retract is
/// logged but the entry is removed anyway, favoring eventual consistency over
/// strict correctness of the external notification's existence.
pub async fn run_iteration(
    live: &mut LiveSet,
    source: &dyn CatalogSource,
    sink: &dyn NotificationSink,
    filter: &StreamFilter,
) -> Result<(), CatalogError> {
    let records = source.live_streams().await?;

    let qualifying: Vec<BroadcastCandidate> = records
        .into_iter()
        .map(candidate_from_record)
        .filter(|candidate| filter.qualifies(candidate))
        .collect();

    for action in reconcile(live, &qualifying) {
        match action {
            Action::Post(candidate) => {
                match sink.post(&notification_from_candidate(&candidate)).await {
                    Ok(handle) => {
                        watch_info!(
                            "Posted notification for {} (stream {})",
                            candidate.broadcaster,
                            candidate.id
                        );
                        live.insert(candidate.id, handle);
                    }
                    Err(err) => {
                        watch_warn!("Post failed for stream {}: {}", candidate.id, err);
                    }
                }
            }
            Action::Retract { stream_id, handle } => {
                match sink.retract(&handle).await {
                    Ok(()) | Err(RetractError::AlreadyGone) => {
                        watch_info!("Retracted notification for stream {stream_id}");
                    }
                    Err(err) => {
                        watch_warn!(
                            "Retract failed for stream {stream_id}, dropping handle anyway: {err}"
                        );
                    }
                }
                live.remove(&stream_id);
            }
        }
    }

    Ok(())
}

fn candidate_from_record(record: StreamRecord) -> BroadcastCandidate {
    BroadcastCandidate {
        id: record.id,
        game_id: record.game_id,
        game_name: record.game_name,
        title: record.title,
        tags: record.tags,
        broadcaster: record.user_name,
        thumbnail_url: record.thumbnail_url,
    }
}

fn notification_from_candidate(candidate: &BroadcastCandidate) -> StreamNotification {
    StreamNotification {
        stream_id: candidate.id.clone(),
        broadcaster: candidate.broadcaster.clone(),
        game_name: candidate.game_name.clone(),
        title: candidate.title.clone(),
        thumbnail_url: candidate.thumbnail_url.clone(),
    }
}
