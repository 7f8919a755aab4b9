//! In-process fakes for the engine's catalog and sink traits.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use streamwatch_engine::{
    CatalogError, CatalogSource, NotificationSink, RetractError, SinkError, StreamNotification,
    StreamRecord,
};

/// A qualifying broadcast for the default test filter (game 5093, keyword
/// "speedrun", tag "speedrun").
pub fn record(id: &str) -> StreamRecord {
    StreamRecord {
        id: id.to_string(),
        user_name: format!("runner_{id}"),
        game_id: "5093".to_string(),
        game_name: "Diddy Kong Racing DS".to_string(),
        title: "speedrun practice".to_string(),
        tags: vec!["speedrun".to_string()],
        thumbnail_url: "https://cdn.example/{width}x{height}.jpg".to_string(),
    }
}

/// Catalog source that replays a scripted sequence of poll results, then
/// repeats the final result forever (an empty script reports an empty
/// catalog).
pub struct ScriptedCatalog {
    polls: Mutex<VecDeque<Result<Vec<StreamRecord>, CatalogError>>>,
    calls: AtomicU64,
}

impl ScriptedCatalog {
    pub fn new(polls: Vec<Result<Vec<StreamRecord>, CatalogError>>) -> Self {
        Self {
            polls: Mutex::new(polls.into()),
            calls: AtomicU64::new(0),
        }
    }

    /// Number of `live_streams` calls served so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn live_streams(&self) -> Result<Vec<StreamRecord>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut polls = self.polls.lock().expect("scripted catalog lock");
        if polls.len() > 1 {
            polls.pop_front().expect("non-empty script")
        } else {
            polls.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

/// Sink that records every call and can be scripted to fail posts or
/// retracts. Handles are `msg-1`, `msg-2`, ... in post order.
#[derive(Default)]
pub struct RecordingSink {
    pub posted: Mutex<Vec<StreamNotification>>,
    pub retracted: Mutex<Vec<String>>,
    pub texts: Mutex<Vec<String>>,
    pub failing_posts: Mutex<usize>,
    pub retract_results: Mutex<VecDeque<Result<(), RetractError>>>,
    next_handle: AtomicU64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_posts(&self, count: usize) {
        *self.failing_posts.lock().expect("sink lock") = count;
    }

    pub fn script_retract(&self, result: Result<(), RetractError>) {
        self.retract_results
            .lock()
            .expect("sink lock")
            .push_back(result);
    }
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    async fn post(&self, notification: &StreamNotification) -> Result<String, SinkError> {
        {
            let mut failing = self.failing_posts.lock().expect("sink lock");
            if *failing > 0 {
                *failing -= 1;
                return Err(SinkError::Http(500));
            }
        }
        self.posted
            .lock()
            .expect("sink lock")
            .push(notification.clone());
        let n = self.next_handle.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("msg-{n}"))
    }

    async fn retract(&self, handle: &str) -> Result<(), RetractError> {
        self.retracted
            .lock()
            .expect("sink lock")
            .push(handle.to_string());
        self.retract_results
            .lock()
            .expect("sink lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn post_text(&self, content: &str) -> Result<(), SinkError> {
        self.texts.lock().expect("sink lock").push(content.to_string());
        Ok(())
    }
}
