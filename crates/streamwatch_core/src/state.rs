use std::collections::BTreeMap;

pub type StreamId = String;

/// Opaque reference to a posted notification, used only to retract it.
pub type NotificationHandle = String;

/// One raw catalog entry as observed in a single poll. Immutable snapshot;
/// not retained past one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastCandidate {
    pub id: StreamId,
    pub game_id: String,
    pub game_name: String,
    pub title: String,
    pub tags: Vec<String>,
    pub broadcaster: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEntry {
    pub stream_id: StreamId,
    pub handle: NotificationHandle,
}

/// The authoritative record of which qualifying streams currently have an
/// active posted notification. At quiescence this is exactly the qualifying
/// set of the last completed poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveSet {
    entries: BTreeMap<StreamId, NotificationHandle>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, stream_id: &str) -> bool {
        self.entries.contains_key(stream_id)
    }

    /// Records a stream as live with the handle of its posted notification.
    /// Called only after the sink has confirmed the post.
    pub fn insert(&mut self, stream_id: StreamId, handle: NotificationHandle) {
        self.entries.insert(stream_id, handle);
    }

    /// Removes a stream unconditionally, returning its handle if it was
    /// tracked. Removal must not depend on the retract outcome, so stale
    /// handles cannot leak.
    pub fn remove(&mut self, stream_id: &str) -> Option<NotificationHandle> {
        self.entries.remove(stream_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = LiveEntry> + '_ {
        self.entries.iter().map(|(stream_id, handle)| LiveEntry {
            stream_id: stream_id.clone(),
            handle: handle.clone(),
        })
    }

    pub fn stream_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
