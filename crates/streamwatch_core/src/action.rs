use crate::{BroadcastCandidate, NotificationHandle, StreamId};

/// A notification lifecycle command emitted by [`crate::reconcile`].
///
/// Posts and retracts within one batch act on disjoint stream identifiers,
/// so the batch is safe to apply in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Post a notification for a newly live qualifying stream.
    Post(BroadcastCandidate),
    /// Retract the notification for a stream no longer observed live.
    Retract {
        stream_id: StreamId,
        handle: NotificationHandle,
    },
}
