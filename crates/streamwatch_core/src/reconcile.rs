use std::collections::BTreeSet;

use crate::{Action, BroadcastCandidate, LiveSet};

/// Diffs a freshly polled set of qualifying streams against the live set and
/// returns the minimal batch of post/retract actions to converge.
///
/// The live set itself is untouched here: the caller applies each action
/// against the notification sink and records the outcome ([`LiveSet::insert`]
/// on a confirmed post, [`LiveSet::remove`] on retract). A failed post is
/// thereby retried on the next poll as still newly-live.
///
/// Streams present in both sets are left alone, so a continuously live stream
/// gets exactly one notification for its whole live duration even if its
/// title changes between polls.
///
/// A stream id occurring more than once in `polled` counts as one stream: the
/// first occurrence wins and duplicates emit no further posts.
pub fn reconcile(live: &LiveSet, polled: &[BroadcastCandidate]) -> Vec<Action> {
    let mut polled_ids: BTreeSet<&str> = BTreeSet::new();
    let mut actions = Vec::new();

    for candidate in polled {
        if polled_ids.insert(candidate.id.as_str()) && !live.contains(&candidate.id) {
            actions.push(Action::Post(candidate.clone()));
        }
    }

    for entry in live.entries() {
        if !polled_ids.contains(entry.stream_id.as_str()) {
            actions.push(Action::Retract {
                stream_id: entry.stream_id,
                handle: entry.handle,
            });
        }
    }

    actions
}
