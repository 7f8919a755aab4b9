//! Streamwatch core: pure stream filter and live-set reconciler.
mod action;
mod filter;
mod reconcile;
mod state;

pub use action::Action;
pub use filter::StreamFilter;
pub use reconcile::reconcile;
pub use state::{BroadcastCandidate, LiveEntry, LiveSet, NotificationHandle, StreamId};
