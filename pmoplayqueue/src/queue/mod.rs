//! Logical play queue.

mod ledger;
mod play_queue;
mod snapshot;

pub use play_queue::PlayQueue;
pub use snapshot::QueueSnapshot;
