/// Read-only summary of a [`PlayQueue`](super::PlayQueue) for displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub main_len: usize,
    pub next_len: usize,
    pub history_len: usize,
    /// Main index materialized for shuffle playback and not yet played.
    pub pending_shuffle: Option<usize>,
}

impl QueueSnapshot {
    /// Same value as `PlayQueue::total_tracks`.
    pub fn total(&self) -> usize {
        self.main_len + self.next_len
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
