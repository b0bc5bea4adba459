use thiserror::Error;

/// Errors returned by host-facing commands.
///
/// Engine callbacks never produce these: a request the queue cannot satisfy
/// falls back to the exhaustion policy instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayQueueError {
    #[error("Main playlist index {0} is out of range")]
    UnknownMainIndex(usize),
    #[error("Play-next index {0} is out of range")]
    UnknownNextIndex(usize),
    #[error("No item is currently playing")]
    NothingPlaying,
    #[error("Seek position {0} is outside the seekable range")]
    InvalidSeekFraction(f32),
}

pub type Result<T> = std::result::Result<T, PlayQueueError>;
