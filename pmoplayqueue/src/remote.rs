/// Transport commands coming from outside the host UI (media keys, lock
/// screen, headset buttons).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteCommand {
    Play,
    Pause,
    TogglePlayPause,
    Next,
    Previous,
}

/// Answer returned to the remote command source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteCommandStatus {
    Success,
    /// The queue is empty, so there is nothing to act on.
    NoActionableItem,
}
