use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::engine::EngineScope;
use crate::now_playing::NowPlayingInfo;
use crate::track::Track;

/// Notifications emitted towards the host UI.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    /// The current track changed; `None` when the engine index is unknown.
    TrackChanged(Option<Track>),
    /// Duration of the current item in seconds, once known.
    DurationKnown(f64),
    CurrentTimeChanged(f64),
    RateChanged { playing: bool },
    /// Main, play-next or history collections changed.
    QueueUpdated,
    NowPlayingChanged(NowPlayingInfo),
    PlaybackFailed { scope: EngineScope, message: String },
}

#[derive(Clone, Default)]
pub struct PlayerEventBus {
    subscribers: Arc<Mutex<Vec<Sender<PlayerEvent>>>>,
}

impl PlayerEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        let (tx, rx) = unbounded::<PlayerEvent>();
        {
            let mut subscribers = self.subscribers.lock().unwrap();
            subscribers.push(tx);
        }
        rx
    }

    pub fn broadcast(&self, event: PlayerEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}
