//! # pmoplayqueue
//!
//! Keeps a user-facing playlist (main order, "play next" insertions, shuffle,
//! history) aligned with a sequential playback engine that only knows a flat
//! list of slots and asks for them one index at a time.
//!
//! - [`PlayQueue`] owns the collections and translates indices.
//! - [`PlaybackSynchronizer`] answers engine requests, forwards host commands
//!   and republishes engine notifications as [`PlayerEvent`]s.
//! - [`SequentialPlayer`] is the engine contract a host implements.
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoplayqueue::{PlaybackSynchronizer, PlayerConfigExt, SequentialPlayer, Track};
//!
//! fn start<P: SequentialPlayer>(engine: P) -> pmoplayqueue::SharedSynchronizer<P> {
//!     let mut session = PlaybackSynchronizer::new(engine, get_config().player_settings());
//!     session.set_playlist(vec![
//!         Track::new("https://example.org/a.flac").with_name("A"),
//!         Track::new("https://example.org/b.flac").with_name("B"),
//!     ]);
//!     session.play_all();
//!     session.into_shared()
//! }
//! ```

pub mod artwork;
pub mod config_ext;
pub mod engine;
pub mod errors;
pub mod events;
pub mod now_playing;
pub mod queue;
pub mod remote;
pub mod synchronizer;
pub mod track;

pub use artwork::ArtworkSource;
pub use config_ext::{PlayerConfigExt, PlayerSettings};
pub use engine::{EngineEvent, EngineScope, RepeatMode, SequentialPlayer, ShuffleMode};
pub use errors::{PlayQueueError, Result};
pub use events::{PlayerEvent, PlayerEventBus};
pub use now_playing::NowPlayingInfo;
pub use queue::{PlayQueue, QueueSnapshot};
pub use remote::{RemoteCommand, RemoteCommandStatus};
pub use synchronizer::{PlaybackSynchronizer, RequestOutcome, SharedSynchronizer, SyncState};
pub use track::{Track, TrackOrigin};
