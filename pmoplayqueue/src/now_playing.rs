//! System-wide "now playing" metadata.

use crate::artwork::ArtworkSource;
use crate::track::Track;

/// Metadata block published for the current track.
///
/// Missing text fields are published as empty strings so that displays clear
/// what the previous track left behind.
#[derive(Clone, Debug, PartialEq)]
pub struct NowPlayingInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Seconds; `None` until the engine knows it.
    pub duration: Option<f64>,
    pub artwork: Option<ArtworkSource>,
}

impl NowPlayingInfo {
    pub fn from_track(track: &Track, duration: f64) -> Self {
        Self {
            title: track.name.clone().unwrap_or_default(),
            artist: track.artist_name.clone().unwrap_or_default(),
            album: track.album_name.clone().unwrap_or_default(),
            duration: (duration.is_finite() && duration > 0.0).then_some(duration),
            artwork: track.artwork(),
        }
    }
}
