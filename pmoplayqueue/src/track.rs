//! Playable track description.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artwork::ArtworkSource;

/// Collection a [`Track`] instance was produced by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackOrigin {
    /// Regular playlist entry.
    #[default]
    Main,
    /// Entry inserted through "play next".
    Next,
}

/// One playable item.
///
/// Tracks are plain values: the queue clones them into its collections and
/// rewrites only `origin` and `position`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque identifier, used to match a track across engine slots.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    /// Remote link or local path to cover art.
    #[serde(default)]
    pub artwork_locator: Option<String>,
    /// Locator handed to the engine when the track is materialized.
    pub media_locator: String,
    #[serde(default)]
    pub origin: TrackOrigin,
    /// Offset in the main collection at the last `set_playlist`.
    ///
    /// Only a full playlist replace rewrites it; `None` for play-next tracks.
    #[serde(default)]
    pub position: Option<usize>,
}

impl Track {
    /// Creates a main-origin track with a fresh random id.
    pub fn new(media_locator: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: None,
            artist_name: None,
            album_name: None,
            artwork_locator: None,
            media_locator: media_locator.into(),
            origin: TrackOrigin::Main,
            position: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_name = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album_name = Some(album.into());
        self
    }

    pub fn with_artwork(mut self, locator: impl Into<String>) -> Self {
        self.artwork_locator = Some(locator.into());
        self
    }

    /// Classified artwork locator; `None` when absent or unusable.
    pub fn artwork(&self) -> Option<ArtworkSource> {
        self.artwork_locator.as_deref().and_then(ArtworkSource::parse)
    }

    /// True when the media locator can be handed to the engine at all.
    pub fn is_playable(&self) -> bool {
        !self.media_locator.trim().is_empty()
    }

    pub fn is_main(&self) -> bool {
        self.origin == TrackOrigin::Main
    }
}
