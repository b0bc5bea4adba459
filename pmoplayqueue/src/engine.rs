// pmoplayqueue/src/engine.rs
use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shuffle mode as reported by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShuffleMode {
    On,
    #[default]
    Off,
}

/// Repeat mode as reported by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

/// Whether a lifecycle event concerns the current item or the whole player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineScope {
    CurrentItem,
    Player,
}

/// Lifecycle notifications pushed by the engine.
///
/// Indices carried here are engine indices, not main-list offsets.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The engine is about to move to the given index.
    WillChangeAt(usize),
    CurrentItemChanged,
    RateChanged { playing: bool },
    ReachedEnd,
    /// Seconds of the current item already buffered.
    CurrentItemPreloaded { seconds: f64 },
    Failed { scope: EngineScope, error: String },
    Ready(EngineScope),
    ItemFailedToPlayToEnd { error: String },
    ItemStalled,
    /// Periodic time observer tick, in seconds from the start of the item.
    TimeTick { seconds: f64 },
}

/// Generic abstraction of a sequential, index-addressed playback engine.
///
/// The engine owns a flat list of `items_count` slots and asks for the
/// locator of each slot lazily. It never sees main or play-next collections.
pub trait SequentialPlayer {
    /// Engine-side handle of a materialized item.
    type Item: Clone + Debug;

    /// Declares how many slots the engine should expose.
    fn set_items_count(&mut self, count: usize);

    /// Starts playback at `index`, discarding what the engine had buffered.
    fn fetch_and_play(&mut self, index: usize);

    /// Binds `locator` to slot `index` in answer to a locator request.
    fn setup_item(&mut self, locator: &str, index: usize);

    /// Removes slot `index`; later slots shift down by one.
    fn remove_item(&mut self, index: usize);

    /// Moves slot `from` to `to` with remove-then-insert semantics.
    fn move_item(&mut self, from: usize, to: usize);

    fn current_index(&self) -> Option<usize>;
    fn current_item(&self) -> Option<Self::Item>;
    fn is_playing(&self) -> bool;

    fn play(&mut self);
    fn pause(&mut self);
    fn play_next(&mut self);
    fn play_previous(&mut self);

    /// Seeks inside the current item, in seconds.
    fn seek_to_time(&mut self, seconds: f64);

    /// Duration of the current item in seconds, `0.0` when unknown.
    fn playing_item_duration(&self) -> f64;

    fn shuffle_mode(&self) -> ShuffleMode;
    fn set_shuffle_mode(&mut self, mode: ShuffleMode);
    fn repeat_mode(&self) -> RepeatMode;
    fn set_repeat_mode(&mut self, mode: RepeatMode);

    /// Keeps decoded items in memory when supported.
    fn set_memory_cache(&mut self, _enabled: bool) {}

    /// Starts emitting [`EngineEvent::TimeTick`] at the given interval.
    fn start_time_observer(&mut self, interval: Duration);
}
