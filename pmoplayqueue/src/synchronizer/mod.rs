//! Session object driving a [`SequentialPlayer`] from a [`PlayQueue`].
//!
//! The engine only knows a flat list of slots and asks for them one at a time
//! through [`PlaybackSynchronizer::request_url_for_item`]. Every answer, every
//! host command and every engine notification goes through this type, which
//! keeps the engine slots and the logical queue aligned.
//!
//! The synchronizer holds no lock of its own. Hosts that receive engine
//! callbacks on another thread wrap it with [`PlaybackSynchronizer::into_shared`]
//! and lock around each call, so requests are always served one at a time.

mod state;

pub use state::{RequestOutcome, SyncState};

use std::sync::{Arc, Mutex};

use crossbeam_channel::Receiver;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::config_ext::PlayerSettings;
use crate::engine::{EngineEvent, EngineScope, RepeatMode, SequentialPlayer, ShuffleMode};
use crate::errors::{PlayQueueError, Result};
use crate::events::{PlayerEvent, PlayerEventBus};
use crate::now_playing::NowPlayingInfo;
use crate::queue::{PlayQueue, QueueSnapshot};
use crate::remote::{RemoteCommand, RemoteCommandStatus};
use crate::track::Track;

/// Synchronizer shared between the host and an engine callback thread.
pub type SharedSynchronizer<P> = Arc<Mutex<PlaybackSynchronizer<P>>>;

pub struct PlaybackSynchronizer<P: SequentialPlayer> {
    player: P,
    queue: PlayQueue,
    state: SyncState,
    settings: PlayerSettings,
    events: PlayerEventBus,
    rng: StdRng,
}

impl<P: SequentialPlayer> std::fmt::Debug for PlaybackSynchronizer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSynchronizer")
            .field("state", &self.state)
            .field("queue", &self.queue.snapshot())
            .field("current_index", &self.player.current_index())
            .finish()
    }
}

impl<P: SequentialPlayer> PlaybackSynchronizer<P> {
    pub fn new(player: P, settings: PlayerSettings) -> Self {
        Self::with_event_bus(player, settings, PlayerEventBus::new())
    }

    /// Builds a session publishing on an existing bus.
    pub fn with_event_bus(mut player: P, settings: PlayerSettings, events: PlayerEventBus) -> Self {
        player.set_memory_cache(settings.memory_cache);
        let rng = match settings.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let state = SyncState::settled(player.shuffle_mode() == ShuffleMode::On);
        debug!(
            memory_cache = settings.memory_cache,
            seeded = settings.shuffle_seed.is_some(),
            ?state,
            "Playback synchronizer created"
        );
        Self {
            player,
            queue: PlayQueue::new(),
            state,
            settings,
            events,
            rng,
        }
    }

    pub fn into_shared(self) -> SharedSynchronizer<P> {
        Arc::new(Mutex::new(self))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub fn event_bus(&self) -> &PlayerEventBus {
        &self.events
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    pub fn queue_snapshot(&self) -> QueueSnapshot {
        self.queue.snapshot()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn current_engine_index(&self) -> Option<usize> {
        self.player.current_index()
    }

    pub fn current_engine_item(&self) -> Option<P::Item> {
        self.player.current_item()
    }

    /// Track currently playing, resolved from the engine index.
    pub fn current_track(&self) -> Option<Track> {
        self.player
            .current_index()
            .and_then(|index| self.queue.track_at(index))
    }

    fn emit(&self, event: PlayerEvent) {
        self.events.broadcast(event);
    }

    fn sync_items_count(&mut self) {
        let count = self.queue.total_tracks();
        self.player.set_items_count(count);
        debug!(items_count = count, "Engine item count updated");
    }

    // =========================================================================
    // Locator requests
    // =========================================================================

    /// Answers the engine asking which locator goes at `index`.
    ///
    /// Prefetch hints are ignored. Otherwise the answer depends on the state:
    /// a pending manual jump resumes right after the pre-jump item, shuffle
    /// replaces the previous random pick with a new one, and normal playback
    /// resolves the next track in order. When nothing is left the engine drops
    /// the slot before `index` and plays it again. Tracks without a media
    /// locator are skipped.
    pub fn request_url_for_item(&mut self, index: usize, is_prefetch: bool) -> RequestOutcome {
        if is_prefetch {
            return RequestOutcome::Ignored;
        }

        let shuffle = self.shuffle_enabled();
        self.state = self.state.reconcile(shuffle);

        match self.state {
            SyncState::PendingManualJump { target } => {
                let to = target + 1;
                self.state = SyncState::settled(shuffle);
                debug!(requested = index, to, "Serving pending manual jump");
                self.player.fetch_and_play(to);
                RequestOutcome::Jumped { to }
            }
            SyncState::ShuffleActive => {
                if let Some(retracted) = self.queue.retract_shuffle_pick() {
                    debug!(index = retracted, "Retracting unplayed shuffle pick");
                    self.player.remove_item(retracted);
                }
                let playing = self
                    .current_track()
                    .filter(Track::is_main)
                    .and_then(|track| track.position);
                for _ in 0..self.queue.main_tracks().len() {
                    let Some((pick, track)) = self.queue.pick_for_shuffle(&mut self.rng, playing)
                    else {
                        break;
                    };
                    if !track.is_playable() {
                        warn!(index = pick, track_id = %track.id, "Shuffle pick has no media locator");
                        self.queue.discard_shuffle_pick();
                        continue;
                    }
                    self.player.setup_item(&track.media_locator, pick);
                    debug!(requested = index, index = pick, track_id = %track.id, "Shuffle pick materialized");
                    return RequestOutcome::ShufflePick {
                        index: pick,
                        track_id: track.id,
                    };
                }
                self.resolve_in_order(index)
            }
            SyncState::Normal => self.resolve_in_order(index),
        }
    }

    fn resolve_in_order(&mut self, index: usize) -> RequestOutcome {
        match self.queue.resolve_for_prefetch(index) {
            Some(track) if track.is_playable() => {
                self.player.setup_item(&track.media_locator, index);
                debug!(index, track_id = %track.id, origin = ?track.origin, "Track materialized");
                RequestOutcome::Materialized {
                    index,
                    track_id: track.id,
                }
            }
            Some(track) => self.skip_unplayable(index, &track),
            None if index == 0 => {
                warn!("Locator requested on an empty queue");
                RequestOutcome::Exhausted { rewound_to: None }
            }
            None => {
                let back = index - 1;
                warn!(requested = index, rewound_to = back, "Queue exhausted, replaying last item");
                self.player.remove_item(back);
                self.queue.note_item_removed(back);
                self.player.fetch_and_play(back);
                RequestOutcome::Exhausted {
                    rewound_to: Some(back),
                }
            }
        }
    }

    /// Moves the engine past a slot whose track has no media locator.
    ///
    /// The engine plays the following slot when the queue has one; otherwise
    /// the dead slot is removed.
    fn skip_unplayable(&mut self, index: usize, track: &Track) -> RequestOutcome {
        let following = index
            .checked_add(1)
            .filter(|&next| self.queue.has_next() || self.queue.track_at(next).is_some());
        if let Some(next) = following {
            warn!(index, track_id = %track.id, "Track has no media locator, skipping");
            self.player.fetch_and_play(next);
            RequestOutcome::Skipped {
                index,
                to: Some(next),
            }
        } else {
            warn!(index, track_id = %track.id, "Last track has no media locator, dropping it");
            self.player.remove_item(index);
            self.queue.note_item_removed(index);
            RequestOutcome::Skipped { index, to: None }
        }
    }

    // =========================================================================
    // Queue commands
    // =========================================================================

    /// Replaces the main collection. Play-next entries and history are kept.
    pub fn set_playlist(&mut self, tracks: Vec<Track>) {
        self.queue.set_playlist(tracks);
        self.state = SyncState::settled(self.shuffle_enabled());
        self.sync_items_count();
        self.emit(PlayerEvent::QueueUpdated);
    }

    /// Queues `track` right after the current item.
    pub fn enqueue_next(&mut self, track: Track) -> Result<()> {
        let now = self
            .player
            .current_index()
            .ok_or(PlayQueueError::NothingPlaying)?;
        self.queue.enqueue_next(track, now);
        self.sync_items_count();
        self.emit(PlayerEvent::QueueUpdated);
        Ok(())
    }

    /// Drops the play-next entry displayed at `index`.
    pub fn remove_next_at(&mut self, index: usize) -> Result<Track> {
        let removed = self
            .queue
            .dequeue_next_at(index)
            .ok_or(PlayQueueError::UnknownNextIndex(index))?;
        self.sync_items_count();
        self.emit(PlayerEvent::QueueUpdated);
        Ok(removed)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn play_all(&mut self) {
        self.player.fetch_and_play(0);
    }

    /// Plays a raw engine index.
    pub fn play_at(&mut self, engine_index: usize) {
        self.player.fetch_and_play(engine_index);
    }

    /// Plays main-list row `index`.
    ///
    /// With play-next tracks waiting, the current engine index is remembered so
    /// the next locator request resumes right after it.
    pub fn play_main_at(&mut self, index: usize) -> Result<usize> {
        let engine_index = self
            .queue
            .resolve_play_at(index)
            .ok_or(PlayQueueError::UnknownMainIndex(index))?;

        if self.queue.has_next() {
            if let Some(target) = self.player.current_index() {
                debug!(target, main_index = index, engine_index, "Manual jump pending");
                self.state = SyncState::PendingManualJump { target };
            }
        }
        self.player.fetch_and_play(engine_index);
        Ok(engine_index)
    }

    /// Plays play-next row `index`.
    ///
    /// Row 0 is already the upcoming track, so this is a plain `next()`. Other
    /// rows are moved to the head of the play-next collection first.
    pub fn play_next_at(&mut self, index: usize) -> Result<()> {
        if index >= self.queue.next_tracks().len() {
            return Err(PlayQueueError::UnknownNextIndex(index));
        }
        if index == 0 {
            self.next();
            return Ok(());
        }

        let now = self
            .player
            .current_index()
            .ok_or(PlayQueueError::NothingPlaying)?;
        let slot = self
            .queue
            .resolve_play_next_at(index, now)
            .ok_or(PlayQueueError::UnknownNextIndex(index))?;
        self.sync_items_count();
        self.player.fetch_and_play(slot);
        self.emit(PlayerEvent::QueueUpdated);
        Ok(())
    }

    pub fn play(&mut self) {
        if !self.player.is_playing() {
            self.player.play();
        }
    }

    pub fn pause(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        } else {
            self.player.play();
        }
    }

    pub fn next(&mut self) {
        self.player.play_next();
    }

    /// Steps back, first moving the previously played track into the slot the
    /// engine is about to land on.
    ///
    /// Does nothing while no item is current.
    pub fn previous(&mut self) {
        let Some(current) = self.player.current_index() else {
            debug!("Previous ignored, nothing is playing");
            return;
        };
        if current > 0 {
            let player = &mut self.player;
            self.queue
                .reorder_after_previous(current - 1, |from, to| player.move_item(from, to));
        }
        self.player.play_previous();
    }

    /// Seeks to `fraction` of the current item's duration.
    ///
    /// Does nothing while the duration is unknown.
    pub fn seek_to(&mut self, fraction: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PlayQueueError::InvalidSeekFraction(fraction));
        }
        let duration = self.player.playing_item_duration();
        if duration.is_finite() && duration > 0.0 {
            self.player.seek_to_time(duration * f64::from(fraction));
        } else {
            debug!(fraction, "Seek ignored, duration unknown");
        }
        Ok(())
    }

    /// Seeks from a slider position expressed in `[min, max]`.
    pub fn seek_to_slider(&mut self, value: f32, min: f32, max: f32) -> Result<()> {
        if max <= min {
            return Err(PlayQueueError::InvalidSeekFraction(value));
        }
        self.seek_to((value - min) / (max - min))
    }

    // =========================================================================
    // Shuffle / repeat
    // =========================================================================

    pub fn shuffle_enabled(&self) -> bool {
        self.player.shuffle_mode() == ShuffleMode::On
    }

    pub fn enable_shuffle(&mut self) {
        self.player.set_shuffle_mode(ShuffleMode::On);
        self.state = self.state.reconcile(true);
    }

    pub fn disable_shuffle(&mut self) {
        self.player.set_shuffle_mode(ShuffleMode::Off);
        self.state = self.state.reconcile(false);
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.player.repeat_mode()
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.player.set_repeat_mode(mode);
    }

    pub fn enable_repeat(&mut self) {
        self.set_repeat_mode(RepeatMode::All);
    }

    pub fn enable_repeat_one(&mut self) {
        self.set_repeat_mode(RepeatMode::One);
    }

    pub fn disable_repeat(&mut self) {
        self.set_repeat_mode(RepeatMode::Off);
    }

    // =========================================================================
    // Remote commands
    // =========================================================================

    pub fn handle_remote_command(&mut self, command: RemoteCommand) -> RemoteCommandStatus {
        if self.queue.total_tracks() == 0 {
            debug!(?command, "Remote command ignored, queue is empty");
            return RemoteCommandStatus::NoActionableItem;
        }
        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.pause(),
            RemoteCommand::TogglePlayPause => self.toggle_play_pause(),
            RemoteCommand::Next => self.next(),
            RemoteCommand::Previous => self.previous(),
        }
        RemoteCommandStatus::Success
    }

    // =========================================================================
    // Engine notifications
    // =========================================================================

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.settings.log_events {
            debug!(?event, current_index = ?self.player.current_index(), "Engine event");
        }

        match event {
            EngineEvent::CurrentItemChanged => self.on_current_item_changed(),
            EngineEvent::RateChanged { playing } => {
                self.emit(PlayerEvent::RateChanged { playing });
            }
            EngineEvent::Failed {
                scope: EngineScope::CurrentItem,
                error,
            } => {
                warn!(
                    error = %error,
                    current_index = ?self.player.current_index(),
                    "Current item failed; advancing"
                );
                self.emit(PlayerEvent::PlaybackFailed {
                    scope: EngineScope::CurrentItem,
                    message: error,
                });
                self.next();
            }
            EngineEvent::Failed {
                scope: EngineScope::Player,
                error,
            } => {
                error!(error = %error, "Player failed");
                self.emit(PlayerEvent::PlaybackFailed {
                    scope: EngineScope::Player,
                    message: error,
                });
            }
            EngineEvent::Ready(EngineScope::CurrentItem) => {
                self.refresh_duration();
                self.publish_now_playing(self.current_track().as_ref());
            }
            EngineEvent::Ready(EngineScope::Player) => {
                let interval = self.settings.time_observer_interval;
                debug!(interval_ms = interval.as_millis() as u64, "Starting time observer");
                self.player.start_time_observer(interval);
            }
            EngineEvent::TimeTick { seconds } => {
                self.emit(PlayerEvent::CurrentTimeChanged(seconds));
            }
            EngineEvent::ItemFailedToPlayToEnd { error } => {
                warn!(error = %error, "Item failed to play to its end");
            }
            EngineEvent::ItemStalled => {
                warn!(current_index = ?self.player.current_index(), "Playback stalled");
            }
            EngineEvent::ReachedEnd => {
                info!("Engine reached the end of its items");
            }
            EngineEvent::WillChangeAt(_) | EngineEvent::CurrentItemPreloaded { .. } => {}
        }
    }

    fn on_current_item_changed(&mut self) {
        let index = self.player.current_index();
        let track = index.and_then(|i| self.queue.track_at(i));

        if let Some(index) = index {
            if self.queue.confirm_shuffle_pick(index) {
                debug!(index, "Shuffle pick started playing");
            }
        }
        match &track {
            Some(track) => self.queue.record_current(track.clone()),
            None => debug!(current_index = ?index, "Current item does not map to a track"),
        }

        self.emit(PlayerEvent::TrackChanged(track.clone()));
        self.emit(PlayerEvent::QueueUpdated);
        self.refresh_duration();
        self.publish_now_playing(track.as_ref());
    }

    fn refresh_duration(&self) {
        let duration = self.player.playing_item_duration();
        if duration.is_finite() && duration > 0.0 {
            self.emit(PlayerEvent::DurationKnown(duration));
        }
    }

    fn publish_now_playing(&self, track: Option<&Track>) {
        if let Some(track) = track {
            let info = NowPlayingInfo::from_track(track, self.player.playing_item_duration());
            self.emit(PlayerEvent::NowPlayingChanged(info));
        }
    }
}
