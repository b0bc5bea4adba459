//! Logical play queue and engine-index translation.
//!
//! ## Index model
//!
//! The engine sees one flat list. Logically that list is the main collection
//! with play-next tracks spliced in:
//!   - tracks already handed to the engine are remembered in the ledger,
//!     including consumed play-next tracks at the slot they were bound to,
//!   - tracks still waiting in the next collection form a block right after
//!     the anchor slot (the item that was playing when the block was started).
//!
//! Translating an engine index to a main index subtracts every spliced slot
//! before it; the reverse translation adds them back. Neither touches state.

use std::collections::{BTreeSet, VecDeque};

use rand::Rng;
use tracing::debug;

use crate::queue::ledger::EngineLedger;
use crate::queue::snapshot::QueueSnapshot;
use crate::track::{Track, TrackOrigin};

/// Where an engine index lands in the logical queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Located {
    Main(usize),
    Next(usize),
}

/// Main, play-next and history collections plus the engine slot ledger.
#[derive(Clone, Debug, Default)]
pub struct PlayQueue {
    main: Vec<Track>,
    next: VecDeque<Track>,
    history: Vec<Track>,
    pending_shuffle: Option<usize>,
    last_shuffle_pick: Option<usize>,
    next_anchor: Option<usize>,
    ledger: EngineLedger,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // =====================================================================
    //  Collections
    // =====================================================================

    /// Replaces the main collection and tags every track with its offset.
    ///
    /// Play-next entries and history are kept. Engine slots bound so far are
    /// forgotten since the host restarts playback on a new playlist.
    pub fn set_playlist(&mut self, tracks: Vec<Track>) {
        self.main = tracks
            .into_iter()
            .enumerate()
            .map(|(i, mut track)| {
                track.origin = TrackOrigin::Main;
                track.position = Some(i);
                track
            })
            .collect();
        self.ledger.clear();
        self.pending_shuffle = None;
        self.last_shuffle_pick = None;
        self.next_anchor = None;
        debug!(main_len = self.main.len(), next_len = self.next.len(), "Playlist replaced");
    }

    pub fn total_tracks(&self) -> usize {
        self.main.len() + self.next.len()
    }

    pub fn main_tracks(&self) -> &[Track] {
        &self.main
    }

    pub fn next_tracks(&self) -> impl ExactSizeIterator<Item = &Track> {
        self.next.iter()
    }

    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }

    pub fn history(&self) -> &[Track] {
        &self.history
    }

    pub fn pending_shuffle(&self) -> Option<usize> {
        self.pending_shuffle
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            main_len: self.main.len(),
            next_len: self.next.len(),
            history_len: self.history.len(),
            pending_shuffle: self.pending_shuffle,
        }
    }

    /// Appends the track that just became current.
    pub fn record_current(&mut self, track: Track) {
        self.history.push(track);
    }

    // =====================================================================
    //  Play-next collection
    // =====================================================================

    /// Queues `track` to play right after engine index `now_index`.
    ///
    /// Later calls append behind tracks already waiting; the block stays
    /// anchored where it was started. Tracks left waiting across a playlist
    /// replace are anchored by the next call.
    pub fn enqueue_next(&mut self, mut track: Track, now_index: usize) {
        track.origin = TrackOrigin::Next;
        track.position = None;
        if self.next_anchor.is_none() {
            self.next_anchor = Some(now_index);
        }
        debug!(track_id = %track.id, now_index, next_len = self.next.len() + 1, "Track queued to play next");
        self.next.push_back(track);
    }

    /// Removes the play-next entry displayed at `index`.
    pub fn dequeue_next_at(&mut self, index: usize) -> Option<Track> {
        let removed = self.next.remove(index);
        if self.next.is_empty() {
            self.next_anchor = None;
        }
        removed
    }

    // =====================================================================
    //  Index translation
    // =====================================================================

    /// Engine slots occupied by play-next tracks, consumed or waiting.
    fn spliced_slots(&self) -> BTreeSet<usize> {
        let mut slots: BTreeSet<usize> = self.ledger.next_slots().collect();
        if let Some(anchor) = self.next_anchor {
            slots.extend((1..=self.next.len()).map(|offset| anchor + offset));
        }
        slots
    }

    fn locate(&self, engine_index: usize) -> Option<Located> {
        if let Some(anchor) = self.next_anchor {
            if engine_index > anchor && engine_index - anchor <= self.next.len() {
                return Some(Located::Next(engine_index - anchor - 1));
            }
        }
        let before = self
            .spliced_slots()
            .range(..engine_index)
            .count();
        let main_index = engine_index - before;
        (main_index < self.main.len()).then_some(Located::Main(main_index))
    }

    fn engine_index_for_main(&self, main_index: usize) -> usize {
        let mut engine_index = main_index;
        for slot in self.spliced_slots() {
            if slot <= engine_index {
                engine_index += 1;
            } else {
                break;
            }
        }
        engine_index
    }

    /// Track the engine reports at `engine_index`, if any.
    ///
    /// Engines report transient or stale indices around transitions, so a
    /// miss is expected and simply yields `None`.
    pub fn track_at(&self, engine_index: usize) -> Option<Track> {
        if let Some(track) = self.ledger.get(engine_index) {
            return Some(track.clone());
        }
        match self.locate(engine_index)? {
            Located::Main(i) => self.main.get(i).cloned(),
            Located::Next(i) => self.next.get(i).cloned(),
        }
    }

    /// Engine index to play for a click on main-list row `ui_index`.
    pub fn resolve_play_at(&self, ui_index: usize) -> Option<usize> {
        (ui_index < self.main.len()).then(|| self.engine_index_for_main(ui_index))
    }

    /// Engine index to play for a click on play-next row `ui_index`.
    ///
    /// The clicked entry moves to the head of the play-next collection and the
    /// block is re-anchored after `now_index`, so it plays at `now_index + 1`.
    /// Play-next tracks already bound past `now_index` but never played go back
    /// to the collection right behind it.
    pub fn resolve_play_next_at(&mut self, ui_index: usize, now_index: usize) -> Option<usize> {
        let chosen = self.next.remove(ui_index)?;

        let unplayed = self
            .ledger
            .truncate_after(now_index)
            .into_iter()
            .filter(|track| track.origin == TrackOrigin::Next);
        for (offset, track) in unplayed.enumerate() {
            self.next.insert(offset, track);
        }
        self.next.push_front(chosen);
        self.next_anchor = Some(now_index);
        self.pending_shuffle = None;

        Some(now_index + 1)
    }

    // =====================================================================
    //  Selection
    // =====================================================================

    /// Track to bind at `engine_index` during forward playback.
    ///
    /// Priority: the head of the play-next collection (consumed, whatever the
    /// index), then a track already bound to that slot, then the main entry the
    /// index translates to. `None` means the queue is exhausted.
    pub fn resolve_for_prefetch(&mut self, engine_index: usize) -> Option<Track> {
        if let Some(track) = self.next.pop_front() {
            self.next_anchor = (!self.next.is_empty()).then_some(engine_index);
            self.ledger.bind(engine_index, track.clone());
            return Some(track);
        }

        if let Some(bound) = self.ledger.get(engine_index) {
            return Some(bound.clone());
        }

        let Located::Main(main_index) = self.locate(engine_index)? else {
            return None;
        };
        let track = self.main.get(main_index)?.clone();
        self.ledger.bind(engine_index, track.clone());
        Some(track)
    }

    /// Picks a random main index for shuffle playback and records it as the
    /// pending pick.
    ///
    /// The previous pick and `playing` are excluded. When that leaves nothing,
    /// only the previous pick is excluded; a one-track playlist whose only
    /// track was the previous pick yields `None`.
    pub fn pick_for_shuffle<R: Rng>(
        &mut self,
        rng: &mut R,
        playing: Option<usize>,
    ) -> Option<(usize, Track)> {
        if self.main.is_empty() {
            return None;
        }
        let previous = self.pending_shuffle.or(self.last_shuffle_pick);

        let mut candidates: Vec<usize> = (0..self.main.len())
            .filter(|i| Some(*i) != previous && Some(*i) != playing)
            .collect();
        if candidates.is_empty() {
            candidates = (0..self.main.len()).filter(|i| Some(*i) != previous).collect();
        }
        if candidates.is_empty() {
            return None;
        }

        let index = candidates[rng.random_range(0..candidates.len())];
        let track = self.main[index].clone();
        self.pending_shuffle = Some(index);
        self.last_shuffle_pick = Some(index);
        self.ledger.bind(index, track.clone());
        Some((index, track))
    }

    /// Forgets the pending shuffle pick and its engine slot.
    ///
    /// Returns the index the caller must also remove from the engine.
    pub fn retract_shuffle_pick(&mut self) -> Option<usize> {
        let index = self.pending_shuffle.take()?;
        self.ledger.remove(index);
        Some(index)
    }

    /// Drops the pending pick before it reached the engine.
    pub fn discard_shuffle_pick(&mut self) {
        if let Some(index) = self.pending_shuffle.take() {
            self.ledger.unbind(index);
        }
    }

    /// Marks the pending pick as played if it sits at `engine_index`.
    pub fn confirm_shuffle_pick(&mut self, engine_index: usize) -> bool {
        if self.pending_shuffle == Some(engine_index) {
            self.pending_shuffle = None;
            true
        } else {
            false
        }
    }

    /// Prepares the engine for a backward step onto slot `target`.
    ///
    /// If the track bound at `target` has already been played there is nothing
    /// to do. Otherwise the most recent history entry other than the current
    /// track is moved to `target` through `move_item(from, to)`.
    ///
    /// The main collection order is never changed. Returns the move made.
    pub fn reorder_after_previous<F>(&mut self, target: usize, mut move_item: F) -> Option<(usize, usize)>
    where
        F: FnMut(usize, usize),
    {
        if let Some(occupant) = self.ledger.get(target) {
            if self.history.iter().any(|played| played.id == occupant.id) {
                return None;
            }
        }

        let current_id = self.history.last().map(|track| track.id.clone());
        let previous_id = self
            .history
            .iter()
            .rev()
            .find(|track| Some(&track.id) != current_id.as_ref())?
            .id
            .clone();

        let from = self.ledger.rposition(&previous_id, target)?;
        debug!(from, to = target, track_id = %previous_id, "Moving previous track back in place");
        move_item(from, target);
        self.ledger.move_slot(from, target);
        Some((from, target))
    }

    /// Mirrors an engine `remove_item(index)`.
    pub fn note_item_removed(&mut self, index: usize) {
        self.ledger.remove(index);
    }

    /// Number of engine slots with a known track.
    pub fn bound_slots(&self) -> usize {
        self.ledger.len()
    }
}
