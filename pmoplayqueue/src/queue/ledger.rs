//! Mirror of the engine's flat item list.
//!
//! The ledger remembers which track was bound to which engine slot. Structural
//! engine commands (`remove_item`, `move_item`) shift indices, so the ledger
//! applies the same shifts to stay aligned.

use std::collections::BTreeMap;

use crate::track::{Track, TrackOrigin};

#[derive(Clone, Debug, Default)]
pub(crate) struct EngineLedger {
    slots: BTreeMap<usize, Track>,
}

impl EngineLedger {
    pub(crate) fn bind(&mut self, index: usize, track: Track) {
        self.slots.insert(index, track);
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Track> {
        self.slots.get(&index)
    }

    /// Forgets the slot at `index` without shifting later slots.
    pub(crate) fn unbind(&mut self, index: usize) -> Option<Track> {
        self.slots.remove(&index)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Removes the slot at `index`; every later slot moves down by one.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Track> {
        let removed = self.slots.remove(&index);
        let tail = self.slots.split_off(&index);
        for (k, track) in tail {
            self.slots.insert(k - 1, track);
        }
        removed
    }

    /// Moves the slot at `from` to `to` with remove-then-insert semantics.
    pub(crate) fn move_slot(&mut self, from: usize, to: usize) {
        let moving = self.remove(from);
        let tail = self.slots.split_off(&to);
        for (k, track) in tail {
            self.slots.insert(k + 1, track);
        }
        if let Some(track) = moving {
            self.slots.insert(to, track);
        }
    }

    /// Drops every slot after `index`, returning the dropped tracks in order.
    pub(crate) fn truncate_after(&mut self, index: usize) -> Vec<Track> {
        let Some(start) = index.checked_add(1) else {
            return Vec::new();
        };
        self.slots.split_off(&start).into_values().collect()
    }

    /// Engine indices currently holding a play-next track.
    pub(crate) fn next_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .filter(|(_, track)| track.origin == TrackOrigin::Next)
            .map(|(index, _)| *index)
    }

    /// Highest slot bound to a track with this id, skipping `except`.
    pub(crate) fn rposition(&self, id: &str, except: usize) -> Option<usize> {
        self.slots
            .iter()
            .rev()
            .find(|(index, track)| **index != except && track.id == id)
            .map(|(index, _)| *index)
    }
}
