use serde::Serialize;

/// Navigation state consulted by every locator request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SyncState {
    /// Forward playback through the play-next and main collections.
    #[default]
    Normal,
    /// The user jumped into the main collection while play-next tracks were
    /// waiting. `target` is the engine index that was current before the jump.
    PendingManualJump { target: usize },
    /// The engine is in shuffle mode; requests are answered with random picks.
    ShuffleActive,
}

impl SyncState {
    pub fn is_pending_jump(&self) -> bool {
        matches!(self, SyncState::PendingManualJump { .. })
    }

    /// State to return to once nothing is pending.
    pub(crate) fn settled(shuffle: bool) -> Self {
        if shuffle {
            SyncState::ShuffleActive
        } else {
            SyncState::Normal
        }
    }

    /// Re-aligns with the engine shuffle mode without dropping a pending jump.
    pub(crate) fn reconcile(self, shuffle: bool) -> Self {
        match self {
            SyncState::PendingManualJump { .. } => self,
            _ => Self::settled(shuffle),
        }
    }
}

/// What a locator request ended up doing to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RequestOutcome {
    /// Prefetch hint; nothing was resolved.
    Ignored,
    /// A pending manual jump was served with `fetch_and_play(to)`.
    Jumped { to: usize },
    /// A track was bound to the requested index.
    Materialized { index: usize, track_id: String },
    /// A shuffle pick was bound at its main index.
    ShufflePick { index: usize, track_id: String },
    /// Nothing left to play. `rewound_to` is the index played again, if any.
    Exhausted { rewound_to: Option<usize> },
    /// The track at `index` has no usable media locator. The engine was sent
    /// to `to`, or the slot was removed when nothing follows it.
    Skipped { index: usize, to: Option<usize> },
}
