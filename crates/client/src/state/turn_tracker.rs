//! Turn ownership memory across snapshots.

use skirmish_domain::{PlayerId, TurnOwnership};
use skirmish_shared::GameSnapshot;

/// Holds the turn-ownership value object and advances it through the pure
/// reducer on every snapshot replace. The snapshot itself is never mutated.
#[derive(Debug, Default)]
pub struct TurnTracker {
    ownership: TurnOwnership,
}

/// What changed when folding in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnChange {
    pub owner_changed: bool,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, snapshot: &GameSnapshot) -> TurnChange {
        let next = self
            .ownership
            .observe(snapshot.active_player_id.as_ref(), snapshot.turn_count);
        let owner_changed =
            self.ownership.owner().is_some() && next.owner() != self.ownership.owner();
        self.ownership = next;
        TurnChange { owner_changed }
    }

    pub fn ownership(&self) -> &TurnOwnership {
        &self.ownership
    }

    pub fn is_local_turn(&self, self_id: &PlayerId) -> bool {
        self.ownership.is_owned_by(self_id)
    }
}
