//! Turn ownership tracking across snapshots.
//!
//! Snapshots taken during transient prompt windows can omit the active
//! player field. Ownership is remembered in this externally-held value and
//! advanced through a pure reducer; the snapshot tree itself is never
//! annotated or mutated.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOwnership {
    last_known_owner: Option<PlayerId>,
    last_known_turn: u64,
}

impl TurnOwnership {
    /// Fold one snapshot's worth of evidence into a new ownership value.
    ///
    /// An explicit active player always wins; an omitted one retains the
    /// previous owner so a prompt window does not flicker the UI into
    /// "nobody's turn".
    pub fn observe(&self, active_player: Option<&PlayerId>, turn_count: u64) -> TurnOwnership {
        match active_player {
            Some(player) => TurnOwnership {
                last_known_owner: Some(player.clone()),
                last_known_turn: turn_count,
            },
            None => TurnOwnership {
                last_known_owner: self.last_known_owner.clone(),
                last_known_turn: self.last_known_turn.max(turn_count),
            },
        }
    }

    pub fn owner(&self) -> Option<&PlayerId> {
        self.last_known_owner.as_ref()
    }

    pub fn turn(&self) -> u64 {
        self.last_known_turn
    }

    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.last_known_owner.as_ref() == Some(player)
    }
}
