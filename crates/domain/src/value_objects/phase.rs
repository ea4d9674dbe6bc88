//! Game phases, battle steps, and player-relative sides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// Overall game lifecycle status reported by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[serde(rename = "WAITING")]
    Waiting,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "FINISHED")]
    Finished,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Turn phase of the active player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    #[serde(rename = "START_PHASE")]
    Start,
    #[serde(rename = "DRAW_PHASE")]
    Draw,
    #[serde(rename = "RESOURCE_PHASE")]
    Resource,
    #[serde(rename = "MAIN_PHASE")]
    Main,
    #[serde(rename = "END_PHASE")]
    End,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Step of the battle currently being resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleStatus {
    #[serde(rename = "ATTACK_STEP")]
    AttackStep,
    #[serde(rename = "BLOCK_STEP")]
    BlockStep,
    #[serde(rename = "ACTION_STEP")]
    ActionStep,
    #[serde(rename = "DAMAGE_STEP")]
    DamageStep,
    #[serde(rename = "BATTLE_END")]
    BattleEnd,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A board side relative to the local player.
///
/// The wire protocol speaks in absolute `PlayerId`s; the rendering layer and
/// slot addressing speak in sides. `Side::of` is the only conversion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Local,
    Opponent,
}

impl Side {
    pub fn of(player: &PlayerId, self_id: &PlayerId) -> Side {
        if player == self_id {
            Side::Local
        } else {
            Side::Opponent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Local => "local",
            Side::Opponent => "opponent",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
