//! Outbound request payloads.
//!
//! Every request carries `game_id`/`player_id` stamped from the client's
//! current context at send time; payload builders deliberately do not accept
//! them so a stale capture cannot leak into a request.

use serde::{Deserialize, Serialize};

use skirmish_domain::{CardUid, EntryId, EventId, GameId, PlayerId, ZoneId};

/// Generic game action submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActionRequest {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub action: PlayerActionKind,
}

/// Concrete game actions the client can take outside of choice flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerActionKind {
    /// Declare an attack against an opponent unit
    AttackUnit {
        attacker: ZoneId,
        target: ZoneId,
        target_player: PlayerId,
    },
    /// Declare an attack against the opponent's shield area
    AttackShieldArea { attacker: ZoneId },
    /// Pass the current action step
    ConfirmBattleAction,
    /// Activate a main-phase ability on a card in play
    ActivateAbility { card_uid: CardUid, ability_index: u32 },
    /// Play a card from hand, optionally into a specific slot
    PlayCard {
        card_uid: CardUid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<ZoneId>,
    },
    /// End the current turn
    EndTurn,
}

/// Per-kind decision submission.
///
/// `entry_id` identifies the notification entry being answered; for grouped
/// burst rows `event_id` additionally selects the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmChoiceRequest {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub entry_id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    pub decision: ChoiceDecision,
}

/// The decision body of a choice submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChoiceDecision {
    Option {
        option_id: String,
    },
    Token {
        token_id: String,
    },
    Target {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        card_uid: Option<CardUid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zone: Option<ZoneId>,
    },
    Burst {
        decision: BurstDecision,
    },
    /// `None` target means the defender declines to block
    Blocker {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<TargetSelector>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_uid: Option<CardUid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneId>,
}

/// Accept/decline decision for a burst effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstDecision {
    #[serde(rename = "ACTIVATE")]
    Activate,
    #[serde(rename = "PASS")]
    Pass,
}

impl BurstDecision {
    /// Decision applied when the burst timer elapses without an answer.
    ///
    /// Activation is the deliberate game-design default: not cancelling a
    /// burst means it triggers.
    pub const TIMEOUT_DEFAULT: BurstDecision = BurstDecision::Activate;
}

/// Batch acknowledgement for grouped/compound notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeEventsRequest {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub event_ids: Vec<EventId>,
}
