//! The polled game snapshot tree.
//!
//! The engine is authoritative; the client only reads these shapes. Every
//! optional or late-added field carries `#[serde(default)]` so a newer or
//! older engine never breaks deserialization, and unknown enum tags land on
//! `Unknown` variants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use skirmish_domain::{
    BattleStatus, CardKind, CardUid, ChoiceKind, EntryId, EntryStatus, EventId, GameId, GameStatus,
    PhaseKind, PlayerId, RuleTiming, ZoneId,
};

fn default_true() -> bool {
    true
}

// =============================================================================
// Snapshot tree
// =============================================================================

/// Full game state as returned by the status poll
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: GameId,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub phase: PhaseKind,
    #[serde(default)]
    pub turn_count: u64,
    /// Omitted by the engine during some transient prompt windows;
    /// see `TurnOwnership` for how the client bridges the gap.
    #[serde(default)]
    pub active_player_id: Option<PlayerId>,
    #[serde(default)]
    pub players: Vec<PlayerState>,
    #[serde(default)]
    pub current_battle: Option<CurrentBattle>,
    /// Action ids currently forbidden by an ongoing effect
    #[serde(default)]
    pub restricted_actions: Vec<String>,
    /// Append-only pending-decision queue
    #[serde(default)]
    pub notifications: Vec<NotificationEntry>,
    /// Entries currently being resolved by the engine
    #[serde(default)]
    pub processing_queue: Vec<NotificationEntry>,
}

impl GameSnapshot {
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| &p.player_id == id)
    }

    pub fn opponent_of(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| &p.player_id != id)
    }

    pub fn battle_status(&self) -> Option<BattleStatus> {
        self.current_battle.as_ref().map(|b| b.status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub player_id: PlayerId,
    #[serde(default)]
    pub hand: Vec<HandCard>,
    #[serde(default)]
    pub battle_area: Vec<BoardSlot>,
    #[serde(default)]
    pub base: Option<CardInPlay>,
    #[serde(default)]
    pub shields_remaining: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandCard {
    pub uid: CardUid,
    #[serde(default)]
    pub card_type: CardKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<CardRule>,
}

/// One board position; may hold a unit and a paired pilot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSlot {
    pub zone_id: ZoneId,
    #[serde(default)]
    pub card: Option<CardInPlay>,
    #[serde(default)]
    pub pilot: Option<CardInPlay>,
    /// Untapped and able to act this turn
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInPlay {
    pub uid: CardUid,
    #[serde(default)]
    pub card_type: CardKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<CardRule>,
}

impl CardInPlay {
    pub fn has_rule_with_timing(&self, timing: RuleTiming) -> bool {
        self.rules.iter().any(|r| r.timing == timing)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRule {
    #[serde(default)]
    pub timing: RuleTiming,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Battle
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBattle {
    #[serde(default)]
    pub status: BattleStatus,
    #[serde(default)]
    pub attacker: Option<BattleRef>,
    #[serde(default)]
    pub target: Option<BattleRef>,
    /// Which players have passed the current action step
    #[serde(default)]
    pub confirmations: BTreeMap<PlayerId, bool>,
    /// Per-player legal action-step targets
    #[serde(default)]
    pub action_targets: BTreeMap<PlayerId, Vec<ActionTargetRef>>,
}

impl CurrentBattle {
    pub fn is_confirmed_by(&self, player: &PlayerId) -> bool {
        self.confirmations.get(player).copied().unwrap_or(false)
    }

    pub fn targets_for(&self, player: &PlayerId) -> &[ActionTargetRef] {
        self.action_targets
            .get(player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRef {
    pub player_id: PlayerId,
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    #[serde(default)]
    pub card_uid: Option<CardUid>,
}

/// A server-declared legal action-step target.
///
/// Matching precedence on the client is card uid first, then zone, then the
/// `location == "hand"` wildcard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTargetRef {
    #[serde(default)]
    pub card_uid: Option<CardUid>,
    #[serde(default)]
    pub zone: Option<ZoneId>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ActionTargetRef {
    pub fn is_hand_wildcard(&self) -> bool {
        self.location.as_deref() == Some("hand")
    }
}

// =============================================================================
// Notification queue
// =============================================================================

/// Wire discriminator of a notification entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "PROMPT_CHOICE")]
    PromptChoice,
    #[serde(rename = "OPTION_CHOICE")]
    OptionChoice,
    #[serde(rename = "TOKEN_CHOICE")]
    TokenChoice,
    #[serde(rename = "BURST_EFFECT_CHOICE")]
    BurstEffectChoice,
    #[serde(rename = "BURST_EFFECT_CHOICE_GROUP")]
    BurstEffectChoiceGroup,
    #[serde(rename = "BLOCKER_CHOICE")]
    BlockerChoice,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NotificationKind {
    pub fn choice_kind(self) -> Option<ChoiceKind> {
        match self {
            NotificationKind::PromptChoice => Some(ChoiceKind::Prompt),
            NotificationKind::OptionChoice => Some(ChoiceKind::Option),
            NotificationKind::TokenChoice => Some(ChoiceKind::Token),
            NotificationKind::BurstEffectChoice => Some(ChoiceKind::Burst),
            NotificationKind::BurstEffectChoiceGroup => Some(ChoiceKind::BurstGroup),
            NotificationKind::BlockerChoice => Some(ChoiceKind::Blocker),
            NotificationKind::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntry {
    pub id: EntryId,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default)]
    pub payload: NotificationPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(default)]
    pub event: Option<EventRef>,
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub data: Option<ChoiceData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRef {
    pub id: EventId,
    #[serde(default)]
    pub description: Option<String>,
}

/// Decision payload attached to a choice notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceData {
    #[serde(default)]
    pub user_decision_made: bool,
    #[serde(default)]
    pub available_options: Vec<ChoiceOption>,
    #[serde(default)]
    pub available_choices: Vec<ChoiceOption>,
    #[serde(default)]
    pub available_targets: Vec<TargetOption>,
    /// Rows of a grouped burst notification
    #[serde(default)]
    pub events: Vec<BurstEventRef>,
    /// Group rows the engine has already resolved
    #[serde(default)]
    pub resolved_event_ids: Vec<EventId>,
    #[serde(default)]
    pub prompt_text: Option<String>,
    /// Server-driven decision deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub tag: Option<OptionTag>,
}

/// Marker tags the engine attaches to options; `Bottom` designates the safe
/// default used when a decision times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionTag {
    #[serde(rename = "BOTTOM")]
    Bottom,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOption {
    #[serde(default)]
    pub card_uid: Option<CardUid>,
    #[serde(default)]
    pub zone: Option<ZoneId>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurstEventRef {
    pub event_id: EventId,
    #[serde(default)]
    pub card_uid: Option<CardUid>,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Normalized choice entries
// =============================================================================

/// A notification entry normalized for flow-manager consumption
#[derive(Debug, Clone, Default)]
pub struct ChoiceEntry {
    pub id: EntryId,
    pub event_id: Option<EventId>,
    pub player_id: Option<PlayerId>,
    pub is_completed: bool,
    pub data: ChoiceData,
}

impl ChoiceEntry {
    /// Normalize an entry if it carries the requested choice kind and has
    /// not been resolved by the engine.
    pub fn from_notification(entry: &NotificationEntry, kind: ChoiceKind) -> Option<ChoiceEntry> {
        if entry.kind.choice_kind() != Some(kind) || entry.status.is_resolved() {
            return None;
        }
        Some(ChoiceEntry {
            id: entry.id.clone(),
            event_id: entry.payload.event.as_ref().map(|e| e.id.clone()),
            player_id: entry.payload.player_id.clone(),
            is_completed: entry.payload.is_completed.unwrap_or(false),
            data: entry.payload.data.clone().unwrap_or_default(),
        })
    }
}

/// Locate the active entry for a choice kind: processing queue first, then
/// the notification queue, newest entries first in both.
pub fn find_active_entry(snapshot: &GameSnapshot, kind: ChoiceKind) -> Option<ChoiceEntry> {
    snapshot
        .processing_queue
        .iter()
        .rev()
        .chain(snapshot.notifications.iter().rev())
        .find_map(|entry| ChoiceEntry::from_notification(entry, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, kind: NotificationKind, status: EntryStatus) -> NotificationEntry {
        NotificationEntry {
            id: EntryId::new(id),
            kind,
            status,
            payload: NotificationPayload::default(),
        }
    }

    #[test]
    fn parses_a_realistic_snapshot() {
        let json = r#"{
            "gameId": "g1",
            "status": "IN_PROGRESS",
            "phase": "MAIN_PHASE",
            "turnCount": 4,
            "activePlayerId": "player_1",
            "players": [
                {
                    "playerId": "player_1",
                    "hand": [{"uid": "H1", "cardType": "COMMAND", "name": "Flare"}],
                    "battleArea": [
                        {"zoneId": "slot1", "card": {"uid": "U1", "cardType": "UNIT", "name": "Striker",
                            "rules": [{"timing": "ACTION_STEP", "description": "Boost"}]}}
                    ],
                    "shieldsRemaining": 3
                },
                {"playerId": "player_2", "battleArea": [{"zoneId": "slot1"}], "shieldsRemaining": 5}
            ],
            "currentBattle": {
                "status": "ACTION_STEP",
                "confirmations": {"player_1": false, "player_2": true},
                "actionTargets": {"player_1": [{"cardUid": "U1", "zone": "slot1"}]}
            },
            "notifications": [
                {"id": "n1", "type": "BURST_EFFECT_CHOICE", "status": "PENDING",
                 "payload": {"playerId": "player_2", "data": {"userDecisionMade": false}}}
            ]
        }"#;

        let snapshot: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert_eq!(snapshot.phase, PhaseKind::Main);
        assert_eq!(snapshot.battle_status(), Some(BattleStatus::ActionStep));
        let p1 = PlayerId::new("player_1");
        let battle = snapshot.current_battle.as_ref().unwrap();
        assert!(!battle.is_confirmed_by(&p1));
        assert_eq!(battle.targets_for(&p1).len(), 1);
        let unit = snapshot.players[0].battle_area[0].card.as_ref().unwrap();
        assert!(unit.has_rule_with_timing(RuleTiming::ActionStep));

        let found = find_active_entry(&snapshot, ChoiceKind::Burst).unwrap();
        assert_eq!(found.id, EntryId::new("n1"));
        assert_eq!(found.player_id, Some(PlayerId::new("player_2")));
    }

    #[test]
    fn unknown_notification_kind_is_tolerated() {
        let json = r#"{"id": "n9", "type": "FIREWORKS", "payload": {}}"#;
        let parsed: NotificationEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, NotificationKind::Unknown);
        assert_eq!(parsed.kind.choice_kind(), None);
    }

    #[test]
    fn find_prefers_processing_queue_over_notifications() {
        let snapshot = GameSnapshot {
            notifications: vec![entry(
                "note",
                NotificationKind::OptionChoice,
                EntryStatus::Pending,
            )],
            processing_queue: vec![entry(
                "proc",
                NotificationKind::OptionChoice,
                EntryStatus::Processing,
            )],
            ..Default::default()
        };
        let found = find_active_entry(&snapshot, ChoiceKind::Option).unwrap();
        assert_eq!(found.id, EntryId::new("proc"));
    }

    #[test]
    fn find_takes_newest_first_and_skips_resolved() {
        let snapshot = GameSnapshot {
            notifications: vec![
                entry("old", NotificationKind::OptionChoice, EntryStatus::Pending),
                entry("new", NotificationKind::OptionChoice, EntryStatus::Pending),
                entry("done", NotificationKind::OptionChoice, EntryStatus::Resolved),
            ],
            ..Default::default()
        };
        let found = find_active_entry(&snapshot, ChoiceKind::Option).unwrap();
        assert_eq!(found.id, EntryId::new("new"));
    }

    #[test]
    fn find_ignores_other_kinds() {
        let snapshot = GameSnapshot {
            notifications: vec![entry(
                "n1",
                NotificationKind::BlockerChoice,
                EntryStatus::Pending,
            )],
            ..Default::default()
        };
        assert!(find_active_entry(&snapshot, ChoiceKind::Burst).is_none());
    }
}
