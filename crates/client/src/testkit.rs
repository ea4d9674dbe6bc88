//! Test fixtures: snapshot builders shared across the test suite.
//!
//! Conventions: the local player is `player_1`, the opponent `player_2`;
//! both exist in every built snapshot.

use std::collections::BTreeMap;

use skirmish_domain::{
    BattleStatus, CardKind, CardUid, EntryId, EntryStatus, EventId, GameId, GameStatus, PhaseKind,
    PlayerId, RuleTiming, ZoneId,
};
use skirmish_shared::snapshot::{
    ActionTargetRef, BoardSlot, BurstEventRef, CardInPlay, CardRule, ChoiceData, ChoiceOption,
    CurrentBattle, GameSnapshot, HandCard, NotificationEntry, NotificationKind,
    NotificationPayload, PlayerState, TargetOption,
};

pub const LOCAL: &str = "player_1";
pub const OPPONENT: &str = "player_2";

/// Simple enabled option rows from ids
pub fn options(ids: &[&str]) -> Vec<ChoiceOption> {
    ids.iter()
        .map(|id| ChoiceOption {
            id: (*id).to_string(),
            label: (*id).to_uppercase(),
            enabled: true,
            tag: None,
        })
        .collect()
}

pub fn snapshot() -> SnapshotBuilder {
    SnapshotBuilder::default()
}

pub struct SnapshotBuilder {
    snapshot: GameSnapshot,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        let snapshot = GameSnapshot {
            game_id: GameId::new("g1"),
            status: GameStatus::InProgress,
            players: vec![
                PlayerState {
                    player_id: PlayerId::new(LOCAL),
                    ..Default::default()
                },
                PlayerState {
                    player_id: PlayerId::new(OPPONENT),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        Self { snapshot }
    }
}

impl SnapshotBuilder {
    pub fn build(self) -> GameSnapshot {
        self.snapshot
    }

    pub fn main_phase(mut self, active_player: &str) -> Self {
        self.snapshot.phase = PhaseKind::Main;
        self.snapshot.active_player_id = Some(PlayerId::new(active_player));
        self.snapshot.turn_count = self.snapshot.turn_count.max(1);
        self
    }

    pub fn with_restriction(mut self, action: &str) -> Self {
        self.snapshot.restricted_actions.push(action.to_string());
        self
    }

    // -------------------------------------------------------------------------
    // Board
    // -------------------------------------------------------------------------

    fn player_mut(&mut self, player: &str) -> &mut PlayerState {
        let id = PlayerId::new(player);
        let index = self
            .snapshot
            .players
            .iter()
            .position(|p| p.player_id == id)
            .unwrap_or_else(|| {
                self.snapshot.players.push(PlayerState {
                    player_id: id,
                    ..Default::default()
                });
                self.snapshot.players.len() - 1
            });
        &mut self.snapshot.players[index]
    }

    fn unit(uid: &str, rules: Vec<CardRule>) -> CardInPlay {
        CardInPlay {
            uid: CardUid::new(uid),
            card_type: CardKind::Unit,
            name: uid.to_string(),
            rules,
        }
    }

    fn trigger_rule() -> CardRule {
        CardRule {
            timing: RuleTiming::ActionStep,
            description: "triggerable".to_string(),
        }
    }

    pub fn with_local_unit(mut self, zone: &str, uid: &str, active: bool) -> Self {
        self.player_mut(LOCAL).battle_area.push(BoardSlot {
            zone_id: ZoneId::new(zone),
            card: Some(Self::unit(uid, Vec::new())),
            pilot: None,
            active,
        });
        self
    }

    pub fn with_local_unit_with_trigger(mut self, zone: &str, uid: &str) -> Self {
        self.player_mut(LOCAL).battle_area.push(BoardSlot {
            zone_id: ZoneId::new(zone),
            card: Some(Self::unit(uid, vec![Self::trigger_rule()])),
            pilot: None,
            active: true,
        });
        self
    }

    pub fn with_local_piloted_unit_with_triggers(
        mut self,
        zone: &str,
        unit_uid: &str,
        pilot_uid: &str,
    ) -> Self {
        let pilot = CardInPlay {
            uid: CardUid::new(pilot_uid),
            card_type: CardKind::Pilot,
            name: pilot_uid.to_string(),
            rules: vec![Self::trigger_rule()],
        };
        self.player_mut(LOCAL).battle_area.push(BoardSlot {
            zone_id: ZoneId::new(zone),
            card: Some(Self::unit(unit_uid, vec![Self::trigger_rule()])),
            pilot: Some(pilot),
            active: true,
        });
        self
    }

    pub fn with_opponent_unit(mut self, zone: &str, uid: &str) -> Self {
        self.player_mut(OPPONENT).battle_area.push(BoardSlot {
            zone_id: ZoneId::new(zone),
            card: Some(Self::unit(uid, Vec::new())),
            pilot: None,
            active: true,
        });
        self
    }

    pub fn with_hand_card(mut self, player: &str, uid: &str) -> Self {
        self.player_mut(player).hand.push(HandCard {
            uid: CardUid::new(uid),
            card_type: CardKind::Command,
            name: uid.to_string(),
            rules: Vec::new(),
        });
        self
    }

    // -------------------------------------------------------------------------
    // Battle
    // -------------------------------------------------------------------------

    fn battle_mut(&mut self) -> &mut CurrentBattle {
        self.snapshot
            .current_battle
            .get_or_insert_with(|| CurrentBattle {
                status: BattleStatus::ActionStep,
                ..Default::default()
            })
    }

    pub fn with_action_step(mut self, confirmations: &[(&str, bool)]) -> Self {
        let battle = self.battle_mut();
        battle.status = BattleStatus::ActionStep;
        battle.confirmations = confirmations
            .iter()
            .map(|(player, confirmed)| (PlayerId::new(*player), *confirmed))
            .collect::<BTreeMap<_, _>>();
        self
    }

    pub fn with_action_target(
        mut self,
        player: &str,
        card_uid: Option<&str>,
        zone: Option<&str>,
        location: Option<&str>,
    ) -> Self {
        let target = ActionTargetRef {
            card_uid: card_uid.map(CardUid::new),
            zone: zone.map(ZoneId::new),
            location: location.map(str::to_string),
        };
        self.battle_mut()
            .action_targets
            .entry(PlayerId::new(player))
            .or_default()
            .push(target);
        self
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    fn push_notification(
        &mut self,
        entry_id: &str,
        kind: NotificationKind,
        player: &str,
        data: ChoiceData,
        is_completed: Option<bool>,
    ) {
        self.snapshot.notifications.push(NotificationEntry {
            id: EntryId::new(entry_id),
            kind,
            status: EntryStatus::Pending,
            payload: NotificationPayload {
                event: None,
                player_id: Some(PlayerId::new(player)),
                is_completed,
                data: Some(data),
            },
        });
    }

    pub fn with_option_choice(
        mut self,
        entry_id: &str,
        player: &str,
        rows: Vec<ChoiceOption>,
    ) -> Self {
        let data = ChoiceData {
            available_options: rows,
            ..Default::default()
        };
        self.push_notification(entry_id, NotificationKind::OptionChoice, player, data, None);
        self
    }

    pub fn with_decided_option_choice(mut self, entry_id: &str, player: &str) -> Self {
        let data = ChoiceData {
            user_decision_made: true,
            ..Default::default()
        };
        self.push_notification(entry_id, NotificationKind::OptionChoice, player, data, None);
        self
    }

    pub fn with_burst_choice(mut self, entry_id: &str, player: &str) -> Self {
        self.push_notification(
            entry_id,
            NotificationKind::BurstEffectChoice,
            player,
            ChoiceData::default(),
            None,
        );
        self
    }

    pub fn with_timed_burst_choice(mut self, entry_id: &str, player: &str, timeout_ms: u64) -> Self {
        let data = ChoiceData {
            timeout_ms: Some(timeout_ms),
            ..Default::default()
        };
        self.push_notification(entry_id, NotificationKind::BurstEffectChoice, player, data, None);
        self
    }

    pub fn with_burst_group(
        mut self,
        entry_id: &str,
        player: &str,
        events: &[&str],
        resolved: &[&str],
        is_completed: bool,
    ) -> Self {
        let data = ChoiceData {
            events: events
                .iter()
                .map(|event_id| BurstEventRef {
                    event_id: EventId::new(*event_id),
                    card_uid: None,
                    description: Some(format!("Burst {event_id}")),
                })
                .collect(),
            resolved_event_ids: resolved.iter().map(|id| EventId::new(*id)).collect(),
            ..Default::default()
        };
        self.push_notification(
            entry_id,
            NotificationKind::BurstEffectChoiceGroup,
            player,
            data,
            Some(is_completed),
        );
        self
    }

    pub fn with_blocker_choice(
        mut self,
        entry_id: &str,
        player: &str,
        targets: Vec<TargetOption>,
    ) -> Self {
        let data = ChoiceData {
            available_targets: targets,
            ..Default::default()
        };
        self.push_notification(entry_id, NotificationKind::BlockerChoice, player, data, None);
        self
    }

    pub fn with_prompt_choice(
        mut self,
        entry_id: &str,
        player: &str,
        targets: Vec<TargetOption>,
    ) -> Self {
        let data = ChoiceData {
            available_targets: targets,
            ..Default::default()
        };
        self.push_notification(entry_id, NotificationKind::PromptChoice, player, data, None);
        self
    }
}
