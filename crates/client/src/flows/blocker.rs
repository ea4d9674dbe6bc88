//! Blocker flow - the defender's intercept decision.
//!
//! Same lifecycle as every other choice flow, plus two extras: the
//! server-provided targets are mapped onto the currently rendered board
//! slots (zone id first, then card identifier), and generic slot clicks are
//! gated off while the decision is pending so a board click cannot bypass
//! the blocker UI. Skipping the block is itself a server call.

use std::sync::Arc;

use skirmish_domain::ChoiceKind;
use skirmish_shared::{ChoiceDecision, GameSnapshot, TargetOption};

use crate::application::dto::GameContext;
use crate::ports::outbound::{DialogPort, SlotView};
use crate::state::gate_reasons;
use crate::state::ActionBarState;

use super::choice_flow::{ChoiceFlow, FlowConfig};
use super::{DialogCommand, FlowEnv, FlowManager, FollowUp, SubmissionTicket};

/// One selectable blocker, addressed independently even when several
/// targets share a board position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockerTarget {
    /// Cloned view model of the slot this target maps to
    pub slot: SlotView,
    /// Index into the entry's `available_targets` (also the dialog row)
    pub index: usize,
    pub label: String,
}

pub struct BlockerFlow {
    inner: ChoiceFlow,
    targets: Vec<BlockerTarget>,
}

impl BlockerFlow {
    pub fn new(dialog: Arc<dyn DialogPort>) -> Self {
        Self {
            inner: ChoiceFlow::new(FlowConfig::for_kind(ChoiceKind::Blocker), dialog),
            targets: Vec::new(),
        }
    }

    /// Mapped targets for rendering and automation
    pub fn targets(&self) -> &[BlockerTarget] {
        &self.targets
    }
}

/// Map server targets onto rendered slots: zone id first, then card
/// identifier. Each target gets its own cloned slot view so two targets
/// sharing a zone stay individually addressable. Targets that match no
/// rendered slot are skipped (the dialog row remains usable regardless).
fn map_targets(targets: &[TargetOption], slots: &[SlotView]) -> Vec<BlockerTarget> {
    targets
        .iter()
        .enumerate()
        .filter_map(|(index, target)| {
            let slot = slots
                .iter()
                .find(|slot| target.zone.as_ref() == Some(&slot.zone_id))
                .or_else(|| {
                    slots
                        .iter()
                        .find(|slot| target.card_uid.is_some() && slot.card_uid == target.card_uid)
                })?;
            let label = target
                .label
                .clone()
                .or_else(|| target.card_uid.as_ref().map(|uid| uid.to_string()))
                .unwrap_or_else(|| slot.zone_id.to_string());
            Some(BlockerTarget {
                slot: slot.clone(),
                index,
                label,
            })
        })
        .collect()
}

impl FlowManager for BlockerFlow {
    fn kind(&self) -> ChoiceKind {
        ChoiceKind::Blocker
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn sync_decision_state(
        &mut self,
        snapshot: &GameSnapshot,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp> {
        self.inner.sync_decision_state(snapshot, ctx, env);

        if self.inner.is_active() {
            env.gate.disable(gate_reasons::BLOCKER_CHOICE);
            if let Some(entry) = self.inner.active_entry() {
                self.targets = map_targets(&entry.data.available_targets, &env.board.visible_slots());
            }
        } else {
            self.targets.clear();
            env.gate.enable(gate_reasons::BLOCKER_CHOICE);
        }
        Vec::new()
    }

    fn apply_action_bar(
        &mut self,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
        bar: &mut ActionBarState,
    ) -> bool {
        self.inner.apply_action_bar(ctx, env, bar)
    }

    fn handle_dialog_command(
        &mut self,
        command: DialogCommand,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp> {
        FlowManager::handle_dialog_command(&mut self.inner, command, ctx, env)
    }

    fn due_timeout(&mut self, ctx: &GameContext, now_ms: u64) -> Vec<FollowUp> {
        FlowManager::due_timeout(&mut self.inner, ctx, now_ms)
    }

    fn begin_submission(
        &mut self,
        ctx: &GameContext,
        decision: ChoiceDecision,
        now_ms: u64,
    ) -> Option<SubmissionTicket> {
        self.inner.begin_submission(ctx, decision, now_ms)
    }

    fn finish_submission(&mut self, ticket: &SubmissionTicket, success: bool) {
        self.inner.finish_submission(ticket, success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::headless::{HeadlessBoard, HeadlessDialog, HeadlessTimer};
    use crate::state::SlotInteractionGate;
    use crate::testkit;
    use skirmish_domain::{CardUid, Side, SlotKey, ZoneId};

    fn slot_view(zone: &str, card: Option<&str>) -> SlotView {
        SlotView {
            key: SlotKey::new(Side::Local, zone),
            zone_id: ZoneId::new(zone),
            card_uid: card.map(CardUid::new),
        }
    }

    fn target(zone: Option<&str>, card: Option<&str>) -> TargetOption {
        TargetOption {
            card_uid: card.map(CardUid::new),
            zone: zone.map(ZoneId::new),
            label: None,
        }
    }

    #[test]
    fn maps_by_zone_first_then_card_uid() {
        let slots = vec![slot_view("slot1", Some("U1")), slot_view("slot2", Some("U2"))];
        let targets = vec![
            target(Some("slot2"), None),
            target(None, Some("U1")),
            target(Some("slot9"), None),
        ];
        let mapped = map_targets(&targets, &slots);
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].slot.zone_id, ZoneId::new("slot2"));
        assert_eq!(mapped[0].index, 0);
        assert_eq!(mapped[1].slot.zone_id, ZoneId::new("slot1"));
        assert_eq!(mapped[1].index, 1);
    }

    #[test]
    fn duplicate_zone_targets_stay_individually_addressable() {
        let slots = vec![slot_view("slot1", Some("U1"))];
        let targets = vec![
            target(Some("slot1"), Some("U1")),
            target(Some("slot1"), Some("P1")),
        ];
        let mapped = map_targets(&targets, &slots);
        assert_eq!(mapped.len(), 2);
        assert_ne!(mapped[0].index, mapped[1].index);
        // Same position, distinct cloned view models
        assert_eq!(mapped[0].slot, mapped[1].slot);
    }

    #[test]
    fn gates_slot_clicks_while_active_and_releases_on_clear() {
        let dialog = Arc::new(HeadlessDialog::new());
        let mut flow = BlockerFlow::new(dialog.clone() as Arc<dyn DialogPort>);
        let board = HeadlessBoard::new();
        let timer = HeadlessTimer::new();
        let mut gate = SlotInteractionGate::new();
        let ctx = GameContext::new("g1", "player_1");

        let snapshot = testkit::snapshot()
            .with_blocker_choice("e1", "player_1", vec![target(Some("slot1"), Some("U1"))])
            .build();
        let mut env = FlowEnv {
            board: &board,
            gate: &mut gate,
            timer: &timer,
            now_ms: 0,
        };
        flow.sync_decision_state(&snapshot, &ctx, &mut env);
        assert!(flow.is_active());
        assert!(!gate.is_enabled());

        let empty = testkit::snapshot().build();
        let mut env = FlowEnv {
            board: &board,
            gate: &mut gate,
            timer: &timer,
            now_ms: 100,
        };
        flow.sync_decision_state(&empty, &ctx, &mut env);
        assert!(!flow.is_active());
        assert!(gate.is_enabled());
    }

    #[test]
    fn skip_option_submits_a_no_block_decision() {
        let dialog = Arc::new(HeadlessDialog::new());
        let mut flow = BlockerFlow::new(dialog.clone() as Arc<dyn DialogPort>);
        let board = HeadlessBoard::new();
        let timer = HeadlessTimer::new();
        let mut gate = SlotInteractionGate::new();
        let ctx = GameContext::new("g1", "player_1");

        let snapshot = testkit::snapshot()
            .with_blocker_choice("e1", "player_1", vec![target(Some("slot1"), Some("U1"))])
            .build();
        let mut env = FlowEnv {
            board: &board,
            gate: &mut gate,
            timer: &timer,
            now_ms: 0,
        };
        flow.sync_decision_state(&snapshot, &ctx, &mut env);

        let follow = flow.handle_dialog_command(
            DialogCommand::SelectOption("skip".to_string()),
            &ctx,
            &mut env,
        );
        assert_eq!(follow.len(), 1);
        match &follow[0] {
            FollowUp::Submit { kind, decision } => {
                assert_eq!(*kind, ChoiceKind::Blocker);
                assert_eq!(*decision, ChoiceDecision::Blocker { target: None });
            }
            other => panic!("unexpected follow-up: {other:?}"),
        }
    }
}
