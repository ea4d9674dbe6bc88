//! The top-level reconciler.
//!
//! On every state refresh this asks each flow manager "are you active?" in
//! strict priority order; the first yes owns the action bar and its dialog.
//! Only when none are active does the attack mode, then the action-step
//! window, then the generic phase/selection policy get to run. Exactly one
//! owner renders the bar per refresh, never zero silently and never two.
//!
//! All methods here are synchronous; network work is handed back to the
//! async shell as [`FollowUp`] commands.

use std::collections::HashSet;
use std::sync::Arc;

use skirmish_domain::{
    ActionId, BattleStatus, CardUid, ChoiceKind, GameStatus, PhaseKind, SelectionTarget, Side,
    SlotKey, ZoneId,
};
use skirmish_shared::{ChoiceDecision, GameSnapshot, PlayerActionKind};

use crate::application::dto::GameContext;
use crate::flows::{
    BlockerTarget, DialogCommand, FlowEnv, FlowSet, FollowUp, SubmissionTicket,
};
use crate::ports::outbound::{BoardPort, DialogOption, DialogRequest, Dialogs, TurnTimerPort};
use crate::state::{
    gate_reasons, ActionBarState, BarOwner, SlotInteractionGate, SnapshotStore, TurnTracker,
};

use super::action_step::{self, ActionStepStatus};
use super::attack::{AttackTargetCoordinator, SlotClickOutcome};
use super::policy;
use super::selection::{SelectOutcome, SelectionHandler};

pub struct GameCoordinator {
    ctx: GameContext,
    snapshots: SnapshotStore,
    selection: SelectionHandler,
    gate: SlotInteractionGate,
    turn: TurnTracker,
    flows: FlowSet,
    attack: AttackTargetCoordinator,
    bar: ActionBarState,
    dialogs: Dialogs,
    board: Arc<dyn BoardPort>,
    timer: Arc<dyn TurnTimerPort>,
    /// Hand card awaiting a slot-replacement decision after a board-full
    /// rejection
    pending_replacement: Option<CardUid>,
}

impl GameCoordinator {
    pub fn new(
        ctx: GameContext,
        dialogs: Dialogs,
        board: Arc<dyn BoardPort>,
        timer: Arc<dyn TurnTimerPort>,
    ) -> Self {
        Self {
            ctx,
            snapshots: SnapshotStore::new(),
            selection: SelectionHandler::new(),
            gate: SlotInteractionGate::new(),
            turn: TurnTracker::new(),
            flows: FlowSet::new(&dialogs),
            attack: AttackTargetCoordinator::new(),
            bar: ActionBarState::default(),
            dialogs,
            board,
            timer,
            pending_replacement: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn ctx(&self) -> &GameContext {
        &self.ctx
    }

    pub fn set_context(&mut self, ctx: GameContext) {
        self.ctx = ctx;
    }

    pub fn bar(&self) -> &ActionBarState {
        &self.bar
    }

    pub fn selection(&self) -> Option<&SelectionTarget> {
        self.selection.get()
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshots.current()
    }

    pub fn last_status(&self) -> GameStatus {
        self.snapshots.last_status()
    }

    pub fn dialogs(&self) -> &Dialogs {
        &self.dialogs
    }

    pub fn blocker_targets(&self) -> &[BlockerTarget] {
        self.flows.blocker.targets()
    }

    // -------------------------------------------------------------------------
    // Refresh cycle
    // -------------------------------------------------------------------------

    /// Fold in a fresh snapshot: sync every flow, revalidate the selection,
    /// recompute the slot gate and the action bar, and collect any due
    /// timeout defaults.
    pub fn apply_snapshot(&mut self, snapshot: GameSnapshot, now_ms: u64) -> Vec<FollowUp> {
        let change = self.turn.observe(&snapshot);
        self.snapshots.replace(snapshot);
        let Some(snap) = self.snapshots.current().cloned() else {
            return Vec::new();
        };

        let mut follow = Vec::new();

        if change.owner_changed {
            tracing::debug!("turn owner changed; resetting selection and attack mode");
            self.selection.clear();
            self.board.set_selected(None);
            self.attack.teardown();
            self.board.clear_attack_targets();
        }

        {
            let GameCoordinator {
                flows,
                gate,
                board,
                timer,
                ctx,
                ..
            } = self;
            let mut env = FlowEnv {
                board: board.as_ref(),
                gate,
                timer: timer.as_ref(),
                now_ms,
            };
            for flow in flows.iter_priority_mut() {
                follow.extend(flow.sync_decision_state(&snap, ctx, &mut env));
            }
        }

        // A selection the server no longer lists as a legal action-step
        // target is an expected race with state; clear it quietly.
        if action_step::status(&snap, &self.ctx) == ActionStepStatus::Awaiting {
            let stale = self
                .selection
                .get()
                .is_some_and(|selection| !action_step::selection_matches(selection, &snap, &self.ctx));
            if stale {
                self.selection.clear();
                self.board.set_selected(None);
            }
        }

        self.update_slot_gate(&snap);
        self.refresh_bar(now_ms);
        follow.extend(self.due_timeouts(now_ms));
        follow
    }

    fn update_slot_gate(&mut self, snap: &GameSnapshot) {
        let interactable = (self.turn.is_local_turn(&self.ctx.player_id)
            && snap.phase == PhaseKind::Main)
            || action_step::status(snap, &self.ctx) == ActionStepStatus::Awaiting
            || self.attack.is_active();
        self.gate.set_enabled(gate_reasons::PHASE_LOCK, interactable);
        self.board.set_slot_click_enabled(self.gate.is_enabled());
    }

    /// Decide who renders the action bar this refresh
    pub fn refresh_bar(&mut self, now_ms: u64) {
        let Some(snap) = self.snapshots.current().cloned() else {
            self.bar = ActionBarState::disconnected();
            return;
        };
        let mut bar = ActionBarState::default();
        let mut owned = false;
        {
            let GameCoordinator {
                flows,
                gate,
                board,
                timer,
                ctx,
                ..
            } = self;
            let mut env = FlowEnv {
                board: board.as_ref(),
                gate,
                timer: timer.as_ref(),
                now_ms,
            };
            for flow in flows.iter_priority_mut() {
                if flow.apply_action_bar(ctx, &mut env, &mut bar) {
                    owned = true;
                    break;
                }
            }
        }
        if !owned {
            // No flow owns the bar; the countdown runs normally
            self.timer.resume();
            owned = self.attack.apply_action_bar(&mut bar);
        }
        if !owned {
            match action_step::status(&snap, &self.ctx) {
                ActionStepStatus::Awaiting => {
                    let descriptors = action_step::descriptors_for_selection(
                        self.selection.get(),
                        &snap,
                        &self.ctx,
                    );
                    bar.set(BarOwner::ActionStep, descriptors);
                    owned = true;
                }
                ActionStepStatus::Confirmed => {
                    bar.set_waiting(BarOwner::ActionStep);
                    owned = true;
                }
                ActionStepStatus::None => {}
            }
        }
        if !owned {
            match self.selection.get() {
                Some(selection) => {
                    let descriptors = policy::selection_descriptors(selection, &snap, &self.ctx);
                    bar.set(BarOwner::MainPhase, descriptors);
                }
                None if self.turn.is_local_turn(&self.ctx.player_id) => {
                    bar.set(
                        BarOwner::MainPhase,
                        policy::neutral_descriptors(&snap, &self.ctx, self.turn.ownership()),
                    );
                }
                None => bar.set_waiting(BarOwner::MainPhase),
            }
        }
        self.bar = bar;
    }

    /// Timeout defaults that have come due across all flows
    pub fn due_timeouts(&mut self, now_ms: u64) -> Vec<FollowUp> {
        let ctx = self.ctx.clone();
        let mut follow = Vec::new();
        for flow in self.flows.iter_priority_mut() {
            follow.extend(flow.due_timeout(&ctx, now_ms));
        }
        follow
    }

    // -------------------------------------------------------------------------
    // User input
    // -------------------------------------------------------------------------

    pub fn handle_slot_click(&mut self, key: SlotKey, now_ms: u64) -> Vec<FollowUp> {
        // Attack mode screens every slot click before selection logic runs
        match self.attack.handle_slot_click(&key) {
            SlotClickOutcome::Consumed(follow) => {
                self.board.clear_attack_targets();
                self.selection.clear();
                self.board.set_selected(None);
                self.refresh_bar(now_ms);
                return follow.into_iter().collect();
            }
            SlotClickOutcome::Swallowed => return Vec::new(),
            SlotClickOutcome::Inactive => {}
        }
        if !self.gate.is_enabled() {
            tracing::debug!(slot = %key, "slot clicks disabled; ignoring");
            return Vec::new();
        }
        self.attempt_selection(SelectionTarget::slot(key), now_ms)
    }

    pub fn handle_hand_click(&mut self, uid: CardUid, now_ms: u64) -> Vec<FollowUp> {
        let card_type = self
            .snapshots
            .current()
            .and_then(|snap| snap.player(&self.ctx.player_id))
            .and_then(|player| player.hand.iter().find(|card| card.uid == uid))
            .map(|card| card.card_type)
            .unwrap_or_default();
        self.attempt_selection(SelectionTarget::Hand { uid, card_type }, now_ms)
    }

    pub fn handle_base_click(&mut self, side: Side, now_ms: u64) -> Vec<FollowUp> {
        let card_id = self.snapshots.current().and_then(|snap| {
            let player = match side {
                Side::Local => snap.player(&self.ctx.player_id),
                Side::Opponent => snap.opponent_of(&self.ctx.player_id),
            }?;
            player.base.as_ref().map(|base| base.uid.clone())
        });
        let Some(card_id) = card_id else {
            return Vec::new();
        };
        self.attempt_selection(SelectionTarget::Base { side, card_id }, now_ms)
    }

    fn attempt_selection(&mut self, target: SelectionTarget, now_ms: u64) -> Vec<FollowUp> {
        let Some(snap) = self.snapshots.current().cloned() else {
            return Vec::new();
        };
        // Selecting a new target always cancels a pending attack mode
        let mut follow = Vec::new();
        if self.attack.is_active() {
            follow.extend(self.attack.cancel());
            self.board.clear_attack_targets();
        }
        match self.selection.try_select(target, &snap, &self.ctx, &self.turn) {
            SelectOutcome::Selected => self.board.set_selected(self.selection.get().cloned()),
            SelectOutcome::Rejected => self.board.set_selected(None),
        }
        self.refresh_bar(now_ms);
        follow
    }

    /// Route a selection made inside a flow's dialog
    pub fn handle_dialog_option(
        &mut self,
        kind: ChoiceKind,
        option_id: String,
        now_ms: u64,
    ) -> Vec<FollowUp> {
        let GameCoordinator {
            flows,
            gate,
            board,
            timer,
            ctx,
            ..
        } = self;
        let mut env = FlowEnv {
            board: board.as_ref(),
            gate,
            timer: timer.as_ref(),
            now_ms,
        };
        flows
            .by_kind_mut(kind)
            .handle_dialog_command(DialogCommand::SelectOption(option_id), ctx, &mut env)
    }

    /// Route a back-navigation from a flow's sub-dialog
    pub fn handle_dialog_back(&mut self, kind: ChoiceKind, now_ms: u64) -> Vec<FollowUp> {
        let GameCoordinator {
            flows,
            gate,
            board,
            timer,
            ctx,
            ..
        } = self;
        let mut env = FlowEnv {
            board: board.as_ref(),
            gate,
            timer: timer.as_ref(),
            now_ms,
        };
        flows
            .by_kind_mut(kind)
            .handle_dialog_command(DialogCommand::Back, ctx, &mut env)
    }

    /// Route an action-bar button press
    pub fn invoke_action(&mut self, id: ActionId, now_ms: u64) -> Vec<FollowUp> {
        let available = self
            .bar
            .descriptors
            .iter()
            .any(|descriptor| descriptor.id == id && descriptor.enabled);
        if !available {
            tracing::debug!(action = %id, "action not available on the current bar; ignoring");
            return Vec::new();
        }
        let Some(snap) = self.snapshots.current().cloned() else {
            return Vec::new();
        };
        match id {
            ActionId::EndTurn => vec![FollowUp::Action(PlayerActionKind::EndTurn)],
            ActionId::AttackUnit => self.enter_attack_mode(&snap, now_ms),
            ActionId::AttackShield => match self.selection.get().and_then(SelectionTarget::slot_key)
            {
                Some(key) => vec![FollowUp::Action(PlayerActionKind::AttackShieldArea {
                    attacker: key.zone.clone(),
                })],
                None => Vec::new(),
            },
            ActionId::PlayCard => match self.selection.get() {
                Some(SelectionTarget::Hand { uid, .. }) => {
                    vec![FollowUp::Action(PlayerActionKind::PlayCard {
                        card_uid: uid.clone(),
                        slot: None,
                    })]
                }
                _ => Vec::new(),
            },
            ActionId::SkipStep => {
                if snap.battle_status() == Some(BattleStatus::ActionStep) {
                    vec![FollowUp::Action(PlayerActionKind::ConfirmBattleAction)]
                } else {
                    // No battle to confirm; a no-op skip is not sent
                    self.reset_to_neutral(now_ms);
                    Vec::new()
                }
            }
            ActionId::Cancel => {
                let follow: Vec<FollowUp> = self.attack.cancel().into_iter().collect();
                self.board.clear_attack_targets();
                self.reset_to_neutral(now_ms);
                follow
            }
            ActionId::TriggerUnitEffect | ActionId::TriggerPilotEffect => {
                // Not yet wired to a network payload; resets the selection
                tracing::debug!(action = %id, "effect trigger not wired; clearing selection");
                self.reset_to_neutral(now_ms);
                Vec::new()
            }
            ActionId::ActivateEffect => {
                if self.bar.owner == BarOwner::ActionStep {
                    tracing::debug!("generic action-step trigger not wired; clearing selection");
                    self.reset_to_neutral(now_ms);
                    return Vec::new();
                }
                let card_uid = self
                    .selection
                    .get()
                    .and_then(SelectionTarget::slot_key)
                    .and_then(|key| {
                        snap.player(&self.ctx.player_id)?
                            .battle_area
                            .iter()
                            .find(|slot| slot.zone_id == key.zone)?
                            .card
                            .as_ref()
                            .map(|card| card.uid.clone())
                    });
                match card_uid {
                    Some(card_uid) => vec![FollowUp::Action(PlayerActionKind::ActivateAbility {
                        card_uid,
                        ability_index: 0,
                    })],
                    None => Vec::new(),
                }
            }
        }
    }

    fn enter_attack_mode(&mut self, snap: &GameSnapshot, now_ms: u64) -> Vec<FollowUp> {
        let Some(key) = self
            .selection
            .get()
            .and_then(SelectionTarget::slot_key)
            .cloned()
        else {
            return Vec::new();
        };
        let Some(opponent) = snap.opponent_of(&self.ctx.player_id) else {
            return Vec::new();
        };
        let targets: HashSet<SlotKey> = opponent
            .battle_area
            .iter()
            .filter(|slot| slot.card.is_some())
            .map(|slot| SlotKey::new(Side::Opponent, slot.zone_id.clone()))
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }
        let attacker = key.zone.clone();
        let target_player = opponent.player_id.clone();
        self.board.show_attack_targets(targets.iter().cloned().collect());
        self.attack.enter(
            targets,
            Box::new(move |slot| {
                Some(FollowUp::Action(PlayerActionKind::AttackUnit {
                    attacker,
                    target: slot.zone,
                    target_player,
                }))
            }),
            Box::new(|| None),
        );
        self.refresh_bar(now_ms);
        Vec::new()
    }

    fn reset_to_neutral(&mut self, now_ms: u64) {
        self.selection.clear();
        self.board.set_selected(None);
        self.refresh_bar(now_ms);
    }

    // -------------------------------------------------------------------------
    // Submission bridge
    // -------------------------------------------------------------------------

    pub fn begin_submission(
        &mut self,
        kind: ChoiceKind,
        decision: ChoiceDecision,
        now_ms: u64,
    ) -> Option<SubmissionTicket> {
        let ctx = self.ctx.clone();
        self.flows
            .by_kind_mut(kind)
            .begin_submission(&ctx, decision, now_ms)
    }

    pub fn finish_submission(&mut self, ticket: &SubmissionTicket, success: bool, now_ms: u64) {
        self.flows
            .by_kind_mut(ticket.kind)
            .finish_submission(ticket, success);
        self.refresh_bar(now_ms);
    }

    pub fn finish_group_ack(&mut self, success: bool, now_ms: u64) {
        self.flows.burst_group.finish_ack(success);
        self.refresh_bar(now_ms);
    }

    // -------------------------------------------------------------------------
    // Attack aftermath and error routing
    // -------------------------------------------------------------------------

    /// Attack calls always leave a clean slate, success or failure
    pub fn clear_attack_state(&mut self, now_ms: u64) {
        self.attack.teardown();
        self.board.clear_attack_targets();
        self.reset_to_neutral(now_ms);
    }

    /// Board-full rejection: re-route into the slot-replacement dialog
    pub fn open_slot_replacement(&mut self, card_uid: CardUid) {
        let options: Vec<DialogOption> = self
            .snapshots
            .current()
            .and_then(|snap| snap.player(&self.ctx.player_id))
            .map(|player| {
                player
                    .battle_area
                    .iter()
                    .filter(|slot| slot.card.is_some())
                    .map(|slot| {
                        let label = slot
                            .card
                            .as_ref()
                            .map(|card| card.name.clone())
                            .filter(|name| !name.is_empty())
                            .unwrap_or_else(|| slot.zone_id.to_string());
                        DialogOption::new(slot.zone_id.to_string(), label)
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.pending_replacement = Some(card_uid);
        self.dialogs.slot_replacement.show(DialogRequest {
            title: "Choose a Slot to Replace".to_string(),
            body: None,
            options,
            timeout: None,
        });
    }

    pub fn handle_slot_replacement_option(&mut self, zone: ZoneId) -> Vec<FollowUp> {
        self.dialogs.slot_replacement.hide();
        let Some(card_uid) = self.pending_replacement.take() else {
            return Vec::new();
        };
        vec![FollowUp::Action(PlayerActionKind::PlayCard {
            card_uid,
            slot: Some(zone),
        })]
    }

    /// Any other rejection surfaces verbatim in the generic error dialog
    pub fn show_error(&self, message: &str) {
        self.dialogs.error.show(DialogRequest {
            title: "Action Failed".to_string(),
            body: Some(message.to_string()),
            options: vec![DialogOption::new("dismiss", "OK")],
            timeout: None,
        });
    }

    pub fn dismiss_error(&self) {
        self.dialogs.error.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::headless::{headless_dialogs, HeadlessBoard, HeadlessTimer};
    use crate::testkit;

    struct Harness {
        coordinator: GameCoordinator,
        dialogs: Dialogs,
        board: Arc<HeadlessBoard>,
    }

    fn harness() -> Harness {
        let dialogs = headless_dialogs();
        let board = Arc::new(HeadlessBoard::new());
        let timer = Arc::new(HeadlessTimer::new());
        let coordinator = GameCoordinator::new(
            GameContext::new("g1", "player_1"),
            dialogs.clone(),
            board.clone(),
            timer,
        );
        Harness {
            coordinator,
            dialogs,
            board,
        }
    }

    #[test]
    fn opponent_owned_burst_shows_waiting_bar_and_no_dialog() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_burst_choice("e1", "player_2")
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);

        let bar = h.coordinator.bar();
        assert_eq!(bar.owner, BarOwner::Flow(ChoiceKind::Burst));
        assert!(bar.waiting_for_opponent);
        assert!(bar.descriptors.is_empty());
        assert!(!h.dialogs.burst.is_open());
    }

    #[test]
    fn burst_group_outranks_every_other_flow() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_burst_choice("e1", "player_1")
            .with_burst_group("e2", "player_1", &["ev1"], &[], false)
            .with_option_choice("e3", "player_1", testkit::options(&["a"]))
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);
        assert_eq!(
            h.coordinator.bar().owner,
            BarOwner::Flow(ChoiceKind::BurstGroup)
        );
    }

    #[test]
    fn exactly_one_owner_renders_the_bar() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_option_choice("e1", "player_1", testkit::options(&["a"]))
            .with_action_step(&[("player_1", false)])
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);
        // The option flow wins; the action-step window does not get the bar
        assert_eq!(h.coordinator.bar().owner, BarOwner::Flow(ChoiceKind::Option));
    }

    #[test]
    fn action_step_scenario_matched_slot_yields_trigger_unit_primary() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .with_local_unit_with_trigger("slot1", "U1")
            .with_local_unit("slot2", "U2", true)
            .with_action_step(&[("player_1", false), ("player_2", true)])
            .with_action_target("player_1", Some("U1"), Some("slot1"), None)
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);

        h.coordinator
            .handle_slot_click(SlotKey::new(Side::Local, "slot1"), 10);
        let bar = h.coordinator.bar();
        assert_eq!(bar.owner, BarOwner::ActionStep);
        assert_eq!(bar.descriptors[0].id, ActionId::TriggerUnitEffect);
        assert!(bar.descriptors[0].primary);

        // An unrelated slot clears the selection and leaves only Skip
        h.coordinator
            .handle_slot_click(SlotKey::new(Side::Local, "slot2"), 20);
        assert!(h.coordinator.selection().is_none());
        let bar = h.coordinator.bar();
        let ids: Vec<ActionId> = bar.descriptors.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![ActionId::SkipStep]);
    }

    #[test]
    fn confirmed_action_step_waits_on_opponent() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .with_action_step(&[("player_1", true), ("player_2", false)])
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);
        let bar = h.coordinator.bar();
        assert_eq!(bar.owner, BarOwner::ActionStep);
        assert!(bar.waiting_for_opponent);
    }

    #[test]
    fn attack_mode_takes_the_bar_and_screens_clicks() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .with_opponent_unit("slot2", "E1")
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);

        h.coordinator
            .handle_slot_click(SlotKey::new(Side::Local, "slot1"), 10);
        assert!(h.coordinator.selection().is_some());

        let follow = h.coordinator.invoke_action(ActionId::AttackUnit, 20);
        assert!(follow.is_empty());
        assert_eq!(h.coordinator.bar().owner, BarOwner::AttackMode);
        assert_eq!(
            h.board.attack_targets(),
            vec![SlotKey::new(Side::Opponent, "slot2")]
        );

        // A click outside the whitelist neither fires nor exits the mode
        let follow = h
            .coordinator
            .handle_slot_click(SlotKey::new(Side::Opponent, "slot9"), 30);
        assert!(follow.is_empty());
        assert_eq!(h.coordinator.bar().owner, BarOwner::AttackMode);
        assert!(h.coordinator.selection().is_some());

        // The legal target fires the continuation and tears down
        let follow = h
            .coordinator
            .handle_slot_click(SlotKey::new(Side::Opponent, "slot2"), 40);
        assert_eq!(follow.len(), 1);
        match &follow[0] {
            FollowUp::Action(PlayerActionKind::AttackUnit {
                attacker,
                target,
                target_player,
            }) => {
                assert_eq!(attacker, &ZoneId::new("slot1"));
                assert_eq!(target, &ZoneId::new("slot2"));
                assert_eq!(target_player.as_str(), "player_2");
            }
            other => panic!("unexpected follow-up: {other:?}"),
        }
        assert_ne!(h.coordinator.bar().owner, BarOwner::AttackMode);
    }

    #[test]
    fn cancel_attack_returns_to_neutral() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .with_opponent_unit("slot2", "E1")
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);
        h.coordinator
            .handle_slot_click(SlotKey::new(Side::Local, "slot1"), 10);
        h.coordinator.invoke_action(ActionId::AttackUnit, 20);

        let follow = h.coordinator.invoke_action(ActionId::Cancel, 30);
        assert!(follow.is_empty());
        assert!(h.coordinator.selection().is_none());
        assert_eq!(h.coordinator.bar().owner, BarOwner::MainPhase);
    }

    #[test]
    fn neutral_bar_on_local_main_phase_offers_end_turn() {
        let mut h = harness();
        let snapshot = testkit::snapshot().main_phase("player_1").build();
        h.coordinator.apply_snapshot(snapshot, 0);
        let bar = h.coordinator.bar();
        assert_eq!(bar.owner, BarOwner::MainPhase);
        assert_eq!(bar.descriptors[0].id, ActionId::EndTurn);
        assert!(!bar.waiting_for_opponent);
    }

    #[test]
    fn neutral_bar_waits_on_opponent_turn() {
        let mut h = harness();
        let snapshot = testkit::snapshot().main_phase("player_2").build();
        h.coordinator.apply_snapshot(snapshot, 0);
        let bar = h.coordinator.bar();
        assert_eq!(bar.owner, BarOwner::MainPhase);
        assert!(bar.waiting_for_opponent);
    }

    #[test]
    fn turn_change_invalidates_selection_and_attack_mode() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .with_opponent_unit("slot2", "E1")
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);
        h.coordinator
            .handle_slot_click(SlotKey::new(Side::Local, "slot1"), 10);
        h.coordinator.invoke_action(ActionId::AttackUnit, 20);

        let next_turn = testkit::snapshot().main_phase("player_2").build();
        h.coordinator.apply_snapshot(next_turn, 30);
        assert!(h.coordinator.selection().is_none());
        assert_ne!(h.coordinator.bar().owner, BarOwner::AttackMode);
    }

    #[test]
    fn board_full_reroutes_into_slot_replacement() {
        let mut h = harness();
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .build();
        h.coordinator.apply_snapshot(snapshot, 0);

        h.coordinator.open_slot_replacement(CardUid::new("H1"));
        assert!(h.dialogs.slot_replacement.is_open());

        let follow = h
            .coordinator
            .handle_slot_replacement_option(ZoneId::new("slot1"));
        assert_eq!(follow.len(), 1);
        match &follow[0] {
            FollowUp::Action(PlayerActionKind::PlayCard { card_uid, slot }) => {
                assert_eq!(card_uid, &CardUid::new("H1"));
                assert_eq!(slot, &Some(ZoneId::new("slot1")));
            }
            other => panic!("unexpected follow-up: {other:?}"),
        }
        assert!(!h.dialogs.slot_replacement.is_open());
    }

    #[test]
    fn bar_is_never_empty_without_an_intentional_waiting_state() {
        let mut h = harness();
        let snapshot = testkit::snapshot().main_phase("player_1").build();
        h.coordinator.apply_snapshot(snapshot, 0);
        let bar = h.coordinator.bar();
        assert!(bar.waiting_for_opponent || !bar.descriptors.is_empty() || matches!(bar.owner, BarOwner::Flow(_)));
    }

    #[test]
    fn unavailable_action_is_ignored() {
        let mut h = harness();
        let snapshot = testkit::snapshot().main_phase("player_2").build();
        h.coordinator.apply_snapshot(snapshot, 0);
        let follow = h.coordinator.invoke_action(ActionId::EndTurn, 10);
        assert!(follow.is_empty());
    }
}
