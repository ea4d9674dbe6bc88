//! Selection handling: the single writer of the selection store.
//!
//! Gating rules for every selection attempt: the target may only become the
//! active selection if it is the local player's turn, or the action-step
//! coordinator reports an awaiting obligation and the target is in the
//! declared legal set with a rule whose timing matches the window. Illegal
//! attempts clear the selection instead of silently ignoring the click, so
//! the UI never shows a selected highlight on an illegal target.

use skirmish_domain::{RuleTiming, SelectionTarget};
use skirmish_shared::GameSnapshot;

use crate::application::dto::GameContext;
use crate::state::{SelectionStore, TurnTracker};

use super::action_step::{self, ActionStepStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// Attempt was illegal; the selection was cleared
    Rejected,
}

#[derive(Default)]
pub struct SelectionHandler {
    store: SelectionStore,
}

impl SelectionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&SelectionTarget> {
        self.store.get()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn try_select(
        &mut self,
        target: SelectionTarget,
        snapshot: &GameSnapshot,
        ctx: &GameContext,
        turn: &TurnTracker,
    ) -> SelectOutcome {
        if is_selectable(&target, snapshot, ctx, turn) {
            self.store.set(target);
            SelectOutcome::Selected
        } else {
            tracing::debug!(?target, "illegal selection attempt; clearing");
            self.store.clear();
            SelectOutcome::Rejected
        }
    }
}

fn is_selectable(
    target: &SelectionTarget,
    snapshot: &GameSnapshot,
    ctx: &GameContext,
    turn: &TurnTracker,
) -> bool {
    match action_step::status(snapshot, ctx) {
        // During an action step the declared legal set rules, regardless of
        // whose turn it is, and the card must actually carry a rule for
        // this window.
        ActionStepStatus::Awaiting => {
            action_step::selection_matches(target, snapshot, ctx)
                && action_step::selection_has_timing(target, snapshot, ctx, RuleTiming::ActionStep)
        }
        ActionStepStatus::Confirmed => false,
        ActionStepStatus::None => turn.is_local_turn(&ctx.player_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;
    use skirmish_domain::{Side, SlotKey};

    fn ctx() -> GameContext {
        GameContext::new("g1", "player_1")
    }

    fn tracker_for(snapshot: &GameSnapshot) -> TurnTracker {
        let mut tracker = TurnTracker::new();
        tracker.observe(snapshot);
        tracker
    }

    #[test]
    fn local_turn_allows_selection() {
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .build();
        let turn = tracker_for(&snapshot);
        let mut handler = SelectionHandler::new();
        let outcome = handler.try_select(
            SelectionTarget::slot(SlotKey::new(Side::Local, "slot1")),
            &snapshot,
            &ctx(),
            &turn,
        );
        assert_eq!(outcome, SelectOutcome::Selected);
        assert!(handler.get().is_some());
    }

    #[test]
    fn opponent_turn_rejects_and_clears() {
        let snapshot = testkit::snapshot()
            .main_phase("player_2")
            .with_local_unit("slot1", "U1", true)
            .build();
        let turn = tracker_for(&snapshot);
        let mut handler = SelectionHandler::new();
        // Seed a previous legal selection, then attempt an illegal one
        handler.store.set(SelectionTarget::slot(SlotKey::new(Side::Local, "slot1")));
        let outcome = handler.try_select(
            SelectionTarget::slot(SlotKey::new(Side::Local, "slot1")),
            &snapshot,
            &ctx(),
            &turn,
        );
        assert_eq!(outcome, SelectOutcome::Rejected);
        assert!(handler.get().is_none());
    }

    #[test]
    fn action_step_requires_declared_target_with_matching_timing() {
        let snapshot = testkit::snapshot()
            .main_phase("player_2")
            .with_local_unit_with_trigger("slot1", "U1")
            .with_local_unit("slot2", "U2", true)
            .with_action_step(&[("player_1", false)])
            .with_action_target("player_1", Some("U1"), Some("slot1"), None)
            .build();
        let turn = tracker_for(&snapshot);
        let mut handler = SelectionHandler::new();

        let legal = handler.try_select(
            SelectionTarget::slot(SlotKey::new(Side::Local, "slot1")),
            &snapshot,
            &ctx(),
            &turn,
        );
        assert_eq!(legal, SelectOutcome::Selected);

        let illegal = handler.try_select(
            SelectionTarget::slot(SlotKey::new(Side::Local, "slot2")),
            &snapshot,
            &ctx(),
            &turn,
        );
        assert_eq!(illegal, SelectOutcome::Rejected);
        assert!(handler.get().is_none());
    }

    #[test]
    fn declared_target_without_window_rule_is_rejected() {
        // The slot is in the legal set but its card has no action-step rule
        let snapshot = testkit::snapshot()
            .with_local_unit("slot1", "U1", true)
            .with_action_step(&[("player_1", false)])
            .with_action_target("player_1", Some("U1"), Some("slot1"), None)
            .build();
        let turn = tracker_for(&snapshot);
        let mut handler = SelectionHandler::new();
        let outcome = handler.try_select(
            SelectionTarget::slot(SlotKey::new(Side::Local, "slot1")),
            &snapshot,
            &ctx(),
            &turn,
        );
        assert_eq!(outcome, SelectOutcome::Rejected);
    }

    #[test]
    fn confirmed_action_step_rejects_all_selection() {
        let snapshot = testkit::snapshot()
            .with_local_unit_with_trigger("slot1", "U1")
            .with_action_step(&[("player_1", true)])
            .with_action_target("player_1", Some("U1"), Some("slot1"), None)
            .build();
        let turn = tracker_for(&snapshot);
        let mut handler = SelectionHandler::new();
        let outcome = handler.try_select(
            SelectionTarget::slot(SlotKey::new(Side::Local, "slot1")),
            &snapshot,
            &ctx(),
            &turn,
        );
        assert_eq!(outcome, SelectOutcome::Rejected);
    }
}
