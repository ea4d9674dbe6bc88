//! Attack-target mode: a transient whitelist over board-slot clicks.
//!
//! Entered when the player initiates an attack; every slot click is checked
//! against the whitelist before any other selection logic runs. A matching
//! click hands the slot to the supplied continuation and tears the mode
//! down; a non-matching click is swallowed without disturbing the current
//! selection; cancel runs the cancel continuation and tears down.

use std::collections::HashSet;

use skirmish_domain::{ActionDescriptor, ActionId, SlotKey};

use crate::flows::FollowUp;
use crate::state::{ActionBarState, BarOwner};

pub type SelectContinuation = Box<dyn FnOnce(SlotKey) -> Option<FollowUp> + Send>;
pub type CancelContinuation = Box<dyn FnOnce() -> Option<FollowUp> + Send>;

/// Outcome of screening a slot click against the active mode
#[derive(Debug)]
pub enum SlotClickOutcome {
    /// Legal target: continuation ran, mode torn down
    Consumed(Option<FollowUp>),
    /// Active mode, illegal target: click absorbed, nothing changes
    Swallowed,
    /// No mode active: let ordinary selection logic run
    Inactive,
}

struct AttackMode {
    targets: HashSet<SlotKey>,
    on_select: SelectContinuation,
    on_cancel: CancelContinuation,
}

#[derive(Default)]
pub struct AttackTargetCoordinator {
    mode: Option<AttackMode>,
}

impl AttackTargetCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(
        &mut self,
        targets: HashSet<SlotKey>,
        on_select: SelectContinuation,
        on_cancel: CancelContinuation,
    ) {
        tracing::debug!(target_count = targets.len(), "entering attack-target mode");
        self.mode = Some(AttackMode {
            targets,
            on_select,
            on_cancel,
        });
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn targets(&self) -> Option<&HashSet<SlotKey>> {
        self.mode.as_ref().map(|mode| &mode.targets)
    }

    /// Screen a slot click. Runs before any other selection logic.
    pub fn handle_slot_click(&mut self, key: &SlotKey) -> SlotClickOutcome {
        let Some(mode) = self.mode.take() else {
            return SlotClickOutcome::Inactive;
        };
        if !mode.targets.contains(key) {
            tracing::debug!(slot = %key, "click outside attack-target whitelist; absorbed");
            self.mode = Some(mode);
            return SlotClickOutcome::Swallowed;
        }
        SlotClickOutcome::Consumed((mode.on_select)(key.clone()))
    }

    /// Cancel the mode, running the cancel continuation
    pub fn cancel(&mut self) -> Option<FollowUp> {
        self.mode.take().and_then(|mode| (mode.on_cancel)())
    }

    /// Drop the mode without running any continuation (turn change, reset)
    pub fn teardown(&mut self) {
        self.mode = None;
    }

    /// While active the bar offers exactly one button: Cancel Attack
    pub fn apply_action_bar(&self, bar: &mut ActionBarState) -> bool {
        if !self.is_active() {
            return false;
        }
        bar.set(
            BarOwner::AttackMode,
            vec![ActionDescriptor::new(ActionId::Cancel, "Cancel Attack").primary()],
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_domain::Side;
    use skirmish_shared::PlayerActionKind;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn key(owner: Side, zone: &str) -> SlotKey {
        SlotKey::new(owner, zone)
    }

    fn coordinator_with_target(zone: &str) -> (AttackTargetCoordinator, Arc<AtomicBool>) {
        let mut coordinator = AttackTargetCoordinator::new();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_flag = cancelled.clone();
        let mut targets = HashSet::new();
        targets.insert(key(Side::Opponent, zone));
        coordinator.enter(
            targets,
            Box::new(|slot| {
                Some(FollowUp::Action(PlayerActionKind::AttackUnit {
                    attacker: "slot1".into(),
                    target: slot.zone,
                    target_player: "player_2".into(),
                }))
            }),
            Box::new(move || {
                cancelled_flag.store(true, Ordering::SeqCst);
                None
            }),
        );
        (coordinator, cancelled)
    }

    #[test]
    fn matching_click_runs_continuation_and_tears_down() {
        let (mut coordinator, _) = coordinator_with_target("slot2");
        let outcome = coordinator.handle_slot_click(&key(Side::Opponent, "slot2"));
        match outcome {
            SlotClickOutcome::Consumed(Some(FollowUp::Action(PlayerActionKind::AttackUnit {
                target,
                ..
            }))) => assert_eq!(target, "slot2".into()),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!coordinator.is_active());
    }

    #[test]
    fn non_matching_click_is_swallowed_and_mode_survives() {
        let (mut coordinator, _) = coordinator_with_target("slot2");
        let outcome = coordinator.handle_slot_click(&key(Side::Opponent, "slot3"));
        assert!(matches!(outcome, SlotClickOutcome::Swallowed));
        assert!(coordinator.is_active());
    }

    #[test]
    fn cancel_runs_cancel_continuation() {
        let (mut coordinator, cancelled) = coordinator_with_target("slot2");
        let follow = coordinator.cancel();
        assert!(follow.is_none());
        assert!(cancelled.load(Ordering::SeqCst));
        assert!(!coordinator.is_active());
    }

    #[test]
    fn inactive_mode_defers_to_selection_logic() {
        let mut coordinator = AttackTargetCoordinator::new();
        let outcome = coordinator.handle_slot_click(&key(Side::Opponent, "slot2"));
        assert!(matches!(outcome, SlotClickOutcome::Inactive));
    }

    #[test]
    fn active_mode_owns_the_bar_with_a_single_cancel() {
        let (coordinator, _) = coordinator_with_target("slot2");
        let mut bar = ActionBarState::default();
        assert!(coordinator.apply_action_bar(&mut bar));
        assert_eq!(bar.owner, BarOwner::AttackMode);
        assert_eq!(bar.descriptors.len(), 1);
        assert_eq!(bar.descriptors[0].id, ActionId::Cancel);
    }
}
