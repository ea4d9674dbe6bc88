//! Action-bar policy: pure functions from game state to descriptor sets.
//!
//! These only run when no flow manager, attack mode, or action-step window
//! owns the bar. Attack descriptors merge ahead of generic ones; the final
//! list is de-duplicated, rank-sorted, and carries at most one primary.

use skirmish_domain::{
    normalize_descriptors, ActionDescriptor, ActionId, PhaseKind, RuleTiming, SelectionTarget,
    Side, SlotKey, TurnOwnership,
};
use skirmish_shared::{BoardSlot, GameSnapshot};

use crate::application::dto::GameContext;

/// Wire tag of the shield-area attack in `restricted_actions`
const ATTACK_SHIELD_RESTRICTION: &str = "ATTACK_SHIELD_AREA";

/// Default action set when nothing is selected
pub fn neutral_descriptors(
    snapshot: &GameSnapshot,
    ctx: &GameContext,
    ownership: &TurnOwnership,
) -> Vec<ActionDescriptor> {
    let local_turn = ownership.is_owned_by(&ctx.player_id);
    let mut end_turn = ActionDescriptor::new(ActionId::EndTurn, "End Turn").primary();
    if !local_turn || snapshot.phase != PhaseKind::Main {
        end_turn = end_turn.disabled();
    }
    vec![end_turn]
}

/// Context-scoped actions for the current selection
pub fn selection_descriptors(
    selection: &SelectionTarget,
    snapshot: &GameSnapshot,
    ctx: &GameContext,
) -> Vec<ActionDescriptor> {
    let mut descriptors = Vec::new();
    match selection {
        SelectionTarget::Hand { .. } => {
            descriptors.push(ActionDescriptor::new(ActionId::PlayCard, "Play Card").primary());
        }
        SelectionTarget::Slot { key } if key.owner == Side::Local => {
            if let Some(slot) = local_slot(snapshot, ctx, key) {
                // Attack descriptors merge ahead of generic descriptors
                if slot.card.is_some() && slot.active {
                    if has_eligible_opponent_unit(snapshot, ctx) {
                        descriptors.push(
                            ActionDescriptor::new(ActionId::AttackUnit, "Attack Unit").primary(),
                        );
                    }
                    if !shield_attack_restricted(snapshot) {
                        descriptors.push(ActionDescriptor::new(
                            ActionId::AttackShield,
                            "Attack Shields",
                        ));
                    }
                }
                if slot_has_main_ability(slot) {
                    descriptors.push(ActionDescriptor::new(
                        ActionId::ActivateEffect,
                        "Activate Effect",
                    ));
                }
            }
        }
        SelectionTarget::Slot { .. } | SelectionTarget::Base { .. } => {}
    }
    descriptors.push(ActionDescriptor::new(ActionId::Cancel, "Cancel"));
    normalize_descriptors(descriptors)
}

/// Any opponent battle-area slot currently holding a unit
pub fn has_eligible_opponent_unit(snapshot: &GameSnapshot, ctx: &GameContext) -> bool {
    snapshot
        .opponent_of(&ctx.player_id)
        .map(|opponent| opponent.battle_area.iter().any(|slot| slot.card.is_some()))
        .unwrap_or(false)
}

/// An active effect explicitly forbids attacking the shield area
pub fn shield_attack_restricted(snapshot: &GameSnapshot) -> bool {
    snapshot
        .restricted_actions
        .iter()
        .any(|action| action == ATTACK_SHIELD_RESTRICTION)
}

fn local_slot<'a>(
    snapshot: &'a GameSnapshot,
    ctx: &GameContext,
    key: &SlotKey,
) -> Option<&'a BoardSlot> {
    snapshot
        .player(&ctx.player_id)?
        .battle_area
        .iter()
        .find(|slot| slot.zone_id == key.zone)
}

fn slot_has_main_ability(slot: &BoardSlot) -> bool {
    slot.card
        .as_ref()
        .map(|card| card.has_rule_with_timing(RuleTiming::Main))
        .unwrap_or(false)
        || slot
            .pilot
            .as_ref()
            .map(|pilot| pilot.has_rule_with_timing(RuleTiming::Main))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;
    use skirmish_domain::{PlayerId, Side};

    fn ctx() -> GameContext {
        GameContext::new("g1", "player_1")
    }

    fn ownership_of(player: &str) -> TurnOwnership {
        TurnOwnership::default().observe(Some(&PlayerId::new(player)), 1)
    }

    #[test]
    fn neutral_bar_offers_end_turn_on_local_main_phase() {
        let snapshot = testkit::snapshot().main_phase("player_1").build();
        let descriptors = neutral_descriptors(&snapshot, &ctx(), &ownership_of("player_1"));
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].id, ActionId::EndTurn);
        assert!(descriptors[0].enabled);
        assert!(descriptors[0].primary);
    }

    #[test]
    fn neutral_end_turn_is_disabled_on_opponent_turn() {
        let snapshot = testkit::snapshot().main_phase("player_2").build();
        let descriptors = neutral_descriptors(&snapshot, &ctx(), &ownership_of("player_2"));
        assert!(!descriptors[0].enabled);
    }

    #[test]
    fn unit_slot_offers_attacks_ahead_of_generic_actions() {
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .with_opponent_unit("slot1", "E1")
            .build();
        let selection = SelectionTarget::slot(SlotKey::new(Side::Local, "slot1"));
        let descriptors = selection_descriptors(&selection, &snapshot, &ctx());
        assert_eq!(descriptors[0].id, ActionId::AttackUnit);
        assert!(descriptors[0].primary);
        assert!(descriptors.iter().any(|d| d.id == ActionId::AttackShield));
        assert!(descriptors.iter().any(|d| d.id == ActionId::Cancel));
    }

    #[test]
    fn no_attack_unit_without_an_eligible_opponent_unit() {
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .build();
        let selection = SelectionTarget::slot(SlotKey::new(Side::Local, "slot1"));
        let descriptors = selection_descriptors(&selection, &snapshot, &ctx());
        assert!(!descriptors.iter().any(|d| d.id == ActionId::AttackUnit));
        assert!(descriptors.iter().any(|d| d.id == ActionId::AttackShield));
    }

    #[test]
    fn tapped_attacker_offers_no_attacks() {
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", false)
            .with_opponent_unit("slot1", "E1")
            .build();
        let selection = SelectionTarget::slot(SlotKey::new(Side::Local, "slot1"));
        let descriptors = selection_descriptors(&selection, &snapshot, &ctx());
        assert!(!descriptors.iter().any(|d| d.id == ActionId::AttackUnit));
        assert!(!descriptors.iter().any(|d| d.id == ActionId::AttackShield));
    }

    #[test]
    fn restriction_suppresses_shield_attack() {
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .with_restriction(ATTACK_SHIELD_RESTRICTION)
            .build();
        let selection = SelectionTarget::slot(SlotKey::new(Side::Local, "slot1"));
        let descriptors = selection_descriptors(&selection, &snapshot, &ctx());
        assert!(!descriptors.iter().any(|d| d.id == ActionId::AttackShield));
    }

    #[test]
    fn hand_selection_offers_play_card() {
        let snapshot = testkit::snapshot().main_phase("player_1").build();
        let selection = SelectionTarget::hand("H1", skirmish_domain::CardKind::Command);
        let descriptors = selection_descriptors(&selection, &snapshot, &ctx());
        assert_eq!(descriptors[0].id, ActionId::PlayCard);
        assert!(descriptors[0].primary);
    }
}
