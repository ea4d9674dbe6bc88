//! Action-step coordination: the bilateral reaction window during battle.
//!
//! Classifies the local player's obligation, matches the current selection
//! against the server-declared legal targets (card uid first, then zone,
//! then the hand-zone wildcard), and builds the trigger descriptors for a
//! matched selection.

use skirmish_domain::{
    ActionDescriptor, ActionId, BattleStatus, RuleTiming, SelectionTarget, Side,
};
use skirmish_shared::{ActionTargetRef, BoardSlot, CurrentBattle, GameSnapshot};

use crate::application::dto::GameContext;

/// The local player's standing in the current action step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStepStatus {
    /// An unresolved, unconfirmed obligation: the local player may react
    Awaiting,
    /// Already passed; waiting on the opponent
    Confirmed,
    /// No action step in progress
    None,
}

pub fn status(snapshot: &GameSnapshot, ctx: &GameContext) -> ActionStepStatus {
    let Some(battle) = action_step_battle(snapshot) else {
        return ActionStepStatus::None;
    };
    if battle.is_confirmed_by(&ctx.player_id) {
        ActionStepStatus::Confirmed
    } else {
        ActionStepStatus::Awaiting
    }
}

fn action_step_battle(snapshot: &GameSnapshot) -> Option<&CurrentBattle> {
    snapshot
        .current_battle
        .as_ref()
        .filter(|battle| battle.status == BattleStatus::ActionStep)
}

/// Legal action-step targets declared for the local player
pub fn legal_targets<'a>(snapshot: &'a GameSnapshot, ctx: &GameContext) -> &'a [ActionTargetRef] {
    action_step_battle(snapshot)
        .map(|battle| battle.targets_for(&ctx.player_id))
        .unwrap_or(&[])
}

/// Whether the selection is one of the declared legal targets.
///
/// Precedence: card identifier, then zone/location string, then the special
/// "hand zone" wildcard.
pub fn selection_matches(
    selection: &SelectionTarget,
    snapshot: &GameSnapshot,
    ctx: &GameContext,
) -> bool {
    let targets = legal_targets(snapshot, ctx);
    if targets.is_empty() {
        return false;
    }

    let selection_uids = selection_card_uids(selection, snapshot, ctx);
    if targets.iter().any(|target| {
        target
            .card_uid
            .as_ref()
            .is_some_and(|uid| selection_uids.contains(uid))
    }) {
        return true;
    }

    if let SelectionTarget::Slot { key } = selection {
        if targets
            .iter()
            .any(|target| target.zone.as_ref() == Some(&key.zone))
        {
            return true;
        }
    }

    selection.is_hand() && targets.iter().any(ActionTargetRef::is_hand_wildcard)
}

/// The selection carries a card rule with the given timing window
pub fn selection_has_timing(
    selection: &SelectionTarget,
    snapshot: &GameSnapshot,
    ctx: &GameContext,
    timing: RuleTiming,
) -> bool {
    match selection {
        SelectionTarget::Hand { uid, .. } => snapshot
            .player(&ctx.player_id)
            .and_then(|player| player.hand.iter().find(|card| &card.uid == uid))
            .map(|card| card.rules.iter().any(|rule| rule.timing == timing))
            .unwrap_or(false),
        SelectionTarget::Slot { .. } => selection_slot(snapshot, ctx, selection)
            .map(|slot| {
                slot.card
                    .as_ref()
                    .map(|card| card.has_rule_with_timing(timing))
                    .unwrap_or(false)
                    || slot
                        .pilot
                        .as_ref()
                        .map(|pilot| pilot.has_rule_with_timing(timing))
                        .unwrap_or(false)
            })
            .unwrap_or(false),
        SelectionTarget::Base { .. } => false,
    }
}

/// Action-bar descriptors for a matched action-step selection.
///
/// If both the unit and its pilot carry a triggerable rule, both are
/// offered with the pilot flagged primary; a single qualifying card gets
/// its specific trigger; a match the client cannot attribute to a card
/// falls back to a generic "Trigger Card Effect". A skip affordance is
/// always appended.
pub fn descriptors_for_selection(
    selection: Option<&SelectionTarget>,
    snapshot: &GameSnapshot,
    ctx: &GameContext,
) -> Vec<ActionDescriptor> {
    let mut descriptors = Vec::new();

    if let Some(selection) = selection {
        if selection_matches(selection, snapshot, ctx) {
            match selection_slot(snapshot, ctx, selection) {
                Some(slot) => {
                    let unit_triggers = slot
                        .card
                        .as_ref()
                        .is_some_and(|card| card.has_rule_with_timing(RuleTiming::ActionStep));
                    let pilot_triggers = slot
                        .pilot
                        .as_ref()
                        .is_some_and(|pilot| pilot.has_rule_with_timing(RuleTiming::ActionStep));
                    match (unit_triggers, pilot_triggers) {
                        (true, true) => {
                            // Pilot wins the primary tie-break
                            descriptors.push(
                                ActionDescriptor::new(
                                    ActionId::TriggerPilotEffect,
                                    "Trigger Pilot Effect",
                                )
                                .primary(),
                            );
                            descriptors.push(ActionDescriptor::new(
                                ActionId::TriggerUnitEffect,
                                "Trigger Unit Effect",
                            ));
                        }
                        (true, false) => descriptors.push(
                            ActionDescriptor::new(
                                ActionId::TriggerUnitEffect,
                                "Trigger Unit Effect",
                            )
                            .primary(),
                        ),
                        (false, true) => descriptors.push(
                            ActionDescriptor::new(
                                ActionId::TriggerPilotEffect,
                                "Trigger Pilot Effect",
                            )
                            .primary(),
                        ),
                        (false, false) => descriptors.push(
                            ActionDescriptor::new(
                                ActionId::ActivateEffect,
                                "Trigger Card Effect",
                            )
                            .primary(),
                        ),
                    }
                }
                None => descriptors.push(
                    ActionDescriptor::new(ActionId::ActivateEffect, "Trigger Card Effect")
                        .primary(),
                ),
            }
        }
    }

    descriptors.push(ActionDescriptor::new(ActionId::SkipStep, "Skip"));
    descriptors
}

fn selection_slot<'a>(
    snapshot: &'a GameSnapshot,
    ctx: &GameContext,
    selection: &SelectionTarget,
) -> Option<&'a BoardSlot> {
    let key = selection.slot_key()?;
    let player = match key.owner {
        Side::Local => snapshot.player(&ctx.player_id)?,
        Side::Opponent => snapshot.opponent_of(&ctx.player_id)?,
    };
    player
        .battle_area
        .iter()
        .find(|slot| slot.zone_id == key.zone)
}

fn selection_card_uids(
    selection: &SelectionTarget,
    snapshot: &GameSnapshot,
    ctx: &GameContext,
) -> Vec<skirmish_domain::CardUid> {
    match selection {
        SelectionTarget::Hand { uid, .. } => vec![uid.clone()],
        SelectionTarget::Base { card_id, .. } => vec![card_id.clone()],
        SelectionTarget::Slot { .. } => selection_slot(snapshot, ctx, selection)
            .map(|slot| {
                slot.card
                    .iter()
                    .chain(slot.pilot.iter())
                    .map(|card| card.uid.clone())
                    .collect()
            })
            .unwrap_or_default(),
    }
}
