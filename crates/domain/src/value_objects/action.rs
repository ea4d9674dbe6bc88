//! Action-bar descriptors and their ordering rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of action-bar commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionId {
    AttackUnit,
    AttackShield,
    TriggerUnitEffect,
    TriggerPilotEffect,
    ActivateEffect,
    PlayCard,
    EndTurn,
    SkipStep,
    Cancel,
}

impl ActionId {
    /// Fixed ordering rank: attack > activate-effect > play-card >
    /// end-turn > cancel.
    pub fn rank(self) -> u8 {
        match self {
            ActionId::AttackUnit | ActionId::AttackShield => 0,
            ActionId::TriggerUnitEffect
            | ActionId::TriggerPilotEffect
            | ActionId::ActivateEffect => 1,
            ActionId::PlayCard => 2,
            ActionId::EndTurn => 3,
            ActionId::SkipStep | ActionId::Cancel => 4,
        }
    }

    /// Stable slug used by the automation surface
    pub fn slug(self) -> &'static str {
        match self {
            ActionId::AttackUnit => "attack-unit",
            ActionId::AttackShield => "attack-shield",
            ActionId::TriggerUnitEffect => "trigger-unit-effect",
            ActionId::TriggerPilotEffect => "trigger-pilot-effect",
            ActionId::ActivateEffect => "activate-effect",
            ActionId::PlayCard => "play-card",
            ActionId::EndTurn => "end-turn",
            ActionId::SkipStep => "skip-step",
            ActionId::Cancel => "cancel",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "attack-unit" => Some(ActionId::AttackUnit),
            "attack-shield" => Some(ActionId::AttackShield),
            "trigger-unit-effect" => Some(ActionId::TriggerUnitEffect),
            "trigger-pilot-effect" => Some(ActionId::TriggerPilotEffect),
            "activate-effect" => Some(ActionId::ActivateEffect),
            "play-card" => Some(ActionId::PlayCard),
            "end-turn" => Some(ActionId::EndTurn),
            "skip-step" => Some(ActionId::SkipStep),
            "cancel" => Some(ActionId::Cancel),
            _ => None,
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One button on the action bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub label: String,
    pub primary: bool,
    pub enabled: bool,
}

impl ActionDescriptor {
    pub fn new(id: ActionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            primary: false,
            enabled: true,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Normalize a merged descriptor list: de-duplicate by action id (first
/// occurrence wins), sort by the fixed rank table, and demote every primary
/// flag after the first.
pub fn normalize_descriptors(descriptors: Vec<ActionDescriptor>) -> Vec<ActionDescriptor> {
    let mut seen = Vec::new();
    let mut out: Vec<ActionDescriptor> = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if seen.contains(&descriptor.id) {
            continue;
        }
        seen.push(descriptor.id);
        out.push(descriptor);
    }

    // Stable by insertion order within a rank
    out.sort_by_key(|d| d.id.rank());

    let mut primary_seen = false;
    for descriptor in &mut out {
        if descriptor.primary {
            if primary_seen {
                descriptor.primary = false;
            }
            primary_seen = true;
        }
    }
    out
}
