//! Card classification and rule timing windows.

use serde::{Deserialize, Serialize};

/// Printed card category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    #[serde(rename = "UNIT")]
    Unit,
    #[serde(rename = "PILOT")]
    Pilot,
    #[serde(rename = "COMMAND")]
    Command,
    #[serde(rename = "BASE")]
    Base,
    #[serde(rename = "RESOURCE")]
    Resource,
    #[default]
    #[serde(other)]
    Unknown,
}

/// The window in which a card rule may be triggered.
///
/// Drives the selection gating in action steps: a card is only a legal
/// action-step selection if it carries a rule whose timing matches the
/// current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleTiming {
    #[serde(rename = "MAIN")]
    Main,
    #[serde(rename = "ACTION_STEP")]
    ActionStep,
    #[serde(rename = "BURST")]
    Burst,
    #[default]
    #[serde(other)]
    Unknown,
}
