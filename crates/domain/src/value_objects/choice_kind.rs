//! Choice kinds and notification entry status.
//!
//! Every interactive decision the server can pose is one of a closed set of
//! kinds. Keeping this a sum type (rather than comparing wire tag strings at
//! each call site) makes adding a kind a compile-checked change: every match
//! over `ChoiceKind` must account for it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The closed set of interactive decision kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// "Choose a target" prompt posed mid-effect
    Prompt,
    /// Pick one of several effect options
    Option,
    /// Pick a token to place
    Token,
    /// Accept or decline a single triggered burst effect
    Burst,
    /// A batch of burst effects resolved one at a time by the owner
    BurstGroup,
    /// Defender selects a unit to intercept an attack
    Blocker,
}

impl ChoiceKind {
    /// The discriminator tag used on the notification queue
    pub fn wire_tag(self) -> &'static str {
        match self {
            ChoiceKind::Prompt => "PROMPT_CHOICE",
            ChoiceKind::Option => "OPTION_CHOICE",
            ChoiceKind::Token => "TOKEN_CHOICE",
            ChoiceKind::Burst => "BURST_EFFECT_CHOICE",
            ChoiceKind::BurstGroup => "BURST_EFFECT_CHOICE_GROUP",
            ChoiceKind::Blocker => "BLOCKER_CHOICE",
        }
    }

    pub fn from_wire_tag(tag: &str) -> Result<Self, DomainError> {
        match tag {
            "PROMPT_CHOICE" => Ok(ChoiceKind::Prompt),
            "OPTION_CHOICE" => Ok(ChoiceKind::Option),
            "TOKEN_CHOICE" => Ok(ChoiceKind::Token),
            "BURST_EFFECT_CHOICE" => Ok(ChoiceKind::Burst),
            "BURST_EFFECT_CHOICE_GROUP" => Ok(ChoiceKind::BurstGroup),
            "BLOCKER_CHOICE" => Ok(ChoiceKind::Blocker),
            other => Err(DomainError::parse(format!("unknown choice kind: {other}"))),
        }
    }
}

impl fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_tag())
    }
}

/// Lifecycle status of a notification queue entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "RESOLVED")]
    Resolved,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EntryStatus {
    pub fn is_resolved(self) -> bool {
        matches!(self, EntryStatus::Resolved)
    }
}
