//! Dialog Port - modal decision surfaces owned by the rendering layer.
//!
//! Dialogs are display-only: the coordination engine pushes a request in and
//! the user's selection comes back through `GameClient` methods (or the
//! automation surface), never through callbacks held by the renderer.

use std::sync::Arc;

/// What a dialog should display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    pub body: Option<String>,
    pub options: Vec<DialogOption>,
    pub timeout: Option<DialogTimeout>,
}

impl DialogRequest {
    /// Fingerprint of the displayed rows; used to detect when an already
    /// shown dialog needs re-rendering because its rows changed.
    pub fn fingerprint(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for option in &self.options {
            option.id.hash(&mut hasher);
            option.label.hash(&mut hasher);
            option.enabled.hash(&mut hasher);
            option.done.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOption {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    /// Row already resolved (grouped burst lists render these checked)
    pub done: bool,
}

impl DialogOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
            done: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn done(mut self) -> Self {
        self.done = true;
        self.enabled = false;
        self
    }
}

/// Auto-decision deadline displayed by the dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogTimeout {
    pub after_ms: u64,
    /// Option applied when the deadline elapses
    pub default_option: String,
}

/// Snapshot of a dialog's state for the automation surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogAutomationState {
    pub open: bool,
    pub title: String,
    pub options: Vec<DialogOption>,
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait DialogPort: Send + Sync {
    fn show(&self, request: DialogRequest);
    fn hide(&self);
    fn is_open(&self) -> bool;
    fn automation_state(&self) -> DialogAutomationState;
}

/// The full set of dialogs the coordination engine drives.
///
/// One per choice flow plus the generic error surface and the board-full
/// slot-replacement disambiguation.
#[derive(Clone)]
pub struct Dialogs {
    pub prompt: Arc<dyn DialogPort>,
    pub option: Arc<dyn DialogPort>,
    pub token: Arc<dyn DialogPort>,
    pub burst: Arc<dyn DialogPort>,
    pub burst_group: Arc<dyn DialogPort>,
    pub burst_group_item: Arc<dyn DialogPort>,
    pub blocker: Arc<dyn DialogPort>,
    pub error: Arc<dyn DialogPort>,
    pub slot_replacement: Arc<dyn DialogPort>,
}

impl Dialogs {
    /// Name/port pairs for the automation surface
    pub fn named(&self) -> [(&'static str, &Arc<dyn DialogPort>); 9] {
        [
            ("prompt", &self.prompt),
            ("option", &self.option),
            ("token", &self.token),
            ("burst", &self.burst),
            ("burst-group", &self.burst_group),
            ("burst-item", &self.burst_group_item),
            ("blocker", &self.blocker),
            ("error", &self.error),
            ("slot-replacement", &self.slot_replacement),
        ]
    }
}
