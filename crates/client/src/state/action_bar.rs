//! The action bar's derived state.
//!
//! Recomputed on every refresh by the coordinator; exactly one owner renders
//! it per refresh. An empty descriptor list is only legal together with
//! `waiting_for_opponent` or while a dialog drives the interaction.

use skirmish_domain::{ActionDescriptor, ChoiceKind};

/// Who decided the bar's contents this refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BarOwner {
    #[default]
    None,
    Flow(ChoiceKind),
    AttackMode,
    ActionStep,
    MainPhase,
    Disconnected,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionBarState {
    pub owner: BarOwner,
    pub waiting_for_opponent: bool,
    pub descriptors: Vec<ActionDescriptor>,
}

impl ActionBarState {
    pub fn set(&mut self, owner: BarOwner, descriptors: Vec<ActionDescriptor>) {
        self.owner = owner;
        self.waiting_for_opponent = false;
        self.descriptors = descriptors;
    }

    /// Waiting state: no buttons, opponent must act first
    pub fn set_waiting(&mut self, owner: BarOwner) {
        self.owner = owner;
        self.waiting_for_opponent = true;
        self.descriptors.clear();
    }

    /// Cleared state: a dialog, not the bar, drives the interaction
    pub fn clear_for(&mut self, owner: BarOwner) {
        self.owner = owner;
        self.waiting_for_opponent = false;
        self.descriptors.clear();
    }

    pub fn disconnected() -> Self {
        Self {
            owner: BarOwner::Disconnected,
            waiting_for_opponent: false,
            descriptors: Vec::new(),
        }
    }
}
