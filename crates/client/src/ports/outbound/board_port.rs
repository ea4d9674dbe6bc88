//! Board Port - the rendered battle area.

use skirmish_domain::{CardUid, SelectionTarget, SlotKey, ZoneId};

/// View model of one rendered board slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub key: SlotKey,
    pub zone_id: ZoneId,
    pub card_uid: Option<CardUid>,
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait BoardPort: Send + Sync {
    /// Slots currently drawn on screen, in render order
    fn visible_slots(&self) -> Vec<SlotView>;

    /// Highlight (or clear) the selected target
    fn set_selected(&self, selection: Option<SelectionTarget>);

    /// Enable or disable generic slot click handling
    fn set_slot_click_enabled(&self, enabled: bool);

    /// Highlight the legal attack targets while attack mode is active
    fn show_attack_targets(&self, targets: Vec<SlotKey>);

    fn clear_attack_targets(&self);
}
