//! Selection targets and board slot addressing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{CardUid, ZoneId};
use crate::value_objects::card::CardKind;
use crate::value_objects::phase::Side;

/// Stable address of a rendered board slot.
///
/// Display form is `"{side}-{zone}"`, which is also the key format used by
/// the attack-target whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub owner: Side,
    pub zone: ZoneId,
}

impl SlotKey {
    pub fn new(owner: Side, zone: impl Into<ZoneId>) -> Self {
        Self {
            owner,
            zone: zone.into(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.owner, self.zone)
    }
}

/// The single "currently selected" UI target.
///
/// At most one of these exists at a time; selecting a new target always
/// replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionTarget {
    Hand { uid: CardUid, card_type: CardKind },
    Slot { key: SlotKey },
    Base { side: Side, card_id: CardUid },
}

impl SelectionTarget {
    pub fn hand(uid: impl Into<CardUid>, card_type: CardKind) -> Self {
        SelectionTarget::Hand {
            uid: uid.into(),
            card_type,
        }
    }

    pub fn slot(key: SlotKey) -> Self {
        SelectionTarget::Slot { key }
    }

    pub fn slot_key(&self) -> Option<&SlotKey> {
        match self {
            SelectionTarget::Slot { key } => Some(key),
            SelectionTarget::Hand { .. } | SelectionTarget::Base { .. } => None,
        }
    }

    pub fn is_hand(&self) -> bool {
        matches!(self, SelectionTarget::Hand { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_key_display_matches_whitelist_format() {
        let key = SlotKey::new(Side::Opponent, "slot3");
        assert_eq!(key.to_string(), "opponent-slot3");
    }
}
