//! Skirmish domain crate.
//!
//! Vocabulary types shared by the wire protocol and the client coordination
//! engine: opaque server ids, closed enums for choice kinds and game phases,
//! selection targets, action descriptors, and the turn-ownership value
//! object. Everything here is a plain value with its invariants attached;
//! no IO, no async.

pub mod error;
pub mod ids;
pub mod value_objects;

pub use error::DomainError;
pub use ids::{CardUid, EntryId, EventId, GameId, PlayerId, ZoneId};
pub use value_objects::action::{normalize_descriptors, ActionDescriptor, ActionId};
pub use value_objects::card::{CardKind, RuleTiming};
pub use value_objects::choice_kind::{ChoiceKind, EntryStatus};
pub use value_objects::phase::{BattleStatus, GameStatus, PhaseKind, Side};
pub use value_objects::selection::{SelectionTarget, SlotKey};
pub use value_objects::turn::TurnOwnership;
