//! Skirmish shared crate.
//!
//! Wire protocol contracts between the client and the remote game engine:
//! the polled snapshot tree, per-kind decision submissions, and the common
//! response envelope.
//!
//! ## Versioning Policy
//!
//! - New fields can be added with `#[serde(default)]` (forward compatible)
//! - Unknown enum tags deserialize to `Unknown` variants instead of failing
//! - Renaming fields or tags is a breaking change

pub mod requests;
pub mod responses;
pub mod snapshot;

pub use requests::{
    AcknowledgeEventsRequest, BurstDecision, ChoiceDecision, ConfirmChoiceRequest,
    PlayerActionKind, PlayerActionRequest, TargetSelector,
};
pub use responses::{ErrorCode, RequestError, ResponseResult};
pub use snapshot::{
    find_active_entry, ActionTargetRef, BattleRef, BoardSlot, BurstEventRef, CardInPlay, CardRule,
    ChoiceData, ChoiceEntry, ChoiceOption, CurrentBattle, EventRef, GameSnapshot, HandCard,
    NotificationEntry, NotificationKind, NotificationPayload, OptionTag, PlayerState, TargetOption,
};
