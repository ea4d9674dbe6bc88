//! Coordination layer: who owns the action bar, and what is clickable.

pub mod action_step;
pub mod attack;
pub mod coordinator;
pub mod policy;
pub mod selection;

pub use action_step::ActionStepStatus;
pub use attack::{AttackTargetCoordinator, SlotClickOutcome};
pub use coordinator::GameCoordinator;
pub use selection::{SelectOutcome, SelectionHandler};
