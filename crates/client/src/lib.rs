//! Skirmish client crate.
//!
//! The choice and turn-flow coordination engine: reconciles polled,
//! server-authoritative game snapshots with the set of concurrent
//! interactive choice flows, and derives what the action bar should present
//! on every refresh. Rendering and transport are external collaborators
//! behind the port traits in [`ports`].

pub mod application;
pub mod automation;
pub mod client;
pub mod coordinator;
pub mod flows;
pub mod infrastructure;
pub mod ports;
pub mod runner;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testkit;

pub use automation::{Automation, Interactable, InteractableKind};
pub use client::GameClient;
pub use runner::ClientConfig;
