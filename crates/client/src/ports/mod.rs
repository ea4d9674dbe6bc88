//! Port definitions for external collaborators.

pub mod outbound;
