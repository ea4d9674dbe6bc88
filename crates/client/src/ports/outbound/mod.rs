//! Outbound ports - interfaces the coordination engine consumes.
//!
//! Each external collaborator (game engine API, dialogs, board rendering,
//! turn timer, wall clock) is a focused trait so consumers depend only on
//! the capability they need and tests can mock each one independently.

pub mod board_port;
pub mod clock_port;
pub mod dialog_port;
pub mod game_server_port;
pub mod timer_port;

pub use board_port::{BoardPort, SlotView};
pub use clock_port::ClockPort;
pub use dialog_port::{
    DialogAutomationState, DialogOption, DialogPort, DialogRequest, DialogTimeout, Dialogs,
};
pub use game_server_port::GameServerPort;
pub use timer_port::TurnTimerPort;

// Re-export mock types when testing is enabled
#[cfg(any(test, feature = "testing"))]
pub use board_port::MockBoardPort;
#[cfg(any(test, feature = "testing"))]
pub use clock_port::MockClockPort;
#[cfg(any(test, feature = "testing"))]
pub use dialog_port::MockDialogPort;
#[cfg(any(test, feature = "testing"))]
pub use game_server_port::MockGameServerPort;
#[cfg(any(test, feature = "testing"))]
pub use timer_port::MockTurnTimerPort;
