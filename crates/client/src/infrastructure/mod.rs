//! Concrete adapters for the outbound ports.

pub mod clock;
pub mod headless;
pub mod http_server;

pub use clock::SystemClock;
pub use http_server::HttpGameServer;
