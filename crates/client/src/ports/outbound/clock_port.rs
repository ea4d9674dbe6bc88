//! Clock Port - wall-clock time in milliseconds.
//!
//! Injected so the submission retry window and dialog deadlines are
//! deterministic under test.

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now_millis(&self) -> u64;
}
