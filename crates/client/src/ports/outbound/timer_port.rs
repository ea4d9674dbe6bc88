//! Turn Timer Port - the countdown display.
//!
//! Whichever flow owns the action bar coordinates the timer: the non-owner
//! of a pending choice pauses their countdown while waiting. Both calls are
//! idempotent.

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TurnTimerPort: Send + Sync {
    fn pause(&self);
    fn resume(&self);
}
