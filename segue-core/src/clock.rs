//! Wall-clock source for VIP expiry checks.

use std::fmt;

pub trait Clock: Send + Sync + fmt::Debug {
    fn now_epoch_secs(&self) -> i64;
}

/// Reads the system clock through chrono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always reports the same instant. Useful for hosts replaying sessions and
/// for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}
