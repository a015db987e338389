//! Clock used for record creation, block timestamps and vote times.

use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use parking_lot::Mutex;

/// Source of the current time, truncated to whole seconds.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock (UTC).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc().trunc_subsecs(0)
    }
}

/// Manually driven clock for tests.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: Mutex<NaiveDateTime>,
}

impl FixedTimeSource {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now.trunc_subsecs(0)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now.trunc_subsecs(0);
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock();
        *now += Duration::seconds(seconds);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
