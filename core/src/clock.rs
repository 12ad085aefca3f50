//! Wall-clock time as an injected capability.
//!
//! Creation timestamps and environment-event expiries are stamped with
//! whatever clock the host wires in. `SystemClock` for production,
//! `FixedClock` for tests and replay tooling.

use crate::types::TimestampMs;

pub trait Clock {
    /// Current time in milliseconds since the epoch.
    fn now_ms(&self) -> TimestampMs;
}

/// Real wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock pinned to one instant. Advance it explicitly between ticks.
pub struct FixedClock {
    ms: TimestampMs,
}

impl FixedClock {
    pub fn at(ms: TimestampMs) -> Self {
        Self { ms }
    }

    pub fn set(&mut self, ms: TimestampMs) {
        self.ms = ms;
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> TimestampMs {
        self.ms
    }
}
