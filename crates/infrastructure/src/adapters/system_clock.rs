//! Wall-clock time source

use chrono::{DateTime, Utc};
use keyhole_application::ports::Clock;

/// Reads the host's wall clock; used by the binary for expiry checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// A handle on the wall clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
