//! Time of day derived from the embassy monotonic timer.

#![cfg(target_os = "none")]

use embassy_time::Instant;
use timer_core::clock::{SECONDS_PER_DAY, WallClock};

/// Wall clock anchored to the last `set` call.
pub struct TimeOfDay {
    base: WallClock,
    set_at: Instant,
}

impl TimeOfDay {
    pub fn new() -> Self {
        Self {
            base: WallClock::MIDNIGHT,
            set_at: Instant::now(),
        }
    }

    pub fn now(&self) -> WallClock {
        let elapsed = Instant::now().duration_since(self.set_at).as_secs();
        let within_day = u32::try_from(elapsed % u64::from(SECONDS_PER_DAY)).unwrap_or(0);
        self.base.advanced_by(within_day)
    }

    pub fn set(&mut self, time: WallClock) {
        self.base = time;
        self.set_at = Instant::now();
    }
}
