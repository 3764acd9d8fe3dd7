//! Mirrors timer telemetry to defmt.

#![cfg(target_os = "none")]

use defmt::info;
use timer_core::telemetry::{EventId, TelemetryLog};

/// Remembers which records were already logged.
pub struct DefmtMirror {
    next: EventId,
}

impl DefmtMirror {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Logs every record newer than the previous drain.
    pub fn drain(&mut self, log: &TelemetryLog) {
        if log.next_id() == self.next {
            return;
        }
        for record in log.since(self.next) {
            info!("{}", defmt::Display2Format(record));
        }
        self.next = log.next_id();
    }
}
