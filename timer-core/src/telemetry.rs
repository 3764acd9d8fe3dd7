//! Telemetry events emitted by the control loop.
//!
//! Records land in a fixed-capacity ring stamped with a monotonically
//! increasing id and the wall-clock time of the iteration that produced
//! them. Consumers (defmt on the firmware, stdout in the emulator) remember
//! the next id they expect and drain anything newer with [`TelemetryLog::since`].

use core::fmt;

use heapless::HistoryBuf;

use crate::clock::{Seconds, WallClock};
use crate::presentation::format_countdown;
use crate::tone::SongReport;

/// Records retained in memory.
pub const TELEMETRY_CAPACITY: usize = 32;

/// Identifier assigned to each record.
pub type EventId = u32;

/// Things worth knowing about that the control loop did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimerEvent {
    Booted { duration: Seconds },
    DurationSet(Seconds),
    DigitChanged(char),
    MotorStepped { offset: u32, levels: u8, wrapped: bool },
    Armed { duration: Seconds, started_at: u32 },
    /// Center press while idle with nothing to count down.
    ArmRejected,
    Stopped { remaining: Seconds },
    Expired { lux: u32 },
    AlarmPlayed(SongReport),
    AlarmSuppressed { lux: u32 },
}

impl TimerEvent {
    /// Short kebab-case tag for log lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            TimerEvent::Booted { .. } => "booted",
            TimerEvent::DurationSet(_) => "duration-set",
            TimerEvent::DigitChanged(_) => "digit-changed",
            TimerEvent::MotorStepped { .. } => "motor-stepped",
            TimerEvent::Armed { .. } => "armed",
            TimerEvent::ArmRejected => "arm-rejected",
            TimerEvent::Stopped { .. } => "stopped",
            TimerEvent::Expired { .. } => "expired",
            TimerEvent::AlarmPlayed(_) => "alarm-played",
            TimerEvent::AlarmSuppressed { .. } => "alarm-suppressed",
        }
    }
}

impl fmt::Display for TimerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        match self {
            TimerEvent::Booted { duration } | TimerEvent::DurationSet(duration) => {
                write!(f, "{label} {}", format_countdown(*duration))
            }
            TimerEvent::DigitChanged(ch) => write!(f, "{label} '{ch}'"),
            TimerEvent::MotorStepped {
                offset,
                levels,
                wrapped,
            } => {
                write!(f, "{label} offset={offset} levels={levels:#04x}")?;
                if *wrapped {
                    f.write_str(" (wrapped)")?;
                }
                Ok(())
            }
            TimerEvent::Armed {
                duration,
                started_at,
            } => write!(
                f,
                "{label} {} from {}",
                format_countdown(*duration),
                WallClock::from_seconds_of_day(*started_at)
            ),
            TimerEvent::ArmRejected => f.write_str(label),
            TimerEvent::Stopped { remaining } => {
                write!(f, "{label} {} left", format_countdown(*remaining))
            }
            TimerEvent::Expired { lux } | TimerEvent::AlarmSuppressed { lux } => {
                write!(f, "{label} lux={lux}")
            }
            TimerEvent::AlarmPlayed(report) => write!(
                f,
                "{label} bursts={} rests={} skipped={}",
                report.bursts, report.rests, report.skipped
            ),
        }
    }
}

/// Event stamped with its id and wall-clock time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub at: WallClock,
    pub event: TimerEvent,
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "telemetry:timer #{} {} {}", self.id, self.at, self.event)
    }
}

/// Ring buffer of the most recent telemetry records.
pub struct TelemetryLog {
    ring: HistoryBuf<TelemetryRecord, TELEMETRY_CAPACITY>,
    next_id: EventId,
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_id: 0,
        }
    }

    /// Appends an event and returns its id.
    pub fn record(&mut self, event: TimerEvent, at: WallClock) -> EventId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.ring.write(TelemetryRecord { id, at, event });
        id
    }

    /// Id the next record will receive.
    #[must_use]
    pub const fn next_id(&self) -> EventId {
        self.next_id
    }

    #[must_use]
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Retained records, oldest first.
    pub fn oldest_first(&self) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.ring.oldest_ordered()
    }

    /// Retained records with an id of at least `first`, oldest first.
    ///
    /// Records that already fell out of the ring are silently missing.
    pub fn since(&self, first: EventId) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.oldest_first().filter(move |record| record.id >= first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(record: &TelemetryRecord) -> heapless::String<96> {
        let mut text = heapless::String::new();
        fmt::write(&mut text, format_args!("{record}")).unwrap();
        text
    }

    #[test]
    fn ids_increase_per_record() {
        let mut log = TelemetryLog::new();
        assert!(log.is_empty());
        assert_eq!(log.record(TimerEvent::ArmRejected, WallClock::MIDNIGHT), 0);
        assert_eq!(log.record(TimerEvent::DurationSet(5), WallClock::MIDNIGHT), 1);
        assert_eq!(log.next_id(), 2);
        assert_eq!(log.latest().map(|r| r.event), Some(TimerEvent::DurationSet(5)));
    }

    #[test]
    fn since_skips_already_drained_records() {
        let mut log = TelemetryLog::new();
        log.record(TimerEvent::DurationSet(1), WallClock::MIDNIGHT);
        let mark = log.next_id();
        log.record(TimerEvent::DurationSet(2), WallClock::MIDNIGHT);
        log.record(TimerEvent::DurationSet(3), WallClock::MIDNIGHT);

        let drained: heapless::Vec<TimerEvent, 4> = log.since(mark).map(|r| r.event).collect();
        assert_eq!(
            drained.as_slice(),
            &[TimerEvent::DurationSet(2), TimerEvent::DurationSet(3)]
        );
    }

    #[test]
    fn ring_keeps_only_recent_records() {
        let mut log = TelemetryLog::new();
        for value in 0..40 {
            log.record(TimerEvent::DurationSet(value), WallClock::MIDNIGHT);
        }
        assert_eq!(log.len(), TELEMETRY_CAPACITY);
        assert_eq!(log.oldest_first().next().map(|r| r.id), Some(8));
    }

    #[test]
    fn records_render_as_log_lines() {
        let mut log = TelemetryLog::new();
        log.record(
            TimerEvent::MotorStepped {
                offset: 300,
                levels: 1,
                wrapped: true,
            },
            WallClock::from_hms(12, 59, 55),
        );
        let line = render(log.latest().unwrap());
        assert_eq!(
            line.as_str(),
            "telemetry:timer #0 12:59:55 motor-stepped offset=300 levels=0x01 (wrapped)"
        );
    }
}
