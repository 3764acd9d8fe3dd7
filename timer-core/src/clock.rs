//! Wall-clock time and the countdown reconciler.
//!
//! The countdown never decrements itself. Once armed it remembers the wall
//! clock at arming plus the duration it was armed with, and every query
//! recomputes the remaining seconds from the current wall-clock reading. Loop
//! timing jitter therefore cannot accumulate into drift.

use core::fmt;

use chrono::{NaiveTime, TimeDelta, Timelike};

/// Seconds in one wall-clock day.
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Countdown length in whole seconds.
pub type Seconds = u32;

/// Time of day reported by the independent clock source.
///
/// Always a whole second within the day; leap seconds are never produced.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct WallClock(NaiveTime);

impl WallClock {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(NaiveTime::MIN);

    /// Builds a time from literal fields.
    ///
    /// # Panics
    ///
    /// Panics when a field is out of range. Intended for constants; use
    /// [`WallClock::new`] for untrusted input.
    #[must_use]
    pub const fn from_hms(hours: u8, minutes: u8, seconds: u8) -> Self {
        match Self::new(hours, minutes, seconds) {
            Some(clock) => clock,
            None => panic!("wall-clock field out of range"),
        }
    }

    /// Builds a time, rejecting out-of-range fields.
    #[must_use]
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        match NaiveTime::from_hms_opt(hours as u32, minutes as u32, seconds as u32) {
            Some(time) => Some(Self(time)),
            None => None,
        }
    }

    #[must_use]
    pub fn hours(&self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.0.minute()
    }

    #[must_use]
    pub fn seconds(&self) -> u32 {
        self.0.second()
    }

    /// Seconds elapsed since midnight.
    #[must_use]
    pub fn seconds_of_day(&self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    /// Inverse of [`WallClock::seconds_of_day`], wrapping at midnight.
    #[must_use]
    pub fn from_seconds_of_day(total: u32) -> Self {
        NaiveTime::from_num_seconds_from_midnight_opt(total % SECONDS_PER_DAY, 0)
            .map_or(Self::MIDNIGHT, Self)
    }

    /// Returns the time `delta` seconds later, wrapping at midnight.
    #[must_use]
    pub fn advanced_by(&self, delta: u32) -> Self {
        let (time, _wrapped_days) = self
            .0
            .overflowing_add_signed(TimeDelta::seconds(i64::from(delta)));
        Self(time)
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole seconds only, so this is always `hh:mm:ss`.
        fmt::Display::fmt(&self.0, f)
    }
}

/// Snapshot captured at the instant the countdown was armed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ArmedAnchor {
    /// Wall-clock seconds since midnight when the run started.
    pub started_at: u32,
    /// Duration the run was armed with.
    pub armed_duration: Seconds,
}

impl ArmedAnchor {
    /// Remaining seconds at `now`, clamped at zero.
    ///
    /// Elapsed time is measured modulo one day so a run that crosses midnight
    /// keeps counting down instead of jumping.
    #[must_use]
    pub fn remaining_at(&self, now: WallClock) -> Seconds {
        let now = now.seconds_of_day();
        let elapsed = (now + SECONDS_PER_DAY - self.started_at % SECONDS_PER_DAY) % SECONDS_PER_DAY;
        self.armed_duration.saturating_sub(elapsed)
    }
}

/// Result of reconciling an armed countdown against the wall clock.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Reconciled {
    /// Not armed; the duration is editable and untouched.
    Idle,
    /// Armed and still counting.
    Counting(Seconds),
    /// Armed and the countdown reached zero.
    Expired,
}

/// Countdown value plus the anchor that drives it while armed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CountdownClock {
    duration: Seconds,
    anchor: Option<ArmedAnchor>,
}

impl CountdownClock {
    /// Creates an idle countdown holding `duration` seconds.
    #[must_use]
    pub const fn new(duration: Seconds) -> Self {
        Self {
            duration,
            anchor: None,
        }
    }

    /// Current countdown value in seconds.
    #[must_use]
    pub const fn duration(&self) -> Seconds {
        self.duration
    }

    /// Anchor of the active run, if armed.
    #[must_use]
    pub const fn anchor(&self) -> Option<ArmedAnchor> {
        self.anchor
    }

    /// Returns `true` while a run is anchored.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.anchor.is_some()
    }

    /// Replaces the editable duration. Ignored while armed.
    pub fn set_duration(&mut self, duration: Seconds) -> bool {
        if self.is_armed() {
            return false;
        }
        self.duration = duration;
        true
    }

    /// Anchors the run at `now`; refuses a zero duration.
    pub fn arm(&mut self, now: WallClock) -> Option<ArmedAnchor> {
        if self.duration == 0 {
            return None;
        }
        let anchor = ArmedAnchor {
            started_at: now.seconds_of_day(),
            armed_duration: self.duration,
        };
        self.anchor = Some(anchor);
        Some(anchor)
    }

    /// Drops the anchor, keeping whatever remaining value was last computed.
    pub fn disarm(&mut self) -> Option<ArmedAnchor> {
        self.anchor.take()
    }

    /// Recomputes the duration from the wall clock.
    pub fn reconcile(&mut self, now: WallClock) -> Reconciled {
        let Some(anchor) = self.anchor else {
            return Reconciled::Idle;
        };
        self.duration = anchor.remaining_at(now);
        if self.duration == 0 {
            Reconciled::Expired
        } else {
            Reconciled::Counting(self.duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_of_day_round_trips_through_components() {
        let clock = WallClock::from_hms(12, 59, 55);
        assert_eq!(clock.seconds_of_day(), 46_795);
        assert_eq!(WallClock::from_seconds_of_day(46_795), clock);
    }

    #[test]
    fn new_rejects_out_of_range_fields() {
        assert!(WallClock::new(23, 59, 59).is_some());
        assert!(WallClock::new(24, 0, 0).is_none());
        assert!(WallClock::new(0, 60, 0).is_none());
        assert!(WallClock::new(0, 0, 60).is_none());
    }

    #[test]
    fn accessors_report_components() {
        let clock = WallClock::from_hms(23, 4, 5);
        assert_eq!((clock.hours(), clock.minutes(), clock.seconds()), (23, 4, 5));
        assert_eq!(WallClock::default(), WallClock::MIDNIGHT);
    }

    #[test]
    fn from_seconds_of_day_wraps_whole_days() {
        assert_eq!(
            WallClock::from_seconds_of_day(SECONDS_PER_DAY + 61),
            WallClock::from_hms(0, 1, 1)
        );
    }

    #[test]
    fn advanced_by_wraps_at_midnight() {
        let clock = WallClock::from_hms(23, 59, 58);
        assert_eq!(clock.advanced_by(5), WallClock::from_hms(0, 0, 3));
        assert_eq!(
            clock.advanced_by(3 * SECONDS_PER_DAY + 2),
            WallClock::from_hms(0, 0, 0)
        );
    }

    #[test]
    fn display_pads_components() {
        let mut text: heapless::String<8> = heapless::String::new();
        core::fmt::write(&mut text, format_args!("{}", WallClock::from_hms(7, 5, 9))).unwrap();
        assert_eq!(text.as_str(), "07:05:09");
    }

    #[test]
    fn arm_requires_positive_duration() {
        let mut countdown = CountdownClock::new(0);
        assert_eq!(countdown.arm(WallClock::MIDNIGHT), None);
        assert!(!countdown.is_armed());
    }

    #[test]
    fn frozen_clock_keeps_remaining_constant() {
        let start = WallClock::from_hms(12, 0, 0);
        let mut countdown = CountdownClock::new(30);
        countdown.arm(start).unwrap();

        for _ in 0..1_000 {
            assert_eq!(countdown.reconcile(start), Reconciled::Counting(30));
        }
    }

    #[test]
    fn advancing_clock_reduces_remaining_exactly() {
        let start = WallClock::from_hms(12, 0, 0);
        let mut countdown = CountdownClock::new(30);
        countdown.arm(start).unwrap();

        assert_eq!(
            countdown.reconcile(start.advanced_by(7)),
            Reconciled::Counting(23)
        );
        assert_eq!(countdown.duration(), 23);
        assert_eq!(countdown.reconcile(start.advanced_by(30)), Reconciled::Expired);
        assert_eq!(countdown.duration(), 0);
    }

    #[test]
    fn overshoot_clamps_at_zero() {
        let start = WallClock::from_hms(8, 0, 0);
        let mut countdown = CountdownClock::new(5);
        countdown.arm(start).unwrap();
        assert_eq!(countdown.reconcile(start.advanced_by(90)), Reconciled::Expired);
        assert_eq!(countdown.duration(), 0);
    }

    #[test]
    fn run_across_midnight_keeps_counting() {
        let start = WallClock::from_hms(23, 59, 50);
        let mut countdown = CountdownClock::new(60);
        countdown.arm(start).unwrap();
        assert_eq!(
            countdown.reconcile(WallClock::from_hms(0, 0, 10)),
            Reconciled::Counting(40)
        );
    }

    #[test]
    fn duration_is_locked_while_armed() {
        let mut countdown = CountdownClock::new(10);
        countdown.arm(WallClock::MIDNIGHT).unwrap();
        assert!(!countdown.set_duration(99));
        assert_eq!(countdown.duration(), 10);

        countdown.disarm();
        assert!(countdown.set_duration(99));
        assert_eq!(countdown.duration(), 99);
    }
}
