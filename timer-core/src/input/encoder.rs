//! Rotary steps from a hardware quadrature counter.
//!
//! The encoder phases are counted by a timer peripheral, which keeps counting
//! while the control loop is busy. Each loop iteration reads the free-running
//! 16-bit count; the difference since the previous reading is banked, and one
//! detent's worth of counts is released as a single [`RotaryStep`] per
//! iteration. Turns made during a blocking alarm are therefore delivered
//! afterwards rather than lost.

use super::RotaryStep;

/// Counter edges per mechanical detent.
pub const COUNTS_PER_DETENT: i32 = 4;

const COUNTER_SPAN: i32 = 1 << 16;

/// Turns counter readings into detent-sized rotary steps.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DetentCounter {
    last: u16,
    pending: i32,
}

impl DetentCounter {
    /// Starts counting from the current hardware reading.
    #[must_use]
    pub const fn new(count: u16) -> Self {
        Self {
            last: count,
            pending: 0,
        }
    }

    /// Counts banked but not yet reported as steps.
    #[must_use]
    pub const fn pending(&self) -> i32 {
        self.pending
    }

    /// Feeds the current counter value and returns at most one step.
    ///
    /// Counting up is clockwise. The delta is taken modulo 2^16, so the
    /// counter may wrap in either direction between readings.
    pub fn update(&mut self, count: u16) -> RotaryStep {
        let raw = i32::from(count) - i32::from(self.last);
        let delta = if raw > i32::from(i16::MAX) {
            raw - COUNTER_SPAN
        } else if raw < i32::from(i16::MIN) {
            raw + COUNTER_SPAN
        } else {
            raw
        };
        self.last = count;
        self.pending = self.pending.saturating_add(delta);

        if self.pending >= COUNTS_PER_DETENT {
            self.pending -= COUNTS_PER_DETENT;
            RotaryStep::Right
        } else if self.pending <= -COUNTS_PER_DETENT {
            self.pending += COUNTS_PER_DETENT;
            RotaryStep::Left
        } else {
            RotaryStep::Wait
        }
    }
}
