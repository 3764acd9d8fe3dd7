//! Loop-tick cooldown guards.
//!
//! A guard is a signed countdown measured in control-loop iterations. It
//! blocks a class of intents while positive and is re-armed whenever one of
//! those intents is accepted. The loop owns two independent guards: one shared
//! by the button and joystick, one pacing the presentation refresh.

/// Number of control-loop iterations a guard stays closed.
pub type Ticks = i32;

/// Decrementing guard enforcing a minimum spacing between accepted events.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CooldownGuard {
    remaining: Ticks,
}

impl CooldownGuard {
    /// Creates an open guard.
    #[must_use]
    pub const fn new() -> Self {
        Self { remaining: 0 }
    }

    /// Advances the guard by one loop iteration.
    pub fn tick(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
    }

    /// Returns `true` when an intent of this class may be accepted.
    #[must_use]
    pub const fn allow(&self) -> bool {
        self.remaining <= 0
    }

    /// Closes the guard for `magnitude` iterations.
    pub fn consume(&mut self, magnitude: Ticks) {
        self.remaining = magnitude;
    }

    /// Iterations left before the guard reopens.
    #[must_use]
    pub const fn remaining(&self) -> Ticks {
        self.remaining
    }
}
