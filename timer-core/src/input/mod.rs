//! Raw input sampling and intent interpretation.
//!
//! Every loop iteration samples the push-button, the joystick and the rotary
//! encoder once, then converts those levels into at most a couple of discrete
//! [`Intent`]s. The button, the joystick center press and the joystick
//! directions share one interaction cooldown guard: accepting any of them
//! closes the guard for all three. Rotary steps are never gated.

use heapless::Vec;

use crate::arbiter::RunState;
use crate::clock::Seconds;
use crate::config::CooldownConfig;
use crate::cooldown::CooldownGuard;

pub mod encoder;

pub use encoder::DetentCounter;

/// One gated intent plus one rotary step.
pub const MAX_INTENTS_PER_ITERATION: usize = 2;

/// Intents produced by a single loop iteration.
pub type Intents = Vec<Intent, MAX_INTENTS_PER_ITERATION>;

/// Joystick direction bitmask as reported by the joystick driver.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct JoystickMask(u8);

impl JoystickMask {
    pub const NONE: Self = Self(0);
    pub const CENTER: Self = Self(0x01);
    pub const UP: Self = Self(0x02);
    pub const DOWN: Self = Self(0x04);
    pub const LEFT: Self = Self(0x08);
    pub const RIGHT: Self = Self(0x10);

    /// Wraps raw driver bits; unknown bits are kept but ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Tri-state rotary encoder reading.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RotaryStep {
    #[default]
    Wait,
    Left,
    Right,
}

/// Input levels sampled once per loop iteration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawInputs {
    pub button_pressed: bool,
    pub joystick: JoystickMask,
    pub rotary: RotaryStep,
}

/// Duration edit requested through a joystick direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DurationAdjust {
    /// Joystick left: one second less, floored at zero.
    Decrement,
    /// Joystick right: one second more.
    Increment,
    /// Joystick down: ten seconds less, only when at least ten remain.
    DecrementTen,
    /// Joystick up: ten seconds more.
    IncrementTen,
}

impl DurationAdjust {
    /// Applies the edit to `duration`.
    #[must_use]
    pub const fn apply(self, duration: Seconds) -> Seconds {
        match self {
            DurationAdjust::Decrement => duration.saturating_sub(1),
            DurationAdjust::Increment => duration.saturating_add(1),
            DurationAdjust::DecrementTen => {
                if duration >= 10 {
                    duration - 10
                } else {
                    duration
                }
            }
            DurationAdjust::IncrementTen => duration.saturating_add(10),
        }
    }
}

/// Discrete user action derived from raw input levels.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Intent {
    /// Button press: raise the motor drive one level.
    StepMotor,
    /// Joystick center: arm or stop the countdown.
    ToggleRun,
    /// Joystick direction: edit the countdown duration.
    AdjustDuration(DurationAdjust),
    /// Rotary step: move the display digit.
    CycleDigit(RotaryStep),
}

/// Single character shown on the secondary indicator, `'0'..='9'`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DisplayDigit(u8);

impl Default for DisplayDigit {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DisplayDigit {
    pub const ZERO: Self = Self(0);

    /// Builds a digit from `'0'..='9'`.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0'..='9' => Some(Self(ch as u8 - b'0')),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        (b'0' + self.0) as char
    }

    /// Next digit, wrapping `'9'` to `'0'`.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 == 9 { Self(0) } else { Self(self.0 + 1) }
    }

    /// Previous digit, wrapping `'0'` to `'9'`.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.0 == 0 { Self(9) } else { Self(self.0 - 1) }
    }

    /// Moves the digit one position in the rotary direction.
    #[must_use]
    pub const fn stepped(self, step: RotaryStep) -> Self {
        match step {
            RotaryStep::Right => self.next(),
            RotaryStep::Left => self.previous(),
            RotaryStep::Wait => self,
        }
    }
}

const DIRECTIONS: [(JoystickMask, DurationAdjust); 4] = [
    (JoystickMask::LEFT, DurationAdjust::Decrement),
    (JoystickMask::RIGHT, DurationAdjust::Increment),
    (JoystickMask::DOWN, DurationAdjust::DecrementTen),
    (JoystickMask::UP, DurationAdjust::IncrementTen),
];

/// Converts sampled levels into intents, gating them through the guard.
///
/// The guard is consumed as soon as an intent is emitted, whether or not the
/// arbiter later accepts it; a center press with a zero duration still closes
/// the guard. Direction intents are only produced while the countdown is not
/// armed. Rotary steps are always passed on; the controller drops them if the
/// countdown is armed once earlier intents have been applied, so a stop and a
/// step sampled together still move the digit.
pub fn interpret(
    inputs: &RawInputs,
    state: RunState,
    guard: &mut CooldownGuard,
    cooldowns: &CooldownConfig,
) -> Intents {
    let mut intents = Intents::new();
    let editable = state != RunState::Armed;

    if inputs.button_pressed && guard.allow() {
        push(&mut intents, Intent::StepMotor);
        guard.consume(cooldowns.interaction);
    }

    if inputs.joystick.contains(JoystickMask::CENTER) && guard.allow() {
        push(&mut intents, Intent::ToggleRun);
        guard.consume(cooldowns.toggle);
    }

    if editable {
        for (mask, adjust) in DIRECTIONS {
            if inputs.joystick.contains(mask) && guard.allow() {
                push(&mut intents, Intent::AdjustDuration(adjust));
                guard.consume(cooldowns.interaction);
            }
        }
    }

    if inputs.rotary != RotaryStep::Wait {
        push(&mut intents, Intent::CycleDigit(inputs.rotary));
    }

    intents
}

fn push(intents: &mut Intents, intent: Intent) {
    // A validated config closes the guard on every accepted press, so one
    // gated intent plus the rotary step always fit.
    let _ = intents.push(intent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimerConfig;

    const COOLDOWNS: CooldownConfig = TimerConfig::DEFAULT.cooldowns;

    fn joystick(mask: JoystickMask) -> RawInputs {
        RawInputs {
            joystick: mask,
            ..RawInputs::default()
        }
    }

    #[test]
    fn left_floors_at_zero() {
        for d in [0, 1, 2, 59, 600] {
            assert_eq!(DurationAdjust::Decrement.apply(d), d.saturating_sub(1));
        }
        assert_eq!(DurationAdjust::Decrement.apply(0), 0);
    }

    #[test]
    fn right_has_no_upper_clamp() {
        for d in [0, 9, 99, 5_999, 100_000] {
            assert_eq!(DurationAdjust::Increment.apply(d), d + 1);
        }
    }

    #[test]
    fn down_only_applies_with_ten_or_more() {
        for d in 0..10 {
            assert_eq!(DurationAdjust::DecrementTen.apply(d), d);
        }
        assert_eq!(DurationAdjust::DecrementTen.apply(10), 0);
        assert_eq!(DurationAdjust::DecrementTen.apply(25), 15);
    }

    #[test]
    fn up_adds_ten() {
        assert_eq!(DurationAdjust::IncrementTen.apply(0), 10);
        assert_eq!(DurationAdjust::IncrementTen.apply(95), 105);
    }

    #[test]
    fn digit_cycles_both_ways() {
        let mut digit = DisplayDigit::ZERO;
        let mut seen = [' '; 10];
        for slot in &mut seen {
            digit = digit.next();
            *slot = digit.as_char();
        }
        assert_eq!(seen, ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0']);

        assert_eq!(DisplayDigit::ZERO.previous().as_char(), '9');
        assert_eq!(DisplayDigit::from_char('9').unwrap().next().as_char(), '0');
        assert_eq!(DisplayDigit::from_char('x'), None);
    }

    #[test]
    fn button_trip_suppresses_joystick_in_same_window() {
        let mut guard = CooldownGuard::new();
        let inputs = RawInputs {
            button_pressed: true,
            joystick: JoystickMask::CENTER.union(JoystickMask::LEFT),
            rotary: RotaryStep::Wait,
        };

        let intents = interpret(&inputs, RunState::Idle, &mut guard, &COOLDOWNS);
        assert_eq!(intents.as_slice(), &[Intent::StepMotor]);
        assert_eq!(guard.remaining(), COOLDOWNS.interaction);

        let intents = interpret(
            &joystick(JoystickMask::CENTER),
            RunState::Idle,
            &mut guard,
            &COOLDOWNS,
        );
        assert!(intents.is_empty());
    }

    #[test]
    fn center_press_uses_toggle_cooldown() {
        let mut guard = CooldownGuard::new();
        let intents = interpret(
            &joystick(JoystickMask::CENTER),
            RunState::Idle,
            &mut guard,
            &COOLDOWNS,
        );
        assert_eq!(intents.as_slice(), &[Intent::ToggleRun]);
        assert_eq!(guard.remaining(), COOLDOWNS.toggle);
    }

    #[test]
    fn directions_ignored_while_armed() {
        let mut guard = CooldownGuard::new();
        let intents = interpret(
            &joystick(JoystickMask::UP),
            RunState::Armed,
            &mut guard,
            &COOLDOWNS,
        );
        assert!(intents.is_empty());
        assert!(guard.allow());
    }

    #[test]
    fn only_first_direction_is_accepted_per_window() {
        let mut guard = CooldownGuard::new();
        let inputs = joystick(JoystickMask::RIGHT.union(JoystickMask::UP));
        let intents = interpret(&inputs, RunState::Idle, &mut guard, &COOLDOWNS);
        assert_eq!(
            intents.as_slice(),
            &[Intent::AdjustDuration(DurationAdjust::Increment)]
        );
    }

    #[test]
    fn rotary_is_never_gated() {
        let mut guard = CooldownGuard::new();
        guard.consume(1_000);
        let inputs = RawInputs {
            rotary: RotaryStep::Left,
            ..RawInputs::default()
        };
        let intents = interpret(&inputs, RunState::Idle, &mut guard, &COOLDOWNS);
        assert_eq!(intents.as_slice(), &[Intent::CycleDigit(RotaryStep::Left)]);

        let intents = interpret(&inputs, RunState::Armed, &mut guard, &COOLDOWNS);
        assert_eq!(intents.as_slice(), &[Intent::CycleDigit(RotaryStep::Left)]);
    }

    #[test]
    fn stop_and_rotary_in_one_sample_keep_both() {
        let mut guard = CooldownGuard::new();
        let inputs = RawInputs {
            joystick: JoystickMask::CENTER,
            rotary: RotaryStep::Right,
            ..RawInputs::default()
        };
        let intents = interpret(&inputs, RunState::Armed, &mut guard, &COOLDOWNS);
        assert_eq!(
            intents.as_slice(),
            &[Intent::ToggleRun, Intent::CycleDigit(RotaryStep::Right)]
        );
    }
}
