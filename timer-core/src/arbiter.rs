//! Run state, motor drive and status outputs.
//!
//! The arbiter is the only owner of [`RunState`]. It keeps the countdown
//! anchor in lock-step with that state (anchored iff armed), decides what the
//! PWM channel and the status LED show, and sounds the alarm on expiry.

use crate::clock::{ArmedAnchor, CountdownClock, Reconciled, Seconds, WallClock};
use crate::config::TimerConfig;
use crate::hw::{AmbientLight, LevelBar, MotorPwm, StatusColor, StatusIndicator, TonePin};
use crate::tone::{self, SongReport};
use embedded_hal::delay::DelayNs;

/// Number of motor levels shown on the level bar.
pub const MOTOR_LEVELS: u32 = 8;

/// Level bar pattern at power-on and after wrapping.
pub const INITIAL_LEVEL_MASK: u16 = 0x01;

/// Countdown lifecycle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RunState {
    /// Not running; the duration is editable.
    #[default]
    Idle,
    /// Counting down with the motor driven.
    Armed,
    /// Reached zero; alarm handling in progress before returning to idle.
    Expired,
}

/// Motor PWM compare value and its level-bar mirror.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MotorDrive {
    offset: u32,
    levels: u16,
    min_drive: u32,
    step: u32,
}

/// Result of raising the motor one level.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MotorStep {
    pub offset: u32,
    pub levels: u8,
    /// The level mask overflowed and both values restarted from the bottom.
    pub wrapped: bool,
}

impl MotorDrive {
    #[must_use]
    pub const fn new(min_drive: u32, step: u32) -> Self {
        Self {
            offset: min_drive,
            levels: INITIAL_LEVEL_MASK,
            min_drive,
            step,
        }
    }

    /// Current compare value.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Compare value applied whenever the motor is stopped.
    #[must_use]
    pub const fn min_drive(&self) -> u32 {
        self.min_drive
    }

    /// Current level-bar pattern.
    #[must_use]
    pub fn levels(&self) -> u8 {
        u8::try_from(self.levels).unwrap_or(u8::MAX)
    }

    /// Raises the drive one level; past the eighth level it wraps to the bottom.
    pub fn step_up(&mut self) -> MotorStep {
        self.offset = self.offset.saturating_add(self.step);
        self.levels = (self.levels << 1) + 1;
        let wrapped = self.levels > u16::from(u8::MAX);
        if wrapped {
            self.levels = INITIAL_LEVEL_MASK;
            self.offset = self.min_drive;
        }
        MotorStep {
            offset: self.offset,
            levels: self.levels(),
            wrapped,
        }
    }
}

/// Result of a center press.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ToggleOutcome {
    Armed(ArmedAnchor),
    /// Manual stop with the seconds that were still left.
    Stopped { remaining: Seconds },
    /// Idle with a zero duration; nothing changed.
    Rejected,
    /// The press landed on the second the countdown ran out. The run stays
    /// armed so the expiry is handled like any other.
    Expiring,
}

/// What happened when the countdown reached zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ExpiryOutcome {
    /// Ambient light sampled at the moment of expiry.
    pub lux: u32,
    /// Song summary, or `None` when the alarm was suppressed by darkness.
    pub alarm: Option<SongReport>,
}

/// Owner of the run state and the motor/status outputs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Arbiter {
    state: RunState,
    motor: MotorDrive,
    status: StatusColor,
}

impl Arbiter {
    #[must_use]
    pub const fn new(config: &TimerConfig) -> Self {
        Self {
            state: RunState::Idle,
            motor: MotorDrive::new(config.min_drive, config.drive_step),
            status: StatusColor::OFF,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub const fn motor(&self) -> &MotorDrive {
        &self.motor
    }

    /// Last color written to the status LED.
    #[must_use]
    pub const fn status(&self) -> StatusColor {
        self.status
    }

    /// Handles a button press: one motor level up, applied at once if armed.
    pub fn step_motor<B>(&mut self, board: &mut B) -> MotorStep
    where
        B: MotorPwm + LevelBar + ?Sized,
    {
        let step = self.motor.step_up();
        if self.state == RunState::Armed {
            board.pwm_set(step.offset);
        }
        board.set_levels(step.levels);
        step
    }

    /// Handles a center press: arm when idle with time left, stop when armed.
    ///
    /// A stop reconciles the countdown against `now` first, so the remaining
    /// value reflects the wall clock at the press.
    pub fn toggle<B>(
        &mut self,
        countdown: &mut CountdownClock,
        now: WallClock,
        board: &mut B,
    ) -> ToggleOutcome
    where
        B: MotorPwm + StatusIndicator + ?Sized,
    {
        if self.state == RunState::Armed {
            if countdown.reconcile(now) == Reconciled::Expired {
                return ToggleOutcome::Expiring;
            }
            countdown.disarm();
            self.state = RunState::Idle;
            self.stop_outputs(board);
            return ToggleOutcome::Stopped {
                remaining: countdown.duration(),
            };
        }

        let Some(anchor) = countdown.arm(now) else {
            return ToggleOutcome::Rejected;
        };
        self.state = RunState::Armed;
        self.set_status(board, StatusColor::RUNNING);
        board.pwm_set(self.motor.offset());
        ToggleOutcome::Armed(anchor)
    }

    /// Handles the countdown reaching zero.
    ///
    /// The motor stops and the status LED switches to the stopped color. When
    /// the room is lit above the threshold the alarm song plays to completion
    /// before this returns; in the dark it is skipped.
    pub fn expire<B>(
        &mut self,
        countdown: &mut CountdownClock,
        config: &TimerConfig,
        board: &mut B,
    ) -> ExpiryOutcome
    where
        B: MotorPwm + StatusIndicator + AmbientLight + TonePin + DelayNs + ?Sized,
    {
        countdown.disarm();
        self.state = RunState::Expired;
        self.stop_outputs(board);

        let lux = board.read_lux();
        let alarm = if lux > config.alarm_lux_threshold {
            Some(tone::play_song(board, config.alarm_song))
        } else {
            None
        };

        self.state = RunState::Idle;
        ExpiryOutcome { lux, alarm }
    }

    fn stop_outputs<B>(&mut self, board: &mut B)
    where
        B: MotorPwm + StatusIndicator + ?Sized,
    {
        self.set_status(board, StatusColor::STOPPED);
        board.pwm_set(self.motor.min_drive());
    }

    fn set_status<B>(&mut self, board: &mut B, color: StatusColor)
    where
        B: StatusIndicator + ?Sized,
    {
        self.status = color;
        board.set_status(color);
    }
}
