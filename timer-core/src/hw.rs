//! Collaborator interfaces for the appliance peripherals.
//!
//! The control loop only sees these traits. The firmware binds them to GPIO,
//! timers, the ADC and the OLED; the [`crate::sim`] board records every call
//! for tests and the emulator. None of the operations can fail: inputs are
//! trusted hardware reads and outputs are fire-and-forget.

use embedded_hal::delay::DelayNs;

use crate::clock::WallClock;
use crate::input::{JoystickMask, RotaryStep};

/// Independent time-of-day source.
pub trait WallClockSource {
    /// Current time of day.
    fn now(&mut self) -> WallClock;

    /// Overwrites the time of day; only used at boot.
    fn set_time(&mut self, time: WallClock);
}

/// Motor drive PWM channel.
pub trait MotorPwm {
    /// Configures the PWM period.
    fn pwm_init(&mut self, period: u32);

    /// Updates the compare value.
    fn pwm_set(&mut self, compare: u32);

    /// Enables the output.
    fn pwm_start(&mut self);
}

/// Digital output driving the piezo.
pub trait TonePin {
    fn tone_high(&mut self);
    fn tone_low(&mut self);
}

/// Discrete input sources, each read without side effects.
pub trait InputSource {
    /// Push-button level; `true` while held.
    fn button_pressed(&mut self) -> bool;

    /// Joystick direction bits.
    fn joystick(&mut self) -> JoystickMask;

    /// Rotary encoder movement since the previous read.
    fn rotary(&mut self) -> RotaryStep;
}

/// Monochrome text colors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DisplayColor {
    Black,
    White,
}

/// Character display treated as a pure sink.
pub trait TextDisplay {
    fn clear_screen(&mut self, background: DisplayColor);

    fn put_string(
        &mut self,
        x: u8,
        y: u8,
        text: &str,
        foreground: DisplayColor,
        background: DisplayColor,
    );
}

/// RGB status LED bitmask.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusColor(u8);

impl StatusColor {
    pub const OFF: Self = Self(0);
    pub const RED: Self = Self(0x01);
    pub const BLUE: Self = Self(0x02);
    pub const GREEN: Self = Self(0x04);

    /// Shown while the countdown runs.
    pub const RUNNING: Self = Self::GREEN.union(Self::BLUE);
    /// Shown after a manual stop or an expiry.
    pub const STOPPED: Self = Self::RED.union(Self::GREEN);

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Multi-color status LED.
pub trait StatusIndicator {
    fn set_status(&mut self, color: StatusColor);
}

/// Eight-LED bar mirroring the motor level.
pub trait LevelBar {
    fn set_levels(&mut self, mask: u8);
}

/// Ambient light sensor.
pub trait AmbientLight {
    fn read_lux(&mut self) -> u32;
}

/// Secondary single-character indicator.
pub trait DigitIndicator {
    fn set_char(&mut self, ch: char, decimal_point: bool);
}

/// Everything the control loop drives, reachable through one value.
pub trait Board:
    WallClockSource
    + MotorPwm
    + TonePin
    + DelayNs
    + InputSource
    + TextDisplay
    + StatusIndicator
    + LevelBar
    + AmbientLight
    + DigitIndicator
{
}

impl<T> Board for T where
    T: WallClockSource
        + MotorPwm
        + TonePin
        + DelayNs
        + InputSource
        + TextDisplay
        + StatusIndicator
        + LevelBar
        + AmbientLight
        + DigitIndicator
{
}
