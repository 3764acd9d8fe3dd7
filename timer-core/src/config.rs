//! Appliance tuning constants and their validation.

use core::fmt;

use crate::clock::{Seconds, WallClock};
use crate::cooldown::Ticks;

/// Default alarm: four short E notes.
pub const DEFAULT_ALARM_SONG: &str = "E2,E2,E2,E2";

/// Cooldown magnitudes, in loop iterations, applied when an intent is accepted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CooldownConfig {
    /// Button presses and joystick directions.
    pub interaction: Ticks,
    /// Joystick center press (arm/stop).
    pub toggle: Ticks,
    /// Spacing between presentation refreshes.
    pub refresh: Ticks,
}

/// Everything the control loop needs to know before boot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimerConfig {
    /// Countdown value shown at power-on.
    pub initial_duration: Seconds,
    /// Time written to the wall clock at boot.
    pub boot_clock: WallClock,
    /// PWM period handed to `pwm_init`.
    pub pwm_period: u32,
    /// Lowest PWM compare value; applied whenever the motor is stopped.
    pub min_drive: u32,
    /// Compare value added per motor level.
    pub drive_step: u32,
    pub cooldowns: CooldownConfig,
    /// The alarm only sounds when ambient light is strictly above this.
    pub alarm_lux_threshold: u32,
    /// Note/duration/pause triples played on expiry.
    pub alarm_song: &'static str,
}

impl TimerConfig {
    pub const DEFAULT: Self = Self {
        initial_duration: 10,
        boot_clock: WallClock::from_hms(12, 59, 55),
        pwm_period: 1_000,
        min_drive: 300,
        drive_step: 100,
        cooldowns: CooldownConfig {
            interaction: 25_000,
            toggle: 100_000,
            refresh: 25_000,
        },
        alarm_lux_threshold: 30,
        alarm_song: DEFAULT_ALARM_SONG,
    };

    /// Highest compare value the motor levels can reach.
    #[must_use]
    pub const fn max_drive(&self) -> u32 {
        self.min_drive
            .saturating_add(self.drive_step.saturating_mul(crate::arbiter::MOTOR_LEVELS - 1))
    }

    /// Checks that the settings describe a usable appliance.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pwm_period == 0 {
            return Err(ConfigError::ZeroPwmPeriod);
        }
        if self.drive_step == 0 {
            return Err(ConfigError::ZeroDriveStep);
        }
        if self.max_drive() > self.pwm_period {
            return Err(ConfigError::DriveExceedsPeriod {
                max_drive: self.max_drive(),
                period: self.pwm_period,
            });
        }
        let cooldowns = self.cooldowns;
        // An accepted press must close the guard, or one iteration could
        // emit several gated intents.
        if cooldowns.interaction <= 0 || cooldowns.toggle <= 0 {
            return Err(ConfigError::InputCooldownNotPositive);
        }
        if cooldowns.refresh < 0 {
            return Err(ConfigError::NegativeCooldown);
        }
        if self.alarm_song.is_empty() {
            return Err(ConfigError::EmptyAlarmSong);
        }
        Ok(())
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reasons a [`TimerConfig`] is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    ZeroPwmPeriod,
    ZeroDriveStep,
    DriveExceedsPeriod { max_drive: u32, period: u32 },
    InputCooldownNotPositive,
    NegativeCooldown,
    EmptyAlarmSong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPwmPeriod => f.write_str("pwm period must be non-zero"),
            ConfigError::ZeroDriveStep => f.write_str("drive step must be non-zero"),
            ConfigError::DriveExceedsPeriod { max_drive, period } => write!(
                f,
                "top motor level {max_drive} exceeds pwm period {period}"
            ),
            ConfigError::InputCooldownNotPositive => {
                f.write_str("interaction and toggle cooldowns must be positive")
            }
            ConfigError::NegativeCooldown => f.write_str("refresh cooldown must not be negative"),
            ConfigError::EmptyAlarmSong => f.write_str("alarm song is empty"),
        }
    }
}
