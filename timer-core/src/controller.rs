//! The appliance main loop.
//!
//! Each iteration runs the same fixed pipeline:
//!
//! 1. read the wall clock and sample every input once,
//! 2. interpret the samples into intents (interaction guard),
//! 3. apply the intents through the arbiter,
//! 4. reconcile an armed countdown against the clock and handle expiry,
//! 5. redraw the display when the refresh guard allows.
//!
//! All state lives in [`TimerContext`], owned by the [`TimerController`] for
//! as long as the loop runs. Nothing in here blocks except the alarm song
//! played on expiry.

use crate::arbiter::{Arbiter, RunState, ToggleOutcome};
use crate::clock::{CountdownClock, Reconciled, Seconds, WallClock};
use crate::config::TimerConfig;
use crate::cooldown::CooldownGuard;
use crate::hw::{Board, DisplayColor};
use crate::input::{self, DisplayDigit, Intent, RawInputs};
use crate::presentation;
use crate::telemetry::{TelemetryLog, TimerEvent};

/// Every piece of mutable state the loop owns.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimerContext {
    pub arbiter: Arbiter,
    pub countdown: CountdownClock,
    pub digit: DisplayDigit,
    pub interaction: CooldownGuard,
    pub refresh: CooldownGuard,
    /// Light level from the most recent cadenced refresh.
    pub last_lux: Option<u32>,
}

impl TimerContext {
    #[must_use]
    pub const fn new(config: &TimerConfig) -> Self {
        Self {
            arbiter: Arbiter::new(config),
            countdown: CountdownClock::new(config.initial_duration),
            digit: DisplayDigit::ZERO,
            interaction: CooldownGuard::new(),
            refresh: CooldownGuard::new(),
            last_lux: None,
        }
    }

    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.arbiter.state()
    }

    #[must_use]
    pub const fn duration(&self) -> Seconds {
        self.countdown.duration()
    }
}

/// Drives a [`Board`] with the countdown state machine.
pub struct TimerController {
    config: TimerConfig,
    context: TimerContext,
    iterations: u64,
}

impl TimerController {
    #[must_use]
    pub const fn new(config: TimerConfig) -> Self {
        Self {
            context: TimerContext::new(&config),
            config,
            iterations: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TimerConfig {
        &self.config
    }

    #[must_use]
    pub const fn context(&self) -> &TimerContext {
        &self.context
    }

    /// Loop iterations completed so far.
    #[must_use]
    pub const fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Brings the outputs to their power-on state.
    pub fn boot<B>(&mut self, board: &mut B, telemetry: &mut TelemetryLog)
    where
        B: Board + ?Sized,
    {
        board.set_time(self.config.boot_clock);

        board.pwm_init(self.config.pwm_period);
        board.pwm_set(self.config.min_drive);
        board.pwm_start();

        board.set_levels(self.context.arbiter.motor().levels());
        board.clear_screen(DisplayColor::White);
        presentation::draw_digit(board, self.context.digit);

        telemetry.record(
            TimerEvent::Booted {
                duration: self.context.duration(),
            },
            self.config.boot_clock,
        );
    }

    /// Runs one loop iteration.
    pub fn step<B>(&mut self, board: &mut B, telemetry: &mut TelemetryLog)
    where
        B: Board + ?Sized,
    {
        let now = board.now();
        let inputs = RawInputs {
            button_pressed: board.button_pressed(),
            joystick: board.joystick(),
            rotary: board.rotary(),
        };

        let context = &mut self.context;
        let intents = input::interpret(
            &inputs,
            context.run_state(),
            &mut context.interaction,
            &self.config.cooldowns,
        );
        context.interaction.tick();

        for intent in intents {
            self.apply(intent, now, board, telemetry);
        }

        self.reconcile(now, board, telemetry);

        let context = &mut self.context;
        if context.refresh.allow() {
            context.last_lux = Some(presentation::refresh(board, context.duration(), now));
            context.refresh.consume(self.config.cooldowns.refresh);
        }
        context.refresh.tick();

        self.iterations = self.iterations.wrapping_add(1);
    }

    /// Boots, then iterates forever.
    ///
    /// `drain` sees the telemetry log after boot and after every iteration.
    pub fn run<B, F>(&mut self, board: &mut B, telemetry: &mut TelemetryLog, mut drain: F) -> !
    where
        B: Board + ?Sized,
        F: FnMut(&TelemetryLog),
    {
        self.boot(board, telemetry);
        drain(telemetry);
        loop {
            self.step(board, telemetry);
            drain(telemetry);
        }
    }

    fn apply<B>(
        &mut self,
        intent: Intent,
        now: WallClock,
        board: &mut B,
        telemetry: &mut TelemetryLog,
    ) where
        B: Board + ?Sized,
    {
        let context = &mut self.context;
        match intent {
            Intent::StepMotor => {
                let step = context.arbiter.step_motor(board);
                telemetry.record(
                    TimerEvent::MotorStepped {
                        offset: step.offset,
                        levels: step.levels,
                        wrapped: step.wrapped,
                    },
                    now,
                );
            }
            Intent::ToggleRun => {
                let event = match context.arbiter.toggle(&mut context.countdown, now, board) {
                    ToggleOutcome::Armed(anchor) => TimerEvent::Armed {
                        duration: anchor.armed_duration,
                        started_at: anchor.started_at,
                    },
                    ToggleOutcome::Stopped { remaining } => TimerEvent::Stopped { remaining },
                    ToggleOutcome::Rejected => TimerEvent::ArmRejected,
                    // Reported by the expiry below.
                    ToggleOutcome::Expiring => return,
                };
                telemetry.record(event, now);
            }
            Intent::AdjustDuration(adjust) => {
                let updated = adjust.apply(context.countdown.duration());
                if context.countdown.set_duration(updated) {
                    presentation::draw_countdown(board, updated);
                    telemetry.record(TimerEvent::DurationSet(updated), now);
                }
            }
            Intent::CycleDigit(step) => {
                // Runs after this iteration's center press, which may have armed or stopped.
                if context.run_state() != RunState::Armed {
                    context.digit = context.digit.stepped(step);
                    presentation::draw_digit(board, context.digit);
                    telemetry.record(TimerEvent::DigitChanged(context.digit.as_char()), now);
                }
            }
        }
    }

    fn reconcile<B>(&mut self, now: WallClock, board: &mut B, telemetry: &mut TelemetryLog)
    where
        B: Board + ?Sized,
    {
        let context = &mut self.context;
        if context.countdown.reconcile(now) != Reconciled::Expired {
            return;
        }

        presentation::draw_countdown(board, context.countdown.duration());
        let outcome = context
            .arbiter
            .expire(&mut context.countdown, &self.config, board);
        telemetry.record(TimerEvent::Expired { lux: outcome.lux }, now);
        let event = match outcome.alarm {
            Some(report) => TimerEvent::AlarmPlayed(report),
            None => TimerEvent::AlarmSuppressed { lux: outcome.lux },
        };
        telemetry.record(event, board.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{JoystickMask, RotaryStep};
    use crate::sim::VirtualBoard;

    fn booted() -> (TimerController, VirtualBoard, TelemetryLog) {
        let mut controller = TimerController::new(TimerConfig::DEFAULT);
        let mut board = VirtualBoard::new();
        let mut telemetry = TelemetryLog::new();
        controller.boot(&mut board, &mut telemetry);
        (controller, board, telemetry)
    }

    #[test]
    fn boot_sets_power_on_outputs() {
        let (_, board, telemetry) = booted();
        assert_eq!(board.clock(), WallClock::from_hms(12, 59, 55));
        assert_eq!(board.pwm_period(), Some(1_000));
        assert_eq!(board.pwm_compare(), Some(300));
        assert!(board.pwm_started());
        assert_eq!(board.levels(), 0x01);
        assert_eq!(board.digit(), Some(('0', false)));
        assert_eq!(
            telemetry.latest().map(|r| r.event),
            Some(TimerEvent::Booted { duration: 10 })
        );
    }

    #[test]
    fn first_iteration_refreshes_display() {
        let (mut controller, mut board, mut telemetry) = booted();
        controller.step(&mut board, &mut telemetry);
        assert_eq!(board.text_at(43, 1), Some("00:10"));
        assert_eq!(board.text_at(22, 50), Some("12:59:55"));
        assert_eq!(controller.context().last_lux, Some(0));
    }

    #[test]
    fn refresh_follows_its_own_cadence() {
        let (mut controller, mut board, mut telemetry) = booted();
        let cadence = u32::try_from(TimerConfig::DEFAULT.cooldowns.refresh).unwrap();
        for _ in 0..=cadence {
            controller.step(&mut board, &mut telemetry);
        }
        assert_eq!(board.lux_reads(), 2);
    }

    #[test]
    fn rotary_step_after_arming_in_same_iteration_is_ignored() {
        let (mut controller, mut board, mut telemetry) = booted();
        board.set_joystick(JoystickMask::CENTER);
        board.queue_rotary(RotaryStep::Right);
        controller.step(&mut board, &mut telemetry);

        assert_eq!(controller.context().run_state(), RunState::Armed);
        assert_eq!(controller.context().digit, DisplayDigit::ZERO);
    }
}
