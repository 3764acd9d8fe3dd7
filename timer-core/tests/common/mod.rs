#![allow(dead_code)]

use timer_core::config::{CooldownConfig, TimerConfig};
use timer_core::controller::TimerController;
use timer_core::input::{JoystickMask, RotaryStep};
use timer_core::sim::VirtualBoard;
use timer_core::telemetry::{TelemetryLog, TimerEvent};

/// Default tuning with cooldowns short enough to step through by hand.
pub const FAST: TimerConfig = TimerConfig {
    cooldowns: CooldownConfig {
        interaction: 3,
        toggle: 6,
        refresh: 4,
    },
    ..TimerConfig::DEFAULT
};

pub struct Rig {
    pub controller: TimerController,
    pub board: VirtualBoard,
    pub telemetry: TelemetryLog,
}

impl Rig {
    pub fn booted(config: TimerConfig) -> Self {
        let mut rig = Self {
            controller: TimerController::new(config),
            board: VirtualBoard::new(),
            telemetry: TelemetryLog::new(),
        };
        rig.controller.boot(&mut rig.board, &mut rig.telemetry);
        rig
    }

    pub fn fast() -> Self {
        Self::booted(FAST)
    }

    pub fn step(&mut self, iterations: u32) {
        for _ in 0..iterations {
            self.controller.step(&mut self.board, &mut self.telemetry);
        }
    }

    /// Idles until the interaction guard reopens.
    pub fn settle(&mut self) {
        while !self.controller.context().interaction.allow() {
            self.step(1);
        }
    }

    pub fn press_button(&mut self) {
        self.board.set_button(true);
        self.step(1);
        self.board.set_button(false);
        self.settle();
    }

    pub fn push_joystick(&mut self, mask: JoystickMask) {
        self.board.set_joystick(mask);
        self.step(1);
        self.board.set_joystick(JoystickMask::NONE);
        self.settle();
    }

    pub fn rotate(&mut self, step: RotaryStep) {
        self.board.queue_rotary(step);
        self.step(1);
    }

    pub fn events(&self) -> Vec<TimerEvent> {
        self.telemetry.oldest_first().map(|record| record.event).collect()
    }
}
