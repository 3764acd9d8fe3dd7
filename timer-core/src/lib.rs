#![no_std]

// Control loop for the countdown timer appliance.
//
// Everything here stays portable across the STM32 firmware and the host
// emulator: peripherals are reached through the traits in `hw`, and all
// per-loop state lives in a single owned `TimerContext`.

pub mod arbiter;
pub mod clock;
pub mod config;
pub mod console;
pub mod controller;
pub mod cooldown;
pub mod hw;
pub mod input;
pub mod presentation;
pub mod sim;
pub mod telemetry;
pub mod tone;
