use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::qei::{Qei, QeiPin};
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use timer_core::config::TimerConfig;
use timer_core::controller::TimerController;
use timer_core::telemetry::TelemetryLog;

use crate::hw::display::Oled;
use crate::hw::light::LightSensor;
use crate::hw::{ApplianceBoard, RgbLed};
use crate::telemetry::DefmtMirror;

mod timer_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Motor PWM carrier frequency.
const MOTOR_PWM_HZ: u32 = 20_000;

fn output(pin: hal::Peri<'static, impl hal::gpio::Pin>) -> Output<'static> {
    Output::new(pin, Level::Low, Speed::Low)
}

fn switch(pin: hal::Peri<'static, impl hal::gpio::Pin>) -> Input<'static> {
    Input::new(pin, Pull::Up)
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let p = hal::init(hal::Config::default());

    let config = TimerConfig::DEFAULT;
    if let Err(err) = config.validate() {
        error!("invalid timer config: {}", defmt::Display2Format(&err));
        return;
    }

    let motor = SimplePwm::new(
        p.TIM1,
        Some(PwmPin::new(p.PA8, OutputType::PushPull)),
        None,
        None,
        None,
        Hertz(MOTOR_PWM_HZ),
        CountingMode::EdgeAlignedUp,
    );

    let display = Oled::new(I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz::khz(400),
        Default::default(),
    ));

    let light = LightSensor::new(Adc::new(p.ADC1), p.PA1.degrade_adc());

    let encoder = Qei::new(p.TIM3, QeiPin::new(p.PA6), QeiPin::new(p.PA7));

    let board = ApplianceBoard::new(
        motor,
        output(p.PA0),
        switch(p.PC13),
        [
            switch(p.PC0),
            switch(p.PC1),
            switch(p.PC2),
            switch(p.PC3),
            switch(p.PC4),
        ],
        encoder,
        display,
        RgbLed {
            red: output(p.PB4),
            blue: output(p.PB5),
            green: output(p.PB3),
        },
        [
            output(p.PB0),
            output(p.PB1),
            output(p.PB2),
            output(p.PB10),
            output(p.PB11),
            output(p.PB12),
            output(p.PB13),
            output(p.PB14),
        ],
        [
            output(p.PC5),
            output(p.PC6),
            output(p.PC7),
            output(p.PC8),
            output(p.PC9),
            output(p.PC10),
            output(p.PC11),
            output(p.PC12),
        ],
        light,
    );

    info!("countdown appliance starting");
    spawner
        .spawn(timer_task::run(
            TimerController::new(config),
            board,
            TelemetryLog::new(),
            DefmtMirror::new(),
        ))
        .expect("failed to spawn timer task");

    core::future::pending::<()>().await;
}
