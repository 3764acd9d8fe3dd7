//! Binds the timer collaborator traits to the appliance board.
//!
//! Wiring (STM32G0B1RE):
//!
//! ```text
//! motor PWM     PA8  (TIM1_CH1)
//! piezo         PA0
//! light sensor  PA1  (ADC1_IN1)
//! encoder A/B   PA6 / PA7        TIM3 quadrature counter; external pull-ups
//! push-button   PC13             active low
//! joystick      PC0..PC4         center, up, down, left, right; active low
//! RGB LED       PB4 / PB5 / PB3  red, blue, green
//! level bar     PB0 PB1 PB2 PB10 PB11 PB12 PB13 PB14
//! 7-segment     PC5..PC12        a..g, dp
//! OLED          PB8 / PB9        I2C1 SCL / SDA
//! ```

pub mod duty;
pub mod segments;

#[cfg(target_os = "none")]
pub mod clock;
#[cfg(target_os = "none")]
pub mod display;
#[cfg(target_os = "none")]
pub mod light;

#[cfg(target_os = "none")]
pub use board::{ApplianceBoard, RgbLed};

#[cfg(target_os = "none")]
mod board {
    use embassy_stm32::gpio::{Input, Level, Output};
    use embassy_stm32::peripherals::{TIM1, TIM3};
    use embassy_stm32::timer::qei::Qei;
    use embassy_stm32::timer::simple_pwm::SimplePwm;
    use embassy_time::Delay;
    use embedded_hal::delay::DelayNs;
    use timer_core::clock::WallClock;
    use timer_core::hw::{
        AmbientLight, DigitIndicator, DisplayColor, InputSource, LevelBar, MotorPwm,
        StatusColor, StatusIndicator, TextDisplay, TonePin, WallClockSource,
    };
    use timer_core::input::{DetentCounter, JoystickMask, RotaryStep};

    use super::clock::TimeOfDay;
    use super::display::Oled;
    use super::light::LightSensor;
    use super::{duty, segments};

    /// Joystick switches in bit order of [`JoystickMask`].
    const JOYSTICK_BITS: [JoystickMask; 5] = [
        JoystickMask::CENTER,
        JoystickMask::UP,
        JoystickMask::DOWN,
        JoystickMask::LEFT,
        JoystickMask::RIGHT,
    ];

    /// Red, blue and green LED channels.
    pub struct RgbLed {
        pub red: Output<'static>,
        pub blue: Output<'static>,
        pub green: Output<'static>,
    }

    pub struct ApplianceBoard {
        clock: TimeOfDay,
        delay: Delay,
        motor: SimplePwm<'static, TIM1>,
        motor_period: u32,
        tone: Output<'static>,
        button: Input<'static>,
        joystick: [Input<'static>; 5],
        encoder: Qei<'static, TIM3>,
        detents: DetentCounter,
        display: Oled<'static>,
        rgb: RgbLed,
        level_bar: [Output<'static>; 8],
        segments: [Output<'static>; 8],
        light: LightSensor<'static>,
    }

    impl ApplianceBoard {
        #[allow(clippy::too_many_arguments)]
        pub fn new(
            motor: SimplePwm<'static, TIM1>,
            tone: Output<'static>,
            button: Input<'static>,
            joystick: [Input<'static>; 5],
            encoder: Qei<'static, TIM3>,
            display: Oled<'static>,
            rgb: RgbLed,
            level_bar: [Output<'static>; 8],
            segments: [Output<'static>; 8],
            light: LightSensor<'static>,
        ) -> Self {
            Self {
                clock: TimeOfDay::new(),
                delay: Delay,
                motor,
                motor_period: 1,
                tone,
                button,
                joystick,
                detents: DetentCounter::new(encoder.count()),
                encoder,
                display,
                rgb,
                level_bar,
                segments,
                light,
            }
        }
    }

    fn level(on: bool) -> Level {
        if on { Level::High } else { Level::Low }
    }

    impl WallClockSource for ApplianceBoard {
        fn now(&mut self) -> WallClock {
            self.clock.now()
        }

        fn set_time(&mut self, time: WallClock) {
            self.clock.set(time);
        }
    }

    impl MotorPwm for ApplianceBoard {
        fn pwm_init(&mut self, period: u32) {
            self.motor_period = period.max(1);
        }

        fn pwm_set(&mut self, compare: u32) {
            // Compare values are expressed against the configured period.
            let mut channel = self.motor.ch1();
            let max_duty = channel.max_duty_cycle();
            channel.set_duty_cycle(duty::scale(compare, self.motor_period, max_duty));
        }

        fn pwm_start(&mut self) {
            self.motor.ch1().enable();
        }
    }

    impl TonePin for ApplianceBoard {
        fn tone_high(&mut self) {
            self.tone.set_high();
        }

        fn tone_low(&mut self) {
            self.tone.set_low();
        }
    }

    impl DelayNs for ApplianceBoard {
        fn delay_ns(&mut self, ns: u32) {
            self.delay.delay_ns(ns);
        }

        fn delay_us(&mut self, us: u32) {
            self.delay.delay_us(us);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms);
        }
    }

    impl InputSource for ApplianceBoard {
        fn button_pressed(&mut self) -> bool {
            self.button.is_low()
        }

        fn joystick(&mut self) -> JoystickMask {
            self.joystick
                .iter()
                .zip(JOYSTICK_BITS)
                .filter(|(switch, _)| switch.is_low())
                .fold(JoystickMask::NONE, |mask, (_, bit)| mask.union(bit))
        }

        fn rotary(&mut self) -> RotaryStep {
            self.detents.update(self.encoder.count())
        }
    }

    impl TextDisplay for ApplianceBoard {
        fn clear_screen(&mut self, background: DisplayColor) {
            self.display.clear(background);
        }

        fn put_string(
            &mut self,
            x: u8,
            y: u8,
            text: &str,
            foreground: DisplayColor,
            background: DisplayColor,
        ) {
            self.display.put_string(x, y, text, foreground, background);
        }
    }

    impl StatusIndicator for ApplianceBoard {
        fn set_status(&mut self, color: StatusColor) {
            self.rgb.red.set_level(level(color.contains(StatusColor::RED)));
            self.rgb.blue.set_level(level(color.contains(StatusColor::BLUE)));
            self.rgb.green.set_level(level(color.contains(StatusColor::GREEN)));
        }
    }

    impl LevelBar for ApplianceBoard {
        fn set_levels(&mut self, mask: u8) {
            for (index, led) in self.level_bar.iter_mut().enumerate() {
                led.set_level(level(mask & (1 << index) != 0));
            }
        }
    }

    impl AmbientLight for ApplianceBoard {
        fn read_lux(&mut self) -> u32 {
            self.light.read_lux()
        }
    }

    impl DigitIndicator for ApplianceBoard {
        fn set_char(&mut self, ch: char, decimal_point: bool) {
            let pattern = segments::pattern(ch, decimal_point);
            for (index, segment) in self.segments.iter_mut().enumerate() {
                segment.set_level(level(segments::is_lit(pattern, index)));
            }
        }
    }
}
