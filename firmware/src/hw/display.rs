//! SSD1306 OLED over I2C, drawn through embedded-graphics.

#![cfg(target_os = "none")]

use defmt::warn;
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use timer_core::hw::DisplayColor;

type Driver<'d> = Ssd1306<
    I2CInterface<I2c<'d, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// 128x64 monochrome panel; every call draws into the buffer and flushes.
pub struct Oled<'d> {
    driver: Driver<'d>,
}

impl<'d> Oled<'d> {
    pub fn new(i2c: I2c<'d, Blocking>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if let Err(err) = driver.init() {
            warn!("oled init failed: {}", defmt::Debug2Format(&err));
        }
        Self { driver }
    }

    pub fn clear(&mut self, background: DisplayColor) {
        // Drawing into the frame buffer is infallible.
        let _ = self.driver.clear(pixel(background));
        self.flush();
    }

    pub fn put_string(
        &mut self,
        x: u8,
        y: u8,
        text: &str,
        foreground: DisplayColor,
        background: DisplayColor,
    ) {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(pixel(foreground))
            .background_color(pixel(background))
            .build();
        let origin = Point::new(i32::from(x), i32::from(y));
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.driver);
        self.flush();
    }

    fn flush(&mut self) {
        if let Err(err) = self.driver.flush() {
            warn!("oled flush failed: {}", defmt::Debug2Format(&err));
        }
    }
}

fn pixel(color: DisplayColor) -> BinaryColor {
    match color {
        DisplayColor::White => BinaryColor::On,
        DisplayColor::Black => BinaryColor::Off,
    }
}
