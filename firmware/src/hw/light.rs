//! Ambient light sampling on the STM32G0 ADC.
//!
//! The photodiode front-end produces a voltage proportional to illuminance;
//! full scale on the 12-bit converter corresponds to roughly 4000 lux.

#![cfg(target_os = "none")]

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

/// Lux reported at full ADC scale.
const FULL_SCALE_LUX: u32 = 4_000;
const FULL_SCALE_RAW: u32 = 4_095;

/// Converts a raw 12-bit reading to lux.
pub fn lux_from_raw(raw: u16) -> u32 {
    u32::from(raw).min(FULL_SCALE_RAW) * FULL_SCALE_LUX / FULL_SCALE_RAW
}

/// Blocking ADC wrapper for the light sensor channel.
pub struct LightSensor<'d> {
    adc: Adc<'d, ADC1>,
    channel: AnyAdcChannel<ADC1>,
    discard_next: bool,
}

impl<'d> LightSensor<'d> {
    pub fn new(mut adc: Adc<'d, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        adc.set_sample_time(SampleTime::CYCLES160_5);
        Self {
            adc,
            channel,
            discard_next: true,
        }
    }

    /// Samples the sensor once and converts to lux.
    pub fn read_lux(&mut self) -> u32 {
        // The first conversion after enabling the ADC is unreliable.
        if self.discard_next {
            let _ = self.adc.blocking_read(&mut self.channel);
            self.discard_next = false;
        }
        lux_from_raw(self.adc.blocking_read(&mut self.channel))
    }
}
