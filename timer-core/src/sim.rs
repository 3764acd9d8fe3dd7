//! In-memory board used by tests and the host emulator.
//!
//! [`VirtualBoard`] implements every collaborator trait by recording what the
//! control loop asked for. Its wall clock only moves when told to, or when
//! the loop spends time in blocking waits, so runs are fully deterministic.

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};

use crate::clock::WallClock;
use crate::hw::{
    AmbientLight, DigitIndicator, DisplayColor, InputSource, LevelBar, MotorPwm, StatusColor,
    StatusIndicator, TextDisplay, TonePin, WallClockSource,
};
use crate::input::{JoystickMask, RotaryStep};

/// Longest string kept per display position.
pub const MAX_TEXT: usize = 16;

/// Distinct display positions remembered.
pub const MAX_TEXT_SLOTS: usize = 8;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Text last drawn at one display position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextSlot {
    pub x: u8,
    pub y: u8,
    pub text: String<MAX_TEXT>,
}

/// Recording implementation of [`crate::hw::Board`].
#[derive(Clone, Debug)]
pub struct VirtualBoard {
    clock: WallClock,
    pending_ns: u64,
    waited_ns: u64,
    pwm_period: Option<u32>,
    pwm_compare: Option<u32>,
    pwm_started: bool,
    tone_level: bool,
    tone_edges: u32,
    button: bool,
    joystick: JoystickMask,
    rotary: RotaryStep,
    screen: Vec<TextSlot, MAX_TEXT_SLOTS>,
    display_writes: u32,
    status: StatusColor,
    levels: u8,
    lux: u32,
    lux_reads: u32,
    digit: Option<(char, bool)>,
}

impl Default for VirtualBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualBoard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: WallClock::MIDNIGHT,
            pending_ns: 0,
            waited_ns: 0,
            pwm_period: None,
            pwm_compare: None,
            pwm_started: false,
            tone_level: false,
            tone_edges: 0,
            button: false,
            joystick: JoystickMask::NONE,
            rotary: RotaryStep::Wait,
            screen: Vec::new(),
            display_writes: 0,
            status: StatusColor::OFF,
            levels: 0,
            lux: 0,
            lux_reads: 0,
            digit: None,
        }
    }

    /// Holds the push-button down (or releases it).
    pub fn set_button(&mut self, pressed: bool) {
        self.button = pressed;
    }

    /// Holds the joystick in the given position.
    pub fn set_joystick(&mut self, mask: JoystickMask) {
        self.joystick = mask;
    }

    /// Queues one rotary step, reported by the next read only.
    pub fn queue_rotary(&mut self, step: RotaryStep) {
        self.rotary = step;
    }

    pub fn set_lux(&mut self, lux: u32) {
        self.lux = lux;
    }

    /// Moves the wall clock forward.
    pub fn advance_clock(&mut self, seconds: u32) {
        self.clock = self.clock.advanced_by(seconds);
    }

    #[must_use]
    pub const fn clock(&self) -> WallClock {
        self.clock
    }

    /// Last compare value written, if any.
    #[must_use]
    pub const fn pwm_compare(&self) -> Option<u32> {
        self.pwm_compare
    }

    #[must_use]
    pub const fn pwm_period(&self) -> Option<u32> {
        self.pwm_period
    }

    #[must_use]
    pub const fn pwm_started(&self) -> bool {
        self.pwm_started
    }

    /// Number of level changes driven onto the tone pin.
    #[must_use]
    pub const fn tone_edges(&self) -> u32 {
        self.tone_edges
    }

    /// Total time spent in blocking waits.
    #[must_use]
    pub const fn waited_ns(&self) -> u64 {
        self.waited_ns
    }

    #[must_use]
    pub const fn status(&self) -> StatusColor {
        self.status
    }

    #[must_use]
    pub const fn levels(&self) -> u8 {
        self.levels
    }

    #[must_use]
    pub const fn lux_reads(&self) -> u32 {
        self.lux_reads
    }

    /// Character last shown on the digit indicator.
    #[must_use]
    pub const fn digit(&self) -> Option<(char, bool)> {
        self.digit
    }

    /// Number of `put_string` calls so far.
    #[must_use]
    pub const fn display_writes(&self) -> u32 {
        self.display_writes
    }

    /// Text last drawn at `(x, y)`.
    #[must_use]
    pub fn text_at(&self, x: u8, y: u8) -> Option<&str> {
        self.screen
            .iter()
            .find(|slot| slot.x == x && slot.y == y)
            .map(|slot| slot.text.as_str())
    }

    /// Every remembered display position, in first-drawn order.
    #[must_use]
    pub fn screen(&self) -> &[TextSlot] {
        &self.screen
    }

    fn wait(&mut self, ns: u64) {
        self.waited_ns = self.waited_ns.saturating_add(ns);
        self.pending_ns = self.pending_ns.saturating_add(ns);
        while self.pending_ns >= NANOS_PER_SECOND {
            self.pending_ns -= NANOS_PER_SECOND;
            self.clock = self.clock.advanced_by(1);
        }
    }
}

impl WallClockSource for VirtualBoard {
    fn now(&mut self) -> WallClock {
        self.clock
    }

    fn set_time(&mut self, time: WallClock) {
        self.clock = time;
        self.pending_ns = 0;
    }
}

impl MotorPwm for VirtualBoard {
    fn pwm_init(&mut self, period: u32) {
        self.pwm_period = Some(period);
    }

    fn pwm_set(&mut self, compare: u32) {
        self.pwm_compare = Some(compare);
    }

    fn pwm_start(&mut self) {
        self.pwm_started = true;
    }
}

impl TonePin for VirtualBoard {
    fn tone_high(&mut self) {
        if !self.tone_level {
            self.tone_edges += 1;
        }
        self.tone_level = true;
    }

    fn tone_low(&mut self) {
        if self.tone_level {
            self.tone_edges += 1;
        }
        self.tone_level = false;
    }
}

impl DelayNs for VirtualBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.wait(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.wait(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(u64::from(ms) * 1_000_000);
    }
}

impl InputSource for VirtualBoard {
    fn button_pressed(&mut self) -> bool {
        self.button
    }

    fn joystick(&mut self) -> JoystickMask {
        self.joystick
    }

    fn rotary(&mut self) -> RotaryStep {
        core::mem::take(&mut self.rotary)
    }
}

impl TextDisplay for VirtualBoard {
    fn clear_screen(&mut self, _background: DisplayColor) {
        self.screen.clear();
    }

    fn put_string(
        &mut self,
        x: u8,
        y: u8,
        text: &str,
        _foreground: DisplayColor,
        _background: DisplayColor,
    ) {
        self.display_writes += 1;
        let mut stored = String::new();
        for ch in text.chars() {
            if stored.push(ch).is_err() {
                break;
            }
        }

        if let Some(slot) = self.screen.iter_mut().find(|slot| slot.x == x && slot.y == y) {
            slot.text = stored;
        } else {
            // Positions beyond the slot budget are counted but not kept.
            let _ = self.screen.push(TextSlot { x, y, text: stored });
        }
    }
}

impl StatusIndicator for VirtualBoard {
    fn set_status(&mut self, color: StatusColor) {
        self.status = color;
    }
}

impl LevelBar for VirtualBoard {
    fn set_levels(&mut self, mask: u8) {
        self.levels = mask;
    }
}

impl AmbientLight for VirtualBoard {
    fn read_lux(&mut self) -> u32 {
        self.lux_reads += 1;
        self.lux
    }
}

impl DigitIndicator for VirtualBoard {
    fn set_char(&mut self, ch: char, decimal_point: bool) {
        self.digit = Some((ch, decimal_point));
    }
}
