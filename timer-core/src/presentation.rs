//! Display formatting and refresh.
//!
//! The full refresh runs on its own cadence: it samples the light sensor and
//! redraws the label, the countdown and the wall clock. Duration edits redraw
//! only the countdown, immediately.

use core::fmt::Write;

use heapless::String;

use crate::clock::{Seconds, WallClock};
use crate::hw::{AmbientLight, DigitIndicator, DisplayColor, TextDisplay};
use crate::input::DisplayDigit;

/// Label drawn left of the countdown.
pub const LABEL: &str = "Timer :";
/// Position of [`LABEL`].
pub const LABEL_POSITION: (u8, u8) = (1, 1);
/// Countdown position, right after the seven-character label.
pub const COUNTDOWN_POSITION: (u8, u8) = (1 + 7 * 6, 1);
/// Wall-clock position on the bottom row.
pub const CLOCK_POSITION: (u8, u8) = (1 + 7 * 3, 50);

const FOREGROUND: DisplayColor = DisplayColor::Black;
const BACKGROUND: DisplayColor = DisplayColor::White;

/// Formatted `mm:ss`; minutes grow past two digits for long durations.
pub type CountdownText = String<12>;

/// Formatted `hh:mm:ss`.
pub type ClockText = String<8>;

/// Formats seconds as zero-padded `mm:ss`.
#[must_use]
pub fn format_countdown(seconds: Seconds) -> CountdownText {
    let mut text = CountdownText::new();
    // Capacity holds the widest u32 minute count.
    let _ = write!(text, "{:02}:{:02}", seconds / 60, seconds % 60);
    text
}

/// Formats a wall-clock reading as `hh:mm:ss`.
#[must_use]
pub fn format_clock(clock: WallClock) -> ClockText {
    let mut text = ClockText::new();
    let _ = write!(text, "{clock}");
    text
}

/// Redraws only the countdown value.
pub fn draw_countdown<B>(board: &mut B, seconds: Seconds)
where
    B: TextDisplay + ?Sized,
{
    let (x, y) = COUNTDOWN_POSITION;
    board.put_string(x, y, &format_countdown(seconds), FOREGROUND, BACKGROUND);
}

/// Shows the digit on the secondary indicator.
pub fn draw_digit<B>(board: &mut B, digit: DisplayDigit)
where
    B: DigitIndicator + ?Sized,
{
    board.set_char(digit.as_char(), false);
}

/// Cadenced refresh: samples ambient light and redraws every field.
///
/// Returns the light reading.
pub fn refresh<B>(board: &mut B, seconds: Seconds, now: WallClock) -> u32
where
    B: TextDisplay + AmbientLight + ?Sized,
{
    let lux = board.read_lux();

    let (x, y) = LABEL_POSITION;
    board.put_string(x, y, LABEL, FOREGROUND, BACKGROUND);
    draw_countdown(board, seconds);
    let (x, y) = CLOCK_POSITION;
    board.put_string(x, y, &format_clock(now), FOREGROUND, BACKGROUND);

    lux
}
