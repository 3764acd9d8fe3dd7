//! Line grammar for driving a board from a text console.
//!
//! The host emulator feeds one line per command. Keywords are
//! case-insensitive; counts default to a single iteration or step.
//!
//! ```text
//! button [ticks]
//! joy <center|up|down|left|right> [ticks]
//! rotate <left|right> [count]
//! tick <n>
//! advance <n>[s]
//! clock <hh:mm:ss>
//! lux <n>
//! status
//! help [topic]
//! ```

use core::fmt;

use winnow::ascii::{Caseless, alpha1, digit1, space0, space1};
use winnow::combinator::{alt, eof, opt, preceded, terminated};
use winnow::prelude::*;

use crate::clock::WallClock;
use crate::input::{JoystickMask, RotaryStep};

/// Parsed console command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConsoleCommand<'a> {
    /// Hold the push-button for `ticks` iterations.
    Button { ticks: u32 },
    /// Hold the joystick in `direction` for `ticks` iterations.
    Joystick { direction: JoystickMask, ticks: u32 },
    /// Turn the encoder `count` detents, one iteration each.
    Rotate { step: RotaryStep, count: u32 },
    /// Run idle iterations.
    Tick(u32),
    /// Move the wall clock forward by whole seconds.
    Advance(u32),
    /// Set the wall clock.
    Clock(WallClock),
    /// Set the ambient light reading.
    Lux(u32),
    Status,
    Help(Option<&'a str>),
}

/// Reasons a console line is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConsoleError {
    Empty,
    /// The line stopped matching the grammar at this byte offset.
    Syntax { offset: usize },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Empty => f.write_str("empty command"),
            ConsoleError::Syntax { offset } => write!(f, "unexpected input at column {offset}"),
        }
    }
}

/// Parses a single console line.
///
/// # Errors
///
/// Returns [`ConsoleError`] when the line is blank or does not match the grammar.
pub fn parse(line: &str) -> Result<ConsoleCommand<'_>, ConsoleError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::Empty);
    }
    terminated(command, (space0, eof))
        .parse(trimmed)
        .map_err(|err| ConsoleError::Syntax {
            offset: err.offset(),
        })
}

/// Parses a bare `hh:mm:ss` wall-clock reading.
///
/// # Errors
///
/// Returns [`ConsoleError::Syntax`] for malformed or out-of-range readings.
pub fn parse_wall_clock(text: &str) -> Result<WallClock, ConsoleError> {
    clock.parse(text.trim()).map_err(|err| ConsoleError::Syntax {
        offset: err.offset(),
    })
}

fn command<'a>(input: &mut &'a str) -> ModalResult<ConsoleCommand<'a>> {
    alt((
        preceded(Caseless("button"), count).map(|ticks| ConsoleCommand::Button { ticks }),
        preceded((Caseless("joy"), space1), (direction, count))
            .map(|(direction, ticks)| ConsoleCommand::Joystick { direction, ticks }),
        preceded((Caseless("rotate"), space1), (rotation, count))
            .map(|(step, count)| ConsoleCommand::Rotate { step, count }),
        preceded((Caseless("tick"), space1), number).map(ConsoleCommand::Tick),
        preceded(
            (Caseless("advance"), space1),
            terminated(number, opt(Caseless("s"))),
        )
        .map(ConsoleCommand::Advance),
        preceded((Caseless("clock"), space1), clock).map(ConsoleCommand::Clock),
        preceded((Caseless("lux"), space1), number).map(ConsoleCommand::Lux),
        Caseless("status").value(ConsoleCommand::Status),
        preceded(Caseless("help"), opt(preceded(space1, alpha1))).map(ConsoleCommand::Help),
    ))
    .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<u32> {
    digit1.parse_to().parse_next(input)
}

fn count(input: &mut &str) -> ModalResult<u32> {
    opt(preceded(space1, number))
        .map(|value| value.unwrap_or(1))
        .parse_next(input)
}

fn direction(input: &mut &str) -> ModalResult<JoystickMask> {
    alt((
        Caseless("center").value(JoystickMask::CENTER),
        Caseless("up").value(JoystickMask::UP),
        Caseless("down").value(JoystickMask::DOWN),
        Caseless("left").value(JoystickMask::LEFT),
        Caseless("right").value(JoystickMask::RIGHT),
    ))
    .parse_next(input)
}

fn rotation(input: &mut &str) -> ModalResult<RotaryStep> {
    alt((
        Caseless("left").value(RotaryStep::Left),
        Caseless("right").value(RotaryStep::Right),
    ))
    .parse_next(input)
}

fn clock_field(input: &mut &str) -> ModalResult<u8> {
    digit1.parse_to().parse_next(input)
}

fn clock(input: &mut &str) -> ModalResult<WallClock> {
    (clock_field, ':', clock_field, ':', clock_field)
        .verify_map(|(hours, _, minutes, _, seconds)| WallClock::new(hours, minutes, seconds))
        .parse_next(input)
}
