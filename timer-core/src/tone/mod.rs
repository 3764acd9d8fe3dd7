//! Monophonic square-wave tone sequencer.
//!
//! Songs are flat strings of `(note, duration, pause)` triples such as
//! `"E2,F4."`. Playback toggles the tone pin with blocking half-period waits
//! and never yields back to the control loop: while a song plays no input is
//! sampled and no display refresh happens.

use embedded_hal::delay::DelayNs;

use crate::hw::TonePin;

pub mod song;

pub use song::SongTones;

/// Pause used for `','`, unknown pause symbols and a missing trailing symbol.
pub const DEFAULT_PAUSE_MS: u32 = 5;

/// Milliseconds per duration digit step.
pub const DURATION_UNIT_MS: u32 = 200;

/// Pitch of a single tone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pitch {
    /// Silence for the tone duration.
    Rest,
    /// Square wave with the given full period in microseconds.
    Period(u32),
    /// Letter outside `A..=G` / `a..=g`; no waveform is defined for it.
    Unmapped(u8),
}

impl Pitch {
    /// Looks up the period for a note letter.
    ///
    /// Uppercase letters are the octave starting at middle C, lowercase
    /// letters the octave above.
    #[must_use]
    pub const fn from_letter(letter: u8) -> Self {
        match letter {
            b'A' => Self::Period(2272),
            b'B' => Self::Period(2024),
            b'C' => Self::Period(3816),
            b'D' => Self::Period(3401),
            b'E' => Self::Period(3030),
            b'F' => Self::Period(2865),
            b'G' => Self::Period(2551),
            b'a' => Self::Period(1136),
            b'b' => Self::Period(1012),
            b'c' => Self::Period(1912),
            b'd' => Self::Period(1703),
            b'e' => Self::Period(1517),
            b'f' => Self::Period(1432),
            b'g' => Self::Period(1275),
            other => Self::Unmapped(other),
        }
    }

    /// Wraps a raw period, treating zero as a rest.
    #[must_use]
    pub const fn from_period(period_us: u32) -> Self {
        if period_us == 0 {
            Self::Rest
        } else {
            Self::Period(period_us)
        }
    }
}

/// Decodes a duration digit into milliseconds.
///
/// The value is `(code - '0') * 200` computed with wrapping `u32` arithmetic
/// for every code. Codes outside `'0'..='9'` are not special-cased, so a `'+'`
/// decodes to an enormous wrapped value. Alarm songs are internal constants
/// and only ever use digits.
#[must_use]
pub const fn duration_ms(code: u8) -> u32 {
    (code as u32)
        .wrapping_sub(b'0' as u32)
        .wrapping_mul(DURATION_UNIT_MS)
}

/// Decodes a pause symbol into milliseconds.
#[must_use]
pub const fn pause_ms(symbol: u8) -> u32 {
    match symbol {
        b'+' => 0,
        b'.' => 20,
        b'_' => 30,
        _ => DEFAULT_PAUSE_MS,
    }
}

/// One decoded song element.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tone {
    pub pitch: Pitch,
    pub duration_ms: u32,
    pub pause_ms: u32,
}

impl Tone {
    #[must_use]
    pub const fn new(pitch: Pitch, duration_ms: u32, pause_ms: u32) -> Self {
        Self {
            pitch,
            duration_ms,
            pause_ms,
        }
    }

    /// Decodes a `(note, duration, pause)` triple.
    #[must_use]
    pub const fn from_codes(note: u8, duration: u8, pause: u8) -> Self {
        Self::new(Pitch::from_letter(note), duration_ms(duration), pause_ms(pause))
    }
}

/// What a single [`play_tone`] call did with the pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Played {
    /// Full square-wave cycles emitted.
    Burst { cycles: u32 },
    Rest,
    /// Nothing emitted for the note itself; the pause was still observed.
    Skipped,
}

/// Plays one tone followed by its pause, blocking for the whole duration.
pub fn play_tone<B>(out: &mut B, tone: &Tone) -> Played
where
    B: TonePin + DelayNs + ?Sized,
{
    let played = match tone.pitch {
        Pitch::Period(period) => {
            let half = period / 2;
            let span_us = tone.duration_ms.wrapping_mul(1_000);
            let mut elapsed = 0u32;
            let mut cycles = 0u32;
            while elapsed < span_us {
                out.tone_high();
                out.delay_us(half);
                out.tone_low();
                out.delay_us(half);
                elapsed = elapsed.saturating_add(period);
                cycles += 1;
            }
            Played::Burst { cycles }
        }
        Pitch::Rest => {
            out.delay_ms(tone.duration_ms);
            Played::Rest
        }
        Pitch::Unmapped(_) => Played::Skipped,
    };
    out.delay_ms(tone.pause_ms);
    played
}

/// Counts of what a song produced.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SongReport {
    pub bursts: u16,
    pub rests: u16,
    pub skipped: u16,
}

/// Plays every tone of `song` to completion.
pub fn play_song<B>(out: &mut B, song: &str) -> SongReport
where
    B: TonePin + DelayNs + ?Sized,
{
    let mut report = SongReport::default();
    for tone in SongTones::new(song) {
        match play_tone(out, &tone) {
            Played::Burst { .. } => report.bursts = report.bursts.saturating_add(1),
            Played::Rest => report.rests = report.rests.saturating_add(1),
            Played::Skipped => report.skipped = report.skipped.saturating_add(1),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        highs: u32,
        lows: u32,
        waited_ns: u64,
    }

    impl TonePin for Recorder {
        fn tone_high(&mut self) {
            self.highs += 1;
        }

        fn tone_low(&mut self) {
            self.lows += 1;
        }
    }

    impl DelayNs for Recorder {
        fn delay_ns(&mut self, ns: u32) {
            self.waited_ns += u64::from(ns);
        }

        fn delay_us(&mut self, us: u32) {
            self.waited_ns += u64::from(us) * 1_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.waited_ns += u64::from(ms) * 1_000_000;
        }
    }

    #[test]
    fn note_table_covers_both_octaves() {
        assert_eq!(Pitch::from_letter(b'A'), Pitch::Period(2272));
        assert_eq!(Pitch::from_letter(b'E'), Pitch::Period(3030));
        assert_eq!(Pitch::from_letter(b'g'), Pitch::Period(1275));
        assert_eq!(Pitch::from_letter(b'H'), Pitch::Unmapped(b'H'));
        assert_eq!(Pitch::from_letter(b'h'), Pitch::Unmapped(b'h'));
    }

    #[test]
    fn duration_digits_scale_by_two_hundred() {
        assert_eq!(duration_ms(b'0'), 0);
        assert_eq!(duration_ms(b'2'), 400);
        assert_eq!(duration_ms(b'9'), 1_800);
    }

    #[test]
    fn out_of_range_duration_uses_wrapped_computation() {
        // 'a' is 49 past '0'.
        assert_eq!(duration_ms(b'a'), 9_800);
        // '+' is 5 before '0' and wraps.
        assert_eq!(duration_ms(b'+'), 0u32.wrapping_sub(5).wrapping_mul(200));
        assert_ne!(duration_ms(b'+'), 400);
    }

    #[test]
    fn pause_symbols_map_to_fixed_table() {
        assert_eq!(pause_ms(b'+'), 0);
        assert_eq!(pause_ms(b','), 5);
        assert_eq!(pause_ms(b'.'), 20);
        assert_eq!(pause_ms(b'_'), 30);
        assert_eq!(pause_ms(b'?'), 5);
    }

    #[test]
    fn burst_toggles_until_duration_is_covered() {
        let mut out = Recorder::default();
        let played = play_tone(&mut out, &Tone::from_codes(b'E', b'2', b','));

        // 132 * 3030 us falls short of 400 ms, so a 133rd cycle runs.
        assert_eq!(played, Played::Burst { cycles: 133 });
        assert_eq!(out.highs, 133);
        assert_eq!(out.lows, 133);
        assert_eq!(out.waited_ns, (133 * 2 * 1_515 + 5_000) * 1_000);
    }

    #[test]
    fn rest_sleeps_without_touching_pin() {
        let mut out = Recorder::default();
        let played = play_tone(&mut out, &Tone::new(Pitch::from_period(0), 200, 20));
        assert_eq!(played, Played::Rest);
        assert_eq!(out.highs, 0);
        assert_eq!(out.waited_ns, 220 * 1_000_000);
    }

    #[test]
    fn unmapped_note_only_observes_pause() {
        let mut out = Recorder::default();
        let played = play_tone(&mut out, &Tone::from_codes(b'X', b'2', b'.'));
        assert_eq!(played, Played::Skipped);
        assert_eq!(out.highs, 0);
        assert_eq!(out.waited_ns, 20 * 1_000_000);
    }

    #[test]
    fn default_alarm_plays_four_e_bursts() {
        let mut out = Recorder::default();
        let report = play_song(&mut out, "E2,E2,E2,E2");
        assert_eq!(
            report,
            SongReport {
                bursts: 4,
                rests: 0,
                skipped: 0
            }
        );
        assert_eq!(out.highs, 4 * 133);
        assert_eq!(out.waited_ns, 4 * (133 * 2 * 1_515 + 5_000) * 1_000);
    }
}
