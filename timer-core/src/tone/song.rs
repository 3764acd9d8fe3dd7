//! Song string tokenizer.

use super::{DEFAULT_PAUSE_MS, Pitch, Tone, duration_ms, pause_ms};

/// Iterator over the tones encoded in a song string.
///
/// Triples are consumed in order. A trailing note without its duration digit
/// is dropped; a trailing note with a digit but no pause symbol still plays,
/// with the default pause. Either case ends the song.
#[derive(Clone, Debug)]
pub struct SongTones<'a> {
    codes: &'a [u8],
    position: usize,
}

impl<'a> SongTones<'a> {
    #[must_use]
    pub fn new(song: &'a str) -> Self {
        Self {
            codes: song.as_bytes(),
            position: 0,
        }
    }

    fn next_code(&mut self) -> Option<u8> {
        let code = *self.codes.get(self.position)?;
        self.position += 1;
        Some(code)
    }
}

impl Iterator for SongTones<'_> {
    type Item = Tone;

    fn next(&mut self) -> Option<Tone> {
        let note = self.next_code()?;
        let duration = self.next_code()?;
        let pause = match self.next_code() {
            Some(symbol) => pause_ms(symbol),
            None => DEFAULT_PAUSE_MS,
        };
        Some(Tone::new(Pitch::from_letter(note), duration_ms(duration), pause))
    }
}
