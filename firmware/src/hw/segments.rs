//! Seven-segment encoding for the secondary digit indicator.
//!
//! Bit 0 is segment `a`, bit 6 is segment `g`, bit 7 the decimal point. The
//! indicator is common-cathode, so a set bit drives the segment high.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

/// Segments lit for each decimal digit.
const DIGITS: [u8; 10] = [
    0b0011_1111,
    0b0000_0110,
    0b0101_1011,
    0b0100_1111,
    0b0110_0110,
    0b0110_1101,
    0b0111_1101,
    0b0000_0111,
    0b0111_1111,
    0b0110_1111,
];

const MINUS: u8 = 0b0100_0000;
const DECIMAL_POINT: u8 = 0b1000_0000;

/// Segment pattern for `ch`; characters without a glyph render blank.
pub fn pattern(ch: char, decimal_point: bool) -> u8 {
    let glyph = match ch {
        '0'..='9' => ch
            .to_digit(10)
            .and_then(|digit| usize::try_from(digit).ok())
            .and_then(|index| DIGITS.get(index))
            .copied()
            .unwrap_or(0),
        '-' => MINUS,
        _ => 0,
    };
    if decimal_point {
        glyph | DECIMAL_POINT
    } else {
        glyph
    }
}

/// Whether segment `index` (0 = `a`, 7 = dp) is lit in `pattern`.
pub fn is_lit(pattern: u8, index: usize) -> bool {
    index < 8 && pattern & (1 << index) != 0
}
