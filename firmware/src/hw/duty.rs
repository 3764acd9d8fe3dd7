//! Motor compare values rescaled to the PWM timer's duty range.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

/// Maps `compare`, expressed against `period`, onto `0..=max_duty`.
///
/// Compares above the period saturate at full duty. The product is formed in
/// 64 bits so any `u32` period is safe.
pub fn scale(compare: u32, period: u32, max_duty: u16) -> u16 {
    let period = u64::from(period.max(1));
    let compare = u64::from(compare).min(period);
    let duty = u64::from(max_duty) * compare / period;
    u16::try_from(duty).unwrap_or(max_duty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_period_maps_linearly() {
        assert_eq!(scale(0, 1_000, 3_199), 0);
        assert_eq!(scale(300, 1_000, 3_199), 959);
        assert_eq!(scale(1_000, 1_000, 3_199), 3_199);
    }

    #[test]
    fn compare_beyond_period_saturates() {
        assert_eq!(scale(5_000, 1_000, 3_199), 3_199);
    }

    #[test]
    fn large_period_does_not_overflow() {
        assert_eq!(scale(u32::MAX / 2, u32::MAX, u16::MAX), 32_767);
        assert_eq!(scale(u32::MAX, u32::MAX, u16::MAX), u16::MAX);
        assert_eq!(scale(3_000_000, 4_000_000, 40_000), 30_000);
    }

    #[test]
    fn zero_period_is_treated_as_one() {
        assert_eq!(scale(0, 0, 100), 0);
        assert_eq!(scale(7, 0, 100), 100);
    }
}
