//! Decibel level handling.

use lull_core::MIN_VOLUME_DB;

/// Convert a fader level in decibels to a linear gain factor.
///
/// The bottom of the fader range is treated as silence rather than a very
/// quiet signal, so a fully lowered fader is actually off.
pub fn db_to_linear(db: f32) -> f32 {
    if db <= MIN_VOLUME_DB {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}

/// Per-frame one-pole smoothing coefficient for gain changes.
///
/// Roughly a 10 ms ramp at the given sample rate, enough to keep fader and
/// mute transitions click-free.
pub fn gain_smoothing_coeff(sample_rate: u32) -> f32 {
    1.0 - (-1.0 / (0.010 * sample_rate as f32)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lull_core::MAX_VOLUME_DB;

    #[test]
    fn test_unity_at_zero_db() {
        assert!((db_to_linear(MAX_VOLUME_DB) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_floor_is_silence() {
        assert_eq!(db_to_linear(MIN_VOLUME_DB), 0.0);
        assert_eq!(db_to_linear(MIN_VOLUME_DB - 10.0), 0.0);
    }

    #[test]
    fn test_half_amplitude_near_minus_six() {
        let gain = db_to_linear(-6.0);
        assert!((gain - 0.501).abs() < 0.01, "got {gain}");
    }

    #[test]
    fn test_monotone_within_range() {
        let mut last = db_to_linear(MIN_VOLUME_DB + 0.1);
        let mut db = MIN_VOLUME_DB + 0.2;
        while db <= MAX_VOLUME_DB {
            let gain = db_to_linear(db);
            assert!(gain > last, "gain not monotone at {db} dB");
            last = gain;
            db += 0.1;
        }
    }

    #[test]
    fn test_smoothing_coeff_in_range() {
        let coeff = gain_smoothing_coeff(48000);
        assert!(coeff > 0.0 && coeff < 1.0);
    }
}
