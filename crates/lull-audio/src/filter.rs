//! Biquad filter stage for derived noise colors.
//!
//! 2nd-order IIR in Direct Form II Transposed; coefficient formulas from the
//! Audio EQ Cookbook (Robert Bristow-Johnson). Only the lowpass and bandpass
//! responses are needed here.

use std::f32::consts::PI;

use lull_core::{FilterKind, FilterSpec};

/// A biquad IIR filter configured from a [`FilterSpec`].
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // State (Direct Form II Transposed)
    z1: f32,
    z2: f32,
}

impl Biquad {
    /// Build a filter for the given spec at the output sample rate.
    pub fn from_spec(spec: FilterSpec, sample_rate: u32) -> Self {
        let w0 = 2.0 * PI * spec.frequency / sample_rate as f32;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * spec.q);

        let (b0, b1, b2, a0, a1, a2) = match spec.kind {
            FilterKind::Lowpass => {
                let b1 = 1.0 - cos_w0;
                let b0 = b1 / 2.0;
                let b2 = b0;
                (b0, b1, b2, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            FilterKind::Bandpass => {
                let b0 = alpha;
                let b2 = -alpha;
                (b0, 0.0, b2, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Process a single sample through the filter.
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Reset filter state.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowpass(frequency: f32) -> Biquad {
        Biquad::from_spec(
            FilterSpec {
                kind: FilterKind::Lowpass,
                frequency,
                q: 0.707,
            },
            44100,
        )
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut f = lowpass(5000.0);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = f.process(1.0);
        }
        assert!(
            (output - 1.0).abs() < 0.001,
            "Lowpass should pass DC, got {output}"
        );
    }

    #[test]
    fn test_bandpass_blocks_dc() {
        let mut f = Biquad::from_spec(
            FilterSpec {
                kind: FilterKind::Bandpass,
                frequency: 500.0,
                q: 1.0,
            },
            44100,
        );
        let mut output = 0.0;
        for _ in 0..1000 {
            output = f.process(1.0);
        }
        assert!(
            output.abs() < 0.001,
            "Bandpass should block DC, got {output}"
        );
    }

    #[test]
    fn test_lowpass_attenuates_high_freq() {
        let mut f = lowpass(200.0);
        let freq = 10000.0;
        let mut max_out = 0.0_f32;
        for i in 0..4410 {
            let t = i as f32 / 44100.0;
            let input = (2.0 * PI * freq * t).sin();
            let out = f.process(input);
            if i > 1000 {
                // skip transient
                max_out = max_out.max(out.abs());
            }
        }
        assert!(
            max_out < 0.01,
            "Lowpass@200Hz should strongly attenuate 10kHz, got amplitude {max_out}"
        );
    }

    #[test]
    fn test_output_finite_under_impulses() {
        let mut f = Biquad::from_spec(
            FilterSpec {
                kind: FilterKind::Bandpass,
                frequency: 1000.0,
                q: 1.0,
            },
            44100,
        );
        for i in 0..10000 {
            let input = if i % 100 == 0 { 1.0 } else { 0.0 };
            let out = f.process(input);
            assert!(out.is_finite(), "Filter output not finite at sample {i}");
        }
    }
}
