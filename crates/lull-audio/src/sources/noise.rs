//! Colored noise generators.
//!
//! White noise comes from an integer LCG; pink is white shaped by the Paul
//! Kellet filter bank; brown is a leaky integrator over white. The two
//! derived catalog colors (green, bath) are a base generator run through a
//! biquad stage picked by [`NoiseColor::derivation`].

use lull_core::NoiseColor;

use crate::filter::Biquad;

/// White noise from a linear congruential generator.
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    rng_state: u32,
}

impl WhiteNoise {
    pub const fn new(seed: u32) -> Self {
        Self {
            rng_state: if seed == 0 { 12345 } else { seed },
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        (self.rng_state as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

/// Pink noise: -3 dB/octave, via Paul Kellet's filter bank.
#[derive(Debug, Clone)]
struct PinkNoise {
    white: WhiteNoise,
    b: [f32; 7],
}

impl PinkNoise {
    const fn new(seed: u32) -> Self {
        Self {
            white: WhiteNoise::new(seed),
            b: [0.0; 7],
        }
    }

    fn next_sample(&mut self) -> f32 {
        let w = self.white.next_sample();
        self.b[0] = 0.99886 * self.b[0] + w * 0.055_517_9;
        self.b[1] = 0.99332 * self.b[1] + w * 0.075_075_9;
        self.b[2] = 0.96900 * self.b[2] + w * 0.153_852_0;
        self.b[3] = 0.86650 * self.b[3] + w * 0.310_485_6;
        self.b[4] = 0.55000 * self.b[4] + w * 0.532_952_2;
        self.b[5] = -0.7616 * self.b[5] - w * 0.016_898_0;
        let pink = self.b.iter().sum::<f32>() + w * 0.5362;
        self.b[6] = w * 0.115_926;
        // The bank sums well above unity; scale back into range.
        pink * 0.11
    }
}

/// Brown noise: -6 dB/octave, via a leaky integrator.
#[derive(Debug, Clone)]
struct BrownNoise {
    white: WhiteNoise,
    level: f32,
}

impl BrownNoise {
    const fn new(seed: u32) -> Self {
        Self {
            white: WhiteNoise::new(seed),
            level: 0.0,
        }
    }

    fn next_sample(&mut self) -> f32 {
        let w = self.white.next_sample();
        self.level = (self.level + 0.02 * w) / 1.02;
        self.level * 3.5
    }
}

enum Generator {
    White(WhiteNoise),
    Pink(PinkNoise),
    Brown(BrownNoise),
}

/// A colored-noise source, including the filter stage for derived colors.
pub struct NoiseSource {
    color: NoiseColor,
    generator: Generator,
    filter: Option<Biquad>,
}

impl NoiseSource {
    pub fn new(color: NoiseColor, sample_rate: u32) -> Self {
        let (base, filter_spec) = color.derivation();
        // Seed off the color so two channels of the same color still decorrelate
        // only by start offset, matching the fixed-approximation intent.
        let seed = 0x9E37_79B9 ^ (base as u32).wrapping_mul(0x85EB_CA6B);
        let generator = match base {
            NoiseColor::White => Generator::White(WhiteNoise::new(seed)),
            NoiseColor::Pink => Generator::Pink(PinkNoise::new(seed)),
            NoiseColor::Brown => Generator::Brown(BrownNoise::new(seed)),
            // derivation() only ever returns base colors
            NoiseColor::Green | NoiseColor::Bath => Generator::Pink(PinkNoise::new(seed)),
        };
        let filter = filter_spec.map(|spec| Biquad::from_spec(spec, sample_rate));
        Self {
            color,
            generator,
            filter,
        }
    }

    pub const fn color(&self) -> NoiseColor {
        self.color
    }

    pub const fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn next_sample(&mut self) -> f32 {
        let raw = match &mut self.generator {
            Generator::White(g) => g.next_sample(),
            Generator::Pink(g) => g.next_sample(),
            Generator::Brown(g) => g.next_sample(),
        };
        match &mut self.filter {
            Some(filter) => filter.process(raw),
            None => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(source: &mut NoiseSource, samples: usize) -> f32 {
        let sum: f32 = (0..samples).map(|_| source.next_sample().powi(2)).sum();
        (sum / samples as f32).sqrt()
    }

    #[test]
    fn test_white_noise_in_range() {
        let mut white = WhiteNoise::new(1);
        for _ in 0..10000 {
            let s = white.next_sample();
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_white_noise_is_not_constant() {
        let mut white = WhiteNoise::new(1);
        let first = white.next_sample();
        let differs = (0..100).any(|_| (white.next_sample() - first).abs() > 1e-3);
        assert!(differs);
    }

    #[test]
    fn test_all_colors_produce_bounded_finite_output() {
        for color in [
            NoiseColor::White,
            NoiseColor::Pink,
            NoiseColor::Brown,
            NoiseColor::Green,
            NoiseColor::Bath,
        ] {
            let mut source = NoiseSource::new(color, 48000);
            for i in 0..48000 {
                let s = source.next_sample();
                assert!(s.is_finite(), "{} sample {i} not finite", color.name());
                assert!(s.abs() <= 2.0, "{} sample {i} out of range: {s}", color.name());
            }
        }
    }

    #[test]
    fn test_derived_colors_carry_filter_stage() {
        assert!(NoiseSource::new(NoiseColor::Green, 48000).has_filter());
        assert!(NoiseSource::new(NoiseColor::Bath, 48000).has_filter());
        assert!(!NoiseSource::new(NoiseColor::Pink, 48000).has_filter());
    }

    #[test]
    fn test_noise_has_energy() {
        for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
            let mut source = NoiseSource::new(color, 48000);
            assert!(
                rms(&mut source, 48000) > 0.01,
                "{} noise has no energy",
                color.name()
            );
        }
    }

    #[test]
    fn test_bath_is_darker_than_white() {
        // The lowpassed derivation should carry noticeably less high-band
        // energy than plain white noise; a crude proxy is sample-to-sample
        // difference energy.
        let diff_energy = |color: NoiseColor| {
            let mut source = NoiseSource::new(color, 48000);
            let mut last = source.next_sample();
            let mut sum = 0.0f32;
            for _ in 0..48000 {
                let s = source.next_sample();
                sum += (s - last).powi(2);
                last = s;
            }
            sum
        };
        assert!(diff_energy(NoiseColor::Bath) < diff_energy(NoiseColor::White) * 0.1);
    }
}
