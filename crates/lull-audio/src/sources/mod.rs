//! Sound sources: one live generator per mixer slot.

pub mod noise;
pub mod sampler;
pub mod tone;

pub use noise::NoiseSource;
pub use sampler::SamplePlayer;
pub use tone::ToneOscillator;

use lull_core::{Error, Result, SoundDefinition};

/// A live audio source bound to a mixer slot.
///
/// Mono generators duplicate their output to both channels; the sample
/// player is inherently stereo.
pub enum Source {
    Tone(ToneOscillator),
    Noise(NoiseSource),
    Sample(SamplePlayer),
}

impl Source {
    /// Build a synthetic (tone or noise) source synchronously.
    ///
    /// Sample sources go through the asynchronous decode path instead and
    /// are constructed from the finished buffer.
    pub fn synth(definition: &SoundDefinition, sample_rate: u32) -> Result<Self> {
        match definition {
            SoundDefinition::Tone { frequency } => {
                if !frequency.is_finite() || *frequency <= 0.0 {
                    return Err(Error::SourceCreation(format!(
                        "invalid tone frequency {frequency}"
                    )));
                }
                Ok(Self::Tone(ToneOscillator::new(*frequency, sample_rate)))
            }
            SoundDefinition::Noise(color) => {
                Ok(Self::Noise(NoiseSource::new(*color, sample_rate)))
            }
            SoundDefinition::Sample { path } => Err(Error::SourceCreation(format!(
                "sample '{path}' must be loaded asynchronously"
            ))),
        }
    }

    /// Render the next stereo frame.
    pub fn next_frame(&mut self) -> [f32; 2] {
        match self {
            Self::Tone(osc) => {
                let s = osc.next_sample();
                [s, s]
            }
            Self::Noise(noise) => {
                let s = noise.next_sample();
                [s, s]
            }
            Self::Sample(player) => player.next_frame(),
        }
    }

    /// Short description for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tone(_) => "tone",
            Self::Noise(_) => "noise",
            Self::Sample(_) => "sample",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lull_core::NoiseColor;

    #[test]
    fn test_synth_builds_tone_and_noise() {
        assert!(Source::synth(&SoundDefinition::tone(528.0), 48000).is_ok());
        assert!(Source::synth(&SoundDefinition::Noise(NoiseColor::Pink), 48000).is_ok());
    }

    #[test]
    fn test_synth_rejects_samples() {
        let err = Source::synth(&SoundDefinition::sample("rain.ogg"), 48000);
        assert!(err.is_err());
    }

    #[test]
    fn test_synth_rejects_bad_frequency() {
        assert!(Source::synth(&SoundDefinition::tone(0.0), 48000).is_err());
        assert!(Source::synth(&SoundDefinition::tone(f32::NAN), 48000).is_err());
    }
}
