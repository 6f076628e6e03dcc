//! Sound definitions: what a channel can be asked to play.

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use serde::{Deserialize, Serialize};

/// Spectral class of a noise generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
    /// Mid-band emphasis; approximated as filtered pink noise.
    Green,
    /// Low-pass "water" timbre; approximated as filtered brown noise.
    Bath,
}

/// Filter shape for derived noise colors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Bandpass,
}

/// A frequency-selective filter stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    /// Cutoff (lowpass) or center (bandpass) frequency in Hz.
    pub frequency: f32,
    pub q: f32,
}

impl NoiseColor {
    /// Resolve a color to the generator actually synthesized.
    ///
    /// The base colors map to themselves. The two derived colors are fixed
    /// approximations: a base generator shaped by a filter stage.
    pub const fn derivation(self) -> (Self, Option<FilterSpec>) {
        match self {
            Self::White | Self::Pink | Self::Brown => (self, None),
            Self::Green => (
                Self::Pink,
                Some(FilterSpec {
                    kind: FilterKind::Bandpass,
                    frequency: 500.0,
                    q: 1.0,
                }),
            ),
            Self::Bath => (
                Self::Brown,
                Some(FilterSpec {
                    kind: FilterKind::Lowpass,
                    frequency: 900.0,
                    q: 0.707,
                }),
            ),
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Green => "green",
            Self::Bath => "bath",
        }
    }
}

/// How to produce a sound: a tone, a noise color, or a bundled audio file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SoundDefinition {
    /// Continuous sine tone at a fixed frequency in Hz.
    Tone { frequency: f32 },
    /// Colored noise generator.
    Noise(NoiseColor),
    /// Looping playback of a bundled audio asset.
    Sample { path: String },
}

impl SoundDefinition {
    pub fn tone(frequency: f32) -> Self {
        Self::Tone { frequency }
    }

    pub fn sample(path: impl Into<String>) -> Self {
        Self::Sample { path: path.into() }
    }

    /// True if loading this sound requires an asynchronous decode step.
    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Sample { .. })
    }
}

impl std::fmt::Display for SoundDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tone { frequency } => write!(f, "{frequency} Hz tone"),
            Self::Noise(color) => write!(f, "{} noise", color.name()),
            Self::Sample { path } => write!(f, "{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_colors_have_no_filter() {
        for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
            let (base, filter) = color.derivation();
            assert_eq!(base, color);
            assert!(filter.is_none());
        }
    }

    #[test]
    fn test_green_is_bandpassed_pink() {
        let (base, filter) = NoiseColor::Green.derivation();
        assert_eq!(base, NoiseColor::Pink);
        let spec = filter.unwrap();
        assert_eq!(spec.kind, FilterKind::Bandpass);
        assert!(spec.frequency > 0.0);
    }

    #[test]
    fn test_bath_is_lowpassed_brown() {
        let (base, filter) = NoiseColor::Bath.derivation();
        assert_eq!(base, NoiseColor::Brown);
        assert_eq!(filter.unwrap().kind, FilterKind::Lowpass);
    }

    #[test]
    fn test_only_samples_load_async() {
        assert!(SoundDefinition::sample("a.ogg").is_async());
        assert!(!SoundDefinition::tone(528.0).is_async());
        assert!(!SoundDefinition::Noise(NoiseColor::Pink).is_async());
    }
}
