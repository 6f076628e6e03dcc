//! Channel identifiers and volume bounds.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of independent channels in the mixer.
pub const MIXER_CHANNELS: usize = 4;

/// Lower bound of the per-channel volume range, in decibels.
///
/// Renders as silence; faders never go below it.
pub const MIN_VOLUME_DB: f32 = -40.0;

/// Upper bound of the per-channel volume range, in decibels (unity gain).
pub const MAX_VOLUME_DB: f32 = 0.0;

/// Volume a channel starts at before the user touches the fader.
pub const DEFAULT_VOLUME_DB: f32 = -10.0;

/// Index of one playback slot in the mixer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(usize);

impl ChannelId {
    /// Create a channel id, rejecting out-of-range indices.
    pub fn new(index: usize) -> Result<Self> {
        if index < MIXER_CHANNELS {
            Ok(Self(index))
        } else {
            Err(Error::InvalidArgument(format!(
                "channel index {index} out of range 0..{MIXER_CHANNELS}"
            )))
        }
    }

    /// The channel used by the single-player view.
    pub const PLAYER: Self = Self(0);

    /// Raw index for array access.
    pub const fn index(self) -> usize {
        self.0
    }

    /// All valid channel ids, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..MIXER_CHANNELS).map(Self)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "channel {}", self.0 + 1)
    }
}

/// Clamp a fader value into the legal decibel range.
pub fn clamp_volume_db(db: f32) -> f32 {
    db.clamp(MIN_VOLUME_DB, MAX_VOLUME_DB)
}
