//! Core domain types for Lull.

pub mod catalog;
pub mod channel;
pub mod sound;
pub mod timer;

pub use catalog::CatalogEntry;
pub use channel::{
    clamp_volume_db, ChannelId, DEFAULT_VOLUME_DB, MAX_VOLUME_DB, MIN_VOLUME_DB, MIXER_CHANNELS,
};
pub use sound::{FilterKind, FilterSpec, NoiseColor, SoundDefinition};
pub use timer::{format_clock, TimerPreset, TimerState, TimerTick};
