//! # lull-audio
//!
//! Synthesis and playback engine for Lull.
//!
//! Features:
//! - Tone, colored-noise, and looping file-backed sound sources
//! - Four independent mixer slots with decibel gain and mute
//! - Low-latency cpal output rendering directly from the mix bus

pub mod decode;
pub mod engine;
pub mod filter;
pub mod level;
pub mod mixer;
pub mod output;
pub mod resample;
pub mod sources;

pub use engine::{AudioEngine, EngineCommand, EngineEvent};
pub use mixer::{shared_mix_bus, ChannelSlot, MixBus, SharedMixBus};
pub use sources::Source;
