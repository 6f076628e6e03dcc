//! Backend services integration.
//!
//! This module connects the UI to the audio engine and the platform:
//! - Audio engine commands/events for playback
//! - Best-effort display wake lock while audio is playing

pub mod audio;
pub mod wake;

pub use audio::AudioService;
pub use wake::WakeLockService;
