//! Application state management.
//!
//! Signals hold only plain values (labels, flags, numbers). Live audio
//! handles never enter this snapshot; they belong to the engine's mix bus
//! and are addressed by [`ChannelId`].

pub mod channel;
pub mod timer;

pub use channel::{ChannelState, ChannelStatus};
pub use timer::TimerControl;

use dioxus::prelude::*;
use lull_core::{ChannelId, MIXER_CHANNELS};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Player,
    Mixer,
}

/// Global application state.
#[derive(Clone, Copy)]
pub struct AppState {
    /// One state struct per mixer channel; the player view uses channel 0.
    pub channels: [ChannelState; MIXER_CHANNELS],
    /// Auto-stop timer for the single-channel player.
    pub timer: TimerControl,
    /// Active view.
    pub view: Signal<View>,
    /// Latest user-visible error, if any.
    pub notice: Signal<Option<String>>,
}

impl AppState {
    /// Create a new application state.
    pub fn new() -> Self {
        Self {
            channels: std::array::from_fn(|_| ChannelState::new()),
            timer: TimerControl::new(),
            view: Signal::new(View::default()),
            notice: Signal::new(None),
        }
    }

    pub fn channel(&self, id: ChannelId) -> ChannelState {
        self.channels[id.index()]
    }

    /// True if any channel is currently audible.
    pub fn any_playing(&self) -> bool {
        self.channels
            .iter()
            .any(|ch| *ch.status.read() == ChannelStatus::Playing)
    }

    /// Reset every channel's UI state (used when a view is torn down).
    pub fn reset_channels(&mut self) {
        for ch in &mut self.channels {
            ch.reset();
        }
        self.timer.reset();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
