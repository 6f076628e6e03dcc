//! Per-channel UI state.

use dioxus::prelude::*;
use lull_core::DEFAULT_VOLUME_DB;

/// What a channel is doing, from the UI's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelStatus {
    /// Nothing attached (or stopped).
    #[default]
    Stopped,
    /// A file-backed sound is decoding; play controls are disabled.
    Loading,
    /// The channel is audible.
    Playing,
}

/// UI state for one mixer channel. Plain values only.
#[derive(Clone, Copy)]
pub struct ChannelState {
    /// Catalog label of the selected sound, if any.
    pub selected: Signal<Option<&'static str>>,
    pub status: Signal<ChannelStatus>,
    /// Fader level in decibels.
    pub volume_db: Signal<f32>,
    pub muted: Signal<bool>,
}

impl ChannelState {
    pub fn new() -> Self {
        Self {
            selected: Signal::new(None),
            status: Signal::new(ChannelStatus::Stopped),
            volume_db: Signal::new(DEFAULT_VOLUME_DB),
            muted: Signal::new(false),
        }
    }

    /// Back to the empty state.
    pub fn reset(&mut self) {
        self.selected.set(None);
        self.status.set(ChannelStatus::Stopped);
        self.volume_db.set(DEFAULT_VOLUME_DB);
        self.muted.set(false);
    }

    pub fn is_playing(&self) -> bool {
        *self.status.read() == ChannelStatus::Playing
    }

    pub fn is_loading(&self) -> bool {
        *self.status.read() == ChannelStatus::Loading
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}
