//! Timer state for the single-channel player.

use dioxus::prelude::*;
use lull_core::{TimerPreset, TimerState, TimerTick};

/// Reactive wrapper around the [`TimerState`] machine.
///
/// Exactly one tick loop drives this (the player sync loop); everything
/// else only reads it.
#[derive(Clone, Copy)]
pub struct TimerControl {
    /// Selected countdown preset; `None` means count up while playing.
    pub preset: Signal<Option<TimerPreset>>,
    pub state: Signal<TimerState>,
}

impl TimerControl {
    pub fn new() -> Self {
        Self {
            preset: Signal::new(None),
            state: Signal::new(TimerState::Idle),
        }
    }

    /// Enter a counting state if not already counting.
    pub fn start(&mut self) {
        let preset = *self.preset.read();
        let mut state = self.state.write();
        if !state.is_counting() {
            state.start(preset);
        }
    }

    /// Advance one second; returns the countdown result.
    pub fn tick(&mut self) -> TimerTick {
        self.state.write().tick()
    }

    /// Back to idle (explicit stop).
    pub fn stop(&mut self) {
        self.state.write().stop();
    }

    pub fn reset(&mut self) {
        self.state.set(TimerState::Idle);
    }

    pub fn is_counting(&self) -> bool {
        self.state.read().is_counting()
    }

    /// Seconds to show on the readout.
    pub fn display_seconds(&self) -> u32 {
        self.state.read().display_seconds(*self.preset.read())
    }
}

impl Default for TimerControl {
    fn default() -> Self {
        Self::new()
    }
}
