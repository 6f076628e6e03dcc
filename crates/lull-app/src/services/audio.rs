//! Audio service connecting UI to the audio engine.

use crate::state::{AppState, ChannelStatus};
use dioxus::prelude::*;
use lull_audio::{AudioEngine, EngineCommand, EngineEvent};
use lull_core::{ChannelId, Error, SoundDefinition, TimerTick};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::wake::WakeLockService;

/// How often the sync loop polls engine events.
const EVENT_POLL_MS: u64 = 100;

/// How many polls between idempotent stream-resume nudges while playing.
///
/// Covers hidden→revealed and suspend→wake stalls without a platform
/// visibility event.
const RESUME_EVERY_POLLS: u64 = 50;

/// Audio service that manages the connection between UI and audio playback.
///
/// The engine is created lazily on the first play action — the platform
/// audio device is only opened in response to a user gesture — and dropped
/// if it dies, so the next gesture retries from scratch.
#[derive(Clone)]
pub struct AudioService {
    engine: Arc<Mutex<Option<AudioEngine>>>,
}

impl AudioService {
    /// Create the service with no engine yet.
    pub fn new() -> Self {
        Self {
            engine: Arc::new(Mutex::new(None)),
        }
    }

    /// Make sure the engine exists; called from play gestures.
    fn activate(&self) -> bool {
        let mut engine = self.engine.lock();
        if engine.is_some() {
            return true;
        }
        match AudioEngine::new() {
            Ok(created) => {
                info!("Audio engine initialized");
                *engine = Some(created);
                true
            }
            Err(e) => {
                error!("Failed to initialize audio engine: {e}");
                false
            }
        }
    }

    /// Send a command, dropping a dead engine so the next gesture retries.
    pub fn send_command(&self, command: EngineCommand) {
        let mut engine = self.engine.lock();
        let Some(active) = engine.as_ref() else {
            warn!("Audio engine not available");
            return;
        };
        if let Err(e) = active.send_command(command) {
            if matches!(e, Error::EngineUnavailable) {
                warn!("Audio engine died; will recreate on next play");
                *engine = None;
            } else {
                error!("Failed to send command to audio engine: {e}");
            }
        }
    }

    /// Bind a sound to a channel and start it.
    ///
    /// This is the gesture that unlocks audio: the engine is created here if
    /// needed, and the stream is confirmed running before the load.
    pub fn play(&self, channel: ChannelId, definition: SoundDefinition) {
        if !self.activate() {
            return;
        }
        self.send_command(EngineCommand::Resume);
        self.send_command(EngineCommand::Load {
            channel,
            definition,
        });
    }

    /// Stop a channel's source.
    pub fn stop(&self, channel: ChannelId) {
        self.send_command(EngineCommand::Stop(channel));
    }

    /// Set a channel's volume in decibels.
    pub fn set_volume(&self, channel: ChannelId, db: f32) {
        self.send_command(EngineCommand::SetVolume(channel, db));
    }

    /// Mute or unmute a channel.
    pub fn set_mute(&self, channel: ChannelId, muted: bool) {
        self.send_command(EngineCommand::SetMute(channel, muted));
    }

    /// Clear a channel back to empty.
    pub fn remove(&self, channel: ChannelId) {
        self.send_command(EngineCommand::Remove(channel));
    }

    /// Stop every channel (view teardown).
    pub fn stop_all(&self) {
        if self.engine.lock().is_none() {
            return;
        }
        for channel in ChannelId::all() {
            self.send_command(EngineCommand::Remove(channel));
        }
    }

    /// Nudge the output stream back into the running state.
    pub fn resume_output(&self) {
        if self.engine.lock().is_some() {
            self.send_command(EngineCommand::Resume);
        }
    }

    /// Try to receive an event from the audio engine.
    pub fn try_recv_event(&self) -> Option<EngineEvent> {
        self.engine.lock().as_ref()?.try_recv_event()
    }
}

impl Default for AudioService {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook to initialize and use the audio service.
pub fn use_audio_service() -> Signal<AudioService> {
    use_context_provider(|| Signal::new(AudioService::new()))
}

/// Hook to sync audio engine events with app state.
/// This should be called in the App component.
pub fn use_audio_event_sync(audio: Signal<AudioService>, app_state: AppState, wake: WakeLockService) {
    use_future(move || {
        let wake = wake.clone();
        async move {
            let mut polls: u64 = 0;
            loop {
                {
                    let service = audio.read();
                    while let Some(event) = service.try_recv_event() {
                        apply_event(&event, app_state);
                    }

                    let playing = app_state.any_playing();
                    wake.set_active(playing);

                    // Periodic foreground-recovery nudge; Resume is
                    // idempotent on a running stream.
                    if playing && polls % RESUME_EVERY_POLLS == 0 {
                        service.resume_output();
                    }
                }

                polls = polls.wrapping_add(1);
                tokio::time::sleep(tokio::time::Duration::from_millis(EVENT_POLL_MS)).await;
            }
        }
    });
}

/// Hook driving the single-channel auto-stop timer, once per second.
/// The only tick source for the timer.
pub fn use_timer_loop(audio: Signal<AudioService>, app_state: AppState) {
    let mut timer = app_state.timer;
    let player = app_state.channel(ChannelId::PLAYER);

    use_future(move || async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));
        loop {
            interval.tick().await;
            if player.is_playing() && timer.is_counting() && timer.tick() == TimerTick::Expired {
                info!("Timer elapsed, stopping playback");
                audio.read().stop(ChannelId::PLAYER);
            }
        }
    });
}

fn apply_event(event: &EngineEvent, app_state: AppState) {
    match event {
        EngineEvent::ChannelLoading(channel) => {
            debug!("{channel} loading");
            let mut ch = app_state.channel(*channel);
            ch.status.set(ChannelStatus::Loading);
        }
        EngineEvent::ChannelStarted(channel) => {
            debug!("{channel} started");
            let mut ch = app_state.channel(*channel);
            ch.status.set(ChannelStatus::Playing);
            if *channel == ChannelId::PLAYER {
                let mut timer = app_state.timer;
                timer.start();
            }
        }
        EngineEvent::ChannelStopped(channel) => {
            let mut ch = app_state.channel(*channel);
            ch.status.set(ChannelStatus::Stopped);
            if *channel == ChannelId::PLAYER {
                let mut timer = app_state.timer;
                timer.stop();
            }
        }
        EngineEvent::ChannelCleared(channel) => {
            let mut ch = app_state.channel(*channel);
            ch.reset();
            if *channel == ChannelId::PLAYER {
                let mut timer = app_state.timer;
                timer.stop();
            }
        }
        EngineEvent::ChannelError { channel, message } => {
            error!("{channel}: {message}");
            // Load failed: the channel reverts to its empty state and the
            // failure (path + cause) is surfaced to the user.
            let mut ch = app_state.channel(*channel);
            ch.reset();
            let mut notice = app_state.notice;
            notice.set(Some(message.clone()));
            if *channel == ChannelId::PLAYER {
                let mut timer = app_state.timer;
                timer.stop();
            }
        }
        EngineEvent::EngineError(message) => {
            error!("Engine error: {message}");
            let mut notice = app_state.notice;
            notice.set(Some(message.clone()));
            let mut state = app_state;
            state.reset_channels();
        }
    }
}
