//! Audio engine coordinating sources, the mix bus, and device output.
//!
//! The engine runs on a dedicated worker thread that owns the cpal stream
//! (`cpal::Stream` is not `Send`) and the authoritative channel lifecycle.
//! The UI talks to it exclusively through commands and observes it through
//! events, so every load/stop/volume action for any channel funnels through
//! one place and the per-slot invariants hold no matter how calls interleave.
//!
//! File loads decode on their own loader threads. Each load carries the
//! generation token captured when it began; the worker attaches the decoded
//! clip only if the slot's generation is unchanged, so a stop, remove, or
//! replacement arriving mid-decode wins and the stale clip is dropped.

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use lull_core::{ChannelId, Error, Result, SoundDefinition};
use tracing::{debug, error, info, warn};

use std::time::Duration;

use crate::decode::decode_file;
use crate::mixer::{shared_mix_bus, SharedMixBus};
use crate::output::AudioOutput;
use crate::sources::{SamplePlayer, Source};

/// Commands to control the audio engine.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Bind a sound to a channel, replacing whatever it plays now.
    Load {
        channel: ChannelId,
        definition: SoundDefinition,
    },
    /// Stop a channel's source. No-op if the channel is silent.
    Stop(ChannelId),
    /// Set a channel's volume in decibels (always un-mutes).
    SetVolume(ChannelId, f32),
    /// Mute or unmute a channel.
    SetMute(ChannelId, bool),
    /// Clear a channel back to its empty state.
    Remove(ChannelId),
    /// Ensure the output stream is running (foreground recovery).
    Resume,
    /// Pause the output stream.
    Suspend,
    /// Shutdown the engine.
    Shutdown,
}

/// Events emitted by the audio engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A file-backed sound started decoding for this channel.
    ChannelLoading(ChannelId),
    /// The channel's source is attached and audible.
    ChannelStarted(ChannelId),
    /// The channel's source was stopped and released.
    ChannelStopped(ChannelId),
    /// The channel was cleared back to empty.
    ChannelCleared(ChannelId),
    /// A load failed; the channel reverted to empty.
    ChannelError { channel: ChannelId, message: String },
    /// Engine-wide failure (device lost, stream control failed).
    EngineError(String),
}

/// Result of a background file decode, tagged with its generation token.
struct LoadResult {
    channel: ChannelId,
    token: u64,
    path: String,
    result: Result<SamplePlayer>,
}

/// Handle to the audio engine worker.
pub struct AudioEngine {
    command_tx: Sender<EngineCommand>,
    event_rx: Receiver<EngineEvent>,
}

impl AudioEngine {
    /// Start the engine: spawns the worker thread, which opens the default
    /// output device and begins servicing commands.
    ///
    /// Device failures are reported as an [`EngineEvent::EngineError`] and
    /// the worker exits; subsequent sends fail with
    /// [`Error::EngineUnavailable`] so the caller can retry with a fresh
    /// engine on the next user gesture.
    pub fn new() -> Result<Self> {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        std::thread::Builder::new()
            .name("lull-audio-engine".to_string())
            .spawn(move || {
                // Probe the device rate first: the bus must exist (at the
                // right rate) before the stream that renders from it.
                let config = match AudioOutput::probe_default_config() {
                    Ok(config) => config,
                    Err(e) => {
                        error!("Failed to probe audio output: {e}");
                        let _ = event_tx.send(EngineEvent::EngineError(e.to_string()));
                        return;
                    }
                };

                let bus = shared_mix_bus(config.sample_rate);
                match AudioOutput::new(bus.clone()) {
                    Ok(output) => {
                        info!(
                            "Audio output initialized: {} Hz, {} channels, device: {}",
                            output.sample_rate(),
                            output.channels(),
                            output.device_name()
                        );
                        let worker = EngineWorker::new(command_rx, event_tx, bus, output);
                        worker.run();
                    }
                    Err(e) => {
                        error!("Failed to initialize audio output: {e}");
                        let _ = event_tx.send(EngineEvent::EngineError(format!(
                            "Failed to initialize audio: {e}"
                        )));
                    }
                }
            })
            .map_err(|e| Error::AudioOutput(format!("Failed to spawn engine thread: {e}")))?;

        Ok(Self {
            command_tx,
            event_rx,
        })
    }

    /// Send a command to the engine.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::EngineUnavailable)
    }

    /// Bind a sound to a channel.
    pub fn load(&self, channel: ChannelId, definition: SoundDefinition) -> Result<()> {
        self.send_command(EngineCommand::Load {
            channel,
            definition,
        })
    }

    /// Stop a channel.
    pub fn stop(&self, channel: ChannelId) -> Result<()> {
        self.send_command(EngineCommand::Stop(channel))
    }

    /// Set a channel's volume in decibels.
    pub fn set_volume(&self, channel: ChannelId, db: f32) -> Result<()> {
        self.send_command(EngineCommand::SetVolume(channel, db))
    }

    /// Mute or unmute a channel.
    pub fn set_mute(&self, channel: ChannelId, muted: bool) -> Result<()> {
        self.send_command(EngineCommand::SetMute(channel, muted))
    }

    /// Clear a channel back to empty.
    pub fn remove(&self, channel: ChannelId) -> Result<()> {
        self.send_command(EngineCommand::Remove(channel))
    }

    /// Ensure the output stream is running.
    pub fn resume(&self) -> Result<()> {
        self.send_command(EngineCommand::Resume)
    }

    /// Shutdown the engine.
    pub fn shutdown(&self) -> Result<()> {
        self.send_command(EngineCommand::Shutdown)
    }

    /// Try to receive an event without blocking.
    pub fn try_recv_event(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Internal worker that services commands on the engine thread.
struct EngineWorker {
    command_rx: Receiver<EngineCommand>,
    event_tx: Sender<EngineEvent>,
    loader_tx: Sender<LoadResult>,
    loader_rx: Receiver<LoadResult>,
    bus: SharedMixBus,
    output: AudioOutput,
}

impl EngineWorker {
    fn new(
        command_rx: Receiver<EngineCommand>,
        event_tx: Sender<EngineEvent>,
        bus: SharedMixBus,
        output: AudioOutput,
    ) -> Self {
        let (loader_tx, loader_rx) = unbounded();
        Self {
            command_rx,
            event_tx,
            loader_tx,
            loader_rx,
            bus,
            output,
        }
    }

    fn run(self) {
        info!("Audio engine worker started");

        loop {
            select! {
                recv(self.command_rx) -> msg => match msg {
                    Ok(EngineCommand::Shutdown) => {
                        info!("Audio engine shutting down");
                        break;
                    }
                    Ok(cmd) => self.handle_command(cmd),
                    Err(_) => {
                        debug!("Command channel closed, shutting down");
                        break;
                    }
                },
                recv(self.loader_rx) -> msg => {
                    if let Ok(result) = msg {
                        self.handle_load_result(result);
                    }
                },
                default(Duration::from_millis(50)) => {}
            }
        }
    }

    fn handle_command(&self, command: EngineCommand) {
        match command {
            EngineCommand::Load {
                channel,
                definition,
            } => self.load(channel, &definition),
            EngineCommand::Stop(channel) => {
                self.bus.lock().detach(channel);
                self.emit(EngineEvent::ChannelStopped(channel));
            }
            EngineCommand::SetVolume(channel, db) => {
                self.bus.lock().set_volume_db(channel, db);
            }
            EngineCommand::SetMute(channel, muted) => {
                self.bus.lock().set_muted(channel, muted);
            }
            EngineCommand::Remove(channel) => {
                self.bus.lock().clear(channel);
                self.emit(EngineEvent::ChannelCleared(channel));
            }
            EngineCommand::Resume => {
                if let Err(e) = self.output.resume() {
                    warn!("Failed to resume output stream: {e}");
                    self.emit(EngineEvent::EngineError(e.to_string()));
                }
            }
            EngineCommand::Suspend => {
                if let Err(e) = self.output.pause() {
                    warn!("Failed to pause output stream: {e}");
                }
            }
            EngineCommand::Shutdown => {
                // Handled in the main loop
            }
        }
    }

    fn load(&self, channel: ChannelId, definition: &SoundDefinition) {
        let sample_rate = self.output.sample_rate();
        let token = self.bus.lock().begin_load(channel);

        match definition {
            SoundDefinition::Sample { path } => {
                debug!("{channel}: loading '{path}'");
                self.emit(EngineEvent::ChannelLoading(channel));
                self.spawn_loader(channel, token, path.clone(), sample_rate);
            }
            synth => match Source::synth(synth, sample_rate) {
                Ok(source) => {
                    if self.bus.lock().attach_if_current(channel, token, source) {
                        debug!("{channel}: started {synth}");
                        self.emit(EngineEvent::ChannelStarted(channel));
                    }
                }
                Err(e) => {
                    error!("{channel}: source creation failed: {e}");
                    self.emit(EngineEvent::ChannelError {
                        channel,
                        message: e.to_string(),
                    });
                }
            },
        }
    }

    fn spawn_loader(&self, channel: ChannelId, token: u64, path: String, sample_rate: u32) {
        let loader_tx = self.loader_tx.clone();
        let spawned = std::thread::Builder::new()
            .name("lull-loader".to_string())
            .spawn(move || {
                let result = decode_file(&path, sample_rate)
                    .map(|clip| SamplePlayer::new(clip, true));
                let _ = loader_tx.send(LoadResult {
                    channel,
                    token,
                    path,
                    result,
                });
            });

        if let Err(e) = spawned {
            error!("{channel}: failed to spawn loader thread: {e}");
            self.emit(EngineEvent::ChannelError {
                channel,
                message: format!("Failed to start load: {e}"),
            });
        }
    }

    fn handle_load_result(&self, load: LoadResult) {
        let LoadResult {
            channel,
            token,
            path,
            result,
        } = load;

        let mut bus = self.bus.lock();
        if bus.slot(channel).generation() != token {
            // Superseded by a stop/remove/newer load while decoding; not an
            // error, the result is simply discarded.
            debug!("{channel}: load of '{path}' superseded, discarding");
            return;
        }

        match result {
            Ok(player) => {
                debug!(
                    "{channel}: '{path}' ready, {:.2}s loop",
                    player.duration_secs()
                );
                if bus.attach_if_current(channel, token, Source::Sample(player)) {
                    drop(bus);
                    self.emit(EngineEvent::ChannelStarted(channel));
                }
            }
            Err(e) => {
                drop(bus);
                error!("{channel}: {e}");
                self.emit(EngineEvent::ChannelError {
                    channel,
                    message: e.to_string(),
                });
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
