//! Audio output using cpal.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, SampleFormat, Stream, StreamConfig,
};
use lull_core::{Error, Result};
use tracing::{debug, error, info};

use crate::mixer::SharedMixBus;

/// Audio output stream configuration.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio output stream wrapper rendering from the shared mix bus.
pub struct AudioOutput {
    stream: Stream,
    config: OutputConfig,
    device_name: String,
}

impl AudioOutput {
    /// Query the default device's output configuration without opening a
    /// stream. The mix bus needs the sample rate before sources exist.
    pub fn probe_default_config() -> Result<OutputConfig> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("No output device found".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get output config: {e}")))?;
        Ok(OutputConfig {
            sample_rate: supported.sample_rate().0,
            channels: supported.channels(),
        })
    }

    /// Create a new audio output with the default device.
    pub fn new(bus: SharedMixBus) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("No output device found".to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("Using audio output device: {device_name}");

        Self::with_device(device, bus)
    }

    /// Create a new audio output with a specific device.
    pub fn with_device(device: Device, bus: SharedMixBus) -> Result<Self> {
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get output config: {e}")))?;

        debug!("Supported output config: {:?}", supported_config);

        let sample_format = supported_config.sample_format();
        let config: StreamConfig = supported_config.into();

        let output_config = OutputConfig {
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        };

        debug!(
            "Output config: {}Hz, {} channels",
            output_config.sample_rate, output_config.channels
        );

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, bus)?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, bus)?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, bus)?,
            _ => {
                return Err(Error::AudioOutput(format!(
                    "Unsupported sample format: {sample_format:?}"
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {e}")))?;

        Ok(Self {
            stream,
            config: output_config,
            device_name,
        })
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &Device,
        config: &StreamConfig,
        bus: SharedMixBus,
    ) -> Result<Stream> {
        let channels = usize::from(config.channels);

        let err_fn = |err| {
            error!("Audio stream error: {err}");
        };

        let mut render_buffer: Vec<f32> = Vec::new();

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    render_buffer.resize(data.len(), 0.0);
                    bus.lock().render(&mut render_buffer, channels);

                    // Soft clipping using tanh for smooth limiting when
                    // several channels sum above full scale.
                    for (out, &sample) in data.iter_mut().zip(&render_buffer) {
                        let limited = if sample.abs() > 0.9 {
                            sample.tanh()
                        } else {
                            sample
                        };
                        *out = T::from_sample(limited);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {e}")))?;

        Ok(stream)
    }

    /// Ensure the stream is running. Idempotent; this is the "confirm the
    /// context is running" step before any source starts.
    pub fn resume(&self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to resume stream: {e}")))
    }

    /// Pause the stream (background/suspend).
    pub fn pause(&self) -> Result<()> {
        self.stream
            .pause()
            .map_err(|e| Error::AudioOutput(format!("Failed to pause stream: {e}")))
    }

    /// Get the output configuration.
    pub const fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Get the device name.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Get the sample rate.
    pub const fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Get the number of channels.
    pub const fn channels(&self) -> u16 {
        self.config.channels
    }
}

/// List available output devices.
pub fn list_output_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();

    let devices: Vec<String> = host
        .output_devices()
        .map_err(|e| Error::AudioOutput(format!("Failed to list devices: {e}")))?
        .filter_map(|d| d.name().ok())
        .collect();

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices() {
        // This test may fail on CI without audio hardware
        let result = list_output_devices();
        // Just ensure it doesn't panic
        let _ = result;
    }
}
