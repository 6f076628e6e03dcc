//! Audio file decoding using symphonia.
//!
//! Clips are short ambience loops, so the whole file is decoded up front:
//! playback may only start once the full buffer exists and reports a valid
//! duration, and looping over an owned buffer needs no further IO.

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use std::fs::File;
use std::path::Path;

use lull_core::{Error, Result};
use symphonia::core::{
    audio::{AudioBufferRef, Signal},
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    formats::FormatOptions,
    io::{MediaSourceStream, MediaSourceStreamOptions},
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::{debug, warn};

use crate::resample::resample_interleaved;
use crate::sources::sampler::DecodedAudio;

/// Decode an audio file into an interleaved stereo buffer at `target_rate`.
///
/// Every failure mode (missing file, unrecognized container, codec error,
/// empty or zero-duration result) maps to [`Error::AudioDecode`] carrying
/// the resource path, so callers can surface exactly what failed.
pub fn decode_file(path: &str, target_rate: u32) -> Result<DecodedAudio> {
    let file = File::open(path).map_err(|e| Error::decode(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };
    let metadata_opts = MetadataOptions::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| Error::decode(path, format!("failed to probe format: {e}")))?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::decode(path, "no audio tracks found"))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(48000);
    let channels = track.codec_params.channels.map_or(2, |c| c.count());

    debug!(
        "Decoding '{}': track={}, sample_rate={}, channels={}",
        path, track_id, sample_rate, channels
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::decode(path, format!("failed to create decoder: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break; // End of stream
            }
            Err(e) => {
                return Err(Error::decode(path, format!("failed to read packet: {e}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => samples.extend(audio_buffer_to_f32(&decoded)),
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                // Log and skip corrupt frames
                warn!("Decode error in '{path}' (skipping frame): {e}");
            }
            Err(e) => {
                return Err(Error::decode(path, format!("decode failed: {e}")));
            }
        }
    }

    if samples.is_empty() {
        return Err(Error::decode(path, "file decoded to zero samples"));
    }

    let stereo = fold_to_stereo(&samples, channels);
    let resampled = resample_interleaved(&stereo, sample_rate, target_rate, 2)
        .map_err(|e| Error::decode(path, e))?;

    DecodedAudio::new(resampled, target_rate).map_err(|e| Error::decode(path, e))
}

/// Fold an interleaved buffer with any channel count down to stereo.
fn fold_to_stereo(input: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => input.iter().flat_map(|&s| [s, s]).collect(),
        2 => input.to_vec(),
        n => {
            // Average the extra channels into left/right.
            let mut output = Vec::with_capacity(input.len() / n * 2);
            for frame in input.chunks_exact(n) {
                let half = n.div_ceil(2);
                let left: f32 = frame[..half].iter().sum::<f32>() / half as f32;
                let right: f32 = frame[half..].iter().sum::<f32>() / (n - half) as f32;
                output.push(left);
                output.push(right);
            }
            output
        }
    }
}

/// Convert an `AudioBuffer` to interleaved f32 samples.
fn audio_buffer_to_f32(buffer: &AudioBufferRef<'_>) -> Vec<f32> {
    match buffer {
        AudioBufferRef::F32(buf) => {
            let planes = buf.planes();
            interleave(planes.planes(), |s| s)
        }
        AudioBufferRef::F64(buf) => {
            let planes = buf.planes();
            interleave(planes.planes(), |s| s as f32)
        }
        AudioBufferRef::S32(buf) => {
            let planes = buf.planes();
            interleave(planes.planes(), |s| s as f32 / i32::MAX as f32)
        }
        AudioBufferRef::S16(buf) => {
            let planes = buf.planes();
            interleave(planes.planes(), |s| f32::from(s) / f32::from(i16::MAX))
        }
        AudioBufferRef::U8(buf) => {
            let planes = buf.planes();
            interleave(planes.planes(), |s| (f32::from(s) - 128.0) / 128.0)
        }
        _ => Vec::new(),
    }
}

fn interleave<T: Copy>(planes: &[&[T]], convert: impl Fn(T) -> f32) -> Vec<f32> {
    if planes.is_empty() {
        return Vec::new();
    }
    let frames = planes[0].len();
    let mut output = Vec::with_capacity(frames * planes.len());
    for frame in 0..frames {
        for plane in planes {
            output.push(convert(plane[frame]));
        }
    }
    output
}
