//! Offline resampling of decoded clips to the device sample rate.

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use lull_core::{Error, Result};
use rubato::{FftFixedIn, Resampler as RubatoResampler};
use tracing::debug;

const CHUNK_SIZE: usize = 1024;

/// Resample a whole interleaved buffer from `input_rate` to `output_rate`.
///
/// Clips are decoded fully before playback starts, so this processes the
/// entire buffer in fixed chunks, padding the tail and trimming the padded
/// frames from the result.
pub fn resample_interleaved(
    input: &[f32],
    input_rate: u32,
    output_rate: u32,
    channels: usize,
) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }
    if channels == 0 || input.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        "Resampling {} frames: {}Hz -> {}Hz, {} channels",
        input.len() / channels,
        input_rate,
        output_rate,
        channels
    );

    let mut resampler = FftFixedIn::new(
        input_rate as usize,
        output_rate as usize,
        CHUNK_SIZE,
        2,
        channels,
    )
    .map_err(|e| Error::Internal(format!("Failed to create resampler: {e}")))?;

    // Deinterleave into per-channel buffers.
    let input_frames = input.len() / channels;
    let mut planes: Vec<Vec<f32>> = vec![Vec::with_capacity(input_frames); channels];
    for frame in input.chunks_exact(channels) {
        for (plane, &sample) in planes.iter_mut().zip(frame) {
            plane.push(sample);
        }
    }

    // Pad to a whole number of chunks; the padding resamples to a known
    // frame count which is trimmed below.
    let padded_frames = input_frames.div_ceil(CHUNK_SIZE) * CHUNK_SIZE;
    for plane in &mut planes {
        plane.resize(padded_frames, 0.0);
    }

    let mut output_planes: Vec<Vec<f32>> = vec![Vec::new(); channels];
    for start in (0..padded_frames).step_by(CHUNK_SIZE) {
        let chunk: Vec<&[f32]> = planes
            .iter()
            .map(|plane| &plane[start..start + CHUNK_SIZE])
            .collect();
        let resampled = resampler
            .process(&chunk, None)
            .map_err(|e| Error::Internal(format!("Resample failed: {e}")))?;
        for (out, plane) in output_planes.iter_mut().zip(&resampled) {
            out.extend_from_slice(plane);
        }
    }

    // Trim the resampled padding.
    let expected_frames =
        (input_frames as f64 * f64::from(output_rate) / f64::from(input_rate)) as usize;
    let produced = output_planes[0].len().min(expected_frames);

    let mut output = Vec::with_capacity(produced * channels);
    for frame in 0..produced {
        for plane in &output_planes {
            output.push(plane[frame]);
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_passthrough() {
        let input = vec![0.5f32; 2048];
        let output = resample_interleaved(&input, 48000, 48000, 2).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        let output = resample_interleaved(&[], 44100, 48000, 2).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_output_length_scales_with_ratio() {
        let input = vec![0.0f32; 44100 * 2]; // 1 second stereo
        let output = resample_interleaved(&input, 44100, 48000, 2).unwrap();
        let frames = output.len() / 2;
        let expected = 48000i64;
        // The FFT resampler carries some latency, so allow a coarse margin.
        assert!(
            (frames as i64 - expected).unsigned_abs() < 4096,
            "expected ~{expected} frames, got {frames}"
        );
    }

    #[test]
    fn test_output_interleave_preserved() {
        let output = resample_interleaved(&vec![0.25f32; 8192], 44100, 48000, 2).unwrap();
        assert_eq!(output.len() % 2, 0);
        assert!(output.iter().all(|s| s.is_finite()));
    }
}
