//! Looping playback of a decoded audio buffer.

#![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

use std::sync::Arc;

use lull_core::{Error, Result};

/// A fully decoded audio clip, interleaved stereo at the output sample rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Arc<Vec<f32>>,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

impl DecodedAudio {
    /// Wrap an interleaved stereo buffer, validating it is playable.
    ///
    /// An empty buffer or a zero/non-finite duration means the decode never
    /// actually produced audio; such clips are rejected here rather than
    /// attached to a slot.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::Internal("decoded clip has zero sample rate".into()));
        }
        let frames = samples.len() / 2;
        let duration_secs = frames as f64 / f64::from(sample_rate);
        if frames == 0 || !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(Error::Internal(format!(
                "decoded clip unplayable: {frames} frames, {duration_secs} s"
            )));
        }
        Ok(Self {
            samples: Arc::new(samples),
            sample_rate,
            duration_secs,
        })
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }
}

/// Plays a [`DecodedAudio`] clip, optionally looping at the buffer end.
pub struct SamplePlayer {
    clip: DecodedAudio,
    position: usize,
    looping: bool,
    finished: bool,
}

impl SamplePlayer {
    pub const fn new(clip: DecodedAudio, looping: bool) -> Self {
        Self {
            clip,
            position: 0,
            looping,
            finished: false,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.clip.duration_secs
    }

    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Render the next stereo frame, wrapping at the clip end when looping.
    pub fn next_frame(&mut self) -> [f32; 2] {
        if self.finished {
            return [0.0, 0.0];
        }
        let base = self.position * 2;
        let frame = [self.clip.samples[base], self.clip.samples[base + 1]];
        self.position += 1;
        if self.position >= self.clip.frames() {
            if self.looping {
                self.position = 0;
            } else {
                self.finished = true;
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(frames: usize) -> DecodedAudio {
        let mut samples = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let v = i as f32;
            samples.push(v);
            samples.push(-v);
        }
        DecodedAudio::new(samples, 48000).unwrap()
    }

    #[test]
    fn test_rejects_empty_clip() {
        assert!(DecodedAudio::new(Vec::new(), 48000).is_err());
    }

    #[test]
    fn test_rejects_zero_rate() {
        assert!(DecodedAudio::new(vec![0.0; 4], 0).is_err());
    }

    #[test]
    fn test_duration_reported() {
        let clip = clip(48000);
        assert!((clip.duration_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_looping_wraps_to_start() {
        let mut player = SamplePlayer::new(clip(3), true);
        assert_eq!(player.next_frame(), [0.0, 0.0]);
        assert_eq!(player.next_frame(), [1.0, -1.0]);
        assert_eq!(player.next_frame(), [2.0, -2.0]);
        // Wrapped around
        assert_eq!(player.next_frame(), [0.0, 0.0]);
        assert!(!player.is_finished());
    }

    #[test]
    fn test_one_shot_finishes_with_silence() {
        let mut player = SamplePlayer::new(clip(2), false);
        player.next_frame();
        player.next_frame();
        assert!(player.is_finished());
        assert_eq!(player.next_frame(), [0.0, 0.0]);
    }
}
