//! The mix bus: four independent playback slots over one output.
//!
//! Each slot owns at most one live [`Source`] and its own gain stage; slots
//! share nothing but the destination buffer they render into. Live handles
//! stay in here, outside any UI state snapshot — the UI only ever holds
//! plain values and addresses slots through the engine by [`ChannelId`].
//!
//! Every slot carries a generation counter, bumped on attach, detach, and
//! clear. An asynchronous load captures the generation when it starts and
//! may only attach its result if the counter is unchanged, so a stop,
//! remove, or replacement that lands mid-decode silently supersedes the
//! stale result.

use std::sync::Arc;

use lull_core::{clamp_volume_db, ChannelId, DEFAULT_VOLUME_DB, MIXER_CHANNELS};
use parking_lot::Mutex;
use tracing::debug;

use crate::level::{db_to_linear, gain_smoothing_coeff};
use crate::sources::Source;

/// The mix bus shared between the engine worker and the output callback.
pub type SharedMixBus = Arc<Mutex<MixBus>>;

/// Create a shared mix bus for the given output sample rate.
pub fn shared_mix_bus(sample_rate: u32) -> SharedMixBus {
    Arc::new(Mutex::new(MixBus::new(sample_rate)))
}

/// One playback slot: a source handle plus its gain stage.
pub struct ChannelSlot {
    source: Option<Source>,
    volume_db: f32,
    muted: bool,
    /// Smoothed gain actually applied, ramped toward the target per frame.
    gain: f32,
    generation: u64,
}

impl ChannelSlot {
    fn new() -> Self {
        Self {
            source: None,
            volume_db: DEFAULT_VOLUME_DB,
            muted: false,
            gain: 0.0,
            generation: 0,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub const fn volume_db(&self) -> f32 {
        self.volume_db
    }

    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    fn target_gain(&self) -> f32 {
        if self.muted || self.source.is_none() {
            0.0
        } else {
            db_to_linear(self.volume_db)
        }
    }
}

/// Fixed array of independent slots rendering additively into one buffer.
pub struct MixBus {
    slots: [ChannelSlot; MIXER_CHANNELS],
    sample_rate: u32,
    smoothing: f32,
}

impl MixBus {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            slots: std::array::from_fn(|_| ChannelSlot::new()),
            sample_rate,
            smoothing: gain_smoothing_coeff(sample_rate),
        }
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn slot(&self, channel: ChannelId) -> &ChannelSlot {
        &self.slots[channel.index()]
    }

    /// Begin (re)loading a slot: tear down any current source and return the
    /// generation token the pending load must present to attach.
    pub fn begin_load(&mut self, channel: ChannelId) -> u64 {
        let slot = &mut self.slots[channel.index()];
        if let Some(old) = slot.source.take() {
            debug!("{channel}: disposed {} source before load", old.kind());
        }
        slot.generation += 1;
        slot.generation
    }

    /// Attach a source if the slot's generation still matches `token`.
    ///
    /// Returns false (and drops the source) when the load was superseded by
    /// a stop, remove, or newer load.
    pub fn attach_if_current(&mut self, channel: ChannelId, token: u64, source: Source) -> bool {
        let slot = &mut self.slots[channel.index()];
        if slot.generation != token {
            debug!(
                "{channel}: dropping stale {} source (token {token}, current {})",
                source.kind(),
                slot.generation
            );
            return false;
        }
        slot.source = Some(source);
        true
    }

    /// Stop and release whatever source is attached. Idempotent.
    pub fn detach(&mut self, channel: ChannelId) -> bool {
        let slot = &mut self.slots[channel.index()];
        slot.generation += 1;
        match slot.source.take() {
            Some(old) => {
                debug!("{channel}: stopped {} source", old.kind());
                true
            }
            None => false,
        }
    }

    /// Clear a slot back to its empty state: detach plus fader reset.
    pub fn clear(&mut self, channel: ChannelId) {
        self.detach(channel);
        let slot = &mut self.slots[channel.index()];
        slot.volume_db = DEFAULT_VOLUME_DB;
        slot.muted = false;
    }

    /// Set the slot volume in decibels. Always un-mutes.
    pub fn set_volume_db(&mut self, channel: ChannelId, db: f32) {
        let slot = &mut self.slots[channel.index()];
        slot.volume_db = clamp_volume_db(db);
        slot.muted = false;
    }

    /// Mute or unmute. The fader level is untouched, so unmute restores the
    /// exact prior volume.
    pub fn set_muted(&mut self, channel: ChannelId, muted: bool) {
        self.slots[channel.index()].muted = muted;
    }

    /// Render additively into an interleaved output buffer.
    pub fn render(&mut self, output: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in output.chunks_exact_mut(channels) {
            let mut left = 0.0f32;
            let mut right = 0.0f32;
            for slot in &mut self.slots {
                let target = slot.target_gain();
                slot.gain += (target - slot.gain) * self.smoothing;
                if let Some(source) = &mut slot.source {
                    let [l, r] = source.next_frame();
                    left += l * slot.gain;
                    right += r * slot.gain;
                }
            }
            if channels == 1 {
                frame[0] = 0.5 * (left + right);
            } else {
                frame[0] = left;
                frame[1] = right;
                for sample in &mut frame[2..] {
                    *sample = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap for brevity
mod tests {
    use super::*;
    use lull_core::{NoiseColor, SoundDefinition, MIN_VOLUME_DB};

    const RATE: u32 = 48000;

    fn tone(frequency: f32) -> Source {
        Source::synth(&SoundDefinition::tone(frequency), RATE).unwrap()
    }

    fn channel(index: usize) -> ChannelId {
        ChannelId::new(index).unwrap()
    }

    fn load(bus: &mut MixBus, ch: ChannelId, source: Source) {
        let token = bus.begin_load(ch);
        assert!(bus.attach_if_current(ch, token, source));
    }

    #[test]
    fn test_load_then_stop() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);

        load(&mut bus, ch, tone(528.0));
        assert!(bus.slot(ch).is_active());

        assert!(bus.detach(ch));
        assert!(!bus.slot(ch).is_active());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);
        assert!(!bus.detach(ch));
        load(&mut bus, ch, tone(440.0));
        assert!(bus.detach(ch));
        assert!(!bus.detach(ch));
    }

    #[test]
    fn test_at_most_one_source_after_any_sequence() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(1);

        load(&mut bus, ch, tone(174.0));
        load(&mut bus, ch, tone(285.0));
        bus.detach(ch);
        load(&mut bus, ch, tone(396.0));
        bus.clear(ch);
        load(&mut bus, ch, tone(417.0));

        // The slot type makes >1 source impossible; what we can observe is
        // that the last load won and the slot renders.
        assert!(bus.slot(ch).is_active());
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);

        // A load begins, then a stop arrives before it finishes.
        let token = bus.begin_load(ch);
        bus.detach(ch);
        assert!(!bus.attach_if_current(ch, token, tone(528.0)));
        assert!(!bus.slot(ch).is_active());
    }

    #[test]
    fn test_newer_load_supersedes_older() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);

        let old_token = bus.begin_load(ch);
        let new_token = bus.begin_load(ch);
        assert!(!bus.attach_if_current(ch, old_token, tone(111.0)));
        assert!(bus.attach_if_current(ch, new_token, tone(222.0)));
        assert!(bus.slot(ch).is_active());
    }

    #[test]
    fn test_mute_remembers_volume() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(2);

        bus.set_volume_db(ch, -17.5);
        bus.set_muted(ch, true);
        assert!(bus.slot(ch).is_muted());
        bus.set_muted(ch, false);
        assert_eq!(bus.slot(ch).volume_db(), -17.5);
    }

    #[test]
    fn test_set_volume_unmutes() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(2);

        bus.set_muted(ch, true);
        bus.set_volume_db(ch, -5.0);
        assert!(!bus.slot(ch).is_muted());
        assert_eq!(bus.slot(ch).volume_db(), -5.0);
    }

    #[test]
    fn test_volume_clamped_to_range() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);
        bus.set_volume_db(ch, -99.0);
        assert_eq!(bus.slot(ch).volume_db(), MIN_VOLUME_DB);
        bus.set_volume_db(ch, 12.0);
        assert_eq!(bus.slot(ch).volume_db(), 0.0);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut bus = MixBus::new(RATE);
        let ch1 = channel(0);
        let ch2 = channel(1);

        load(&mut bus, ch1, tone(528.0));
        bus.set_volume_db(ch1, -3.0);
        let gen_before = bus.slot(ch1).generation();

        // Everything done to channel 2 leaves channel 1 untouched.
        load(
            &mut bus,
            ch2,
            Source::Noise(crate::sources::NoiseSource::new(NoiseColor::Pink, RATE)),
        );
        bus.set_volume_db(ch2, -30.0);
        bus.set_muted(ch2, true);
        bus.clear(ch2);

        assert!(bus.slot(ch1).is_active());
        assert_eq!(bus.slot(ch1).volume_db(), -3.0);
        assert_eq!(bus.slot(ch1).generation(), gen_before);
    }

    #[test]
    fn test_render_produces_signal_then_silence() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);
        load(&mut bus, ch, tone(528.0));
        bus.set_volume_db(ch, 0.0);

        let mut buffer = vec![0.0f32; 4096];
        // First block ramps the gain in; render two to get steady state.
        bus.render(&mut buffer, 2);
        bus.render(&mut buffer, 2);
        assert!(buffer.iter().any(|s| s.abs() > 0.1), "expected audible tone");

        bus.detach(ch);
        bus.render(&mut buffer, 2);
        bus.render(&mut buffer, 2);
        let peak = buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak < 0.01, "expected near-silence after stop, peak {peak}");
    }

    #[test]
    fn test_render_muted_slot_is_silent() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);
        load(&mut bus, ch, tone(528.0));
        bus.set_muted(ch, true);

        let mut buffer = vec![0.0f32; 4096];
        bus.render(&mut buffer, 2);
        bus.render(&mut buffer, 2);
        let peak = buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak < 0.01, "muted slot still audible, peak {peak}");
    }

    #[test]
    fn test_render_mono_output() {
        let mut bus = MixBus::new(RATE);
        let ch = channel(0);
        load(&mut bus, ch, tone(528.0));

        let mut buffer = vec![0.0f32; 512];
        bus.render(&mut buffer, 1);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
