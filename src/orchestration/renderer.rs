// Copyright (c) 2024 Mike Tsao

use super::{SfxKind, VideoCue};
use crate::{
    composition::Sequencer,
    cores::{DrumKit, SoundEffects, SynthVoices},
    prelude::*,
};
use delegate::delegate;

/// Turns a [VideoCue] into a finished mono soundtrack: the style's music with
/// every sound effect mixed in on top.
#[derive(Debug, Default)]
pub struct Renderer {
    seed: Option<u64>,
    voices: SynthVoices,

    c: Configurables,
}
impl Configurable for Renderer {
    delegate! {
        to self.c {
            fn sample_rate(&self) -> SampleRate;
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.c.update_sample_rate(sample_rate);
        self.voices.update_sample_rate(sample_rate);
    }
}
impl Renderer {
    /// With a seed, every video renders identically from run to run, no matter
    /// which other videos are rendered alongside it. Without one, the noise
    /// is different every time.
    pub fn new_with(sample_rate: SampleRate, seed: Option<u64>) -> Self {
        Self {
            seed,
            voices: SynthVoices::new_with(sample_rate),
            c: Configurables::new_with(sample_rate),
        }
    }

    #[allow(missing_docs)]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Renders the video's soundtrack. `duration_override` replaces the cue's
    /// own duration, e.g. when the real video turned out a little longer.
    pub fn render(&mut self, cue: &VideoCue, duration_override: Option<Seconds>) -> Signal {
        let sample_rate = self.sample_rate();
        let duration = duration_override.unwrap_or(cue.duration);
        let tempo = cue.effective_tempo();
        log::debug!(
            "rendering {}: {} {} at {tempo} for {duration}",
            cue.name,
            cue.style,
            sample_rate
        );

        let mut rng = self.rng_for(&cue.name);
        let mut kit = DrumKit::new_with(sample_rate, Rng::new_with_seed(rng.rand_u64() as u128));
        let mut effects =
            SoundEffects::new_with(sample_rate, Rng::new_with_seed(rng.rand_u64() as u128));

        let sequencer = Sequencer::new_with(sample_rate, tempo, duration);
        let mut mix = cue.style.render(&sequencer, &mut kit, &self.voices);

        for sfx in cue.sfx.iter() {
            if sfx.at.0 < 0.0 || sfx.at.0 >= duration.0 {
                log::warn!(
                    "{}: skipping {:?} at {}, outside the {duration} track",
                    cue.name,
                    sfx.effect,
                    sfx.at
                );
                continue;
            }
            mix.place(&Self::render_sfx(&mut effects, &sfx.effect), sfx.at);
        }
        mix.clip();
        mix
    }

    /// Renders one sound effect at its standard length.
    pub fn render_sfx(effects: &mut SoundEffects, effect: &SfxKind) -> Signal {
        match effect {
            SfxKind::Impact => effects.impact(SoundEffects::IMPACT_DURATION),
            SfxKind::Whoosh { direction } => {
                effects.whoosh(SoundEffects::WHOOSH_DURATION, *direction)
            }
            SfxKind::Rise { duration } => effects.rise(*duration),
            SfxKind::Ding => effects.ding(SoundEffects::DING_DURATION),
            SfxKind::Boing => effects.boing(SoundEffects::BOING_DURATION),
            SfxKind::RecordScratch => {
                effects.record_scratch(SoundEffects::RECORD_SCRATCH_DURATION)
            }
        }
    }

    // A stream that depends only on the seed and the video's name.
    fn rng_for(&self, name: &str) -> Rng {
        match self.seed {
            Some(seed) => Rng::new_with_seed(((seed as u128) << 64) | Self::name_hash(name) as u128),
            None => Rng::default(),
        }
    }

    // FNV-1a. Stable across platforms and releases, unlike std's hashers.
    fn name_hash(name: &str) -> u64 {
        name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
        })
    }
}
