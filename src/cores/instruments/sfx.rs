// Copyright (c) 2024 Mike Tsao

use super::DrumKit;
use crate::{cores::SweepFilter, prelude::*};
use delegate::delegate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Which way a whoosh's filter sweeps.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    IntoStaticStr,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WhooshDirection {
    /// Dark to bright.
    #[default]
    Up,
    /// Bright to dark.
    Down,
}

/// One-shot sound effects for punctuating edits.
#[derive(Debug, Default)]
pub struct SoundEffects {
    kit: DrumKit,
}
impl Configurable for SoundEffects {
    delegate! {
        to self.kit {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }
}
impl SoundEffects {
    #[allow(missing_docs)]
    pub const WHOOSH_DURATION: Seconds = Seconds(0.3);
    #[allow(missing_docs)]
    pub const IMPACT_DURATION: Seconds = Seconds(0.3);
    #[allow(missing_docs)]
    pub const RISE_DURATION: Seconds = Seconds(1.0);
    #[allow(missing_docs)]
    pub const DING_DURATION: Seconds = Seconds(0.5);
    #[allow(missing_docs)]
    pub const BOING_DURATION: Seconds = Seconds(0.3);
    #[allow(missing_docs)]
    pub const RECORD_SCRATCH_DURATION: Seconds = Seconds(0.2);

    const IMPACT_NOISE_DURATION: Seconds = Seconds(0.05);

    #[allow(missing_docs)]
    pub fn new_with(sample_rate: SampleRate, rng: Rng) -> Self {
        Self {
            kit: DrumKit::new_with(sample_rate, rng),
        }
    }

    // t / duration for every frame.
    fn ramp(&self, duration: Seconds) -> Signal {
        Signal::from_fn_with_duration(self.sample_rate(), duration, |t| t / duration.0)
    }

    /// Noise through a low-pass whose cutoff sweeps between 500 Hz and
    /// 8.5 kHz.
    pub fn whoosh(&mut self, duration: Seconds, direction: WhooshDirection) -> Signal {
        let mut s = self.kit.noise(duration);
        s.scale(0.5);
        SweepFilter::new_with(self.sample_rate()).process(&mut s, |t| {
            let progress = t.0 / duration.0;
            FrequencyHz(match direction {
                WhooshDirection::Up => 500.0 + 8000.0 * progress,
                WhooshDirection::Down => 8500.0 - 8000.0 * progress,
            })
        });
        s.exp_decay(3.0).scale(0.6);
        s
    }

    /// A kick with a crunchy burst of noise on top.
    pub fn impact(&mut self, duration: Seconds) -> Signal {
        let kick = self.kit.kick(duration);
        let mut crunch = self.kit.noise(Self::IMPACT_NOISE_DURATION);
        let mut crunch_envelope = self.kit.noise(Self::IMPACT_NOISE_DURATION);
        crunch_envelope.exp_decay(30.0);
        crunch.multiply_by(&crunch_envelope).scale(0.3);

        let mut s = Signal::with_duration(self.sample_rate(), duration);
        s.add(&kick).add(&crunch).scale(0.8);
        s
    }

    /// A rising chirp and hiss that both fade in.
    pub fn rise(&mut self, duration: Seconds) -> Signal {
        let ramp = self.ramp(duration);
        let mut s = Signal::chirp(self.sample_rate(), duration, |t| {
            200.0 + 3000.0 * (t / duration.0).powi(2)
        });
        s.multiply_by(&ramp).scale(0.3);

        let mut hiss = self.kit.noise(duration);
        hiss.multiply_by(&ramp)
            .scale(0.1)
            .high_pass(FrequencyHz(3000.0));
        s.add(&hiss);
        s
    }

    /// A bell-like major chord on A5.
    pub fn ding(&mut self, duration: Seconds) -> Signal {
        let sample_rate = self.sample_rate();
        let partial =
            |frequency| Oscillator::render(Waveform::Sine, FrequencyHz(frequency), sample_rate, duration);
        let mut s = partial(880.0);
        s.add_scaled(&partial(1320.0), 0.5)
            .add_scaled(&partial(1760.0), 0.25)
            .scale(1.0 / 3.0)
            .exp_decay(5.0)
            .scale(0.4);
        s
    }

    /// A cartoon spring: a pitch that wobbles around 300 Hz and settles.
    pub fn boing(&mut self, duration: Seconds) -> Signal {
        let mut s = Signal::chirp(self.sample_rate(), duration, |t| {
            300.0 + 500.0 * (t * 30.0).sin() * (-t * 8.0).exp()
        });
        s.exp_decay(10.0).scale(0.4);
        s
    }

    /// A falling chirp mixed with noise, like a record dragged to a stop.
    pub fn record_scratch(&mut self, duration: Seconds) -> Signal {
        let mut s = Signal::chirp(self.sample_rate(), duration, |t| {
            2000.0 - 1800.0 * (t / duration.0)
        });
        s.add_scaled(&self.kit.noise(duration), 0.5)
            .exp_decay(10.0)
            .scale(0.3);
        s
    }
}
