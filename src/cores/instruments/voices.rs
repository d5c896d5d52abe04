// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use delegate::delegate;

/// Pitched instruments. Each call renders one note of the given length.
#[derive(Debug, Default)]
pub struct SynthVoices {
    c: Configurables,
}
impl Configurable for SynthVoices {
    delegate! {
        to self.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }
}
impl SynthVoices {
    const PAD_ENVELOPE: Envelope = Envelope::new_with(
        Seconds(0.1),
        Seconds(0.2),
        Normal::new_const(0.6),
        Seconds(0.2),
    );
    const LEAD_ENVELOPE: Envelope = Envelope::new_with(
        Seconds(0.01),
        Seconds(0.05),
        Normal::new_const(0.4),
        Seconds(0.05),
    );

    #[allow(missing_docs)]
    pub fn new_with(sample_rate: SampleRate) -> Self {
        Self {
            c: Configurables::new_with(sample_rate),
        }
    }

    fn wave(&self, waveform: Waveform, frequency: FrequencyHz, duration: Seconds) -> Signal {
        Oscillator::render(waveform, frequency, self.sample_rate(), duration)
    }

    /// A bright saw with an octave sine on top, plucked.
    pub fn pluck(&self, frequency: FrequencyHz, duration: Seconds) -> Signal {
        let mut s = self.wave(Waveform::Sawtooth, frequency, duration);
        s.scale(0.5).add_scaled(
            &self.wave(Waveform::Sine, frequency * 2.0, duration),
            0.3,
        );
        s.low_pass(FrequencyHz(3000.0)).exp_decay(6.0).scale(0.35);
        s
    }

    /// Three slightly detuned sines under a slow envelope.
    pub fn pad(&self, frequency: FrequencyHz, duration: Seconds) -> Signal {
        let mut s = self.wave(Waveform::Sine, frequency, duration);
        s.add(&self.wave(Waveform::Sine, frequency * 1.005, duration))
            .add(&self.wave(Waveform::Sine, frequency * 0.995, duration))
            .scale(1.0 / 3.0);
        Self::PAD_ENVELOPE.apply(&mut s);
        s.scale(0.2);
        s
    }

    /// Square plus sine, darkened and decaying.
    pub fn bass(&self, frequency: FrequencyHz, duration: Seconds) -> Signal {
        let mut s = self.wave(Waveform::Square, frequency, duration);
        s.scale(0.5)
            .add(&self.wave(Waveform::Sine, frequency, duration))
            .low_pass(FrequencyHz(800.0))
            .exp_decay(4.0)
            .scale(0.5);
        s
    }

    /// A soft sine bass that sustains longer than [SynthVoices::bass].
    pub fn smooth_bass(&self, frequency: FrequencyHz, duration: Seconds) -> Signal {
        let mut s = self.wave(Waveform::Sine, frequency, duration);
        s.scale(0.4).low_pass(FrequencyHz(500.0)).exp_decay(2.0);
        s
    }

    /// Saw and sine through a gentle low-pass, with a short envelope.
    pub fn lead(&self, frequency: FrequencyHz, duration: Seconds) -> Signal {
        let mut s = self.wave(Waveform::Sawtooth, frequency, duration);
        s.scale(0.25)
            .add_scaled(&self.wave(Waveform::Sine, frequency, duration), 0.5)
            .low_pass(FrequencyHz(5000.0));
        Self::LEAD_ENVELOPE.apply(&mut s);
        s.scale(0.3);
        s
    }
}
