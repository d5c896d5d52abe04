// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use core::f64::consts::PI;
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use kahan::KahanSum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Classic oscillator waveforms
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Waveform {
    /// Silence
    None,
    /// Sine wave
    #[default]
    Sine,
    /// Square wave. Zero exactly at the zero crossings of the matching sine.
    Square,
    /// Triangle wave
    Triangle,
    /// Sawtooth wave
    Sawtooth,
    /// Uniform white noise
    Noise,
}

/// A signal generator that produces traditional waveforms (sine, square,
/// triangle, etc.)
#[derive(Clone, Builder, Debug, Default, Serialize, Deserialize)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct Oscillator {
    /// The fundamental waveform for this oscillator.
    pub waveform: Waveform,

    /// Hertz. Any positive number. 440 = A4
    pub frequency: FrequencyHz,

    #[serde(skip)]
    #[builder(setter(skip))]
    e: OscillatorEphemerals,
}
#[derive(Clone, Debug, Derivative)]
#[derivative(Default)]
pub struct OscillatorEphemerals {
    /// working variables to generate semi-deterministic noise.
    #[derivative(Default(value = "0x70f4f854"))]
    noise_x1: u32,
    #[derivative(Default(value = "0xe1e9f0a7"))]
    noise_x2: u32,

    // The "cursor" in the current waveform, in cycles. Kahan summation keeps
    // FP error from accumulating over long renders.
    cycle_position: KahanSum<f64>,

    delta: f64,
    delta_updated: bool,

    // reset() is requested.
    #[derivative(Default(value = "true"))]
    reset_pending: bool,

    c: Configurables,
}
impl Generates for Oscillator {
    fn generate(&mut self, values: &mut [Sample]) -> bool {
        for value in values.iter_mut() {
            let cycle_position = self.next_cycle_position();
            *value = Sample(self.amplitude_for_position(self.waveform, cycle_position));
        }
        !matches!(self.waveform, Waveform::None)
    }
}
impl Configurable for Oscillator {
    delegate! {
        to self.e.c {
            fn sample_rate(&self) -> SampleRate;
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.e.c.update_sample_rate(sample_rate);
        self.e.delta_updated = false;
        self.reset();
    }

    fn reset(&mut self) {
        self.e.reset_pending = true;
    }
}
impl Oscillator {
    /// Creates an oscillator that's ready to render at the given rate.
    pub fn new_with(waveform: Waveform, frequency: FrequencyHz, sample_rate: SampleRate) -> Self {
        let mut r = Self {
            waveform,
            frequency,
            ..Default::default()
        };
        r.update_sample_rate(sample_rate);
        r
    }

    /// Renders the waveform `sin(2π·f·t)`-style from phase zero for
    /// `duration`, rounded down to whole frames.
    pub fn render(
        waveform: Waveform,
        frequency: FrequencyHz,
        sample_rate: SampleRate,
        duration: Seconds,
    ) -> Signal {
        let mut oscillator = Self::new_with(waveform, frequency, sample_rate);
        let mut signal = Signal::with_duration(sample_rate, duration);
        oscillator.generate(signal.samples_mut());
        signal
    }

    /// Renders a sine whose frequency is given per frame. The phase at frame
    /// i is the sum of the increments of frames 0 through i.
    pub fn sweep(sample_rate: SampleRate, frequencies: &[FrequencyHz]) -> Signal {
        let rate = sample_rate.0 as f64;
        let mut cycle_position = KahanSum::new_with_value(0.0);
        let samples = frequencies
            .iter()
            .map(|frequency| {
                cycle_position += frequency.0 / rate;
                let position = cycle_position.sum();
                if !(0.0..1.0).contains(&position) {
                    cycle_position = KahanSum::new_with_value(position - position.floor());
                }
                Sample((position * 2.0 * PI).sin())
            })
            .collect();
        Signal::from_samples(sample_rate, samples)
    }

    /// The current frequency of the oscillator.
    pub fn set_frequency(&mut self, frequency: FrequencyHz) {
        self.frequency = frequency;
        self.e.delta_updated = false;
    }

    #[allow(missing_docs)]
    pub fn frequency(&self) -> FrequencyHz {
        self.frequency
    }

    #[allow(missing_docs)]
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    #[allow(missing_docs)]
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    fn update_delta(&mut self) {
        if !self.e.delta_updated {
            self.e.delta = self.frequency.0 / self.e.c.sample_rate().0 as f64;

            // This resets the accumulated error.
            self.e.cycle_position = KahanSum::new_with_value(self.e.cycle_position.sum());

            self.e.delta_updated = true;
        }
    }

    fn next_cycle_position(&mut self) -> f64 {
        self.update_delta();
        if self.e.reset_pending {
            self.e.reset_pending = false;
            self.e.cycle_position = KahanSum::new_with_value(0.0);
            return 0.0;
        }

        self.e.cycle_position += self.e.delta;
        let position = self.e.cycle_position.sum();
        if position >= 1.0 {
            self.e.cycle_position += -position.floor();
        }
        self.e.cycle_position.sum()
    }

    // https://en.wikipedia.org/wiki/Sine_wave
    // https://en.wikipedia.org/wiki/Square_wave
    // https://en.wikipedia.org/wiki/Triangle_wave
    // https://en.wikipedia.org/wiki/Sawtooth_wave
    // https://www.musicdsp.org/en/latest/Synthesis/216-fast-whitenoise-generator.html
    //
    // Every waveform starts at amplitude zero, which makes it a lot easier to
    // avoid transients when a note starts.
    fn amplitude_for_position(&mut self, waveform: Waveform, cycle_position: f64) -> f64 {
        match waveform {
            Waveform::None => 0.0,
            Waveform::Sine => (cycle_position * 2.0 * PI).sin(),
            Waveform::Square => {
                let sine = (cycle_position * 2.0 * PI).sin();
                if sine == 0.0 {
                    0.0
                } else {
                    sine.signum()
                }
            }
            Waveform::Triangle => {
                4.0 * (cycle_position - (0.75 + cycle_position).floor() + 0.25).abs() - 1.0
            }
            Waveform::Sawtooth => 2.0 * (cycle_position - (0.5 + cycle_position).floor()),
            Waveform::Noise => {
                self.e.noise_x1 ^= self.e.noise_x2;
                let tmp =
                    2.0 * (self.e.noise_x2 as f64 - (u32::MAX as f64 / 2.0)) / u32::MAX as f64;
                (self.e.noise_x2, _) = self.e.noise_x2.overflowing_add(self.e.noise_x1);
                tmp
            }
        }
    }
}

/// Evenly spaced values from `start` to `end`, both included. A single value
/// is just `start`.
pub fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| {
        if count > 1 && i == count - 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

/// A gain curve that behaves like a typical ADSR envelope, stretched over a
/// note of known length. The release always ends on the note's last frame.
#[derive(Clone, Builder, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct Envelope {
    /// Time to ramp from zero to full level.
    #[derivative(Default(value = "Seconds(0.005)"))]
    attack: Seconds,
    /// Time to fall from full level to the sustain level.
    #[derivative(Default(value = "Seconds(0.1)"))]
    decay: Seconds,
    /// Level held between decay and release.
    #[derivative(Default(value = "Normal::new_const(0.3)"))]
    sustain: Normal,
    /// Time to fall from the sustain level to zero at the end of the note.
    #[derivative(Default(value = "Seconds(0.1)"))]
    release: Seconds,
}
impl Envelope {
    #[allow(missing_docs)]
    pub const fn new_with(attack: Seconds, decay: Seconds, sustain: Normal, release: Seconds) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Computes the gain for each of `frames` frames.
    ///
    /// The curve starts at 1.0 everywhere. The attack ramp covers the first
    /// frames; the decay ramp follows only if it ends before the buffer does;
    /// the sustain level fills whatever lies between decay and release; and
    /// the release ramp overwrites the tail.
    pub fn shape(&self, sample_rate: SampleRate, frames: usize) -> Vec<f64> {
        let n = frames;
        let a = sample_rate.frames_in(self.attack);
        let d = sample_rate.frames_in(self.decay);
        let r = sample_rate.frames_in(self.release);
        let s = self.sustain.0;

        let mut env = vec![1.0; n];
        env.iter_mut()
            .zip(linspace(0.0, 1.0, a))
            .for_each(|(e, v)| *e = v);
        if d > 0 && a + d < n {
            env[a..a + d]
                .iter_mut()
                .zip(linspace(1.0, s, d))
                .for_each(|(e, v)| *e = v);
        }
        if r <= n && a + d < n - r {
            env[a + d..n - r].fill(s);
        }
        if r > 0 {
            let tail = r.min(n);
            env[n - tail..]
                .iter_mut()
                .zip(linspace(s, 0.0, r).skip(r - tail))
                .for_each(|(e, v)| *e = v);
        }
        env
    }

    /// Multiplies the signal by this envelope's shape.
    pub fn apply(&self, signal: &mut Signal) {
        let shape = self.shape(signal.sample_rate(), signal.len());
        signal
            .samples_mut()
            .iter_mut()
            .zip(shape)
            .for_each(|(s, g)| *s *= g);
    }

    #[allow(missing_docs)]
    pub fn attack(&self) -> Seconds {
        self.attack
    }

    #[allow(missing_docs)]
    pub fn decay(&self) -> Seconds {
        self.decay
    }

    #[allow(missing_docs)]
    pub fn sustain(&self) -> Normal {
        self.sustain
    }

    #[allow(missing_docs)]
    pub fn release(&self) -> Seconds {
        self.release
    }
}
