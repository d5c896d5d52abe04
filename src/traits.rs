// Copyright (c) 2024 Mike Tsao

//! The traits that define many characteristics and relationships among parts of
//! the system.

use crate::types::prelude::*;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{Configurable, Configurables, Generates, TransformsAudio};
}

/// A convenience struct for the fields implied by [Configurable]. Note that
/// this struct is not serde-compliant, because these fields typically aren't
/// meant to be serialized.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Configurables {
    sample_rate: SampleRate,
    tempo: Tempo,
}
impl Configurables {
    /// Creates a set with the given sample rate and the default tempo.
    pub fn new_with(sample_rate: SampleRate) -> Self {
        Self {
            sample_rate,
            ..Default::default()
        }
    }
}
impl Configurable for Configurables {
    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate
    }

    fn tempo(&self) -> Tempo {
        self.tempo
    }

    fn update_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo
    }
}

/// Something that is [Configurable] is interested in staying in sync with
/// global configuration.
pub trait Configurable {
    /// Returns this item's sample rate.
    fn sample_rate(&self) -> SampleRate;

    /// The sample rate changed.
    #[allow(unused_variables)]
    fn update_sample_rate(&mut self, sample_rate: SampleRate) {}

    /// Returns this item's [Tempo].
    fn tempo(&self) -> Tempo {
        Tempo::default()
    }

    /// Tempo (beats per minute) changed.
    #[allow(unused_variables)]
    fn update_tempo(&mut self, tempo: Tempo) {}

    /// Sent to indicate that it's time to reset internal state. Oscillators
    /// should reset phase, filters should forget their history, etc.
    fn reset(&mut self) {}
}

/// Something that [Generates] creates the given type as its work product
/// over time. Examples are envelopes, which produce a gain curve, and
/// oscillators, which produce an audio signal.
pub trait Generates: core::fmt::Debug + Configurable {
    /// Fills a batch of values with new signal. Returns true if any of the
    /// generated signal was non-silent.
    fn generate(&mut self, values: &mut [Sample]) -> bool {
        values.fill(Sample::default());
        false
    }
}

/// A [TransformsAudio] takes input audio, which is typically produced by
/// [Generates], does something to it, and then outputs it. It's what effects
/// do.
pub trait TransformsAudio: core::fmt::Debug {
    /// Transforms a buffer of audio in place.
    fn transform(&mut self, samples: &mut [Sample]) {
        for sample in samples {
            *sample = self.transform_sample(*sample);
        }
    }

    /// Transforms a single sample. Default implementation is passthrough.
    fn transform_sample(&mut self, input_sample: Sample) -> Sample {
        input_sample
    }
}
