// Copyright (c) 2024 Mike Tsao

//! Building blocks for other parts of the system, especially musical
//! instruments and effects.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Envelope, EnvelopeBuilder, Oscillator, OscillatorBuilder, Signal, Waveform,
    };
}

pub use generators::{linspace, Envelope, EnvelopeBuilder, Oscillator, OscillatorBuilder, Waveform};
pub use signal::Signal;

mod generators;
mod signal;
