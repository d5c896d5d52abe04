// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        FrequencyHz, Normal, ParameterType, Ratio, Sample, SampleRate,
        SampleType, Seconds, StereoSample, Tempo,
    };
}

pub use {
    note::{chord, pitch},
    numbers::{FrequencyHz, ParameterType, Ratio, Sample, SampleType, StereoSample},
    ranges::{Normal, RangedF64},
    time::{SampleRate, Seconds, Tempo},
};

mod note;
mod numbers;
mod ranges;
mod time;
