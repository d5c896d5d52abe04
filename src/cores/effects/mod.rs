// Copyright (c) 2024 Mike Tsao

//! Effects transform audio through the
//! [TransformsAudio](crate::traits::TransformsAudio) trait. Examples are
//! filters and [Distortion].

pub use {
    distortion::{Distortion, DistortionBuilder},
    filter::{
        BandPassFilter, BiQuadFilter, ButterworthFilter, ButterworthFilterBuilder, FilterKind,
        SweepFilter,
    },
};

mod distortion;
mod filter;
