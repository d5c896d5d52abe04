// Copyright (c) 2024 Mike Tsao

//! Instruments render finished hits and notes as [Signal](crate::elements::Signal)s.

pub use {
    drums::DrumKit,
    sfx::{SoundEffects, WhooshDirection},
    voices::SynthVoices,
};

mod drums;
mod sfx;
mod voices;
