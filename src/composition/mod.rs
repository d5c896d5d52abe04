// Copyright (c) 2024 Mike Tsao

//! Beat-based arrangement of drums, bass, melody and pads into background
//! music.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{BgmStyle, NoteEvent, Sequencer, SequencerBuilder};
}

pub use sequencer::{
    BassStyle, ChordEvent, DrumStyle, NoteEvent, Sequencer, SequencerBuilder, SequencerBuilderError,
};
pub use styles::{Arrangement, BgmStyle};

mod sequencer;
mod styles;
