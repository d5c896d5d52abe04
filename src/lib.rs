// Copyright (c) 2024 Mike Tsao

#![warn(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Reelsynth scores short vertical videos with procedurally synthesized
//! background music and sound effects.
//!
//! There are several ways to use it, depending on the level of control you
//! need.
//!
//! * *Easiest, but least control*: Describe each video with a [VideoCue] (or
//! use [CueSheet::builtin()]), render it with a [Renderer], and write it out
//! with a [WavExporter].
//! * *More control over the music*: Use a [Sequencer] with a
//! [BgmStyle](composition::BgmStyle), or place your own
//! [NoteEvent](composition::NoteEvent)s.
//! * *Maximum control, fewest batteries included*: Use the instruments and
//! effects in [cores] and the [Signal](elements::Signal) buffer directly.

/// A collection of imports that are useful to users of this crate. `use
/// reelsynth::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        composition::prelude::*, elements::prelude::*, orchestration::prelude::*,
        traits::prelude::*, types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use version::app_version;
pub use {
    composition::Sequencer,
    orchestration::{CueSheet, Renderer, VideoCue, WavExporter},
};

pub mod composition;
pub mod cores;
pub mod elements;
pub mod motion;
pub mod orchestration;
pub mod traits;
pub mod types;
pub mod util;

mod version;
