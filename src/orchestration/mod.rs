// Copyright (c) 2024 Mike Tsao

//! Scoring whole videos: the cue sheet that describes them, the renderer
//! that mixes their soundtracks, and the exporter that writes them out.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{CueSheet, Renderer, SfxCue, SfxKind, VideoCue, WavExporter};
}

pub use {
    cue_sheet::{CueSheet, CueSheetError, SfxCue, SfxKind, VideoCue, VideoCueBuilder},
    export::WavExporter,
    renderer::Renderer,
};

mod cue_sheet;
mod export;
mod renderer;
