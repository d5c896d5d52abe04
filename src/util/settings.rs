// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about rendering. Intended to
//! be serialized.

use crate::{
    orchestration::{Renderer, WavExporter},
    prelude::*,
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything about a render that isn't part of the cue sheet. Every field
/// is optional in the JSON form.
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct RenderSettings {
    sample_rate: SampleRate,

    /// Fixes the noise sources so renders repeat exactly.
    seed: Option<u64>,

    #[derivative(Default(value = "WavExporter::DEFAULT_STEREO_DELAY"))]
    stereo_delay: Seconds,

    #[derivative(Default(value = "WavExporter::DEFAULT_OUTPUT_LEVEL"))]
    output_level: f64,

    #[derivative(Default(value = "PathBuf::from(RenderSettings::DEFAULT_OUTPUT_DIR)"))]
    output_dir: PathBuf,

    /// Frame rate of the motion tracks.
    #[derivative(Default(value = "30.0"))]
    fps: f64,
}
impl RenderSettings {
    /// Where soundtracks go unless told otherwise.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "sns-videos";

    /// Parses and checks settings.
    pub fn load_from_json(json: &str) -> anyhow::Result<Self> {
        let settings = serde_json::from_str::<Self>(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        log::info!("Loading settings from {path:?}");
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::format_err!("Couldn't read {path:?}: {}", e))?;
        Self::load_from_json(&json)
            .map_err(|e| anyhow::format_err!("Couldn't parse {path:?}: {}", e))
    }

    /// Writes settings to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self)
            .map_err(|_| anyhow::format_err!("Unable to serialize settings JSON"))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::format_err!("Unable to create {path:?} parent directories: {}", e)
            })?;
        }
        std::fs::write(path, json)
            .map_err(|e| anyhow::format_err!("Unable to write {path:?}: {}", e))?;
        Ok(())
    }

    /// Rejects values that can't produce a sensible render.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sample_rate.0 == 0 {
            return Err(anyhow::anyhow!("sample rate must be positive"));
        }
        if !self.stereo_delay.0.is_finite() || self.stereo_delay.0 < 0.0 {
            return Err(anyhow::anyhow!(
                "stereo delay {} must be zero or more",
                self.stereo_delay.0
            ));
        }
        if !(self.output_level > 0.0 && self.output_level <= i16::MAX as f64) {
            return Err(anyhow::anyhow!(
                "output level {} must be in (0, {}]",
                self.output_level,
                i16::MAX
            ));
        }
        crate::motion::validate_fps(self.fps)
    }

    /// The soundtrack file for the named video.
    pub fn output_path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}_bgm.wav"))
    }

    #[allow(missing_docs)]
    pub fn renderer(&self) -> Renderer {
        Renderer::new_with(self.sample_rate, self.seed)
    }

    #[allow(missing_docs)]
    pub fn exporter(&self) -> WavExporter {
        WavExporter::new_with(self.stereo_delay, self.output_level)
    }

    #[allow(missing_docs)]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    #[allow(missing_docs)]
    pub fn set_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate;
    }

    #[allow(missing_docs)]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[allow(missing_docs)]
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    #[allow(missing_docs)]
    pub fn stereo_delay(&self) -> Seconds {
        self.stereo_delay
    }

    #[allow(missing_docs)]
    pub fn output_level(&self) -> f64 {
        self.output_level
    }

    #[allow(missing_docs)]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[allow(missing_docs)]
    pub fn set_output_dir(&mut self, output_dir: PathBuf) {
        self.output_dir = output_dir;
    }

    #[allow(missing_docs)]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[allow(missing_docs)]
    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = RenderSettings::default();
        assert_eq!(s.sample_rate(), SampleRate(44100));
        assert_eq!(s.seed(), None);
        assert_eq!(s.stereo_delay(), Seconds(0.0003));
        assert_eq!(s.output_level(), 30000.0);
        assert_eq!(s.output_dir(), Path::new("sns-videos"));
        assert_eq!(s.fps(), 30.0);
        assert!(s.validate().is_ok());
        assert_eq!(
            s.output_path_for("01_aruaru"),
            PathBuf::from("sns-videos/01_aruaru_bgm.wav")
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s = RenderSettings::load_from_json(r#"{ "seed": 7, "output-dir": "out" }"#).unwrap();
        assert_eq!(s.seed(), Some(7));
        assert_eq!(s.output_dir(), Path::new("out"));
        assert_eq!(s.sample_rate(), SampleRate::DEFAULT);
        assert_eq!(s.fps(), 30.0);

        assert!(RenderSettings::load_from_json(r#"{ "fps": 0 }"#).is_err());
        assert!(RenderSettings::load_from_json(r#"{ "fps": 1e12 }"#).is_err());
        assert!(RenderSettings::load_from_json(r#"{ "output-level": 40000 }"#).is_err());
        assert!(RenderSettings::load_from_json(r#"{ "sample-rate": 0 }"#).is_err());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut s = RenderSettings::default();
        s.set_seed(Some(99));
        s.set_fps(60.0);
        s.save(&path).unwrap();
        assert_eq!(RenderSettings::load(&path).unwrap(), s);
        assert!(RenderSettings::load(&dir.path().join("missing.json")).is_err());
    }
}
