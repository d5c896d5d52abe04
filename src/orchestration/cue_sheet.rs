// Copyright (c) 2024 Mike Tsao

use crate::{composition::BgmStyle, cores::WhooshDirection, prelude::*};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};
use thiserror::Error;

/// Problems with a [CueSheet] that callers may want to tell apart.
#[derive(Debug, Error, PartialEq)]
pub enum CueSheetError {
    #[allow(missing_docs)]
    #[error("no video named \"{0}\" in the cue sheet")]
    UnknownVideo(String),
    #[allow(missing_docs)]
    #[error("video \"{0}\" appears more than once")]
    DuplicateName(String),
    #[allow(missing_docs)]
    #[error("a video has an empty name")]
    EmptyName,
    #[allow(missing_docs)]
    #[error("video \"{name}\" has invalid duration {duration}")]
    InvalidDuration { name: String, duration: f64 },
    #[allow(missing_docs)]
    #[error("video \"{name}\" has invalid tempo {tempo}")]
    InvalidTempo { name: String, tempo: f64 },
    #[allow(missing_docs)]
    #[error("video \"{name}\" has a cue at invalid time {at}")]
    InvalidCueTime { name: String, at: f64 },
    #[allow(missing_docs)]
    #[error("video \"{name}\" has an effect at {at} with invalid length")]
    InvalidEffect { name: String, at: f64 },
}

/// A one-shot sound effect and whatever parameters it takes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SfxKind {
    #[allow(missing_docs)]
    Impact,
    #[allow(missing_docs)]
    Whoosh {
        #[serde(default)]
        direction: WhooshDirection,
    },
    #[allow(missing_docs)]
    Rise {
        #[serde(default = "SfxKind::default_rise_duration")]
        duration: Seconds,
    },
    #[allow(missing_docs)]
    Ding,
    #[allow(missing_docs)]
    Boing,
    #[allow(missing_docs)]
    RecordScratch,
}
impl SfxKind {
    fn default_rise_duration() -> Seconds {
        Seconds(1.0)
    }

    /// A whoosh that sweeps upward.
    pub fn whoosh() -> Self {
        Self::Whoosh {
            direction: WhooshDirection::Up,
        }
    }

    #[allow(missing_docs)]
    pub fn rise(duration: f64) -> Self {
        Self::Rise {
            duration: Seconds(duration),
        }
    }
}

/// A sound effect placed at a time within the video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SfxCue {
    /// Start time from the beginning of the video.
    pub at: Seconds,
    #[allow(missing_docs)]
    #[serde(flatten)]
    pub effect: SfxKind,
}
impl SfxCue {
    #[allow(missing_docs)]
    pub fn new_with(at: f64, effect: SfxKind) -> Self {
        Self {
            at: Seconds(at),
            effect,
        }
    }
}

/// Everything needed to score one video: its music, its sound effects, and
/// the times of its flash and shake frame effects.
#[derive(Clone, Debug, Builder, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[builder(setter(into))]
pub struct VideoCue {
    /// Also the stem of the output file name.
    pub name: String,
    #[allow(missing_docs)]
    pub duration: Seconds,
    #[allow(missing_docs)]
    #[builder(default)]
    #[serde(default)]
    pub style: BgmStyle,
    /// When absent, the style's own tempo is used.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<Tempo>,
    #[allow(missing_docs)]
    #[builder(default)]
    #[serde(default)]
    pub sfx: Vec<SfxCue>,
    /// Times at which the frame flashes white.
    #[builder(default)]
    #[serde(default)]
    pub flashes: Vec<Seconds>,
    /// Times at which the frame shakes.
    #[builder(default)]
    #[serde(default)]
    pub shakes: Vec<Seconds>,
    /// Peak shake displacement, in pixels.
    #[builder(default = "VideoCue::DEFAULT_SHAKE_POWER")]
    #[serde(default = "VideoCue::default_shake_power")]
    pub shake_power: f64,
}
impl VideoCue {
    #[allow(missing_docs)]
    pub const DEFAULT_SHAKE_POWER: f64 = 18.0;

    /// The longest video, or rise effect, we'll render.
    pub const MAX_DURATION: Seconds = Seconds(600.0);

    fn default_shake_power() -> f64 {
        Self::DEFAULT_SHAKE_POWER
    }

    /// The tempo the music actually plays at.
    pub fn effective_tempo(&self) -> Tempo {
        self.tempo.unwrap_or_else(|| self.style.default_tempo())
    }

    /// Whether `duration` is positive and no longer than [Self::MAX_DURATION].
    pub fn is_valid_duration(duration: Seconds) -> bool {
        duration.0.is_finite() && duration.0 > 0.0 && duration <= Self::MAX_DURATION
    }

    fn validate(&self) -> Result<(), CueSheetError> {
        let name = || self.name.clone();
        if self.name.trim().is_empty() {
            return Err(CueSheetError::EmptyName);
        }
        if !Self::is_valid_duration(self.duration) {
            return Err(CueSheetError::InvalidDuration {
                name: name(),
                duration: self.duration.0,
            });
        }
        if let Some(tempo) = self.tempo {
            if !tempo.is_valid() {
                return Err(CueSheetError::InvalidTempo {
                    name: name(),
                    tempo: tempo.0,
                });
            }
        }
        let times = self
            .sfx
            .iter()
            .map(|cue| cue.at)
            .chain(self.flashes.iter().copied())
            .chain(self.shakes.iter().copied());
        for at in times {
            if !at.0.is_finite() {
                return Err(CueSheetError::InvalidCueTime {
                    name: name(),
                    at: at.0,
                });
            }
        }
        for cue in self.sfx.iter() {
            if let SfxKind::Rise { duration } = cue.effect {
                if !Self::is_valid_duration(duration) {
                    return Err(CueSheetError::InvalidEffect {
                        name: name(),
                        at: cue.at.0,
                    });
                }
            }
        }
        if !self.shake_power.is_finite() {
            return Err(CueSheetError::InvalidEffect {
                name: name(),
                at: 0.0,
            });
        }
        Ok(())
    }
}

/// The list of videos to score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CueSheet {
    #[allow(missing_docs)]
    pub videos: Vec<VideoCue>,
}
impl CueSheet {
    /// Parses and validates a cue sheet.
    pub fn load_from_json(json: &str) -> anyhow::Result<Self> {
        let sheet = serde_json::from_str::<Self>(json)?;
        sheet.validate()?;
        Ok(sheet)
    }

    /// Reads, parses, and validates a cue sheet file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::format_err!("Couldn't read {path:?}: {}", e))?;
        Self::load_from_json(&json)
            .map_err(|e| anyhow::format_err!("Couldn't load {path:?}: {}", e))
    }

    #[allow(missing_docs)]
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every video, and that names are unique.
    pub fn validate(&self) -> Result<(), CueSheetError> {
        let mut names = HashSet::new();
        for video in self.videos.iter() {
            video.validate()?;
            if !names.insert(video.name.as_str()) {
                return Err(CueSheetError::DuplicateName(video.name.clone()));
            }
        }
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn find(&self, name: &str) -> Result<&VideoCue, CueSheetError> {
        self.videos
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| CueSheetError::UnknownVideo(name.to_string()))
    }

    /// The named videos in the order given, or every video if `names` is
    /// empty.
    pub fn select(&self, names: &[String]) -> Result<Vec<&VideoCue>, CueSheetError> {
        if names.is_empty() {
            return Ok(self.videos.iter().collect());
        }
        names.iter().map(|name| self.find(name)).collect()
    }

    /// The ten videos of the launch campaign.
    pub fn builtin() -> Self {
        use BgmStyle::*;
        use SfxKind::*;

        Self {
            videos: vec![
                video("01_aruaru", 15.0, Energetic, 128.0)
                    .sfx([
                        SfxCue::new_with(0.0, Impact),
                        SfxCue::new_with(1.3, SfxKind::whoosh()),
                    ])
                    .sfx(each(&[3.5, 5.7, 7.9, 10.1], Boing))
                    .sfx([SfxCue::new_with(12.3, Ding)])
                    .flashes(&[0.0, 1.3, 3.5, 5.7, 7.9, 10.1, 12.3])
                    .shakes(&[0.0, 1.3, 3.5, 5.7, 7.9, 10.1])
                    .into(),
                video("02_fish_quiz", 18.0, Dramatic, 115.0)
                    .sfx([SfxCue::new_with(0.0, Impact)])
                    .sfx(each(&[2.0, 5.0, 8.0, 11.0], SfxKind::rise(1.0)))
                    .sfx(each(&[2.7, 5.7, 8.7, 11.7], Ding))
                    .sfx([SfxCue::new_with(13.2, Impact)])
                    .flashes(&[0.0, 1.2, 4.2, 7.2, 10.2, 13.2])
                    .shakes(&[2.0, 5.0, 8.0, 11.0])
                    .into(),
                video("03_5000yen", 15.0, Hype, 135.0)
                    .sfx([
                        SfxCue::new_with(0.0, Impact),
                        SfxCue::new_with(1.0, SfxKind::whoosh()),
                    ])
                    .sfx(each(&[2.8, 4.6, 6.4, 8.2], Impact))
                    .sfx([SfxCue::new_with(10.0, Ding)])
                    .flashes(&[0.0, 1.0, 2.8, 4.6, 6.4, 8.2, 10.0, 12.0])
                    .shakes(&[1.0, 2.8, 4.6, 6.4, 8.2, 10.0])
                    .shake_power(22.0)
                    .into(),
                video("04_best_time", 18.0, Chill, 100.0)
                    .sfx([
                        SfxCue::new_with(0.0, Impact),
                        SfxCue::new_with(1.3, SfxKind::whoosh()),
                        SfxCue::new_with(5.3, Ding),
                    ])
                    .flashes(&[0.0, 1.3])
                    .shakes(&[0.0])
                    .into(),
                video("05_winter", 15.0, Dramatic, 108.0)
                    .sfx([
                        SfxCue::new_with(0.0, Impact),
                        SfxCue::new_with(1.0, RecordScratch),
                        SfxCue::new_with(2.5, SfxKind::whoosh()),
                        SfxCue::new_with(9.1, Ding),
                    ])
                    .flashes(&[0.0, 1.0, 2.5, 4.7, 6.9, 9.1])
                    .shakes(&[0.0, 1.0, 2.5])
                    .into(),
                video("06_neighbor", 18.0, Energetic, 125.0)
                    .sfx([SfxCue::new_with(0.0, Impact)])
                    .sfx(each(&[1.5, 3.7, 5.9, 8.1, 10.3], SfxKind::whoosh()))
                    .sfx([SfxCue::new_with(12.5, Ding)])
                    .flashes(&[0.0, 1.5, 3.7, 5.9, 8.1, 10.3, 12.5])
                    .shakes(&[1.5, 3.7, 5.9, 8.1, 10.3])
                    .into(),
                video("07_ranking", 18.0, Hype, 132.0)
                    .sfx([SfxCue::new_with(0.0, Impact)])
                    .sfx(each(&[1.3, 3.5, 5.7, 7.9], SfxKind::whoosh()))
                    .sfx([
                        SfxCue::new_with(10.1, SfxKind::rise(1.5)),
                        SfxCue::new_with(12.3, Impact),
                        SfxCue::new_with(12.3, Ding),
                    ])
                    .flashes(&[0.0, 1.3, 3.5, 5.7, 7.9, 10.1, 12.3])
                    .shakes(&[1.3, 3.5, 5.7, 7.9, 10.1, 12.3])
                    .into(),
                video("08_calendar", 15.0, Energetic, 140.0)
                    .sfx([SfxCue::new_with(0.0, Impact), SfxCue::new_with(10.5, Ding)])
                    .into(),
                video("09_girlfriend", 15.0, Chill, 105.0)
                    .sfx([
                        SfxCue::new_with(0.0, Impact),
                        SfxCue::new_with(1.3, RecordScratch),
                        SfxCue::new_with(2.5, SfxKind::whoosh()),
                        SfxCue::new_with(9.7, Ding),
                    ])
                    .flashes(&[0.0, 1.3, 2.5, 4.3, 6.1, 7.9, 9.7])
                    .shakes(&[1.3, 2.5])
                    .into(),
                video("10_features", 15.0, Dramatic, 118.0)
                    .sfx([SfxCue::new_with(0.0, Impact)])
                    .sfx(each(&[1.3, 3.3, 5.3, 7.3], SfxKind::whoosh()))
                    .sfx([SfxCue::new_with(9.3, Ding)])
                    .flashes(&[0.0, 1.3, 3.3, 5.3, 7.3, 9.3])
                    .shakes(&[0.0, 1.3, 3.3, 5.3, 7.3])
                    .into(),
            ],
        }
    }
}

// Terse construction of the built-in table.
fn video(name: &str, duration: f64, style: BgmStyle, bpm: f64) -> VideoDraft {
    VideoDraft(VideoCue {
        name: name.to_string(),
        duration: Seconds(duration),
        style,
        tempo: Some(Tempo(bpm)),
        sfx: Vec::default(),
        flashes: Vec::default(),
        shakes: Vec::default(),
        shake_power: VideoCue::DEFAULT_SHAKE_POWER,
    })
}
fn each(times: &[f64], effect: SfxKind) -> Vec<SfxCue> {
    times
        .iter()
        .map(|t| SfxCue::new_with(*t, effect.clone()))
        .collect()
}
struct VideoDraft(VideoCue);
impl VideoDraft {
    fn sfx(mut self, cues: impl IntoIterator<Item = SfxCue>) -> Self {
        self.0.sfx.extend(cues);
        self
    }

    fn flashes(mut self, times: &[f64]) -> Self {
        self.0.flashes = times.iter().map(|t| Seconds(*t)).collect();
        self
    }

    fn shakes(mut self, times: &[f64]) -> Self {
        self.0.shakes = times.iter().map(|t| Seconds(*t)).collect();
        self
    }

    fn shake_power(mut self, power: f64) -> Self {
        self.0.shake_power = power;
        self
    }
}
impl From<VideoDraft> for VideoCue {
    fn from(value: VideoDraft) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sheet_is_valid() {
        let sheet = CueSheet::builtin();
        assert_eq!(sheet.videos.len(), 10);
        assert_eq!(sheet.validate(), Ok(()));

        let durations: Vec<f64> = sheet.videos.iter().map(|v| v.duration.0).collect();
        assert_eq!(
            durations,
            vec![15.0, 18.0, 15.0, 18.0, 15.0, 18.0, 18.0, 15.0, 15.0, 15.0]
        );
    }

    #[test]
    fn builtin_entries() {
        let sheet = CueSheet::builtin();

        let v = sheet.find("01_aruaru").unwrap();
        assert_eq!(v.style, BgmStyle::Energetic);
        assert_eq!(v.effective_tempo(), Tempo(128.0));
        assert_eq!(v.sfx.len(), 7);
        assert_eq!(v.sfx[2], SfxCue::new_with(3.5, SfxKind::Boing));
        assert_eq!(v.flashes.len(), 7);
        assert_eq!(v.shakes.len(), 6);

        let v = sheet.find("03_5000yen").unwrap();
        assert_eq!(v.shake_power, 22.0);
        assert_eq!(v.flashes.last(), Some(&Seconds(12.0)));

        let v = sheet.find("07_ranking").unwrap();
        assert_eq!(v.sfx[5], SfxCue::new_with(10.1, SfxKind::rise(1.5)));
        assert_eq!(
            v.sfx.iter().filter(|c| c.at == Seconds(12.3)).count(),
            2,
            "impact and ding share a cue time"
        );

        let v = sheet.find("08_calendar").unwrap();
        assert!(v.flashes.is_empty());
        assert!(v.shakes.is_empty());
        assert_eq!(v.effective_tempo(), Tempo(140.0));

        assert_eq!(
            sheet.find("11_missing"),
            Err(CueSheetError::UnknownVideo("11_missing".to_string()))
        );
    }

    #[test]
    fn select_preserves_order() {
        let sheet = CueSheet::builtin();
        assert_eq!(sheet.select(&[]).unwrap().len(), 10);
        let picked = sheet
            .select(&["05_winter".to_string(), "02_fish_quiz".to_string()])
            .unwrap();
        assert_eq!(picked[0].name, "05_winter");
        assert_eq!(picked[1].name, "02_fish_quiz");
        assert!(sheet.select(&["nope".to_string()]).is_err());
    }

    #[test]
    fn json_format() {
        let json = r#"{
            "videos": [
                {
                    "name": "intro",
                    "duration": 6.5,
                    "style": "chill",
                    "sfx": [
                        { "at": 0.0, "kind": "impact" },
                        { "at": 1.0, "kind": "whoosh", "direction": "down" },
                        { "at": 2.0, "kind": "rise" },
                        { "at": 3.0, "kind": "record-scratch" }
                    ],
                    "flashes": [0.0, 1.0]
                }
            ]
        }"#;
        let sheet = CueSheet::load_from_json(json).unwrap();
        let v = sheet.find("intro").unwrap();
        assert_eq!(v.style, BgmStyle::Chill);
        assert_eq!(v.tempo, None);
        assert_eq!(v.effective_tempo(), Tempo(100.0));
        assert_eq!(v.shake_power, VideoCue::DEFAULT_SHAKE_POWER);
        assert_eq!(
            v.sfx[1].effect,
            SfxKind::Whoosh {
                direction: WhooshDirection::Down
            }
        );
        assert_eq!(v.sfx[2].effect, SfxKind::rise(1.0));
        assert_eq!(v.sfx[3].effect, SfxKind::RecordScratch);
        assert!(v.shakes.is_empty());

        let builtin = CueSheet::builtin();
        let reloaded = CueSheet::load_from_json(&builtin.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, builtin);
    }

    #[test]
    fn validation_catches_problems() {
        let good = || {
            VideoCueBuilder::default()
                .name("a")
                .duration(Seconds(10.0))
                .build()
                .unwrap()
        };
        let sheet_of = |videos: Vec<VideoCue>| CueSheet { videos };

        assert_eq!(sheet_of(vec![good()]).validate(), Ok(()));
        assert_eq!(
            sheet_of(vec![good(), good()]).validate(),
            Err(CueSheetError::DuplicateName("a".to_string()))
        );

        let mut v = good();
        v.name = " ".to_string();
        assert_eq!(sheet_of(vec![v]).validate(), Err(CueSheetError::EmptyName));

        let mut v = good();
        v.duration = Seconds(0.0);
        assert!(matches!(
            sheet_of(vec![v]).validate(),
            Err(CueSheetError::InvalidDuration { .. })
        ));

        let mut v = good();
        v.tempo = Some(Tempo(0.0));
        assert!(matches!(
            sheet_of(vec![v]).validate(),
            Err(CueSheetError::InvalidTempo { .. })
        ));

        let mut v = good();
        v.flashes.push(Seconds(f64::NAN));
        assert!(matches!(
            sheet_of(vec![v]).validate(),
            Err(CueSheetError::InvalidCueTime { .. })
        ));

        let mut v = good();
        v.sfx.push(SfxCue::new_with(1.0, SfxKind::rise(-1.0)));
        assert!(matches!(
            sheet_of(vec![v]).validate(),
            Err(CueSheetError::InvalidEffect { .. })
        ));

        let mut v = good();
        v.duration = Seconds(1e12);
        assert!(matches!(
            sheet_of(vec![v]).validate(),
            Err(CueSheetError::InvalidDuration { .. })
        ));

        let mut v = good();
        v.sfx.push(SfxCue::new_with(1.0, SfxKind::rise(1e12)));
        assert!(matches!(
            sheet_of(vec![v]).validate(),
            Err(CueSheetError::InvalidEffect { .. })
        ));

        let mut v = good();
        v.duration = VideoCue::MAX_DURATION;
        v.sfx.push(SfxCue::new_with(1.0, SfxKind::rise(600.0)));
        assert_eq!(sheet_of(vec![v]).validate(), Ok(()));

        assert!(CueSheet::load_from_json(r#"{"videos": [{"name": "x", "duration": -1}]}"#).is_err());
        assert!(
            CueSheet::load_from_json(r#"{"videos": [{"name": "x", "duration": 1e12}]}"#).is_err()
        );
        assert!(CueSheet::load_from_json("not json").is_err());
    }
}
