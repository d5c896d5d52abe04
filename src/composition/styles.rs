// Copyright (c) 2024 Mike Tsao

use super::{BassStyle, ChordEvent, DrumStyle, NoteEvent, Sequencer};
use crate::{
    cores::{DrumKit, SynthVoices},
    prelude::*,
    types::{
        chord::{self, Triad},
        pitch::*,
    },
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The background-music recipes. Each one has a drum pattern, a four-bar
/// progression that repeats for the whole track, and a fixed mix.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BgmStyle {
    /// I-V-vi-IV with a bouncing bass and a catchy lead.
    #[default]
    Energetic,
    /// I-IV-V-I pads over a smooth bass.
    Chill,
    /// vi-IV-I-V that grows louder from start to finish.
    Dramatic,
    /// Driving eighth-note bass and a stabbing lead, no pads.
    Hype,
}

/// The notes a [BgmStyle] plays, before any audio is rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arrangement {
    #[allow(missing_docs)]
    pub bass: Vec<NoteEvent>,
    #[allow(missing_docs)]
    pub bass_style: BassStyle,
    #[allow(missing_docs)]
    pub melody: Vec<NoteEvent>,
    #[allow(missing_docs)]
    pub chords: Vec<ChordEvent>,
}

// Track gains for one style.
struct MixLevels {
    drums: f64,
    bass: f64,
    melody: f64,
    pad: f64,
}

impl BgmStyle {
    /// The tempo to use when a cue doesn't name one.
    pub fn default_tempo(&self) -> Tempo {
        match self {
            BgmStyle::Energetic => Tempo(130.0),
            BgmStyle::Chill => Tempo(100.0),
            BgmStyle::Dramatic => Tempo(110.0),
            BgmStyle::Hype => Tempo(140.0),
        }
    }

    #[allow(missing_docs)]
    pub fn drum_style(&self) -> DrumStyle {
        match self {
            BgmStyle::Energetic => DrumStyle::Energetic,
            BgmStyle::Chill => DrumStyle::Chill,
            BgmStyle::Dramatic => DrumStyle::Dramatic,
            BgmStyle::Hype => DrumStyle::Hype,
        }
    }

    fn mix_levels(&self) -> MixLevels {
        match self {
            BgmStyle::Energetic => MixLevels {
                drums: 0.55,
                bass: 0.35,
                melody: 0.20,
                pad: 0.15,
            },
            BgmStyle::Chill => MixLevels {
                drums: 0.45,
                bass: 0.3,
                melody: 0.0,
                pad: 0.25,
            },
            BgmStyle::Dramatic => MixLevels {
                drums: 0.5,
                bass: 0.3,
                melody: 0.0,
                pad: 0.3,
            },
            BgmStyle::Hype => MixLevels {
                drums: 0.6,
                bass: 0.35,
                melody: 0.15,
                pad: 0.0,
            },
        }
    }

    /// Writes out `bars` bars of this style's progression.
    pub fn arrange(&self, bars: usize) -> Arrangement {
        let mut r = Arrangement {
            bass_style: match self {
                BgmStyle::Energetic | BgmStyle::Hype => BassStyle::Bounce,
                BgmStyle::Chill | BgmStyle::Dramatic => BassStyle::Smooth,
            },
            ..Default::default()
        };
        let note = NoteEvent::new_with;
        for bar in 0..bars {
            let b = (bar * 4) as f64;
            let chord_index = bar % 4;
            match self {
                BgmStyle::Energetic => {
                    let root = [C3, G3, A3, F3][chord_index];
                    r.bass.extend([note(b, root, 1.0), note(b + 2.0, root, 1.0)]);
                    r.push_chord(b, &[chord::C, chord::G, chord::AM, chord::F][chord_index]);
                    r.melody.extend(match chord_index {
                        0 => [note(b, E4, 0.5), note(b + 0.5, G4, 0.5), note(b + 1.0, C5, 1.0)],
                        1 => [note(b, D4, 0.5), note(b + 0.5, G4, 1.0), note(b + 2.0, B4, 0.5)],
                        2 => [note(b, C4, 0.5), note(b + 0.5, E4, 0.5), note(b + 1.0, A4, 1.0)],
                        _ => [note(b, A3, 0.5), note(b + 0.5, C4, 0.5), note(b + 1.5, F4, 1.0)],
                    });
                }
                BgmStyle::Chill => {
                    let root = [C3, F3, G3, C3][chord_index];
                    r.bass
                        .extend([note(b, root, 2.0), note(b + 2.5, root * 1.5, 1.0)]);
                    r.push_chord(b, &[chord::C, chord::F, chord::G, chord::C][chord_index]);
                }
                BgmStyle::Dramatic => {
                    let root = [A3, F3, C3, G3][chord_index];
                    r.bass.push(note(b, root, 4.0));
                    r.push_chord(b, &[chord::AM, chord::F, chord::C, chord::G][chord_index]);
                }
                BgmStyle::Hype => {
                    let root = [E3, E3, A3, B3][chord_index];
                    r.bass
                        .extend((0..4).map(|beat| note(b + beat as f64, root, 0.5)));
                    let lead = [E4, G4, A4, B4][chord_index];
                    r.melody.extend([
                        note(b, lead, 0.25),
                        note(b + 0.5, lead * 1.25, 0.25),
                        note(b + 1.0, lead, 0.5),
                    ]);
                }
            }
        }
        r
    }

    /// Renders the full mix: drums, bass, melody and pads at this style's
    /// levels, clipped to [-1, 1].
    pub fn render(&self, sequencer: &Sequencer, kit: &mut DrumKit, voices: &SynthVoices) -> Signal {
        let bars = sequencer.bar_count();
        let arrangement = self.arrange(bars);
        let levels = self.mix_levels();
        log::debug!(
            "{self}: {bars} bars, {} bass notes, {} melody notes, {} chords",
            arrangement.bass.len(),
            arrangement.melody.len(),
            arrangement.chords.len()
        );

        let mut mix = sequencer.silence();
        mix.add_scaled(&sequencer.drum_loop(self.drum_style(), kit), levels.drums)
            .add_scaled(
                &sequencer.bassline(&arrangement.bass, arrangement.bass_style, voices),
                levels.bass,
            );
        if !arrangement.melody.is_empty() {
            mix.add_scaled(&sequencer.melody(&arrangement.melody, voices), levels.melody);
        }
        if !arrangement.chords.is_empty() {
            mix.add_scaled(&sequencer.pad(&arrangement.chords, voices), levels.pad);
        }
        if *self == BgmStyle::Dramatic {
            mix.apply_curve(|progress| 0.4 + 0.6 * progress);
        }
        mix.clip();
        mix
    }
}
impl Arrangement {
    fn push_chord(&mut self, beat: f64, triad: &Triad) {
        self.chords.push(ChordEvent::new_with(beat, triad, 4.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::{assert_gt, assert_le};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn default_tempos() {
        assert_eq!(BgmStyle::Energetic.default_tempo(), Tempo(130.0));
        assert_eq!(BgmStyle::Chill.default_tempo(), Tempo(100.0));
        assert_eq!(BgmStyle::Dramatic.default_tempo(), Tempo(110.0));
        assert_eq!(BgmStyle::Hype.default_tempo(), Tempo(140.0));
        assert_eq!(BgmStyle::from_str("hype").unwrap(), BgmStyle::Hype);
        assert_eq!(BgmStyle::Dramatic.to_string(), "dramatic");
    }

    #[test]
    fn energetic_arrangement() {
        let a = BgmStyle::Energetic.arrange(5);
        assert_eq!(a.bass_style, BassStyle::Bounce);
        assert_eq!(a.bass.len(), 10);
        assert_eq!(a.chords.len(), 5);
        assert_eq!(a.melody.len(), 15);
        assert_eq!(a.bass[2], NoteEvent::new_with(4.0, G3, 1.0));
        assert_eq!(a.bass[3], NoteEvent::new_with(6.0, G3, 1.0));
        assert_eq!(a.chords[2].frequencies, chord::AM.to_vec());
        // The progression wraps after four bars.
        assert_eq!(a.chords[4].frequencies, chord::C.to_vec());
        assert_eq!(a.chords[4].beat, 16.0);
        assert_eq!(a.melody[11], NoteEvent::new_with(13.5, F4, 1.0));
    }

    #[test]
    fn chill_arrangement() {
        let a = BgmStyle::Chill.arrange(2);
        assert_eq!(a.bass_style, BassStyle::Smooth);
        assert_eq!(
            a.bass,
            vec![
                NoteEvent::new_with(0.0, C3, 2.0),
                NoteEvent::new_with(2.5, C3 * 1.5, 1.0),
                NoteEvent::new_with(4.0, F3, 2.0),
                NoteEvent::new_with(6.5, F3 * 1.5, 1.0),
            ]
        );
        assert!(a.melody.is_empty());
        assert_eq!(a.chords[1].frequencies, chord::F.to_vec());
    }

    #[test]
    fn dramatic_and_hype_arrangements() {
        let a = BgmStyle::Dramatic.arrange(4);
        assert_eq!(
            a.bass.iter().map(|n| n.frequency).collect::<Vec<_>>(),
            vec![A3, F3, C3, G3]
        );
        assert!(a.bass.iter().all(|n| n.length == 4.0));

        let a = BgmStyle::Hype.arrange(3);
        assert_eq!(a.bass.len(), 12);
        assert!(a.chords.is_empty());
        assert_eq!(a.bass[8], NoteEvent::new_with(8.0, A3, 0.5));
        assert_eq!(a.melody[4], NoteEvent::new_with(4.5, G4 * 1.25, 0.25));
    }

    #[test]
    fn every_style_renders_clipped_audio() {
        let sample_rate = SampleRate(8000);
        let voices = SynthVoices::new_with(sample_rate);
        let mut kit = DrumKit::new_with(sample_rate, Rng::new_with_seed(11));
        for style in BgmStyle::iter() {
            let sequencer = Sequencer::new_with(sample_rate, style.default_tempo(), Seconds(3.0));
            let mix = style.render(&sequencer, &mut kit, &voices);
            assert_eq!(mix.len(), 24000, "{style}");
            assert!(mix.is_audible(), "{style}");
            assert_le!(mix.peak(), 1.0, "{style}");
        }
    }

    #[test]
    fn dramatic_builds() {
        let sample_rate = SampleRate(8000);
        let voices = SynthVoices::new_with(sample_rate);
        let mut kit = DrumKit::new_with(sample_rate, Rng::new_with_seed(11));
        let sequencer = Sequencer::new_with(sample_rate, Tempo(120.0), Seconds(4.0));
        let mix = BgmStyle::Dramatic.render(&sequencer, &mut kit, &voices);

        // Both halves start on a bar with the same drum hits; the second is
        // louder.
        let first = Signal::from_samples(sample_rate, mix.samples()[..4000].to_vec());
        let second = Signal::from_samples(sample_rate, mix.samples()[16000..20000].to_vec());
        assert_gt!(second.peak(), first.peak());
    }
}
