// Copyright (c) 2024 Mike Tsao

use crate::{
    cores::{DrumKit, SynthVoices},
    prelude::*,
};
use delegate::delegate;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// A single pitched note. Times are in beats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoteEvent {
    /// When the note starts.
    pub beat: f64,
    #[allow(missing_docs)]
    pub frequency: FrequencyHz,
    /// How long the note lasts.
    pub length: f64,
}
impl NoteEvent {
    #[allow(missing_docs)]
    pub fn new_with(beat: f64, frequency: FrequencyHz, length: f64) -> Self {
        Self {
            beat,
            frequency,
            length,
        }
    }
}

/// Several pitches that start and stop together. Times are in beats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChordEvent {
    /// When the chord starts.
    pub beat: f64,
    #[allow(missing_docs)]
    pub frequencies: Vec<FrequencyHz>,
    /// How long the chord lasts.
    pub length: f64,
}
impl ChordEvent {
    #[allow(missing_docs)]
    pub fn new_with(beat: f64, frequencies: &[FrequencyHz], length: f64) -> Self {
        Self {
            beat,
            frequencies: frequencies.to_vec(),
            length,
        }
    }
}

/// The fixed drum patterns.
#[derive(
    Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DrumStyle {
    /// Four on the floor with eighth-note hats and a pushed kick.
    #[default]
    Energetic,
    /// Laid-back kick and snare with a soft clap and quiet hats.
    Chill,
    /// Sparse kicks and claps with hats on every other beat.
    Dramatic,
    /// A kick on every beat and sixteenth-note hats.
    Hype,
}

/// How a bass line voices its notes.
#[derive(
    Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BassStyle {
    /// Punchy [SynthVoices::bass].
    #[default]
    Bounce,
    /// Soft [SynthVoices::smooth_bass].
    Smooth,
}

/// Places notes and hits on a beat grid. Every track it renders is exactly as
/// long as the sequencer's duration.
#[derive(Clone, Debug, Default, Builder)]
#[builder(default)]
pub struct Sequencer {
    /// Length of every rendered track.
    duration: Seconds,

    #[builder(setter(custom))]
    c: Configurables,
}
impl SequencerBuilder {
    #[allow(missing_docs)]
    pub fn sample_rate(&mut self, sample_rate: SampleRate) -> &mut Self {
        self.c
            .get_or_insert_with(Configurables::default)
            .update_sample_rate(sample_rate);
        self
    }

    #[allow(missing_docs)]
    pub fn tempo(&mut self, tempo: Tempo) -> &mut Self {
        self.c
            .get_or_insert_with(Configurables::default)
            .update_tempo(tempo);
        self
    }
}
impl Configurable for Sequencer {
    delegate! {
        to self.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }
}
impl Sequencer {
    const BEATS_PER_BAR: usize = 4;

    #[allow(missing_docs)]
    pub fn new_with(sample_rate: SampleRate, tempo: Tempo, duration: Seconds) -> Self {
        let mut c = Configurables::new_with(sample_rate);
        c.update_tempo(tempo);
        Self { duration, c }
    }

    #[allow(missing_docs)]
    pub fn duration(&self) -> Seconds {
        self.duration
    }

    /// The number of frames in every track.
    pub fn frames(&self) -> usize {
        self.sample_rate().frames_in(self.duration)
    }

    /// An empty track.
    pub fn silence(&self) -> Signal {
        Signal::silence(self.sample_rate(), self.frames())
    }

    /// Converts a beat position to seconds at the current tempo.
    pub fn beat_to_seconds(&self, beat: f64) -> Seconds {
        self.tempo().beats_to_seconds(beat)
    }

    /// The number of whole bars in the track, plus one to cover any partial
    /// bar at the end.
    pub fn bar_count(&self) -> usize {
        match self.whole_beats() {
            Some(beats) => beats / Self::BEATS_PER_BAR + 1,
            None => 0,
        }
    }

    // floor(duration / beat), or None if the tempo can't produce a beat grid.
    fn whole_beats(&self) -> Option<usize> {
        if !self.tempo().is_valid() {
            log::warn!("tempo {} can't drive a sequencer", self.tempo());
            return None;
        }
        let beats = (self.duration.0 / self.tempo().seconds_per_beat().0).floor();
        if beats.is_finite() && beats >= 0.0 {
            Some(beats as usize)
        } else {
            None
        }
    }

    /// Renders a fixed drum pattern across the whole track, one hit at a
    /// time. The result is clipped.
    pub fn drum_loop(&self, style: DrumStyle, kit: &mut DrumKit) -> Signal {
        let mut buf = self.silence();
        let Some(total_beats) = self.whole_beats() else {
            return buf;
        };
        let beat = self.tempo().seconds_per_beat();
        let half = beat * 0.5;

        for b in 0..=total_beats {
            let t = beat * b as f64;
            let beat_in_bar = b % Self::BEATS_PER_BAR;

            match style {
                DrumStyle::Energetic => {
                    if beat_in_bar == 0 || beat_in_bar == 2 {
                        buf.place(&kit.kick(DrumKit::KICK_DURATION), t);
                    }
                    if beat_in_bar == 1 && b > 4 {
                        buf.place(&kit.kick(Seconds(0.15)), t + half);
                    }
                    if beat_in_bar == 1 || beat_in_bar == 3 {
                        buf.place(&kit.snare(DrumKit::SNARE_DURATION), t);
                    }
                    buf.place(&kit.hihat(DrumKit::HIHAT_DURATION, false), t);
                    buf.place(&kit.hihat(DrumKit::HIHAT_DURATION, false), t + half);
                    if beat_in_bar == 3 && (b / Self::BEATS_PER_BAR) % 2 == 1 {
                        buf.place(&kit.hihat(DrumKit::HIHAT_DURATION, true), t + half);
                    }
                }
                DrumStyle::Chill => {
                    if beat_in_bar == 0 || beat_in_bar == 2 {
                        buf.place(&kit.kick(Seconds(0.25)), t);
                    }
                    if beat_in_bar == 1 || beat_in_bar == 3 {
                        buf.place(&kit.snare(DrumKit::SNARE_DURATION), t);
                        buf.place(&kit.clap(DrumKit::CLAP_DURATION), t);
                    }
                    buf.place(&kit.hihat(DrumKit::HIHAT_DURATION, false).scaled(0.6), t);
                    buf.place(
                        &kit.hihat(DrumKit::HIHAT_DURATION, false).scaled(0.4),
                        t + half,
                    );
                }
                DrumStyle::Dramatic => {
                    if beat_in_bar == 0 {
                        buf.place(&kit.kick(DrumKit::KICK_DURATION), t);
                    }
                    if beat_in_bar == 2 {
                        buf.place(&kit.kick(Seconds(0.2)), t);
                    }
                    if beat_in_bar == 1 || beat_in_bar == 3 {
                        buf.place(&kit.clap(DrumKit::CLAP_DURATION), t);
                    }
                    if b % 2 == 0 {
                        buf.place(&kit.hihat(DrumKit::HIHAT_DURATION, false).scaled(0.5), t);
                    }
                }
                DrumStyle::Hype => {
                    buf.place(&kit.kick(Seconds(0.15)), t);
                    if beat_in_bar == 1 || beat_in_bar == 3 {
                        buf.place(&kit.snare(DrumKit::SNARE_DURATION), t);
                    }
                    for sub in 0..4 {
                        let volume = if sub == 0 { 0.7 } else { 0.4 };
                        buf.place(
                            &kit.hihat(Seconds(0.04), false).scaled(volume),
                            t + beat * (sub as f64 * 0.25),
                        );
                    }
                }
            }
        }
        buf.clip();
        buf
    }

    /// Renders each note with the given bass voice.
    pub fn bassline(&self, notes: &[NoteEvent], style: BassStyle, voices: &SynthVoices) -> Signal {
        self.render_notes(notes, |frequency, duration| match style {
            BassStyle::Bounce => voices.bass(frequency, duration),
            BassStyle::Smooth => voices.smooth_bass(frequency, duration),
        })
    }

    /// Renders each note with the lead voice.
    pub fn melody(&self, notes: &[NoteEvent], voices: &SynthVoices) -> Signal {
        self.render_notes(notes, |frequency, duration| voices.lead(frequency, duration))
    }

    /// Renders one pad voice per chord tone.
    pub fn pad(&self, chords: &[ChordEvent], voices: &SynthVoices) -> Signal {
        let mut buf = self.silence();
        for chord in chords {
            let t = self.beat_to_seconds(chord.beat);
            let duration = self.beat_to_seconds(chord.length);
            for frequency in chord.frequencies.iter() {
                buf.place(&voices.pad(*frequency, duration), t);
            }
        }
        buf
    }

    fn render_notes<F>(&self, notes: &[NoteEvent], mut voice: F) -> Signal
    where
        F: FnMut(FrequencyHz, Seconds) -> Signal,
    {
        let mut buf = self.silence();
        for note in notes {
            let t = self.beat_to_seconds(note.beat);
            buf.place(&voice(note.frequency, self.beat_to_seconds(note.length)), t);
        }
        buf
    }
}
