// Copyright (c) 2024 Mike Tsao

//! Handles digital-audio, wall-clock, and musical time.

use crate::types::ParameterType;
use core::{
    fmt,
    ops::{Add, Div, Mul, Sub},
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Beats per minute.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Derivative, PartialEq, PartialOrd)]
#[derivative(Default)]
#[serde(transparent)]
pub struct Tempo(#[derivative(Default(value = "128.0"))] pub ParameterType);
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} BPM", self.0))
    }
}
impl From<u16> for Tempo {
    fn from(value: u16) -> Self {
        Self(value as ParameterType)
    }
}
impl From<f64> for Tempo {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl Tempo {
    /// The largest value we'll allow.
    pub const MAX_VALUE: ParameterType = 1024.0;

    /// The smallest value we'll allow. Zero is degenerate because a beat would
    /// never end.
    pub const MIN_VALUE: ParameterType = 0.0;

    /// Beats per second.
    pub fn bps(&self) -> ParameterType {
        self.0 / 60.0
    }

    /// The wall-clock length of a single beat.
    pub fn seconds_per_beat(&self) -> Seconds {
        Seconds(60.0 / self.0)
    }

    /// Converts a (possibly fractional) beat position into wall-clock time.
    pub fn beats_to_seconds(&self, beats: f64) -> Seconds {
        Seconds(beats * (60.0 / self.0))
    }

    /// Whether this tempo can drive a sequencer.
    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.0 > Self::MIN_VALUE && self.0 <= Self::MAX_VALUE
    }
}

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of time.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }
}
impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.1}s", self.0))
    }
}
impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<f32> for Seconds {
    fn from(value: f32) -> Self {
        Self(value as f64)
    }
}
impl From<Seconds> for f64 {
    fn from(value: Seconds) -> Self {
        value.0
    }
}
impl Add for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl Sub for Seconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl Mul<f64> for Seconds {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl Div<usize> for Seconds {
    type Output = Self;

    fn div(self, rhs: usize) -> Self::Output {
        Self(self.0 / rhs as f64)
    }
}

/// Samples per second. Always a positive integer; cannot be zero.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(transparent)]
pub struct SampleRate(#[derivative(Default(value = "44100"))] pub usize);
#[allow(missing_docs)]
impl SampleRate {
    pub const DEFAULT_SAMPLE_RATE: usize = 44100;
    pub const DEFAULT: SampleRate = SampleRate::new(Self::DEFAULT_SAMPLE_RATE);

    pub const fn new(value: usize) -> Self {
        if value != 0 {
            Self(value)
        } else {
            Self(Self::DEFAULT_SAMPLE_RATE)
        }
    }

    /// The number of whole frames that fit in the given duration. Partial
    /// frames are dropped, and negative durations have no frames.
    pub fn frames_in(&self, seconds: Seconds) -> usize {
        let frames = (self.0 as f64 * seconds.0).floor();
        if frames.is_finite() && frames > 0.0 {
            frames as usize
        } else {
            0
        }
    }

    /// The time at which the given frame starts.
    pub fn frame_to_seconds(&self, frame: usize) -> Seconds {
        Seconds(frame as f64 / self.0 as f64)
    }

    /// Half the sample rate.
    pub fn nyquist(&self) -> f64 {
        self.0 as f64 / 2.0
    }
}
impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}Hz", self.0))
    }
}
impl From<usize> for SampleRate {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}
impl From<f64> for SampleRate {
    fn from(value: f64) -> Self {
        Self::new(value as usize)
    }
}
impl From<SampleRate> for f64 {
    fn from(value: SampleRate) -> Self {
        value.0 as f64
    }
}
impl From<SampleRate> for u32 {
    fn from(value: SampleRate) -> Self {
        value.0 as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo() {
        let t = Tempo::default();
        assert_eq!(t.0, 128.0);
        assert_eq!(Tempo(120.0).seconds_per_beat(), Seconds(0.5));
        assert_eq!(Tempo(120.0).beats_to_seconds(3.0), Seconds(1.5));
        assert_eq!(Tempo(60.0).bps(), 1.0);
    }

    #[test]
    fn beat_times_scale_the_beat_length() {
        // Rounds like beat × (60 / bpm), which lands a frame earlier here
        // than (beat × 60) / bpm would.
        let t = Tempo(135.0).beats_to_seconds(3.5);
        assert_eq!(t, Seconds(3.5 * Tempo(135.0).seconds_per_beat().0));
        assert_eq!(t.0 * 44100.0, 68599.99999999999);
        assert_eq!((t.0 * 44100.0).trunc(), 68599.0);
        assert_eq!(Tempo(125.0).beats_to_seconds(5.5), Seconds(2.6399999999999997));
    }

    #[test]
    fn tempo_validity() {
        assert!(Tempo(130.0).is_valid());
        assert!(!Tempo(0.0).is_valid());
        assert!(!Tempo(-5.0).is_valid());
        assert!(!Tempo(f64::NAN).is_valid());
    }

    #[test]
    fn sample_rate_defaults() {
        assert_eq!(SampleRate::default(), SampleRate::DEFAULT);
        assert_eq!(
            SampleRate::new(0),
            SampleRate::DEFAULT,
            "zero sample rate should be replaced with the default"
        );
    }

    #[test]
    fn frames_in_duration() {
        let sr = SampleRate::DEFAULT;
        assert_eq!(sr.frames_in(Seconds(1.0)), 44100);
        assert_eq!(sr.frames_in(Seconds(0.005)), 220, "partial frames are dropped");
        assert_eq!(sr.frames_in(Seconds(0.0003)), 13);
        assert_eq!(sr.frames_in(Seconds(-1.0)), 0);
        assert_eq!(sr.frames_in(Seconds(f64::NAN)), 0);
    }
}
