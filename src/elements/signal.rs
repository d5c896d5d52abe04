// Copyright (c) 2024 Mike Tsao

use crate::{
    cores::{BandPassFilter, ButterworthFilter, Distortion, FilterKind},
    prelude::*,
};

/// A mono buffer of audio at a known sample rate. Everything the synthesizers
/// produce is a [Signal], and everything the sequencer arranges is built by
/// placing [Signal]s into other [Signal]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signal {
    samples: Vec<Sample>,
    sample_rate: SampleRate,
}
impl Signal {
    /// A silent buffer of the given number of frames.
    pub fn silence(sample_rate: SampleRate, frames: usize) -> Self {
        Self {
            samples: vec![Sample::SILENCE; frames],
            sample_rate,
        }
    }

    /// A silent buffer long enough to hold `duration`, rounded down to whole
    /// frames.
    pub fn with_duration(sample_rate: SampleRate, duration: Seconds) -> Self {
        Self::silence(sample_rate, sample_rate.frames_in(duration))
    }

    /// Builds a buffer by evaluating `f` at the start time of every frame.
    pub fn from_fn<F>(sample_rate: SampleRate, frames: usize, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let samples = (0..frames)
            .map(|i| Sample(f(sample_rate.frame_to_seconds(i).0)))
            .collect();
        Self {
            samples,
            sample_rate,
        }
    }

    /// Like [Signal::from_fn()], but sized by a duration.
    pub fn from_fn_with_duration<F>(sample_rate: SampleRate, duration: Seconds, f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        Self::from_fn(sample_rate, sample_rate.frames_in(duration), f)
    }

    /// Wraps existing samples.
    pub fn from_samples(sample_rate: SampleRate, samples: Vec<Sample>) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Gaussian white noise with unit variance.
    pub fn white_noise(sample_rate: SampleRate, duration: Seconds, rng: &mut Rng) -> Self {
        Self::from_fn_with_duration(sample_rate, duration, |_| rng.gaussian())
    }

    /// Renders a sine whose frequency changes every frame. The phase is the
    /// running sum of each frame's phase increment, so the first frame already
    /// includes the first increment.
    pub fn chirp<F>(sample_rate: SampleRate, duration: Seconds, mut frequency: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let frequencies: Vec<FrequencyHz> = (0..sample_rate.frames_in(duration))
            .map(|i| FrequencyHz(frequency(sample_rate.frame_to_seconds(i).0)))
            .collect();
        Oscillator::sweep(sample_rate, &frequencies)
    }

    #[allow(missing_docs)]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The wall-clock length of the buffer.
    pub fn duration(&self) -> Seconds {
        self.sample_rate.frame_to_seconds(self.len())
    }

    #[allow(missing_docs)]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[allow(missing_docs)]
    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    #[allow(missing_docs)]
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// The start time of each frame.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(|i| self.sample_rate.frame_to_seconds(i).0)
    }

    /// The largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak, s| s.0.abs().max(peak))
    }

    /// Whether any sample is non-zero.
    pub fn is_audible(&self) -> bool {
        self.samples.iter().any(|s| s.0 != 0.0)
    }

    /// Multiplies every sample by `gain`.
    pub fn scale(&mut self, gain: f64) -> &mut Self {
        self.samples.iter_mut().for_each(|s| *s *= gain);
        self
    }

    /// Returns a copy multiplied by `gain`.
    pub fn scaled(&self, gain: f64) -> Self {
        let mut r = self.clone();
        r.scale(gain);
        r
    }

    /// Adds `other` frame by frame, over the frames the two have in common.
    pub fn add(&mut self, other: &Signal) -> &mut Self {
        self.add_scaled(other, 1.0)
    }

    /// Adds `other × gain` frame by frame, over the frames the two have in
    /// common.
    pub fn add_scaled(&mut self, other: &Signal, gain: f64) -> &mut Self {
        self.samples
            .iter_mut()
            .zip(other.samples.iter())
            .for_each(|(a, b)| *a += *b * gain);
        self
    }

    /// Multiplies frame by frame, over the frames the two have in common.
    /// Frames past the end of `other` are left alone.
    pub fn multiply_by(&mut self, other: &Signal) -> &mut Self {
        self.samples
            .iter_mut()
            .zip(other.samples.iter())
            .for_each(|(a, b)| *a = *a * *b);
        self
    }

    /// Limits every sample to [-1.0, 1.0].
    pub fn clip(&mut self) -> &mut Self {
        self.samples.iter_mut().for_each(|s| *s = s.clipped());
        self
    }

    /// Mixes `other` into this buffer starting at time `at`. If `at` falls
    /// outside the buffer, nothing happens. Whatever doesn't fit is dropped.
    pub fn place(&mut self, other: &Signal, at: Seconds) -> &mut Self {
        let start = (at.0 * self.sample_rate.0 as f64).trunc();
        if !start.is_finite() || start < 0.0 || start >= self.len() as f64 {
            return self;
        }
        let start = start as usize;
        self.samples[start..]
            .iter_mut()
            .zip(other.samples.iter())
            .for_each(|(a, b)| *a += *b);
        self
    }

    /// Multiplies frame i by `exp(-rate × i / sample_rate)`.
    pub fn exp_decay(&mut self, rate: f64) -> &mut Self {
        let sample_rate = self.sample_rate;
        self.samples.iter_mut().enumerate().for_each(|(i, s)| {
            *s *= (-rate * sample_rate.frame_to_seconds(i).0).exp();
        });
        self
    }

    /// Multiplies frame i by `curve(progress)`, where progress runs linearly
    /// from 0.0 at the first frame to 1.0 at the last.
    pub fn apply_curve<F>(&mut self, mut curve: F) -> &mut Self
    where
        F: FnMut(f64) -> f64,
    {
        let steps = self.len().saturating_sub(1).max(1) as f64;
        self.samples
            .iter_mut()
            .enumerate()
            .for_each(|(i, s)| *s *= curve(i as f64 / steps));
        self
    }

    /// Runs the buffer through an effect.
    pub fn apply(&mut self, effect: &mut dyn TransformsAudio) -> &mut Self {
        effect.transform(&mut self.samples);
        self
    }

    /// Fourth-order Butterworth low-pass, starting from rest.
    pub fn low_pass(&mut self, cutoff: FrequencyHz) -> &mut Self {
        let mut filter = ButterworthFilter::new_with(
            FilterKind::LowPass,
            ButterworthFilter::DEFAULT_ORDER,
            cutoff,
            self.sample_rate,
        );
        self.apply(&mut filter)
    }

    /// Fourth-order Butterworth high-pass, starting from rest.
    pub fn high_pass(&mut self, cutoff: FrequencyHz) -> &mut Self {
        let mut filter = ButterworthFilter::new_with(
            FilterKind::HighPass,
            ButterworthFilter::DEFAULT_ORDER,
            cutoff,
            self.sample_rate,
        );
        self.apply(&mut filter)
    }

    /// Third-order Butterworth band-pass between `low` and `high`, starting
    /// from rest.
    pub fn band_pass(&mut self, low: FrequencyHz, high: FrequencyHz) -> &mut Self {
        let mut filter = BandPassFilter::new_with(
            low,
            high,
            BandPassFilter::DEFAULT_ORDER,
            self.sample_rate,
        );
        self.apply(&mut filter)
    }

    /// Soft clipping with `tanh`.
    pub fn distort(&mut self, gain: f64) -> &mut Self {
        self.apply(&mut Distortion::new_with(gain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    const SR: SampleRate = SampleRate(1000);

    fn ramp(frames: usize) -> Signal {
        Signal::from_fn(SR, frames, |t| t)
    }

    #[test]
    fn construction() {
        let s = Signal::with_duration(SR, Seconds(0.5));
        assert_eq!(s.len(), 500);
        assert!(!s.is_audible());
        assert_eq!(s.duration(), Seconds(0.5));

        let s = ramp(4);
        assert_eq!(
            s.samples(),
            &[Sample(0.0), Sample(0.001), Sample(0.002), Sample(0.003)],
            "from_fn should evaluate at i / sample_rate"
        );
        assert_eq!(s.times().collect::<Vec<_>>(), vec![0.0, 0.001, 0.002, 0.003]);
    }

    #[test]
    fn place_adds_and_truncates() {
        let mut buffer = Signal::silence(SR, 10);
        let blip = Signal::from_fn(SR, 4, |_| 1.0);

        buffer.place(&blip, Seconds(0.008));
        assert_eq!(buffer.samples()[7], Sample(0.0));
        assert_eq!(buffer.samples()[8], Sample(1.0));
        assert_eq!(buffer.samples()[9], Sample(1.0), "overflow should be dropped");

        buffer.place(&blip, Seconds(0.0085));
        assert_eq!(
            buffer.samples()[8],
            Sample(2.0),
            "start index should be truncated, and placement should add"
        );
    }

    #[test]
    fn place_out_of_range_is_ignored() {
        let mut buffer = Signal::silence(SR, 10);
        let blip = Signal::from_fn(SR, 4, |_| 1.0);
        buffer.place(&blip, Seconds(0.010));
        buffer.place(&blip, Seconds(-0.002));
        buffer.place(&blip, Seconds(f64::NAN));
        assert!(!buffer.is_audible());
    }

    #[test]
    fn place_into_empty_buffer_is_ignored() {
        let mut buffer = Signal::silence(SR, 0);
        buffer.place(&Signal::from_fn(SR, 4, |_| 1.0), Seconds::zero());
        assert!(buffer.is_empty());
    }

    #[test]
    fn clip_limits_range() {
        let mut s = Signal::from_samples(SR, vec![Sample(-3.0), Sample(0.5), Sample(1.5)]);
        s.clip();
        assert_eq!(s.samples(), &[Sample(-1.0), Sample(0.5), Sample(1.0)]);
    }

    #[test]
    fn exp_decay_follows_time() {
        let mut s = Signal::from_fn(SR, 1001, |_| 1.0);
        s.exp_decay(2.0);
        assert_eq!(s.samples()[0], Sample(1.0));
        assert!(approx_eq!(
            f64,
            s.samples()[1000].0,
            (-2.0f64).exp(),
            epsilon = 1e-12
        ));
    }

    #[test]
    fn curve_spans_zero_to_one() {
        let mut s = Signal::from_fn(SR, 5, |_| 1.0);
        s.apply_curve(|p| p);
        assert_eq!(
            s.samples(),
            &[Sample(0.0), Sample(0.25), Sample(0.5), Sample(0.75), Sample(1.0)]
        );
    }

    #[test]
    fn mixing_uses_common_length() {
        let mut a = Signal::from_fn(SR, 3, |_| 1.0);
        let b = Signal::from_fn(SR, 2, |_| 1.0);
        a.add_scaled(&b, 0.5);
        assert_eq!(a.samples(), &[Sample(1.5), Sample(1.5), Sample(1.0)]);
        a.multiply_by(&b.scaled(2.0));
        assert_eq!(a.samples(), &[Sample(3.0), Sample(3.0), Sample(1.0)]);
        assert_eq!(a.peak(), 3.0);
    }

    #[test]
    fn noise_is_reproducible() {
        let a = Signal::white_noise(SR, Seconds(0.1), &mut Rng::new_with_seed(7));
        let b = Signal::white_noise(SR, Seconds(0.1), &mut Rng::new_with_seed(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 100);
        assert!(a.is_audible());
    }

    #[test]
    fn distortion_is_bounded() {
        let mut s = Signal::from_samples(SR, vec![Sample(-10.0), Sample(0.0), Sample(10.0)]);
        s.distort(3.0);
        assert!(s.samples().iter().all(|s| s.0.abs() < 1.0 + f64::EPSILON));
        assert_eq!(s.samples()[1], Sample(0.0));
    }
}
