// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use core::f64::consts::PI;
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Which side of the cutoff a [ButterworthFilter] lets through.
#[derive(
    Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[allow(missing_docs)]
    #[default]
    LowPass,
    #[allow(missing_docs)]
    HighPass,
}

/// A maximally flat filter of configurable order, built as a cascade of
/// second-order sections (plus one first-order section for odd orders). Its
/// response matches the classic bilinear-transform Butterworth design.
#[derive(Debug, Clone, Derivative, Builder, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
#[builder(default, build_fn(private, name = "build_from_builder"))]
pub struct ButterworthFilter {
    kind: FilterKind,
    #[derivative(Default(value = "ButterworthFilter::DEFAULT_ORDER"))]
    order: usize,
    #[derivative(Default(value = "1000.0.into()"))]
    cutoff: FrequencyHz,

    #[serde(skip)]
    #[builder(setter(skip))]
    e: ButterworthFilterEphemerals,
}
#[derive(Debug, Clone, Default)]
pub struct ButterworthFilterEphemerals {
    sections: Vec<BiQuadFilter>,

    c: Configurables,
}
impl ButterworthFilterBuilder {
    /// The overridden Builder build() method.
    pub fn build(&self) -> Result<ButterworthFilter, ButterworthFilterBuilderError> {
        match self.build_from_builder() {
            Ok(mut s) => {
                s.order = s.order.clamp(Self::MIN_ORDER, Self::MAX_ORDER);
                s.rebuild_sections();
                Ok(s)
            }
            Err(e) => Err(e),
        }
    }

    const MIN_ORDER: usize = 1;
    const MAX_ORDER: usize = 8;
}
impl Configurable for ButterworthFilter {
    delegate! {
        to self.e.c {
            fn sample_rate(&self) -> SampleRate;
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.e.c.update_sample_rate(sample_rate);
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.e.sections.iter_mut().for_each(|s| s.reset());
    }
}
impl TransformsAudio for ButterworthFilter {
    fn transform_sample(&mut self, input_sample: Sample) -> Sample {
        self.e
            .sections
            .iter_mut()
            .fold(input_sample, |sample, section| {
                section.transform_sample(sample)
            })
    }
}
impl ButterworthFilter {
    /// The order of the plain low- and high-pass filters.
    pub const DEFAULT_ORDER: usize = 4;

    /// A filter at rest, ready to run at the given sample rate.
    pub fn new_with(
        kind: FilterKind,
        order: usize,
        cutoff: FrequencyHz,
        sample_rate: SampleRate,
    ) -> Self {
        let mut r = Self {
            kind,
            order: order.clamp(
                ButterworthFilterBuilder::MIN_ORDER,
                ButterworthFilterBuilder::MAX_ORDER,
            ),
            cutoff,
            e: ButterworthFilterEphemerals {
                c: Configurables::new_with(sample_rate),
                ..Default::default()
            },
        };
        r.rebuild_sections();
        r
    }

    fn rebuild_sections(&mut self) {
        self.e.sections = vec![BiQuadFilter::default(); self.order / 2 + self.order % 2];
        self.update_coefficients();
    }

    // The section count depends only on the order, so retuning keeps each
    // section's history.
    fn update_coefficients(&mut self) {
        let sample_rate = self.e.c.sample_rate();
        let cutoff = Self::clamped_cutoff(self.cutoff, sample_rate);
        let n = self.order;
        for (k, section) in self.e.sections.iter_mut().enumerate() {
            let coefficients = if k < n / 2 {
                let q = 1.0 / (2.0 * ((2 * k + 1) as f64 * PI / (2 * n) as f64).sin());
                CoefficientSet::second_order(self.kind, sample_rate, cutoff, q)
            } else {
                CoefficientSet::first_order(self.kind, sample_rate, cutoff)
            };
            section.set_coefficients(coefficients);
        }
    }

    /// Keeps the cutoff where the bilinear transform stays stable.
    pub fn clamped_cutoff(cutoff: FrequencyHz, sample_rate: SampleRate) -> ParameterType {
        let ceiling = 0.99 * sample_rate.nyquist();
        if cutoff.0.is_nan() {
            return ceiling;
        }
        cutoff.0.clamp(1.0, ceiling)
    }

    #[allow(missing_docs)]
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    #[allow(missing_docs)]
    pub fn order(&self) -> usize {
        self.order
    }

    #[allow(missing_docs)]
    pub fn cutoff(&self) -> FrequencyHz {
        self.cutoff
    }

    /// Retunes the filter. Its history is kept, so a cutoff that moves while
    /// audio is running doesn't click.
    pub fn set_cutoff(&mut self, cutoff: FrequencyHz) {
        if self.cutoff != cutoff {
            self.cutoff = cutoff;
            self.update_coefficients();
        }
    }
}

/// Passes the band between two frequencies: a high-pass at the low edge
/// feeding a low-pass at the high edge.
#[derive(Debug, Clone, Default)]
pub struct BandPassFilter {
    high_pass: ButterworthFilter,
    low_pass: ButterworthFilter,
}
impl TransformsAudio for BandPassFilter {
    fn transform_sample(&mut self, input_sample: Sample) -> Sample {
        let s = self.high_pass.transform_sample(input_sample);
        self.low_pass.transform_sample(s)
    }
}
impl Configurable for BandPassFilter {
    fn sample_rate(&self) -> SampleRate {
        self.low_pass.sample_rate()
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.high_pass.update_sample_rate(sample_rate);
        self.low_pass.update_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.high_pass.reset();
        self.low_pass.reset();
    }
}
impl BandPassFilter {
    /// The order of each edge of the band.
    pub const DEFAULT_ORDER: usize = 3;

    #[allow(missing_docs)]
    pub fn new_with(
        low: FrequencyHz,
        high: FrequencyHz,
        order: usize,
        sample_rate: SampleRate,
    ) -> Self {
        Self {
            high_pass: ButterworthFilter::new_with(FilterKind::HighPass, order, low, sample_rate),
            low_pass: ButterworthFilter::new_with(FilterKind::LowPass, order, high, sample_rate),
        }
    }

    #[allow(missing_docs)]
    pub fn low(&self) -> FrequencyHz {
        self.high_pass.cutoff()
    }

    #[allow(missing_docs)]
    pub fn high(&self) -> FrequencyHz {
        self.low_pass.cutoff()
    }
}

/// A low-pass filter whose cutoff is re-read from a schedule at the start of
/// every chunk. Each chunk is filtered from rest, as if by a fresh filter.
#[derive(Debug, Clone)]
pub struct SweepFilter {
    inner: ButterworthFilter,
    chunk_frames: usize,
}
impl SweepFilter {
    /// How often the cutoff is updated.
    pub const CHUNK: Seconds = Seconds(0.01);

    #[allow(missing_docs)]
    pub fn new_with(sample_rate: SampleRate) -> Self {
        Self {
            inner: ButterworthFilter::new_with(
                FilterKind::LowPass,
                ButterworthFilter::DEFAULT_ORDER,
                FrequencyHz(1000.0),
                sample_rate,
            ),
            chunk_frames: sample_rate.frames_in(Self::CHUNK).max(1),
        }
    }

    /// Filters `signal` in place. `cutoff` receives the time of each chunk's
    /// first frame.
    pub fn process<F>(&mut self, signal: &mut Signal, mut cutoff: F)
    where
        F: FnMut(Seconds) -> FrequencyHz,
    {
        let sample_rate = signal.sample_rate();
        for (i, chunk) in signal
            .samples_mut()
            .chunks_mut(self.chunk_frames)
            .enumerate()
        {
            self.inner
                .set_cutoff(cutoff(sample_rate.frame_to_seconds(i * self.chunk_frames)));
            self.inner.reset();
            self.inner.transform(chunk);
        }
    }

    #[allow(missing_docs)]
    pub fn chunk_frames(&self) -> usize {
        self.chunk_frames
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CoefficientSet {
    a0: f64,
    a1: f64,
    a2: f64,
    b0: f64,
    b1: f64,
    b2: f64,
}
impl Default for CoefficientSet {
    // This is an identity set.
    fn default() -> Self {
        Self {
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
        }
    }
}
impl CoefficientSet {
    // https://webaudio.github.io/Audio-EQ-Cookbook/audio-eq-cookbook.html
    fn second_order(
        kind: FilterKind,
        sample_rate: SampleRate,
        cutoff: ParameterType,
        q: ParameterType,
    ) -> Self {
        let (_w0, w0cos, _w0sin, alpha) = BiQuadFilter::rbj_intermediates_q(sample_rate, cutoff, q);
        match kind {
            FilterKind::LowPass => Self {
                a0: 1.0 + alpha,
                a1: -2.0f64 * w0cos,
                a2: 1.0 - alpha,
                b0: (1.0 - w0cos) / 2.0f64,
                b1: (1.0 - w0cos),
                b2: (1.0 - w0cos) / 2.0f64,
            },
            FilterKind::HighPass => Self {
                a0: 1.0 + alpha,
                a1: -2.0f64 * w0cos,
                a2: 1.0 - alpha,
                b0: (1.0 + w0cos) / 2.0f64,
                b1: -(1.0 + w0cos),
                b2: (1.0 + w0cos) / 2.0f64,
            },
        }
    }

    // Bilinear transform of 1/(s + 1), prewarped to the cutoff.
    fn first_order(kind: FilterKind, sample_rate: SampleRate, cutoff: ParameterType) -> Self {
        let k = (PI * cutoff / sample_rate.0 as f64).tan();
        let a1 = (k - 1.0) / (k + 1.0);
        match kind {
            FilterKind::LowPass => Self {
                a0: 1.0,
                a1,
                a2: 0.0,
                b0: k / (k + 1.0),
                b1: k / (k + 1.0),
                b2: 0.0,
            },
            FilterKind::HighPass => Self {
                a0: 1.0,
                a1,
                a2: 0.0,
                b0: 1.0 / (k + 1.0),
                b1: -1.0 / (k + 1.0),
                b2: 0.0,
            },
        }
    }
}

/// <https://en.wikipedia.org/wiki/Digital_biquad_filter>
#[derive(Clone, Debug, Default)]
pub struct BiQuadFilter {
    coefficients: CoefficientSet,

    // Working variables
    sample_m1: f64, // "sample minus one" or x(n-1)
    sample_m2: f64,
    output_m1: f64,
    output_m2: f64,
}
impl TransformsAudio for BiQuadFilter {
    fn transform_sample(&mut self, input_sample: Sample) -> Sample {
        let s64 = input_sample.0;
        let r = (self.coefficients.b0 / self.coefficients.a0) * s64
            + (self.coefficients.b1 / self.coefficients.a0) * self.sample_m1
            + (self.coefficients.b2 / self.coefficients.a0) * self.sample_m2
            - (self.coefficients.a1 / self.coefficients.a0) * self.output_m1
            - (self.coefficients.a2 / self.coefficients.a0) * self.output_m2;

        // Scroll everything forward in time.
        self.sample_m2 = self.sample_m1;
        self.sample_m1 = s64;

        self.output_m2 = self.output_m1;
        self.output_m1 = r;
        Sample::from(r)
    }
}
impl BiQuadFilter {
    // Excerpted from Robert Bristow-Johnson's audio cookbook to explain various
    // parameters
    //
    // Fs (the sampling frequency)
    //
    // f0 ("wherever it's happenin', man."  Center Frequency or Corner
    //     Frequency, or shelf midpoint frequency, depending on which filter
    //     type.  The "significant frequency".)
    //
    // Q (the EE kind of definition)
    fn rbj_intermediates_q(
        sample_rate: SampleRate,
        cutoff: ParameterType,
        q: ParameterType,
    ) -> (f64, f64, f64, f64) {
        let w0 = 2.0f64 * PI * cutoff / sample_rate.0 as f64;
        let w0cos = w0.cos();
        let w0sin = w0.sin();
        let alpha = w0sin / (2.0 * q.max(ParameterType::EPSILON));
        (w0, w0cos, w0sin, alpha)
    }

    fn set_coefficients(&mut self, coefficient_set: CoefficientSet) {
        self.coefficients = coefficient_set;
    }

    /// Forgets the filter's history.
    pub fn reset(&mut self) {
        self.sample_m1 = 0.0;
        self.sample_m2 = 0.0;
        self.output_m1 = 0.0;
        self.output_m2 = 0.0;
    }
}
