// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Soft-clips the signal with `tanh(x × gain)`. Higher gain means more
/// saturation; the output never leaves [-1, 1].
#[derive(Debug, Clone, Derivative, Builder, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct Distortion {
    #[derivative(Default(value = "3.0"))]
    gain: ParameterType,
}
impl TransformsAudio for Distortion {
    fn transform_sample(&mut self, input_sample: Sample) -> Sample {
        Sample((input_sample.0 * self.gain).tanh())
    }
}
impl Distortion {
    #[allow(missing_docs)]
    pub fn new_with(gain: ParameterType) -> Self {
        Self { gain }
    }

    #[allow(missing_docs)]
    pub fn gain(&self) -> ParameterType {
        self.gain
    }

    #[allow(missing_docs)]
    pub fn set_gain(&mut self, gain: ParameterType) {
        self.gain = gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn distortion_mainline() {
        let mut distortion = DistortionBuilder::default().build().unwrap();
        assert_eq!(distortion.gain(), 3.0);
        assert_eq!(distortion.transform_sample(Sample::SILENCE), Sample::SILENCE);
        assert!(approx_eq!(
            f64,
            distortion.transform_sample(Sample(0.5)).0,
            1.5f64.tanh()
        ));
        assert!(approx_eq!(
            f64,
            distortion.transform_sample(Sample(-0.5)).0,
            -(1.5f64.tanh())
        ));

        distortion.set_gain(100.0);
        let saturated = distortion.transform_sample(Sample(0.9)).0;
        assert!(saturated <= 1.0 && saturated > 0.999);
    }
}
