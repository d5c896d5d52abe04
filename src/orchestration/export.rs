// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use std::path::Path;

/// Writes soundtracks as 16-bit stereo WAV files. The right channel is the
/// left delayed by a fraction of a millisecond, which widens the image a
/// little without changing the mix.
#[derive(Debug, Clone)]
pub struct WavExporter {
    stereo_delay: Seconds,
    output_level: f64,
}
impl Default for WavExporter {
    fn default() -> Self {
        Self::new_with(Self::DEFAULT_STEREO_DELAY, Self::DEFAULT_OUTPUT_LEVEL)
    }
}
impl WavExporter {
    /// About 13 frames at 44.1 kHz.
    pub const DEFAULT_STEREO_DELAY: Seconds = Seconds(0.0003);
    /// Full scale maps to this PCM value. A bit under [i16::MAX] for headroom.
    pub const DEFAULT_OUTPUT_LEVEL: f64 = 30000.0;

    #[allow(missing_docs)]
    pub fn new_with(stereo_delay: Seconds, output_level: f64) -> Self {
        Self {
            stereo_delay,
            output_level,
        }
    }

    /// Splits a mono signal into the left and delayed right channels. Both
    /// are clipped to [-1, 1].
    pub fn to_stereo(&self, signal: &Signal) -> Vec<StereoSample> {
        let delay = signal.sample_rate().frames_in(self.stereo_delay);
        let samples = signal.samples();
        samples
            .iter()
            .enumerate()
            .map(|(i, left)| {
                let right = if i >= delay {
                    samples[i - delay]
                } else {
                    Sample::SILENCE
                };
                StereoSample::new(left.clipped(), right.clipped())
            })
            .collect()
    }

    /// Writes the signal to `path` at the signal's sample rate.
    pub fn export_to_wav(&self, signal: &Signal, path: &Path) -> anyhow::Result<()> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: signal.sample_rate().into(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| anyhow::format_err!("Couldn't create {path:?}: {}", e))?;
        for frame in self.to_stereo(signal) {
            let (left, right) = frame.into_i16_with_level(self.output_level);
            writer.write_sample(left)?;
            writer.write_sample(right)?;
        }
        writer.finalize()?;
        log::debug!(
            "wrote {} frames ({}) to {path:?}",
            signal.len(),
            signal.duration()
        );
        Ok(())
    }
}
