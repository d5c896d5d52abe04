// Copyright (c) 2024 Mike Tsao

use crate::{elements::linspace, prelude::*};
use delegate::delegate;

/// Synthesizes drum hits from oscillators and filtered noise. Every hit is
/// rendered fresh, so two snares are never quite identical.
#[derive(Debug, Default)]
pub struct DrumKit {
    rng: Rng,

    c: Configurables,
}
impl Configurable for DrumKit {
    delegate! {
        to self.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
            fn tempo(&self) -> Tempo;
            fn update_tempo(&mut self, tempo: Tempo);
        }
    }
}
impl DrumKit {
    #[allow(missing_docs)]
    pub const KICK_DURATION: Seconds = Seconds(0.3);
    #[allow(missing_docs)]
    pub const SNARE_DURATION: Seconds = Seconds(0.2);
    #[allow(missing_docs)]
    pub const HIHAT_DURATION: Seconds = Seconds(0.06);
    /// Open hats ignore the requested duration and always ring this long.
    pub const OPEN_HIHAT_DURATION: Seconds = Seconds(0.15);
    #[allow(missing_docs)]
    pub const CLAP_DURATION: Seconds = Seconds(0.15);

    const CLICK_DURATION: Seconds = Seconds(0.005);
    const CLAP_BURSTS: [Seconds; 3] = [Seconds(0.0), Seconds(0.01), Seconds(0.02)];

    #[allow(missing_docs)]
    pub fn new_with(sample_rate: SampleRate, rng: Rng) -> Self {
        Self {
            rng,
            c: Configurables::new_with(sample_rate),
        }
    }

    /// Gaussian noise from this kit's generator.
    pub fn noise(&mut self, duration: Seconds) -> Signal {
        Signal::white_noise(self.sample_rate(), duration, &mut self.rng)
    }

    /// A sine that drops from 200 Hz toward 50 Hz, with a short noise click
    /// on the front.
    pub fn kick(&mut self, duration: Seconds) -> Signal {
        let mut body = Signal::chirp(self.sample_rate(), duration, |t| {
            150.0 * (-t * 20.0).exp() + 50.0
        });
        body.exp_decay(8.0);

        let mut click = self.noise(Self::CLICK_DURATION);
        click.apply_curve(|progress| (-progress * 30.0).exp());
        body.add_scaled(&click, 0.3).scale(0.9);
        body
    }

    /// A 200 Hz body under a burst of high-passed noise.
    pub fn snare(&mut self, duration: Seconds) -> Signal {
        let sample_rate = self.sample_rate();
        let mut body = Oscillator::render(Waveform::Sine, FrequencyHz(200.0), sample_rate, duration);
        body.exp_decay(25.0);

        let mut noise = self.noise(duration);
        noise.exp_decay(15.0).high_pass(FrequencyHz(2000.0));

        body.scale(0.4).add_scaled(&noise, 0.6).scale(0.7);
        body
    }

    /// Band-passed noise. Open hats ring longer and decay more slowly.
    pub fn hihat(&mut self, duration: Seconds, open: bool) -> Signal {
        let (duration, decay_rate) = if open {
            (Self::OPEN_HIHAT_DURATION, 8.0)
        } else {
            (duration, 40.0)
        };
        let mut noise = self.noise(duration);
        noise
            .band_pass(FrequencyHz(6000.0), FrequencyHz(16000.0))
            .exp_decay(decay_rate)
            .scale(0.4);
        noise
    }

    /// Band-passed noise shaped by three quick overlapping bursts.
    pub fn clap(&mut self, duration: Seconds) -> Signal {
        let sample_rate = self.sample_rate();
        let mut noise = self.noise(duration);
        noise.band_pass(FrequencyHz(1000.0), FrequencyHz(8000.0));

        let frames = noise.len();
        let mut envelope = vec![Sample::SILENCE; frames];
        for offset in Self::CLAP_BURSTS {
            let start = sample_rate.frames_in(offset);
            if start >= frames {
                continue;
            }
            let remaining = frames - start;
            envelope[start..]
                .iter_mut()
                .zip(linspace(0.0, 1.0, remaining))
                .for_each(|(e, x)| *e += Sample((-x * 20.0).exp()));
        }
        noise
            .multiply_by(&Signal::from_samples(sample_rate, envelope))
            .scale(0.5);
        noise
    }
}
