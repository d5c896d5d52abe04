// Copyright (c) 2024 Mike Tsao

//! Provides a random-number generator for noise sources.

use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// A pseudorandom number generator (PRNG) for applications such as
/// digital-audio libraries that don't require cryptographically secure random
/// numbers.
#[derive(Debug)]
pub struct Rng {
    inner: oorandom::Rand64,
    spare_gaussian: Option<f64>,
}
impl Default for Rng {
    fn default() -> Self {
        // If the OS can't give us entropy, fall back to a fixed seed. Noise
        // doesn't need to be unpredictable, just noisy.
        let seed = Self::generate_seed().unwrap_or_else(|e| {
            log::warn!("couldn't get a random seed from the OS ({e}); using a fixed one");
            Self::FALLBACK_SEED
        });
        Self::new_with_seed(seed)
    }
}
#[allow(missing_docs)]
impl Rng {
    const FALLBACK_SEED: u128 = 0x70f4_f854_e1e9_f0a7;

    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing renders and test failures.
    pub fn new_with_seed(seed: u128) -> Self {
        Self {
            inner: oorandom::Rand64::new(seed),
            spare_gaussian: None,
        }
    }

    /// Create a sufficiently high-quality random number that's suitable for
    /// [Rng].
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    delegate! {
        to self.inner {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_i64(&mut self) -> i64;
            pub fn rand_float(&mut self) -> f64;
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }

    /// Returns a value from the standard normal distribution (mean 0,
    /// variance 1).
    ///
    /// <https://en.wikipedia.org/wiki/Box%E2%80%93Muller_transform>
    pub fn gaussian(&mut self) -> f64 {
        if let Some(spare) = self.spare_gaussian.take() {
            return spare;
        }
        // rand_float() is in [0, 1), so flip it to keep ln() finite.
        let u1 = 1.0 - self.rand_float();
        let u2 = self.rand_float();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * core::f64::consts::PI * u2;
        self.spare_gaussian = Some(radius * theta.sin());
        radius * theta.cos()
    }
}
