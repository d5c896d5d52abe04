// Copyright (c) 2024 Mike Tsao

use core::{fmt::Display, ops::Mul};
use serde::{Deserialize, Serialize};

/// [RangedF64] keeps an f64 within `LOWER..=UPPER` when it's created or
/// converted from a plain f64. Math on the inner value is not checked, and
/// clamping is silent.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(pub f64);
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;

    /// Clamps `value` into range.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// For constant tables. The caller promises `value` is in range.
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }
}
impl<const LOWER: i8, const UPPER: i8> Display for RangedF64<LOWER, UPPER> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f64> for RangedF64<LOWER, UPPER> {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<RangedF64<LOWER, UPPER>> for f64 {
    fn from(value: RangedF64<LOWER, UPPER>) -> Self {
        value.0
    }
}

/// A [Normal] is a RangedF64 whose range is [0.0, 1.0]. Envelope levels are
/// Normals.
pub type Normal = RangedF64<0, 1>;
impl Default for Normal {
    // A default-constructed level shouldn't silently zero out a signal.
    fn default() -> Self {
        Self(1.0)
    }
}
impl Mul<Normal> for f64 {
    type Output = Self;

    fn mul(self, rhs: Normal) -> Self::Output {
        self * rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_out_of_bounds() {
        assert_eq!(
            Normal::new(-1.0),
            Normal::new(0.0),
            "Normal below 0.0 should be clamped to 0.0"
        );
        assert_eq!(
            Normal::from(1.1),
            Normal::new(1.0),
            "Normal above 1.0 should be clamped to 1.0"
        );
        assert_eq!(Normal::default().0, 1.0);
    }

    #[test]
    fn scaling() {
        assert_eq!(2.0 * Normal::new(0.25), 0.5);
        assert_eq!(f64::from(Normal::new(0.3)), 0.3);
    }
}
