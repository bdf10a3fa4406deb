//! Angles measured in half-turns: a full circle is `2.0`, so radians are
//! `π × half_rotations`.

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::iter::Sum;
use std::num::NonZeroUsize;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Half-turns in one complete revolution.
pub const FULL_TURN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RotationError {
    #[error("rotation value {0} is not finite")]
    NonFinite(f64),
    #[error("absolute rotation {0} is outside [0, 2) half-turns")]
    OutOfRange(f64),
    #[error("a full turn cannot be divided into zero steps")]
    ZeroStepCount,
}

/// Maps `value` into `[0, modulus)`.
///
/// Takes the floating remainder and shifts negative remainders up by one
/// modulus. A remainder so close to zero that adding `modulus` rounds to
/// `modulus` itself collapses to `0.0`.
pub fn positive_representation(value: f64, modulus: f64) -> f64 {
    debug_assert!(modulus > 0.0, "modulus must be positive, got {modulus}");
    let remainder = value % modulus;
    let shifted = if remainder >= 0.0 {
        remainder
    } else {
        remainder + modulus
    };
    if shifted >= modulus {
        0.0
    } else {
        // folds -0.0 into 0.0
        shifted + 0.0
    }
}

/// Sine and cosine of `π × half_rotations`.
///
/// The argument is reduced to the nearest quarter turn first so the four
/// axis directions come out exact and large windings lose no precision to a
/// multiplication by π.
fn sin_cos_pi(half_rotations: f64) -> (f64, f64) {
    let quarters = (half_rotations * 2.0).round();
    let residual = half_rotations - quarters * 0.5;
    let (sine, cosine) = (residual * PI).sin_cos();
    match (quarters as i64).rem_euclid(4) {
        0 => (sine, cosine),
        1 => (cosine, -sine),
        2 => (-sine, -cosine),
        _ => (-cosine, sine),
    }
}

/// A direction on the circle, always stored in its canonical form `[0, 2)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[display("{_0} half-turns")]
#[serde(try_from = "f64", into = "f64")]
pub struct AbsoluteRotation(f64);

impl AbsoluteRotation {
    pub const ZERO: Self = Self(0.0);

    fn is_canonical(raw: f64) -> bool {
        raw.is_finite() && (0.0..FULL_TURN).contains(&raw)
    }

    /// Returns `None` unless `raw` is finite and already within `[0, 2)`.
    pub fn try_new(raw: f64) -> Option<Self> {
        Self::is_canonical(raw).then_some(Self(raw))
    }

    /// Wraps a value the caller has already normalized.
    ///
    /// Passing anything outside `[0, 2)` is a programming error: debug builds
    /// panic, release builds log the violation and normalize.
    pub fn new_unchecked(raw: f64) -> Self {
        debug_assert!(
            Self::is_canonical(raw),
            "unchecked absolute rotation {raw} is outside [0, 2)"
        );
        if Self::is_canonical(raw) {
            Self(raw)
        } else if raw.is_finite() {
            log::error!("absolute rotation {raw} was not normalized, normalizing");
            Self(positive_representation(raw, FULL_TURN))
        } else {
            log::error!("absolute rotation {raw} is not finite, using zero");
            Self::ZERO
        }
    }

    pub fn raw(self) -> f64 {
        self.0
    }

    pub fn positive_half_rotations(self) -> f64 {
        self.0
    }

    /// Re-centers the angle on zero: values above one half-turn come back
    /// negative, so the result lies in `(-1, 1]`.
    pub fn balanced_half_rotations(self) -> f64 {
        let positive = self.positive_half_rotations();
        if positive > 1.0 {
            -1.0 + (positive - 1.0)
        } else {
            positive
        }
    }

    pub fn radians(self) -> f64 {
        self.0 * PI
    }

    pub fn rotated(self, by: RelativeRotation) -> Self {
        Self::new_unchecked(positive_representation(
            self.0 + by.half_rotations(),
            FULL_TURN,
        ))
    }

    /// `(sine, cosine)` of the angle.
    pub fn sin_cos(self) -> (f64, f64) {
        sin_cos_pi(self.0)
    }
}

impl TryFrom<f64> for AbsoluteRotation {
    type Error = RotationError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        if !raw.is_finite() {
            return Err(RotationError::NonFinite(raw));
        }
        Self::try_new(raw).ok_or(RotationError::OutOfRange(raw))
    }
}

/// An unbounded, signed rotation: offsets, windings and steps between items.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize,
)]
#[display("{_0} half-turns")]
#[serde(try_from = "f64", into = "f64")]
pub struct RelativeRotation(f64);

impl RelativeRotation {
    pub const ZERO: Self = Self(0.0);

    pub fn new(half_rotations: f64) -> Self {
        debug_assert!(
            half_rotations.is_finite(),
            "relative rotation {half_rotations} is not finite"
        );
        Self(half_rotations)
    }

    pub fn half_rotations(self) -> f64 {
        self.0
    }

    pub fn radians(self) -> f64 {
        self.0 * PI
    }

    /// `count` whole revolutions. Fractional counts are allowed.
    pub fn complete_rotation(count: f64) -> Self {
        Self::new(FULL_TURN * count)
    }

    /// The angle between neighbours when `step_count` items share a circle.
    pub fn incremental_rotation(step_count: usize) -> Result<Self, RotationError> {
        NonZeroUsize::new(step_count)
            .map(Self::step_between)
            .ok_or(RotationError::ZeroStepCount)
    }

    pub fn step_between(step_count: NonZeroUsize) -> Self {
        Self::new(FULL_TURN / step_count.get() as f64)
    }

    pub fn equivalent_absolute_rotation(self) -> AbsoluteRotation {
        AbsoluteRotation::new_unchecked(positive_representation(self.0, FULL_TURN))
    }

    pub fn scale(&mut self, by: f64) {
        *self *= by;
    }

    pub fn magnitude_squared(self) -> f64 {
        self.0 * self.0
    }
}

impl TryFrom<f64> for RelativeRotation {
    type Error = RotationError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        if raw.is_finite() {
            Ok(Self(raw))
        } else {
            Err(RotationError::NonFinite(raw))
        }
    }
}

impl Add for RelativeRotation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for RelativeRotation {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for RelativeRotation {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl SubAssign for RelativeRotation {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for RelativeRotation {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for RelativeRotation {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

crate::impl_rotation_scaling!(RelativeRotation => f64, f32, i32, u32, usize);
