use crate::rotation::RelativeRotation;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("layout parameter `{field}` is not finite")]
    NonFinite { field: &'static str },
}

/// The tunable shape of a rotary menu at both ends of its expansion.
///
/// Forms a vector space component by component so an animation driver can
/// blend two parameter sets the same way it blends a single scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParameters {
    pub rotary_offset_when_contracted: RelativeRotation,
    pub rotary_offset_when_expanded: RelativeRotation,
    pub item_ring_radius_when_expanded: f64,
    pub item_ring_radius_when_contracted: f64,
    pub item_radius_when_expanded: f64,
    pub item_radius_when_contracted: f64,
    pub center_item_radius_when_expanded: f64,
    pub center_item_radius_when_contracted: f64,
    /// The direction treated as angle zero for ring placement.
    pub neutral_rotation_from_zero: RelativeRotation,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            rotary_offset_when_contracted: RelativeRotation::ZERO,
            rotary_offset_when_expanded: RelativeRotation::ZERO,
            item_ring_radius_when_expanded: 80.0,
            item_ring_radius_when_contracted: 0.0,
            item_radius_when_expanded: 44.0,
            item_radius_when_contracted: 11.0,
            center_item_radius_when_expanded: 44.0,
            center_item_radius_when_contracted: 56.0,
            neutral_rotation_from_zero: RelativeRotation::ZERO,
        }
    }
}

// Applies `$op` field by field. Rotations and lengths share the operator set
// so one list covers both.
macro_rules! componentwise {
    ($lhs:expr, $rhs:expr, $op:tt) => {
        LayoutParameters {
            rotary_offset_when_contracted: $lhs.rotary_offset_when_contracted
                $op $rhs.rotary_offset_when_contracted,
            rotary_offset_when_expanded: $lhs.rotary_offset_when_expanded
                $op $rhs.rotary_offset_when_expanded,
            item_ring_radius_when_expanded: $lhs.item_ring_radius_when_expanded
                $op $rhs.item_ring_radius_when_expanded,
            item_ring_radius_when_contracted: $lhs.item_ring_radius_when_contracted
                $op $rhs.item_ring_radius_when_contracted,
            item_radius_when_expanded: $lhs.item_radius_when_expanded
                $op $rhs.item_radius_when_expanded,
            item_radius_when_contracted: $lhs.item_radius_when_contracted
                $op $rhs.item_radius_when_contracted,
            center_item_radius_when_expanded: $lhs.center_item_radius_when_expanded
                $op $rhs.center_item_radius_when_expanded,
            center_item_radius_when_contracted: $lhs.center_item_radius_when_contracted
                $op $rhs.center_item_radius_when_contracted,
            neutral_rotation_from_zero: $lhs.neutral_rotation_from_zero
                $op $rhs.neutral_rotation_from_zero,
        }
    };
}

impl LayoutParameters {
    pub fn zero() -> Self {
        Self {
            rotary_offset_when_contracted: RelativeRotation::ZERO,
            rotary_offset_when_expanded: RelativeRotation::ZERO,
            item_ring_radius_when_expanded: 0.0,
            item_ring_radius_when_contracted: 0.0,
            item_radius_when_expanded: 0.0,
            item_radius_when_contracted: 0.0,
            center_item_radius_when_expanded: 0.0,
            center_item_radius_when_contracted: 0.0,
            neutral_rotation_from_zero: RelativeRotation::ZERO,
        }
    }

    fn components(&self) -> [(&'static str, f64); 9] {
        [
            (
                "rotary_offset_when_contracted",
                self.rotary_offset_when_contracted.half_rotations(),
            ),
            (
                "rotary_offset_when_expanded",
                self.rotary_offset_when_expanded.half_rotations(),
            ),
            (
                "item_ring_radius_when_expanded",
                self.item_ring_radius_when_expanded,
            ),
            (
                "item_ring_radius_when_contracted",
                self.item_ring_radius_when_contracted,
            ),
            ("item_radius_when_expanded", self.item_radius_when_expanded),
            ("item_radius_when_contracted", self.item_radius_when_contracted),
            (
                "center_item_radius_when_expanded",
                self.center_item_radius_when_expanded,
            ),
            (
                "center_item_radius_when_contracted",
                self.center_item_radius_when_contracted,
            ),
            (
                "neutral_rotation_from_zero",
                self.neutral_rotation_from_zero.half_rotations(),
            ),
        ]
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        match self
            .components()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            Some((field, _)) => Err(ParameterError::NonFinite { field }),
            None => Ok(()),
        }
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.components()
            .into_iter()
            .map(|(_, value)| value * value)
            .sum()
    }

    pub fn scale(&mut self, by: f64) {
        *self *= by;
    }
}

impl Add for LayoutParameters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        componentwise!(self, rhs, +)
    }
}

impl AddAssign for LayoutParameters {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for LayoutParameters {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        componentwise!(self, rhs, -)
    }
}

impl SubAssign for LayoutParameters {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for LayoutParameters {
    type Output = Self;

    fn neg(self) -> Self {
        Self::zero() - self
    }
}

impl Mul<f64> for LayoutParameters {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self {
            rotary_offset_when_contracted: self.rotary_offset_when_contracted * factor,
            rotary_offset_when_expanded: self.rotary_offset_when_expanded * factor,
            item_ring_radius_when_expanded: self.item_ring_radius_when_expanded * factor,
            item_ring_radius_when_contracted: self.item_ring_radius_when_contracted * factor,
            item_radius_when_expanded: self.item_radius_when_expanded * factor,
            item_radius_when_contracted: self.item_radius_when_contracted * factor,
            center_item_radius_when_expanded: self.center_item_radius_when_expanded * factor,
            center_item_radius_when_contracted: self.center_item_radius_when_contracted * factor,
            neutral_rotation_from_zero: self.neutral_rotation_from_zero * factor,
        }
    }
}

impl MulAssign<f64> for LayoutParameters {
    fn mul_assign(&mut self, factor: f64) {
        *self = *self * factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let params = LayoutParameters::default();
        assert_eq!(params.item_ring_radius_when_expanded, 80.0);
        assert_eq!(params.item_ring_radius_when_contracted, 0.0);
        assert_eq!(params.item_radius_when_expanded, 44.0);
        assert_eq!(params.item_radius_when_contracted, 11.0);
        assert_eq!(params.center_item_radius_when_expanded, 44.0);
        assert_eq!(params.center_item_radius_when_contracted, 56.0);
        assert_eq!(params.neutral_rotation_from_zero, RelativeRotation::ZERO);
    }

    #[test]
    fn test_vector_space() {
        let a = LayoutParameters::default();
        let mut b = LayoutParameters::default();
        b.rotary_offset_when_expanded = RelativeRotation::new(0.5);
        b.item_radius_when_expanded = 20.0;

        let sum = a + b;
        assert_eq!(sum.item_ring_radius_when_expanded, 160.0);
        assert_eq!(sum.item_radius_when_expanded, 64.0);
        assert_eq!(sum.rotary_offset_when_expanded, RelativeRotation::new(0.5));
        assert_eq!(sum - b, a);
        assert_eq!(a + LayoutParameters::zero(), a);
        assert_eq!(a + (-a), LayoutParameters::zero());

        let mut doubled = a;
        doubled.scale(2.0);
        assert_eq!(doubled, a + a);

        let mut accumulated = a;
        accumulated += b;
        accumulated -= a;
        assert_eq!(accumulated, b);
    }

    #[test]
    fn test_magnitude_squared() {
        let mut params = LayoutParameters::zero();
        assert_eq!(params.magnitude_squared(), 0.0);
        params.item_radius_when_expanded = 3.0;
        params.neutral_rotation_from_zero = RelativeRotation::new(4.0);
        assert_eq!(params.magnitude_squared(), 25.0);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(LayoutParameters::default().validate().is_ok());
        let params = LayoutParameters {
            center_item_radius_when_contracted: f64::NAN,
            ..LayoutParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParameterError::NonFinite {
                field: "center_item_radius_when_contracted"
            })
        );
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let params: LayoutParameters = serde_json::from_str(
            r#"{ "item_ring_radius_when_expanded": 120.0, "rotary_offset_when_expanded": -0.5 }"#,
        )
        .unwrap();
        assert_eq!(params.item_ring_radius_when_expanded, 120.0);
        assert_eq!(params.rotary_offset_when_expanded, RelativeRotation::new(-0.5));
        assert_eq!(params.item_radius_when_contracted, 11.0);
    }
}
