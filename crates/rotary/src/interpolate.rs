use std::ops::{Add, Mul, Sub};

/// Linear interpolation for anything that behaves like a vector over `f64`.
pub trait Lerp: Sized {
    /// `start` at position 0, `limit` at position 1, extrapolated beyond.
    fn lerp(start: Self, limit: Self, position: f64) -> Self;
}

impl<T> Lerp for T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    fn lerp(start: T, limit: T, position: f64) -> T {
        // Both endpoints are hit exactly: `start + (limit - start) * 1` can be
        // off by an ulp when the difference rounds.
        if position == 1.0 {
            limit
        } else {
            start + (limit - start) * position
        }
    }
}

pub fn lerp<T: Lerp>(start: T, limit: T, position: f64) -> T {
    T::lerp(start, limit, position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::LayoutParameters;
    use crate::rotation::RelativeRotation;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scalar_endpoints_are_exact() {
        let cases = [(0.1, 0.3), (56.0, 44.0), (-1e-9, 1e9), (3.0, 3.0)];
        for (start, limit) in cases {
            assert_eq!(lerp(start, limit, 0.0), start);
            assert_eq!(lerp(start, limit, 1.0), limit);
        }
    }

    #[test]
    fn test_rotation_endpoints_are_exact() {
        let start = RelativeRotation::new(0.1);
        let limit = RelativeRotation::complete_rotation(3.0) + RelativeRotation::new(0.2);
        assert_eq!(lerp(start, limit, 0.0), start);
        assert_eq!(lerp(start, limit, 1.0), limit);
        assert_abs_diff_eq!(lerp(start, limit, 0.5).half_rotations(), 3.15, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolates_outside_unit_range() {
        assert_eq!(lerp(0.0, 80.0, 1.25), 100.0);
        assert_eq!(lerp(0.0, 80.0, -0.5), -40.0);
        assert_eq!(
            lerp(RelativeRotation::ZERO, RelativeRotation::new(4.0), 1.5),
            RelativeRotation::new(6.0)
        );
    }

    #[test]
    fn test_parameter_blending() {
        let from = LayoutParameters::default();
        let to = LayoutParameters {
            item_ring_radius_when_expanded: 120.0,
            neutral_rotation_from_zero: RelativeRotation::new(-0.5),
            ..LayoutParameters::default()
        };
        let halfway = lerp(from, to, 0.5);
        assert_eq!(halfway.item_ring_radius_when_expanded, 100.0);
        assert_eq!(halfway.neutral_rotation_from_zero, RelativeRotation::new(-0.25));
        assert_eq!(halfway.item_radius_when_expanded, 44.0);
        assert_eq!(lerp(from, to, 1.0), to);
    }
}
