/// Implements `*`, `/`, `*=` and `/=` between a half-turn newtype and each
/// listed numeric factor type. The newtype must provide `new(f64)` and
/// `half_rotations() -> f64`.
#[macro_export]
macro_rules! impl_rotation_scaling {
    ($name:ty => $($factor:ty),+ $(,)?) => {
        $(
            impl ::core::ops::Mul<$factor> for $name {
                type Output = $name;

                fn mul(self, factor: $factor) -> $name {
                    <$name>::new(self.half_rotations() * factor as f64)
                }
            }

            impl ::core::ops::Mul<$name> for $factor {
                type Output = $name;

                fn mul(self, rotation: $name) -> $name {
                    rotation * self
                }
            }

            impl ::core::ops::MulAssign<$factor> for $name {
                fn mul_assign(&mut self, factor: $factor) {
                    *self = *self * factor;
                }
            }

            impl ::core::ops::Div<$factor> for $name {
                type Output = $name;

                fn div(self, factor: $factor) -> $name {
                    <$name>::new(self.half_rotations() / factor as f64)
                }
            }

            impl ::core::ops::DivAssign<$factor> for $name {
                fn div_assign(&mut self, factor: $factor) {
                    *self = *self / factor;
                }
            }
        )+
    };
}
