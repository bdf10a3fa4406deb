use rand::Rng;
use rotary::{Lerp, lerp};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    Smoothstep,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Out-of-range
    /// progress is clamped first.
    pub fn apply(self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// A value moving from one state to another over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl<T: Lerp + Copy> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// A tween that has already arrived at `value`.
    pub fn settled(value: T) -> Self {
        Self::new(value, value, Duration::ZERO, Easing::Linear)
    }

    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        let progress = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        lerp(self.from, self.to, self.easing.apply(progress))
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: Duration) -> T {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Starts over from wherever the tween is now.
    pub fn retarget(&mut self, to: T, duration: Duration, easing: Easing) {
        *self = Self::new(self.value(), to, duration, easing);
    }
}

/// Where the expand/contract cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LoopPhase {
    #[default]
    Idle,
    AnimatingToExpanded,
    AnimatingToContracted,
}

impl LoopPhase {
    pub fn toward(target_level: f64) -> Self {
        if target_level >= 0.5 {
            Self::AnimatingToExpanded
        } else {
            Self::AnimatingToContracted
        }
    }

    /// The level the next leg of a loop heads for: a mostly contracted menu
    /// expands, anything else contracts.
    pub fn next_target(current_level: f64) -> f64 {
        if current_level < 0.5 { 1.0 } else { 0.0 }
    }
}

/// Picks a duration for a loop leg uniformly from `[min, max]` seconds.
pub fn random_duration(rng: &mut impl Rng, min: f64, max: f64) -> Duration {
    let seconds = if min < max {
        rng.random_range(min..=max)
    } else {
        min
    };
    Duration::from_secs_f64(seconds.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_easing_endpoints() {
        for easing in Easing::iter() {
            assert_abs_diff_eq!(easing.apply(0.0), 0.0);
            assert_abs_diff_eq!(easing.apply(1.0), 1.0);
            assert_abs_diff_eq!(easing.apply(-3.0), 0.0);
            assert_abs_diff_eq!(easing.apply(7.0), 1.0);
        }
        assert_abs_diff_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert_abs_diff_eq!(Easing::Smoothstep.apply(0.5), 0.5);
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn test_easing_deserialization() {
        let cases = vec![
            ("\"linear\"", Easing::Linear),
            ("\"Linear\"", Easing::Linear),
            ("\"ease-in-out\"", Easing::EaseInOut),
            ("\"EASE-OUT\"", Easing::EaseOut),
            ("\"smoothstep\"", Easing::Smoothstep),
        ];

        for (json, expected) in cases {
            let deserialized: Easing = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(Easing::from_str("bounce").is_err());
    }

    #[test]
    fn test_tween_progress() {
        let mut tween = Tween::new(0.0, 1.0, Duration::from_secs(2), Easing::Linear);
        assert_eq!(tween.value(), 0.0);
        assert_abs_diff_eq!(tween.advance(Duration::from_millis(500)), 0.25);
        assert!(!tween.is_finished());
        assert_abs_diff_eq!(tween.advance(Duration::from_secs(1)), 0.75);
        assert_eq!(tween.advance(Duration::from_secs(10)), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_zero_duration_jumps() {
        let tween = Tween::new(0.0, 1.0, Duration::ZERO, Easing::EaseInOut);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 1.0);
        assert_eq!(Tween::settled(0.4).value(), 0.4);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut tween = Tween::new(0.0, 1.0, Duration::from_secs(1), Easing::Linear);
        tween.advance(Duration::from_millis(600));
        tween.retarget(0.0, Duration::from_secs(2), Easing::Linear);
        assert_abs_diff_eq!(tween.value(), 0.6);
        assert_eq!(tween.target(), 0.0);
        assert_abs_diff_eq!(tween.advance(Duration::from_secs(1)), 0.3);
    }

    #[test]
    fn test_loop_targets() {
        assert_eq!(LoopPhase::next_target(0.0), 1.0);
        assert_eq!(LoopPhase::next_target(0.49), 1.0);
        assert_eq!(LoopPhase::next_target(0.5), 0.0);
        assert_eq!(LoopPhase::next_target(1.0), 0.0);
        assert_eq!(LoopPhase::toward(1.0), LoopPhase::AnimatingToExpanded);
        assert_eq!(LoopPhase::toward(0.0), LoopPhase::AnimatingToContracted);
    }

    #[test]
    fn test_random_duration_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let duration = random_duration(&mut rng, 0.25, 3.0).as_secs_f64();
            assert!((0.25..=3.0).contains(&duration), "{duration}");
        }
        assert_eq!(
            random_duration(&mut rng, 1.5, 1.5),
            Duration::from_secs_f64(1.5)
        );
    }
}
