// Copyright (c) 2024 Mike Tsao

//! Wall-clock and musical time.

use core::{
    fmt,
    ops::{Div, Mul},
};
use derivative::Derivative;
use derive_more::{Add, Display, From, Sub};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of
/// time. This is the logical time that every scheduled event carries.
///
/// Ordering is total for the values we care about (finite numbers), and
/// nothing assumes that two instants are distinct.
#[derive(
    Add,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    From,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    Sub,
)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }

    /// Whether this is a usable duration: finite and not negative.
    pub fn is_valid_duration(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}
impl Mul<f64> for Seconds {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl Div<f64> for Seconds {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}
impl From<Seconds> for f64 {
    fn from(value: Seconds) -> Self {
        value.0
    }
}

/// Beats per minute.
#[derive(Synonym, Serialize, Deserialize, Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
#[synonym(skip(Default, Clone, Copy, Debug, PartialEq, Display))]
#[serde(rename_all = "kebab-case")]
pub struct Tempo(#[derivative(Default(value = "120.0"))] pub f64);
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} BPM", self.0))
    }
}
impl From<u16> for Tempo {
    fn from(value: u16) -> Self {
        Self(value as f64)
    }
}
impl Tempo {
    /// The largest value we'll allow.
    pub const MAX_VALUE: f64 = 1024.0;

    /// The smallest value we'll allow. Zero would mean a beat never ends.
    pub const MIN_VALUE: f64 = 1.0;

    /// Beats per second.
    pub fn bps(&self) -> f64 {
        self.0 / 60.0
    }

    /// How long one beat lasts at this tempo. Out-of-range tempos are clamped,
    /// and a tempo that isn't a number at all counts as the default.
    pub fn beat_duration(&self) -> Seconds {
        let bpm = if self.0.is_finite() {
            self.0
        } else {
            Self::default().0
        };
        Seconds(60.0 / bpm.clamp(Self::MIN_VALUE, Self::MAX_VALUE))
    }

    /// MIN..=MAX
    pub const fn range() -> core::ops::RangeInclusive<f64> {
        Self::MIN_VALUE..=Self::MAX_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn seconds_arithmetic() {
        let t = Seconds(1.0) + Seconds(0.25);
        assert_eq!(t, Seconds(1.25));
        assert_eq!(t - Seconds(0.25), Seconds(1.0));
        assert_eq!(Seconds(0.1) / 4.0, Seconds(0.025));
        assert_eq!(Seconds(2.0) * 1.5, Seconds(3.0));
        assert!(Seconds(1.0) < Seconds(1.5));
    }

    #[test]
    fn seconds_validity() {
        assert!(Seconds::zero().is_valid_duration());
        assert!(Seconds(3.0).is_valid_duration());
        assert!(!Seconds(-0.001).is_valid_duration());
        assert!(!Seconds(f64::NAN).is_valid_duration());
        assert!(!Seconds(f64::INFINITY).is_valid_duration());
    }

    #[test]
    fn tempo_beat_duration() {
        assert_eq!(Tempo::default().0, 120.0);
        assert!(approx_eq!(f64, Tempo(120.0).beat_duration().0, 0.5));
        assert!(approx_eq!(f64, Tempo(60.0).beat_duration().0, 1.0));
        assert!(approx_eq!(f64, Tempo(120.0).bps(), 2.0));

        // Degenerate tempos are clamped rather than dividing by zero.
        assert!(approx_eq!(f64, Tempo(0.0).beat_duration().0, 60.0));
        for bpm in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                approx_eq!(f64, Tempo(bpm).beat_duration().0, 0.5),
                "{bpm} BPM should fall back to the default tempo"
            );
        }
        assert_eq!(format!("{}", Tempo(128.0)), "128.00 BPM");
    }
}
