//! Validated credibility value.

use crate::error::CredibilityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default distance kept from 0 and 1 when clamping.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// A probability of honesty, strictly inside (0, 1).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Credibility(f64);

impl Credibility {
    pub fn new(p: f64) -> Result<Self, CredibilityError> {
        if p > 0.0 && p < 1.0 {
            Ok(Self(p))
        } else {
            Err(CredibilityError::OutOfRange(p))
        }
    }

    /// Clamp `p` into `[eps, 1 - eps]`. NaN maps to `eps` (no trust).
    ///
    /// `eps` itself is clamped into `[f64::EPSILON, 0.5]` so the result is
    /// always representable strictly below 1.
    pub fn clamped(p: f64, eps: f64) -> Self {
        let eps = if eps.is_nan() {
            DEFAULT_EPSILON
        } else {
            eps.clamp(f64::EPSILON, 0.5)
        };
        if p.is_nan() {
            return Self(eps);
        }
        Self(p.clamp(eps, 1.0 - eps))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Probability the vote is dishonest, `1 - p`.
    pub fn distrust(self) -> f64 {
        1.0 - self.0
    }

    /// `ln(p / (1 - p))`.
    pub fn log_odds(self) -> f64 {
        self.0.ln() - (-self.0).ln_1p()
    }
}

impl TryFrom<f64> for Credibility {
    type Error = CredibilityError;

    fn try_from(p: f64) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl From<Credibility> for f64 {
    fn from(c: Credibility) -> f64 {
        c.0
    }
}

impl fmt::Display for Credibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_rejected() {
        assert!(Credibility::new(0.0).is_err());
        assert!(Credibility::new(1.0).is_err());
        assert!(Credibility::new(-0.1).is_err());
        assert!(Credibility::new(f64::NAN).is_err());
        assert!(Credibility::new(0.5).is_ok());
    }

    #[test]
    fn clamping_keeps_open_interval() {
        assert_eq!(Credibility::clamped(1.0, 1e-6).value(), 1.0 - 1e-6);
        assert_eq!(Credibility::clamped(0.0, 1e-6).value(), 1e-6);
        assert_eq!(Credibility::clamped(0.7, 1e-6).value(), 0.7);
        assert_eq!(Credibility::clamped(f64::NAN, 1e-6).value(), 1e-6);
        assert!(Credibility::clamped(1.0, 0.0).value() < 1.0);
    }

    #[test]
    fn log_odds_of_even_is_zero() {
        assert!(Credibility::new(0.5).unwrap().log_odds().abs() < 1e-15);
        let c = Credibility::new(0.9).unwrap();
        assert!((c.log_odds() - 9f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn distrust_complements() {
        let c = Credibility::new(0.8).unwrap();
        assert!((c.distrust() - 0.2).abs() < 1e-12);
    }
}
