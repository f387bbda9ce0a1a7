use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CredibilityError {
    #[error("credibility {0} is outside the open interval (0, 1)")]
    OutOfRange(f64),

    #[error("faulty fraction {0} is outside the open interval (0, 1)")]
    InvalidFaultyFraction(f64),

    #[error("clamp epsilon {0} must be in [f64::EPSILON, 0.5)")]
    InvalidEpsilon(f64),
}
