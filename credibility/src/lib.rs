//! Credibility: the probability that a participant's vote is honest.
//!
//! The consensus engine consumes credibility through the [`CredibilityModel`]
//! capability and never bakes in a default value. Models should return values in
//! the open interval (0, 1). Exactly 1 declares the voter certain, which the
//! consensus engine treats as an outright win; 0 is rejected. Models built on
//! raw reputation scores should wrap themselves in [`Clamped`].
//!
//! Stock models:
//! - [`ConstantCredibility`]: every vote gets the same value.
//! - [`TableCredibility`]: per-participant values with a default.
//! - [`HistoryCredibility`]: spot-check credibility `1 - f/(k+1)` from a
//!   participant's count of previously validated results.

pub mod credibility;
pub mod error;
pub mod model;
pub mod weight;

pub use credibility::{Credibility, DEFAULT_EPSILON};
pub use error::CredibilityError;
pub use model::{Clamped, ConstantCredibility, CredibilityModel, HistoryCredibility, TableCredibility};
pub use weight::log_odds_weight;
