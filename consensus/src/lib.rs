//! Consensus: credibility-weighted Bayesian resolution of independently
//! submitted results (Sarmenta's credibility-based voting).
//!
//! - Participants reveal votes into a [`ConsensusRound`].
//! - Votes are partitioned into groups by declared result, in first-seen order.
//! - Each group is scored with the probability that its result is the correct
//!   one given every voter's credibility.
//! - The round resolves once the best group's score reaches the confidence target.
//!
//! ## Module overview
//!
//! - [`group`]: Partitioning votes by result with deterministic ordering.
//! - [`scoring`]: Log-space Bayesian group scores and the certainty policy.
//! - [`round`]: Round state machine (Open → Resolved) and its result.
//! - [`error`]: Consensus error types.

pub mod error;
pub mod group;
pub mod round;
pub mod scoring;

pub use error::ConsensusError;
pub use group::{partition, VoteGroup};
pub use round::{ConsensusResult, ConsensusRound, Contribution, RoundState};
pub use scoring::{score_groups, GroupScore, ScoreTable};
