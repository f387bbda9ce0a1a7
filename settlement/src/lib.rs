//! Settlement: redistribution of the kitty after a round resolves.
//!
//! - Losers forfeit their stake into the kitty, which also holds the round cost.
//! - Winners split the kitty in proportion to their contribution weight.
//!
//! The resulting [`TransactionTable`] is a list of signed amounts for an
//! external ledger to execute; nothing here moves funds.

pub mod error;
pub mod outcome;
pub mod table;

pub use error::SettlementError;
pub use outcome::{settle, settle_round, settle_with, SettleRound, Weighting};
pub use table::{Transaction, TransactionTable};
