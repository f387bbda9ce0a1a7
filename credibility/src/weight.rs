//! Alternative payout weights derived from credibility.

use crate::credibility::Credibility;

/// `-ln(1 - cr)`: grows without bound as credibility approaches 1, so highly
/// trusted participants dominate a payout split much more than under linear
/// credibility weights.
pub fn log_odds_weight(cr: Credibility) -> f64 {
    -(-cr.value()).ln_1p()
}
