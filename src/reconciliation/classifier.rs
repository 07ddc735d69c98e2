//! Outcome classification

use bigdecimal::BigDecimal;

use crate::reconciliation::validator::within_tolerance;
use crate::types::*;

/// Classify a ledger record from its match and amount delta.
///
/// Unresolved references take precedence over the amount: a partial match
/// is never reported as a mismatch.
pub fn classify(matches: &MatchResult, delta: &BigDecimal, tolerance: &BigDecimal) -> OutcomeState {
    if !matches.has_matches() {
        OutcomeState::NotFound
    } else if matches.has_unmatched() {
        OutcomeState::PartiallyMatched
    } else if within_tolerance(delta, tolerance) {
        OutcomeState::Reconciled
    } else {
        OutcomeState::AmountMismatch
    }
}
