//! Amount aggregation and tolerance comparison

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Amounts of a ledger record compared against its matched bank records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountCheck {
    /// Sum of the matched bank amounts
    pub aggregated: BigDecimal,
    /// Declared minus aggregated
    pub delta: BigDecimal,
    /// `|delta| <= tolerance`
    pub within_tolerance: bool,
}

/// Compares declared amounts with matched bank amounts
#[derive(Debug, Clone)]
pub struct Validator {
    tolerance: BigDecimal,
}

impl Validator {
    /// Create a validator with the given inclusive tolerance
    pub fn new(tolerance: BigDecimal) -> Self {
        Self { tolerance }
    }

    /// The tolerance in use
    pub fn tolerance(&self) -> &BigDecimal {
        &self.tolerance
    }

    /// Exact sum of the bank amounts
    pub fn aggregate(records: &[BankRecord]) -> BigDecimal {
        records
            .iter()
            .map(|record| &record.amount)
            .fold(BigDecimal::zero(), |acc, amount| acc + amount)
    }

    /// Compare a declared amount with the records of a match
    pub fn check(&self, declared: &BigDecimal, matches: &MatchResult) -> AmountCheck {
        let aggregated = Self::aggregate(&matches.matched);
        let delta = declared - &aggregated;
        let within_tolerance = within_tolerance(&delta, &self.tolerance);

        AmountCheck {
            aggregated,
            delta,
            within_tolerance,
        }
    }
}

/// `|delta| <= tolerance`
pub fn within_tolerance(delta: &BigDecimal, tolerance: &BigDecimal) -> bool {
    delta.abs() <= *tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    fn matched(amounts: &[&str]) -> MatchResult {
        MatchResult {
            matched: amounts
                .iter()
                .enumerate()
                .map(|(row, amount)| BankRecord::new(row, &row.to_string(), dec(amount)))
                .collect(),
            ..MatchResult::default()
        }
    }

    #[test]
    fn test_aggregate_is_exact() {
        let matches = matched(&["0.10", "0.20", "0.30"]);
        assert_eq!(Validator::aggregate(&matches.matched), dec("0.60"));
    }

    #[test]
    fn test_check_delta() {
        let validator = Validator::new(dec("0.01"));
        let check = validator.check(&dec("900.00"), &matched(&["400.00", "500.00"]));

        assert_eq!(check.aggregated, dec("900.00"));
        assert_eq!(check.delta, dec("0"));
        assert!(check.within_tolerance);
    }

    #[test]
    fn test_tolerance_boundary() {
        let validator = Validator::new(dec("0.01"));

        let at_boundary = validator.check(&dec("500.01"), &matched(&["500.00"]));
        assert_eq!(at_boundary.delta, dec("0.01"));
        assert!(at_boundary.within_tolerance);

        let beyond = validator.check(&dec("500.02"), &matched(&["500.00"]));
        assert!(!beyond.within_tolerance);

        let below = validator.check(&dec("499.99"), &matched(&["500.00"]));
        assert_eq!(below.delta, dec("-0.01"));
        assert!(below.within_tolerance);
    }

    #[test]
    fn test_no_matches_aggregates_to_zero() {
        let validator = Validator::new(dec("0.01"));
        let check = validator.check(&dec("100"), &MatchResult::default());
        assert_eq!(check.aggregated, BigDecimal::zero());
        assert_eq!(check.delta, dec("100"));
    }
}
