//! Run totals for the report header

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::reconciliation::differences::{Difference, DifferenceKind};
use crate::reconciliation::report::LedgerRowResult;
use crate::types::*;

/// Number of outcomes per state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub reconciled: usize,
    pub amount_mismatch: usize,
    pub partially_matched: usize,
    pub not_found: usize,
}

impl StateCounts {
    fn record(&mut self, state: OutcomeState) {
        match state {
            OutcomeState::Reconciled => self.reconciled += 1,
            OutcomeState::AmountMismatch => self.amount_mismatch += 1,
            OutcomeState::PartiallyMatched => self.partially_matched += 1,
            OutcomeState::NotFound => self.not_found += 1,
        }
    }

    /// Total number of classified outcomes
    pub fn total(&self) -> usize {
        self.reconciled + self.amount_mismatch + self.partially_matched + self.not_found
    }
}

/// Totals of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub ledger_rows: usize,
    pub rejected_ledger_rows: usize,
    pub rejected_bank_rows: usize,
    pub counts: StateCounts,
    /// Outcomes carrying at least one data-quality warning
    pub flagged_outcomes: usize,
    /// Sum of the declared ledger amounts
    pub ledger_balance: BigDecimal,
    /// Last running balance reported by the bank, or the sum of its amounts
    pub bank_balance: BigDecimal,
    /// Ledger balance minus bank balance
    pub total_difference: BigDecimal,
    pub temporary_count: usize,
    pub temporary_amount: BigDecimal,
    pub permanent_count: usize,
    pub permanent_amount: BigDecimal,
    /// Check keys carried by more than one bank record
    pub duplicate_checks: Vec<String>,
}

impl ReconciliationSummary {
    /// Compute the totals of a run
    pub fn build(
        rows: &[LedgerRowResult],
        bank: &[BankRecord],
        rejected_bank_rows: usize,
        differences: &[Difference],
        duplicate_checks: Vec<String>,
    ) -> Self {
        let mut counts = StateCounts::default();
        let mut flagged_outcomes = 0;
        let mut rejected_ledger_rows = 0;
        let mut ledger_balance = BigDecimal::zero();

        for row in rows {
            match row {
                LedgerRowResult::Evaluated(outcome) => {
                    counts.record(outcome.state);
                    if outcome.needs_review() {
                        flagged_outcomes += 1;
                    }
                    ledger_balance += &outcome.ledger.amount;
                }
                LedgerRowResult::Rejected(_) => rejected_ledger_rows += 1,
            }
        }

        let bank_balance = bank
            .iter()
            .rev()
            .find_map(|record| record.balance.clone())
            .unwrap_or_else(|| {
                bank.iter()
                    .fold(BigDecimal::zero(), |acc, record| acc + &record.amount)
            });

        let (mut temporary_count, mut permanent_count) = (0, 0);
        let (mut temporary_amount, mut permanent_amount) = (BigDecimal::zero(), BigDecimal::zero());
        for difference in differences {
            match difference.category.kind {
                DifferenceKind::Temporary => {
                    temporary_count += 1;
                    temporary_amount += &difference.amount;
                }
                DifferenceKind::Permanent => {
                    permanent_count += 1;
                    permanent_amount += &difference.amount;
                }
            }
        }

        let total_difference = &ledger_balance - &bank_balance;

        Self {
            ledger_rows: rows.len(),
            rejected_ledger_rows,
            rejected_bank_rows,
            counts,
            flagged_outcomes,
            ledger_balance,
            bank_balance,
            total_difference,
            temporary_count,
            temporary_amount,
            permanent_count,
            permanent_amount,
            duplicate_checks,
        }
    }

    /// True when every evaluated ledger record reconciled and nothing was rejected
    pub fn is_fully_reconciled(&self) -> bool {
        self.rejected_ledger_rows == 0 && self.counts.reconciled == self.counts.total()
    }
}
