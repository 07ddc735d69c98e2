//! The result of a full run over raw input rows

use serde::{Deserialize, Serialize};

use crate::reconciliation::differences::Difference;
use crate::reconciliation::summary::ReconciliationSummary;
use crate::types::*;

/// What became of one ledger input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerRowResult {
    /// The row was read and classified
    Evaluated(ReconciliationOutcome),
    /// The row's amount could not be read
    Rejected(RejectedRow),
}

impl LedgerRowResult {
    /// Row in the ledger input
    pub fn row(&self) -> usize {
        match self {
            LedgerRowResult::Evaluated(outcome) => outcome.row(),
            LedgerRowResult::Rejected(rejected) => rejected.row,
        }
    }

    /// The outcome, when the row was evaluated
    pub fn outcome(&self) -> Option<&ReconciliationOutcome> {
        match self {
            LedgerRowResult::Evaluated(outcome) => Some(outcome),
            LedgerRowResult::Rejected(_) => None,
        }
    }
}

/// Everything the report renderer needs, in ledger order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// One entry per ledger input row, in input order
    pub rows: Vec<LedgerRowResult>,
    /// Bank rows left out because their amount could not be read
    pub rejected_bank_rows: Vec<RejectedRow>,
    /// Unmatched ledger and bank items
    pub differences: Vec<Difference>,
    pub summary: ReconciliationSummary,
}

impl ReconciliationReport {
    /// Evaluated outcomes in ledger order
    pub fn outcomes(&self) -> impl Iterator<Item = &ReconciliationOutcome> {
        self.rows.iter().filter_map(LedgerRowResult::outcome)
    }

    /// Ledger rows left out because their amount could not be read
    pub fn rejected_ledger_rows(&self) -> impl Iterator<Item = &RejectedRow> {
        self.rows.iter().filter_map(|row| match row {
            LedgerRowResult::Rejected(rejected) => Some(rejected),
            LedgerRowResult::Evaluated(_) => None,
        })
    }

    /// Outcomes in a given state
    pub fn outcomes_in(&self, state: OutcomeState) -> impl Iterator<Item = &ReconciliationOutcome> {
        self.outcomes().filter(move |outcome| outcome.state == state)
    }
}
