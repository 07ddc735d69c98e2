//! Traits for the collaborators around the engine

use async_trait::async_trait;

use crate::ingest::{RawBankRow, RawLedgerRow};
use crate::reconciliation::{DifferenceCategory, ReconciliationReport};
use crate::types::*;

/// Source of the two raw input sets
///
/// This trait lets the engine read from any ingestion backend (spreadsheet
/// reader, CSV, database export, in-memory) by implementing these methods.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Ledger rows in their original order
    async fn ledger_rows(&self) -> ReconciliationResult<Vec<RawLedgerRow>>;

    /// Bank statement rows in their original order
    async fn bank_rows(&self) -> ReconciliationResult<Vec<RawBankRow>>;
}

/// Turns a finished report into an output document
pub trait ReportRenderer {
    type Output;

    /// Render the report
    fn render(&self, report: &ReconciliationReport) -> ReconciliationResult<Self::Output>;
}

/// Decides whether an unmatched item is a temporary or permanent difference
pub trait DifferenceCategorizer: Send + Sync {
    /// Categorize an unmatched item by its description and the side it came from
    fn categorize(&self, description: &str, side: InputSide) -> DifferenceCategory;
}
