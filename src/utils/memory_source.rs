//! In-memory record source for testing

use async_trait::async_trait;

use crate::ingest::{RawBankRow, RawLedgerRow};
use crate::traits::*;
use crate::types::*;

/// In-memory record source for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    ledger: Vec<RawLedgerRow>,
    bank: Vec<RawBankRow>,
}

impl MemorySource {
    /// Create a source holding both input sets
    pub fn new(ledger: Vec<RawLedgerRow>, bank: Vec<RawBankRow>) -> Self {
        Self { ledger, bank }
    }

    /// Append a ledger row
    pub fn with_ledger_row(mut self, row: RawLedgerRow) -> Self {
        self.ledger.push(row);
        self
    }

    /// Append a bank row
    pub fn with_bank_row(mut self, row: RawBankRow) -> Self {
        self.bank.push(row);
        self
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn ledger_rows(&self) -> ReconciliationResult<Vec<RawLedgerRow>> {
        Ok(self.ledger.clone())
    }

    async fn bank_rows(&self) -> ReconciliationResult<Vec<RawBankRow>> {
        Ok(self.bank.clone())
    }
}
