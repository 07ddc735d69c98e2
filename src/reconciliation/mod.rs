//! Check-number reconciliation of a ledger against a bank statement
//!
//! A run indexes the bank statement by check number once, then walks the
//! ledger in order: each description's parenthetical check references are
//! extracted, resolved against the index, summed and compared with the
//! declared amount, and the record is classified.

pub mod bank_index;
pub mod classifier;
pub mod differences;
pub mod engine;
pub mod extractor;
pub mod matcher;
pub mod report;
pub mod summary;
pub mod validator;

pub use bank_index::BankIndex;
pub use classifier::classify;
pub use differences::{
    collect_differences, Difference, DifferenceCategory, DifferenceKind, KeywordCategorizer,
};
pub use engine::ReconciliationRun;
pub use extractor::{extract_check_numbers, Extraction, ExtractionStatus, Extractor};
pub use report::{LedgerRowResult, ReconciliationReport};
pub use summary::{ReconciliationSummary, StateCounts};
pub use validator::{AmountCheck, Validator};
