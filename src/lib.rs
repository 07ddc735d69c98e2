//! # Reconciliation Core
//!
//! A bank reconciliation library that matches ledger entries against a bank
//! statement by the check numbers written in the ledger descriptions.
//!
//! ## Features
//!
//! - **Check extraction**: parenthetical references such as `(100234)` or `(100234, 100235)`
//! - **Exact amounts**: `BigDecimal` throughout, with locale-aware parsing of `1.050.000,00`
//! - **Classification**: reconciled, amount mismatch, partially matched, not found
//! - **Data-quality warnings**: duplicate bank checks, shared references, unreadable descriptions
//! - **Differences**: unmatched items categorized as temporary or permanent
//! - **Source abstraction**: input-agnostic design with a trait-based record source
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{
//!     BankRecord, LedgerRecord, OutcomeState, ReconciliationConfig, ReconciliationRun,
//! };
//! use bigdecimal::BigDecimal;
//!
//! let run = ReconciliationRun::new(ReconciliationConfig::default()).unwrap();
//!
//! let ledger = vec![LedgerRecord::new(0, "Pago combinado (100234, 100235)", BigDecimal::from(900))];
//! let bank = vec![
//!     BankRecord::new(0, "100234", BigDecimal::from(400)),
//!     BankRecord::new(1, "100235", BigDecimal::from(500)),
//! ];
//!
//! let outcomes = run.evaluate(&ledger, &bank);
//! assert_eq!(outcomes[0].state, OutcomeState::Reconciled);
//! ```

pub mod config;
pub mod ingest;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ingest::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
pub use utils::*;
