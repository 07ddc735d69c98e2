//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Which of the two input sets a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSide {
    /// The internal ledger ("Libro")
    Ledger,
    /// The bank statement ("Extracto")
    Bank,
}

impl fmt::Display for InputSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSide::Ledger => write!(f, "ledger"),
            InputSide::Bank => write!(f, "bank"),
        }
    }
}

/// Normalize a check number into its comparison key.
///
/// Surrounding whitespace is trimmed and a trailing `.0` left by spreadsheet
/// float cells is dropped, then leading zeros are stripped. Anything that is
/// not all digits after that is not a check number and yields `None`. Ledger
/// tokens and bank fields go through this same rule. A number made only of
/// zeros normalizes to `"0"`.
pub fn normalize_check_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = match trimmed.split_once('.') {
        Some((integer, fraction)) if !fraction.is_empty() && fraction.chars().all(|c| c == '0') => {
            integer
        }
        Some(_) => return None,
        None => trimmed,
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let key = digits.trim_start_matches('0');
    if key.is_empty() {
        Some("0".to_string())
    } else {
        Some(key.to_string())
    }
}

/// A check number as written in the source, paired with its comparison key.
///
/// Equality and hashing only look at the key, so `"00100234"` and `"100234"`
/// are the same check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckNumber {
    raw: String,
    key: String,
}

impl CheckNumber {
    /// Parse a check number, keeping the trimmed original text for display
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_check_key(raw)?;
        Some(Self {
            raw: raw.trim().to_string(),
            key,
        })
    }

    /// The original token
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The normalized comparison key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for CheckNumber {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CheckNumber {}

impl Hash for CheckNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for CheckNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// One internal accounting entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Position of the row in the ledger input
    pub row: usize,
    /// Free-text description, may carry check numbers in parentheses
    pub description: String,
    /// Declared amount
    pub amount: BigDecimal,
    /// Payment date, when the ledger has one
    pub date: Option<NaiveDate>,
    /// Extra columns carried through to the report untouched
    pub metadata: BTreeMap<String, String>,
}

impl LedgerRecord {
    /// Create a new ledger record
    pub fn new(row: usize, description: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            row,
            description: description.into(),
            amount,
            date: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach a metadata column
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One bank statement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    /// Position of the row in the bank input
    pub row: usize,
    /// Check number, `None` when the line carries no usable one
    pub check_number: Option<CheckNumber>,
    /// Net amount of the line (credits minus debits)
    pub amount: BigDecimal,
    /// Bank description of the movement
    pub description: Option<String>,
    /// Value date
    pub date: Option<NaiveDate>,
    /// Running balance reported by the bank after this line
    pub balance: Option<BigDecimal>,
}

impl BankRecord {
    /// Create a new bank record from the raw check field
    pub fn new(row: usize, check_number: &str, amount: BigDecimal) -> Self {
        Self {
            row,
            check_number: CheckNumber::parse(check_number),
            amount,
            description: None,
            date: None,
            balance: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach the running balance
    pub fn with_balance(mut self, balance: BigDecimal) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Comparison key of the check number, if any
    pub fn check_key(&self) -> Option<&str> {
        self.check_number.as_ref().map(CheckNumber::key)
    }
}

/// Bank records found for a ledger record's check references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Every bank record whose check number was referenced
    pub matched: Vec<BankRecord>,
    /// References that resolved to at least one bank record
    pub matched_references: Vec<CheckNumber>,
    /// References with no bank record
    pub unmatched_references: Vec<CheckNumber>,
}

impl MatchResult {
    /// True when at least one bank record was found
    pub fn has_matches(&self) -> bool {
        !self.matched.is_empty()
    }

    /// True when some reference could not be resolved
    pub fn has_unmatched(&self) -> bool {
        !self.unmatched_references.is_empty()
    }
}

/// Final state of a ledger record after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeState {
    /// Every reference found and the amounts agree within tolerance
    Reconciled,
    /// Every reference found but the amounts disagree
    AmountMismatch,
    /// Some references found, some not
    PartiallyMatched,
    /// Nothing found
    NotFound,
}

impl OutcomeState {
    /// Label shown in the reconciliation report
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeState::Reconciled => "Conciliado OK",
            OutcomeState::AmountMismatch => "Diferencia de Monto",
            OutcomeState::PartiallyMatched => "Parcialmente Conciliado",
            OutcomeState::NotFound => "No Encontrado",
        }
    }
}

impl fmt::Display for OutcomeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Data-quality conditions attached to an outcome.
///
/// None of these stop the run; they mark the outcome for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataQualityWarning {
    /// The description produced no check number
    UnparseableDescription {
        /// Parenthetical groups that held something other than check numbers
        rejected_groups: Vec<String>,
    },
    /// Some parenthetical groups were skipped while others produced checks
    IgnoredGroups { groups: Vec<String> },
    /// More than one bank line carries the same check number
    DuplicateCheckNumber { check: String, bank_rows: Vec<usize> },
    /// The same matched check is referenced by more than one ledger record
    SharedCheckReference { check: String, ledger_rows: Vec<usize> },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::UnparseableDescription { rejected_groups } => {
                if rejected_groups.is_empty() {
                    write!(f, "no check number in description")
                } else {
                    write!(f, "unparseable check groups: {}", rejected_groups.join(" | "))
                }
            }
            DataQualityWarning::IgnoredGroups { groups } => {
                write!(f, "ignored groups: {}", groups.join(" | "))
            }
            DataQualityWarning::DuplicateCheckNumber { check, bank_rows } => {
                write!(f, "check {} appears on bank rows {:?}", check, bank_rows)
            }
            DataQualityWarning::SharedCheckReference { check, ledger_rows } => {
                write!(f, "check {} referenced by ledger rows {:?}", check, ledger_rows)
            }
        }
    }
}

/// Result of reconciling one ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// The ledger record this outcome belongs to
    pub ledger: LedgerRecord,
    /// Check numbers extracted from the description
    pub references: Vec<CheckNumber>,
    /// Bank records found for those references
    pub matches: MatchResult,
    /// Sum of the matched bank amounts
    pub aggregated_amount: BigDecimal,
    /// Declared minus aggregated
    pub delta: BigDecimal,
    /// Classification
    pub state: OutcomeState,
    /// Conditions that need a human look
    pub warnings: Vec<DataQualityWarning>,
}

impl ReconciliationOutcome {
    /// Row of the ledger record
    pub fn row(&self) -> usize {
        self.ledger.row
    }

    /// Amount declared in the ledger
    pub fn declared_amount(&self) -> &BigDecimal {
        &self.ledger.amount
    }

    /// Original tokens of the references that were found
    pub fn matched_tokens(&self) -> Vec<&str> {
        self.matches
            .matched_references
            .iter()
            .map(CheckNumber::raw)
            .collect()
    }

    /// Original tokens of the references that were not found
    pub fn unmatched_tokens(&self) -> Vec<&str> {
        self.matches
            .unmatched_references
            .iter()
            .map(CheckNumber::raw)
            .collect()
    }

    /// True when the record reconciled cleanly
    pub fn is_reconciled(&self) -> bool {
        self.state == OutcomeState::Reconciled
    }

    /// True when the outcome carries any warning
    pub fn needs_review(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Why a single amount could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Malformed amount '{raw}': {reason}")]
    Malformed { raw: String, reason: String },
}

/// A row left out of the run because its amount could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub side: InputSide,
    pub row: usize,
    pub error: AmountError,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row {}: {}", self.side, self.row, self.error)
    }
}

/// Errors that abort a whole run
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Missing required field '{field}' in every {input} row")]
    MissingField {
        input: InputSide,
        field: &'static str,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Record source error: {0}")]
    Source(String),
}

/// Result type for run-level operations
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
