//! Run-level configuration

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::*;

/// Environment variable overriding the amount tolerance
pub const TOLERANCE_ENV: &str = "RECON_TOLERANCE";
/// Environment variable overriding the decimal separator
pub const DECIMAL_SEPARATOR_ENV: &str = "RECON_DECIMAL_SEPARATOR";
/// Environment variable overriding the thousands separator (empty disables it)
pub const THOUSANDS_SEPARATOR_ENV: &str = "RECON_THOUSANDS_SEPARATOR";

/// Configuration of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Largest absolute difference between declared and matched amounts
    /// still considered an agreement (inclusive)
    pub tolerance: BigDecimal,
    /// How check numbers are found in ledger descriptions
    pub extraction: ExtractionConfig,
    /// Number format of the raw amount columns
    pub amount_format: AmountFormat,
}

/// Description parsing convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub open_delimiter: char,
    pub close_delimiter: char,
    /// Separators accepted inside a group listing several checks
    pub list_separators: Vec<char>,
    /// Whether `(100234, 100235)` yields two checks or is rejected
    pub split_lists: bool,
}

/// Number format of raw amount text, e.g. `1.050.000,00`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountFormat {
    pub decimal_separator: char,
    pub thousands_separator: Option<char>,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            extraction: ExtractionConfig::default(),
            amount_format: AmountFormat::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            open_delimiter: '(',
            close_delimiter: ')',
            list_separators: vec![',', '/'],
            split_lists: true,
        }
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            thousands_separator: Some('.'),
        }
    }
}

impl AmountFormat {
    /// Plain `1050000.00` style amounts
    pub fn plain() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: None,
        }
    }
}

/// One cent
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

impl ReconciliationConfig {
    /// Replace the tolerance
    pub fn with_tolerance(mut self, tolerance: BigDecimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Replace the amount format
    pub fn with_amount_format(mut self, amount_format: AmountFormat) -> Self {
        self.amount_format = amount_format;
        self
    }

    /// Load configuration from a TOML document.
    ///
    /// Missing keys keep their defaults. The tolerance should be written as a
    /// string (`tolerance = "0.05"`) so it is read exactly.
    pub fn from_toml_str(source: &str) -> ReconciliationResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| ReconciliationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> ReconciliationResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Default configuration with overrides read through `lookup`, keyed by
    /// the `RECON_*` variable names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ReconciliationResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(TOLERANCE_ENV) {
            config.tolerance = BigDecimal::from_str(raw.trim()).map_err(|e| {
                ReconciliationError::InvalidConfig(format!(
                    "{} must be a decimal number, got '{}': {}",
                    TOLERANCE_ENV, raw, e
                ))
            })?;
        }

        if let Some(raw) = lookup(DECIMAL_SEPARATOR_ENV) {
            config.amount_format.decimal_separator = single_char(DECIMAL_SEPARATOR_ENV, &raw)?;
        }

        if let Some(raw) = lookup(THOUSANDS_SEPARATOR_ENV) {
            config.amount_format.thousands_separator = if raw.is_empty() {
                None
            } else {
                Some(single_char(THOUSANDS_SEPARATOR_ENV, &raw)?)
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> ReconciliationResult<()> {
        if self.tolerance < BigDecimal::zero() {
            return Err(ReconciliationError::InvalidConfig(format!(
                "tolerance must not be negative, got {}",
                self.tolerance
            )));
        }

        let extraction = &self.extraction;
        if extraction.open_delimiter == extraction.close_delimiter {
            return Err(ReconciliationError::InvalidConfig(
                "open and close delimiters must differ".to_string(),
            ));
        }

        if extraction.list_separators.iter().any(|c| {
            c.is_ascii_digit() || *c == extraction.open_delimiter || *c == extraction.close_delimiter
        }) {
            return Err(ReconciliationError::InvalidConfig(
                "list separators cannot be digits or delimiters".to_string(),
            ));
        }

        let format = &self.amount_format;
        if format.decimal_separator.is_ascii_digit() {
            return Err(ReconciliationError::InvalidConfig(
                "decimal separator cannot be a digit".to_string(),
            ));
        }
        if is_reserved_in_amounts(format.decimal_separator) {
            return Err(ReconciliationError::InvalidConfig(format!(
                "decimal separator '{}' is reserved in amounts",
                format.decimal_separator
            )));
        }

        if let Some(thousands) = format.thousands_separator {
            if thousands == format.decimal_separator {
                return Err(ReconciliationError::InvalidConfig(
                    "decimal and thousands separators must differ".to_string(),
                ));
            }
            if thousands.is_ascii_digit() {
                return Err(ReconciliationError::InvalidConfig(
                    "thousands separator cannot be a digit".to_string(),
                ));
            }
            if is_reserved_in_amounts(thousands) {
                return Err(ReconciliationError::InvalidConfig(format!(
                    "thousands separator '{}' is reserved in amounts",
                    thousands
                )));
            }
        }

        Ok(())
    }
}

/// Characters the amount parser strips or reads as a sign
fn is_reserved_in_amounts(c: char) -> bool {
    c.is_whitespace() || matches!(c, '$' | '-' | '+' | '(' | ')')
}

fn single_char(name: &str, raw: &str) -> ReconciliationResult<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ReconciliationError::InvalidConfig(format!(
            "{} must be a single character, got '{}'",
            name, raw
        ))),
    }
}
