//! Check-number extraction from free-text ledger descriptions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::ExtractionConfig;
use crate::types::*;

/// How much of a description could be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStatus {
    /// Every parenthetical group produced check numbers
    Complete,
    /// Some groups produced check numbers, others were rejected
    Partial,
    /// No parenthetical group at all
    NoReference,
    /// Groups were present but none held check numbers
    Unparseable,
}

/// Check numbers found in one description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Distinct check numbers in order of first appearance
    pub tokens: Vec<CheckNumber>,
    /// Content of the groups that were not check numbers
    pub rejected_groups: Vec<String>,
    pub status: ExtractionStatus,
}

impl Extraction {
    /// True when no check number was found
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Finds check numbers written in parentheses, e.g. `Pago (100234)` or
/// `Pago combinado (100234, 100235)`.
///
/// Numbers outside a group are never picked up.
#[derive(Debug, Clone)]
pub struct Extractor {
    group: Regex,
    list_separators: Vec<char>,
    split_lists: bool,
}

impl Extractor {
    /// Build an extractor for the given parsing convention
    pub fn new(config: &ExtractionConfig) -> ReconciliationResult<Self> {
        let open = regex::escape(&config.open_delimiter.to_string());
        let close = regex::escape(&config.close_delimiter.to_string());
        let pattern = format!("{open}([^{open}{close}]*){close}");

        let group = Regex::new(&pattern).map_err(|e| {
            ReconciliationError::InvalidConfig(format!("invalid group delimiters: {}", e))
        })?;

        Ok(Self {
            group,
            list_separators: config.list_separators.clone(),
            split_lists: config.split_lists,
        })
    }

    /// Extract the check numbers of a description
    pub fn extract(&self, description: &str) -> Extraction {
        let mut tokens = Vec::new();
        let mut seen = HashSet::new();
        let mut rejected_groups = Vec::new();
        let mut groups = 0usize;

        for captures in self.group.captures_iter(description) {
            groups += 1;
            let inner = captures.get(1).map_or("", |m| m.as_str()).trim();

            match self.parse_group(inner) {
                Some(found) => {
                    for check in found {
                        if seen.insert(check.key().to_string()) {
                            tokens.push(check);
                        }
                    }
                }
                None => rejected_groups.push(inner.to_string()),
            }
        }

        let status = if groups == 0 {
            ExtractionStatus::NoReference
        } else if tokens.is_empty() {
            ExtractionStatus::Unparseable
        } else if !rejected_groups.is_empty() {
            ExtractionStatus::Partial
        } else {
            ExtractionStatus::Complete
        };

        Extraction {
            tokens,
            rejected_groups,
            status,
        }
    }

    fn parse_group(&self, inner: &str) -> Option<Vec<CheckNumber>> {
        if let Some(check) = CheckNumber::parse(inner) {
            return Some(vec![check]);
        }

        if !self.split_lists {
            return None;
        }

        let parts: Vec<&str> = inner
            .split(|c: char| self.list_separators.contains(&c))
            .collect();
        if parts.len() < 2 {
            return None;
        }

        parts.into_iter().map(CheckNumber::parse).collect()
    }
}

static DEFAULT_EXTRACTOR: LazyLock<Option<Extractor>> =
    LazyLock::new(|| Extractor::new(&ExtractionConfig::default()).ok());

/// Check numbers of a description under the default `(...)` convention
pub fn extract_check_numbers(description: &str) -> Vec<CheckNumber> {
    DEFAULT_EXTRACTOR
        .as_ref()
        .map(|extractor| extractor.extract(description).tokens)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(extraction: &Extraction) -> Vec<&str> {
        extraction.tokens.iter().map(CheckNumber::key).collect()
    }

    fn extractor() -> Extractor {
        Extractor::new(&ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn test_single_check() {
        let extraction = extractor().extract("Cheques de terceros (36142161) cobrados");
        assert_eq!(keys(&extraction), vec!["36142161"]);
        assert_eq!(extraction.status, ExtractionStatus::Complete);
    }

    #[test]
    fn test_several_groups_and_lists() {
        let extraction = extractor().extract("Pago (100234) y (100235/100236, 100237)");
        assert_eq!(
            keys(&extraction),
            vec!["100234", "100235", "100236", "100237"]
        );
    }

    #[test]
    fn test_comma_list() {
        let extraction = extractor().extract("Pago combinado (100234, 100235)");
        assert_eq!(keys(&extraction), vec!["100234", "100235"]);
        assert_eq!(extraction.tokens[1].raw(), "100235");
    }

    #[test]
    fn test_leading_zeros_keep_raw_token() {
        let extraction = extractor().extract("Cheque (000123)");
        assert_eq!(extraction.tokens[0].key(), "123");
        assert_eq!(extraction.tokens[0].raw(), "000123");
    }

    #[test]
    fn test_duplicates_collapse() {
        let extraction = extractor().extract("(0100) reimputado (100)");
        assert_eq!(keys(&extraction), vec!["100"]);
        assert_eq!(extraction.tokens[0].raw(), "0100");
    }

    #[test]
    fn test_no_group() {
        let extraction = extractor().extract("Transferencia 100234, 100235");
        assert!(extraction.is_empty());
        assert_eq!(extraction.status, ExtractionStatus::NoReference);
    }

    #[test]
    fn test_non_numeric_group() {
        let extraction = extractor().extract("Pago (ver detalle)");
        assert!(extraction.is_empty());
        assert_eq!(extraction.status, ExtractionStatus::Unparseable);
        assert_eq!(extraction.rejected_groups, vec!["ver detalle"]);
    }

    #[test]
    fn test_mixed_groups_are_partial() {
        let extraction = extractor().extract("Pago (100234) (factura A-12)");
        assert_eq!(keys(&extraction), vec!["100234"]);
        assert_eq!(extraction.status, ExtractionStatus::Partial);
    }

    #[test]
    fn test_malformed_list_rejected() {
        let extraction = extractor().extract("Combo (100234, , 100235) (12 34)");
        assert!(extraction.is_empty());
        assert_eq!(extraction.rejected_groups.len(), 2);
    }

    #[test]
    fn test_lists_disabled() {
        let config = ExtractionConfig {
            split_lists: false,
            ..ExtractionConfig::default()
        };
        let extraction = Extractor::new(&config)
            .unwrap()
            .extract("Combo (100234, 100235) (9)");
        assert_eq!(keys(&extraction), vec!["9"]);
        assert_eq!(extraction.status, ExtractionStatus::Partial);
    }

    #[test]
    fn test_custom_delimiters() {
        let config = ExtractionConfig {
            open_delimiter: '[',
            close_delimiter: ']',
            ..ExtractionConfig::default()
        };
        let extraction = Extractor::new(&config)
            .unwrap()
            .extract("Pago [100234] (999)");
        assert_eq!(keys(&extraction), vec!["100234"]);
    }

    #[test]
    fn test_group_keys_follow_bank_rule() {
        let extraction = extractor().extract("Pago (100234.0) (100-234)");
        assert_eq!(keys(&extraction), vec!["100234"]);
        assert_eq!(extraction.rejected_groups, vec!["100-234"]);
    }

    #[test]
    fn test_default_helper() {
        let checks = extract_check_numbers("Cheque (999999)");
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].key(), "999999");
        assert!(extract_check_numbers("sin cheque").is_empty());
    }
}
