//! Resolution of check references against the bank index

use crate::reconciliation::bank_index::BankIndex;
use crate::types::*;

/// Resolve every reference independently.
///
/// References found in the index land in `matched_references` and all the
/// bank records behind them (duplicates included) in `matched`; the rest go
/// to `unmatched_references`. Order follows the references.
pub fn resolve(references: &[CheckNumber], index: &BankIndex<'_>) -> MatchResult {
    let mut result = MatchResult::default();

    for reference in references {
        let found = index.lookup(reference.key());
        if found.is_empty() {
            result.unmatched_references.push(reference.clone());
        } else {
            result.matched_references.push(reference.clone());
            result.matched.extend(found.iter().map(|record| (*record).clone()));
        }
    }

    result
}

/// Warnings for matched references whose check is shared by several bank lines
pub fn duplicate_warnings(result: &MatchResult, index: &BankIndex<'_>) -> Vec<DataQualityWarning> {
    result
        .matched_references
        .iter()
        .filter(|reference| index.is_duplicate(reference.key()))
        .map(|reference| DataQualityWarning::DuplicateCheckNumber {
            check: reference.key().to_string(),
            bank_rows: index
                .lookup(reference.key())
                .iter()
                .map(|record| record.row)
                .collect(),
        })
        .collect()
}
