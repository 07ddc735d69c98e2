//! The reconciliation run that ties extraction, matching, validation and
//! classification together

use std::collections::HashMap;

use crate::config::ReconciliationConfig;
use crate::ingest::{bank_record, ledger_record, RawBankRow, RawLedgerRow};
use crate::reconciliation::bank_index::BankIndex;
use crate::reconciliation::classifier::classify;
use crate::reconciliation::differences::{collect_differences, KeywordCategorizer};
use crate::reconciliation::extractor::{Extraction, ExtractionStatus, Extractor};
use crate::reconciliation::matcher;
use crate::reconciliation::report::{LedgerRowResult, ReconciliationReport};
use crate::reconciliation::summary::ReconciliationSummary;
use crate::reconciliation::validator::Validator;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_bank_rows, validate_ledger_rows};

/// Check keys matched by more than one ledger record, with those records' rows
type SharedReferences = HashMap<String, Vec<usize>>;

/// A configured reconciliation run.
///
/// The run holds no state between calls: every call builds its own bank
/// index and hands back a fresh outcome sequence, so the same inputs always
/// produce the same result.
pub struct ReconciliationRun {
    config: ReconciliationConfig,
    extractor: Extractor,
    validator: Validator,
    categorizer: Box<dyn DifferenceCategorizer>,
}

impl ReconciliationRun {
    /// Create a run after validating the configuration
    pub fn new(config: ReconciliationConfig) -> ReconciliationResult<Self> {
        Self::with_categorizer(config, Box::new(KeywordCategorizer))
    }

    /// Create a run with a custom difference categorizer
    pub fn with_categorizer(
        config: ReconciliationConfig,
        categorizer: Box<dyn DifferenceCategorizer>,
    ) -> ReconciliationResult<Self> {
        config.validate()?;
        let extractor = Extractor::new(&config.extraction)?;
        let validator = Validator::new(config.tolerance.clone());

        Ok(Self {
            config,
            extractor,
            validator,
            categorizer,
        })
    }

    /// The configuration in use
    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Reconcile typed ledger records against typed bank records.
    ///
    /// Returns exactly one outcome per ledger record, in input order.
    pub fn evaluate(
        &self,
        ledger: &[LedgerRecord],
        bank: &[BankRecord],
    ) -> Vec<ReconciliationOutcome> {
        self.evaluate_with_index(ledger, &BankIndex::build(bank))
    }

    fn evaluate_with_index(
        &self,
        ledger: &[LedgerRecord],
        index: &BankIndex<'_>,
    ) -> Vec<ReconciliationOutcome> {
        for warning in index.duplicates() {
            tracing::warn!(%warning, "duplicate check number in bank statement");
        }

        let extractions: Vec<Extraction> = ledger
            .iter()
            .map(|record| self.extractor.extract(&record.description))
            .collect();
        let shared = shared_references(ledger, &extractions, index);

        #[cfg(feature = "parallel")]
        let outcomes = {
            use rayon::prelude::*;

            ledger
                .par_iter()
                .zip(extractions.into_par_iter())
                .map(|(record, extraction)| {
                    self.evaluate_record(record, extraction, index, &shared)
                })
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes = ledger
            .iter()
            .zip(extractions)
            .map(|(record, extraction)| self.evaluate_record(record, extraction, index, &shared))
            .collect();

        outcomes
    }

    /// Reconcile raw rows.
    ///
    /// Aborts only on structural failures. A row whose amount cannot be read
    /// is rejected on its own and the rest of the run goes on.
    pub fn execute(
        &self,
        ledger_rows: &[RawLedgerRow],
        bank_rows: &[RawBankRow],
    ) -> ReconciliationResult<ReconciliationReport> {
        validate_ledger_rows(ledger_rows)?;
        validate_bank_rows(bank_rows)?;

        let format = &self.config.amount_format;

        let mut bank = Vec::with_capacity(bank_rows.len());
        let mut rejected_bank_rows = Vec::new();
        for (row, raw) in bank_rows.iter().enumerate() {
            match bank_record(row, raw, format) {
                Ok(record) => bank.push(record),
                Err(rejected) => {
                    tracing::warn!(%rejected, "rejecting bank row");
                    rejected_bank_rows.push(rejected);
                }
            }
        }

        // `None` marks a slot filled by the next evaluated outcome
        let mut ledger = Vec::with_capacity(ledger_rows.len());
        let mut slots = Vec::with_capacity(ledger_rows.len());
        for (row, raw) in ledger_rows.iter().enumerate() {
            match ledger_record(row, raw, format) {
                Ok(record) => {
                    ledger.push(record);
                    slots.push(None);
                }
                Err(rejected) => {
                    tracing::warn!(%rejected, "rejecting ledger row");
                    slots.push(Some(rejected));
                }
            }
        }

        let index = BankIndex::build(&bank);
        let mut outcomes = self.evaluate_with_index(&ledger, &index).into_iter();
        let rows: Vec<LedgerRowResult> = slots
            .into_iter()
            .filter_map(|slot| match slot {
                Some(rejected) => Some(LedgerRowResult::Rejected(rejected)),
                None => outcomes.next().map(LedgerRowResult::Evaluated),
            })
            .collect();

        let differences = collect_differences(
            rows.iter().filter_map(LedgerRowResult::outcome),
            &bank,
            self.categorizer.as_ref(),
        );

        let duplicate_checks = index
            .duplicate_keys()
            .into_iter()
            .map(str::to_string)
            .collect();

        let summary = ReconciliationSummary::build(
            &rows,
            &bank,
            rejected_bank_rows.len(),
            &differences,
            duplicate_checks,
        );

        tracing::info!(
            ledger_rows = summary.ledger_rows,
            reconciled = summary.counts.reconciled,
            amount_mismatch = summary.counts.amount_mismatch,
            partially_matched = summary.counts.partially_matched,
            not_found = summary.counts.not_found,
            rejected_ledger_rows = summary.rejected_ledger_rows,
            rejected_bank_rows = summary.rejected_bank_rows,
            total_difference = %summary.total_difference,
            "reconciliation finished"
        );

        Ok(ReconciliationReport {
            rows,
            rejected_bank_rows,
            differences,
            summary,
        })
    }

    /// Load both input sets from a source and reconcile them
    pub async fn execute_from_source<S: RecordSource>(
        &self,
        source: &S,
    ) -> ReconciliationResult<ReconciliationReport> {
        let ledger_rows = source.ledger_rows().await?;
        let bank_rows = source.bank_rows().await?;
        self.execute(&ledger_rows, &bank_rows)
    }

    fn evaluate_record(
        &self,
        record: &LedgerRecord,
        extraction: Extraction,
        index: &BankIndex<'_>,
        shared: &SharedReferences,
    ) -> ReconciliationOutcome {
        let Extraction {
            tokens,
            rejected_groups,
            status,
        } = extraction;

        let mut warnings = Vec::new();
        match status {
            ExtractionStatus::NoReference | ExtractionStatus::Unparseable => {
                tracing::warn!(
                    row = record.row,
                    description = %record.description,
                    "no check number in ledger description"
                );
                warnings.push(DataQualityWarning::UnparseableDescription { rejected_groups });
            }
            ExtractionStatus::Partial => {
                warnings.push(DataQualityWarning::IgnoredGroups {
                    groups: rejected_groups,
                });
            }
            ExtractionStatus::Complete => {}
        }

        let matches = matcher::resolve(&tokens, index);
        warnings.extend(matcher::duplicate_warnings(&matches, index));

        for reference in &matches.matched_references {
            if let Some(rows) = shared.get(reference.key()) {
                tracing::warn!(
                    row = record.row,
                    check = reference.key(),
                    "check referenced by several ledger records"
                );
                warnings.push(DataQualityWarning::SharedCheckReference {
                    check: reference.key().to_string(),
                    ledger_rows: rows.clone(),
                });
            }
        }

        let amounts = self.validator.check(&record.amount, &matches);
        let state = classify(&matches, &amounts.delta, self.validator.tolerance());

        tracing::debug!(
            row = record.row,
            %state,
            aggregated = %amounts.aggregated,
            delta = %amounts.delta,
            "evaluated ledger record"
        );

        ReconciliationOutcome {
            ledger: record.clone(),
            references: tokens,
            matches,
            aggregated_amount: amounts.aggregated,
            delta: amounts.delta,
            state,
            warnings,
        }
    }
}

fn shared_references(
    ledger: &[LedgerRecord],
    extractions: &[Extraction],
    index: &BankIndex<'_>,
) -> SharedReferences {
    let mut rows_by_key: SharedReferences = HashMap::new();

    for (record, extraction) in ledger.iter().zip(extractions) {
        for token in &extraction.tokens {
            if !index.lookup(token.key()).is_empty() {
                rows_by_key
                    .entry(token.key().to_string())
                    .or_default()
                    .push(record.row);
            }
        }
    }

    rows_by_key.retain(|_, rows| rows.len() > 1);
    rows_by_key
}
