//! Categorization of items left unmatched after a run
//!
//! Temporary differences settle on their own with time (deposits in transit,
//! pending checks); permanent ones need an accounting entry (fees, taxes,
//! bounced checks).

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::traits::DifferenceCategorizer;
use crate::types::*;

/// Temporary or permanent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifferenceKind {
    /// Adjusts without an accounting entry
    Temporary,
    /// Requires an accounting entry
    Permanent,
}

/// Kind plus the report subcategory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceCategory {
    pub kind: DifferenceKind,
    pub subcategory: String,
}

impl DifferenceCategory {
    pub fn temporary(subcategory: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::Temporary,
            subcategory: subcategory.into(),
        }
    }

    pub fn permanent(subcategory: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::Permanent,
            subcategory: subcategory.into(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.kind == DifferenceKind::Temporary
    }

    pub fn requires_accounting_entry(&self) -> bool {
        self.kind == DifferenceKind::Permanent
    }
}

/// An unmatched ledger or bank item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub side: InputSide,
    pub row: usize,
    pub description: String,
    pub amount: BigDecimal,
    pub category: DifferenceCategory,
    /// Bank debit carrying a check number that no ledger entry claimed
    pub pending_check: Option<CheckNumber>,
}

const PERMANENT_KEYWORDS: &[(&str, &str)] = &[
    ("comision", "Comisiones"),
    ("impuesto", "Impuestos y percepciones"),
    ("imp.", "Impuestos y percepciones"),
    ("percep", "Impuestos y percepciones"),
    ("debito autom", "Débito automático"),
    ("sueldo", "Sueldos y cargas sociales"),
    ("carga social", "Sueldos y cargas sociales"),
    ("rechazo", "Cheques rechazados"),
    ("devuelto", "Cheques rechazados"),
    ("anulacion", "Anulaciones"),
    ("ley 25413", "Impuestos y percepciones"),
    ("ing. bruto", "Impuestos y percepciones"),
    ("ingresos brutos", "Impuestos y percepciones"),
];

const TEMPORARY_KEYWORDS: &[(&str, &str)] = &[
    ("acreditacion", "Acreditaciones en tránsito"),
    ("transferencia", "Transferencias transitorias"),
    ("transito", "Depósitos en tránsito"),
    ("prisma", "Acreditaciones tarjetas"),
    ("tarjeta", "Acreditaciones tarjetas"),
];

/// Subcategory of ledger items the bank has not credited yet
pub const DEPOSITS_IN_TRANSIT: &str = "Depósitos en tránsito";
/// Subcategory of bank items missing from the ledger
pub const OMITTED_NOTES: &str = "Notas de débito/crédito omitidas";

/// Keyword rules over the lowercased, accent-folded description.
///
/// Permanent rules are checked first. Without a keyword, ledger items
/// default to deposits in transit and bank items to omitted notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCategorizer;

impl DifferenceCategorizer for KeywordCategorizer {
    fn categorize(&self, description: &str, side: InputSide) -> DifferenceCategory {
        let text = fold(description);

        if let Some((_, sub)) = PERMANENT_KEYWORDS.iter().find(|(kw, _)| text.contains(kw)) {
            return DifferenceCategory::permanent(*sub);
        }

        if let Some((_, sub)) = TEMPORARY_KEYWORDS.iter().find(|(kw, _)| text.contains(kw)) {
            return DifferenceCategory::temporary(*sub);
        }

        match side {
            InputSide::Ledger => DifferenceCategory::temporary(DEPOSITS_IN_TRANSIT),
            InputSide::Bank => DifferenceCategory::permanent(OMITTED_NOTES),
        }
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Collect the differences of a run: ledger outcomes that found nothing and
/// bank records that no outcome matched, in that order
pub fn collect_differences<'a>(
    outcomes: impl IntoIterator<Item = &'a ReconciliationOutcome>,
    bank: &[BankRecord],
    categorizer: &dyn DifferenceCategorizer,
) -> Vec<Difference> {
    let mut differences = Vec::new();
    let mut matched_bank_rows = HashSet::new();

    for outcome in outcomes {
        matched_bank_rows.extend(outcome.matches.matched.iter().map(|record| record.row));

        if outcome.state == OutcomeState::NotFound {
            differences.push(Difference {
                side: InputSide::Ledger,
                row: outcome.row(),
                description: outcome.ledger.description.clone(),
                amount: outcome.ledger.amount.clone(),
                category: categorizer.categorize(&outcome.ledger.description, InputSide::Ledger),
                pending_check: None,
            });
        }
    }

    for record in bank.iter().filter(|r| !matched_bank_rows.contains(&r.row)) {
        let description = record.description.clone().unwrap_or_default();
        let pending_check = match &record.check_number {
            Some(check) if record.amount < BigDecimal::zero() => Some(check.clone()),
            _ => None,
        };

        differences.push(Difference {
            side: InputSide::Bank,
            row: record.row,
            category: categorizer.categorize(&description, InputSide::Bank),
            description,
            amount: record.amount.clone(),
            pending_check,
        });
    }

    differences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_keywords() {
        let categorizer = KeywordCategorizer;
        let category = categorizer.categorize("COMISIÓN MANTENIMIENTO CTA", InputSide::Bank);
        assert_eq!(category, DifferenceCategory::permanent("Comisiones"));
        assert!(category.requires_accounting_entry());

        let category = categorizer.categorize("Imp. Ley 25413 débito", InputSide::Bank);
        assert_eq!(category.subcategory, "Impuestos y percepciones");
    }

    #[test]
    fn test_permanent_wins_over_temporary() {
        let category =
            KeywordCategorizer.categorize("Comision transferencia", InputSide::Bank);
        assert_eq!(category.kind, DifferenceKind::Permanent);
    }

    #[test]
    fn test_temporary_keywords() {
        let category = KeywordCategorizer.categorize("Acreditación PRISMA", InputSide::Bank);
        assert_eq!(
            category,
            DifferenceCategory::temporary("Acreditaciones en tránsito")
        );

        let category = KeywordCategorizer.categorize("Depósito en tránsito", InputSide::Ledger);
        assert_eq!(category.subcategory, DEPOSITS_IN_TRANSIT);
    }

    #[test]
    fn test_fallback_by_side() {
        assert_eq!(
            KeywordCategorizer.categorize("Cobranza cliente", InputSide::Ledger),
            DifferenceCategory::temporary(DEPOSITS_IN_TRANSIT)
        );
        assert_eq!(
            KeywordCategorizer.categorize("Movimiento varios", InputSide::Bank),
            DifferenceCategory::permanent(OMITTED_NOTES)
        );
    }

    #[test]
    fn test_collect_differences() {
        let matched_bank = BankRecord::new(0, "100234", BigDecimal::from(500));
        let bank = vec![
            matched_bank.clone(),
            BankRecord::new(1, "", BigDecimal::from(-35)).with_description("Comision"),
            BankRecord::new(2, "100999", BigDecimal::from(-800)),
        ];

        let found = ReconciliationOutcome {
            ledger: LedgerRecord::new(0, "Pago (100234)", BigDecimal::from(500)),
            references: vec![CheckNumber::parse("100234").unwrap()],
            matches: MatchResult {
                matched: vec![matched_bank],
                matched_references: vec![CheckNumber::parse("100234").unwrap()],
                unmatched_references: Vec::new(),
            },
            aggregated_amount: BigDecimal::from(500),
            delta: BigDecimal::zero(),
            state: OutcomeState::Reconciled,
            warnings: Vec::new(),
        };
        let missing = ReconciliationOutcome {
            ledger: LedgerRecord::new(1, "Deposito efectivo", BigDecimal::from(1200)),
            references: Vec::new(),
            matches: MatchResult::default(),
            aggregated_amount: BigDecimal::zero(),
            delta: BigDecimal::from(1200),
            state: OutcomeState::NotFound,
            warnings: Vec::new(),
        };

        let differences = collect_differences([&found, &missing], &bank, &KeywordCategorizer);

        assert_eq!(differences.len(), 3);
        assert_eq!(differences[0].side, InputSide::Ledger);
        assert_eq!(differences[0].row, 1);
        assert!(differences[0].category.is_temporary());

        assert_eq!(differences[1].side, InputSide::Bank);
        assert_eq!(differences[1].category.subcategory, "Comisiones");
        assert_eq!(differences[1].pending_check, None);

        assert_eq!(differences[2].row, 2);
        assert_eq!(
            differences[2].pending_check.as_ref().map(CheckNumber::key),
            Some("100999")
        );
    }
}
