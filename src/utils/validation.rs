//! Structural validation of raw input sets

use crate::ingest::{RawBankRow, RawLedgerRow};
use crate::types::*;

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Fail when a required ledger column is absent from every row.
///
/// An empty ledger is valid; single rows missing a field are handled per row.
pub fn validate_ledger_rows(rows: &[RawLedgerRow]) -> ReconciliationResult<()> {
    if rows.is_empty() {
        return Ok(());
    }

    if rows.iter().all(|r| is_blank(r.description.as_deref())) {
        return Err(ReconciliationError::MissingField {
            input: InputSide::Ledger,
            field: "description",
        });
    }

    if rows
        .iter()
        .all(|r| is_blank(r.inflow.as_deref()) && is_blank(r.outflow.as_deref()))
    {
        return Err(ReconciliationError::MissingField {
            input: InputSide::Ledger,
            field: "amount",
        });
    }

    Ok(())
}

/// Fail when a required bank column is absent from every row
pub fn validate_bank_rows(rows: &[RawBankRow]) -> ReconciliationResult<()> {
    if rows.is_empty() {
        return Ok(());
    }

    if rows.iter().all(|r| is_blank(r.check_number.as_deref())) {
        return Err(ReconciliationError::MissingField {
            input: InputSide::Bank,
            field: "check_number",
        });
    }

    if rows
        .iter()
        .all(|r| is_blank(r.credit.as_deref()) && is_blank(r.debit.as_deref()))
    {
        return Err(ReconciliationError::MissingField {
            input: InputSide::Bank,
            field: "amount",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_valid() {
        assert!(validate_ledger_rows(&[]).is_ok());
        assert!(validate_bank_rows(&[]).is_ok());
    }

    #[test]
    fn test_ledger_without_descriptions() {
        let rows = vec![
            RawLedgerRow::new("", "100,00"),
            RawLedgerRow {
                description: None,
                ..RawLedgerRow::new("x", "5,00")
            },
        ];
        let err = validate_ledger_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            ReconciliationError::MissingField {
                input: InputSide::Ledger,
                field: "description"
            }
        ));
    }

    #[test]
    fn test_one_missing_description_is_not_structural() {
        let rows = vec![RawLedgerRow::new("", "100,00"), RawLedgerRow::new("Pago (1)", "5,00")];
        assert!(validate_ledger_rows(&rows).is_ok());
    }

    #[test]
    fn test_bank_without_amounts() {
        let rows = vec![RawBankRow {
            credit: None,
            ..RawBankRow::credit("100234", "")
        }];
        let err = validate_bank_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            ReconciliationError::MissingField {
                input: InputSide::Bank,
                field: "amount"
            }
        ));
    }

    #[test]
    fn test_bank_without_check_numbers() {
        let rows = vec![RawBankRow::credit(" ", "10,00")];
        assert!(validate_bank_rows(&rows).is_err());
    }
}
