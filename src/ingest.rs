//! Raw rows handed over by the ingestion collaborator and their conversion
//! into typed records

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AmountFormat;
use crate::types::*;
use crate::utils::amount::parse_optional_amount;

/// A ledger row as read from the source file.
///
/// Amount columns stay as text so malformed values can be reported instead
/// of being coerced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLedgerRow {
    /// "Concepto"
    pub description: Option<String>,
    /// "Ingreso"
    pub inflow: Option<String>,
    /// "Egreso"
    pub outflow: Option<String>,
    pub date: Option<NaiveDate>,
    pub metadata: BTreeMap<String, String>,
}

impl RawLedgerRow {
    /// Row with an inflow amount
    pub fn new(description: impl Into<String>, inflow: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            inflow: Some(inflow.into()),
            ..Self::default()
        }
    }

    /// Row with an outflow amount
    pub fn outflow(description: impl Into<String>, outflow: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            outflow: Some(outflow.into()),
            ..Self::default()
        }
    }
}

/// A bank statement row as read from the source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBankRow {
    /// "Número de Comprobante"
    pub check_number: Option<String>,
    /// "Descripción"
    pub description: Option<String>,
    /// "Créditos"
    pub credit: Option<String>,
    /// "Débitos"
    pub debit: Option<String>,
    /// "Saldo"
    pub balance: Option<String>,
    pub date: Option<NaiveDate>,
}

impl RawBankRow {
    /// Row crediting the account
    pub fn credit(check_number: impl Into<String>, credit: impl Into<String>) -> Self {
        Self {
            check_number: Some(check_number.into()),
            credit: Some(credit.into()),
            ..Self::default()
        }
    }

    /// Row debiting the account
    pub fn debit(check_number: impl Into<String>, debit: impl Into<String>) -> Self {
        Self {
            check_number: Some(check_number.into()),
            debit: Some(debit.into()),
            ..Self::default()
        }
    }

    /// Attach a bank description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the running balance text
    pub fn with_balance(mut self, balance: impl Into<String>) -> Self {
        self.balance = Some(balance.into());
        self
    }
}

/// `plus - minus`, where a blank side counts as zero but two blank sides
/// are an error
fn net_amount(
    plus: Option<&str>,
    minus: Option<&str>,
    format: &AmountFormat,
) -> Result<BigDecimal, AmountError> {
    let plus = parse_optional_amount(plus, format)?;
    let minus = parse_optional_amount(minus, format)?;

    match (plus, minus) {
        (None, None) => Err(AmountError::Empty),
        (plus, minus) => {
            Ok(plus.unwrap_or_else(BigDecimal::zero) - minus.unwrap_or_else(BigDecimal::zero))
        }
    }
}

/// Convert a raw ledger row into a record
pub fn ledger_record(
    row: usize,
    raw: &RawLedgerRow,
    format: &AmountFormat,
) -> Result<LedgerRecord, RejectedRow> {
    let amount = net_amount(raw.inflow.as_deref(), raw.outflow.as_deref(), format).map_err(
        |error| RejectedRow {
            side: InputSide::Ledger,
            row,
            error,
        },
    )?;

    Ok(LedgerRecord {
        row,
        description: raw.description.clone().unwrap_or_default(),
        amount,
        date: raw.date,
        metadata: raw.metadata.clone(),
    })
}

/// Convert a raw bank row into a record.
///
/// A malformed running balance does not reject the row; it is dropped and
/// logged, since it only feeds the closing balance of the summary.
pub fn bank_record(
    row: usize,
    raw: &RawBankRow,
    format: &AmountFormat,
) -> Result<BankRecord, RejectedRow> {
    let amount = net_amount(raw.credit.as_deref(), raw.debit.as_deref(), format).map_err(
        |error| RejectedRow {
            side: InputSide::Bank,
            row,
            error,
        },
    )?;

    let balance = match parse_optional_amount(raw.balance.as_deref(), format) {
        Ok(balance) => balance,
        Err(error) => {
            tracing::warn!(row, %error, "ignoring unreadable bank balance");
            None
        }
    };

    Ok(BankRecord {
        row,
        check_number: raw.check_number.as_deref().and_then(CheckNumber::parse),
        amount,
        description: raw.description.clone(),
        date: raw.date,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_ledger_net_amount() {
        let format = AmountFormat::default();
        let raw = RawLedgerRow {
            description: Some("Pago (100234)".to_string()),
            inflow: Some("1.000,00".to_string()),
            outflow: Some("250,50".to_string()),
            ..RawLedgerRow::default()
        };

        let record = ledger_record(7, &raw, &format).unwrap();
        assert_eq!(record.row, 7);
        assert_eq!(record.amount, dec("749.50"));
    }

    #[test]
    fn test_ledger_outflow_only() {
        let record =
            ledger_record(0, &RawLedgerRow::outflow("Cheque (1)", "500,00"), &AmountFormat::default())
                .unwrap();
        assert_eq!(record.amount, dec("-500.00"));
    }

    #[test]
    fn test_ledger_missing_description_becomes_empty() {
        let raw = RawLedgerRow {
            description: None,
            ..RawLedgerRow::new("", "1,00")
        };
        let record = ledger_record(0, &raw, &AmountFormat::default()).unwrap();
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_ledger_malformed_amount_is_rejected() {
        let rejected =
            ledger_record(3, &RawLedgerRow::new("Pago (1)", "quinientos"), &AmountFormat::default())
                .unwrap_err();
        assert_eq!(rejected.side, InputSide::Ledger);
        assert_eq!(rejected.row, 3);
        assert!(matches!(rejected.error, AmountError::Malformed { .. }));
    }

    #[test]
    fn test_ledger_without_any_amount_is_rejected() {
        let raw = RawLedgerRow {
            inflow: None,
            ..RawLedgerRow::new("Pago (1)", "")
        };
        let rejected = ledger_record(0, &raw, &AmountFormat::default()).unwrap_err();
        assert_eq!(rejected.error, AmountError::Empty);
    }

    #[test]
    fn test_bank_record_conversion() {
        let raw = RawBankRow::debit(" 00100234 ", "1.500,00")
            .with_description("Cheque pagado")
            .with_balance("10.000,00");
        let record = bank_record(2, &raw, &AmountFormat::default()).unwrap();

        assert_eq!(record.check_key(), Some("100234"));
        assert_eq!(record.amount, dec("-1500.00"));
        assert_eq!(record.balance, Some(dec("10000.00")));
        assert_eq!(record.description.as_deref(), Some("Cheque pagado"));
    }

    #[test]
    fn test_bank_bad_balance_is_dropped() {
        let raw = RawBankRow::credit("1", "5,00").with_balance("n/a");
        let record = bank_record(0, &raw, &AmountFormat::default()).unwrap();
        assert_eq!(record.balance, None);
    }
}
