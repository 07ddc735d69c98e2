//! Exact parsing of amount text exported by ledgers and banks

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::config::AmountFormat;
use crate::types::*;

/// Parse an amount such as `1.050.000,00` into an exact decimal.
///
/// Accepts a leading `-`, accounting negatives in parentheses `(1.234,50)`,
/// a `$` sign and inner whitespace. When a thousands separator is
/// configured, groups after the first must hold exactly three digits, so
/// `500.00` is rejected under the default `,` decimal format instead of
/// being read as fifty thousand.
pub fn parse_amount(raw: &str, format: &AmountFormat) -> Result<BigDecimal, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let malformed = |reason: &str| AmountError::Malformed {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let (negative, body) = if let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        (true, inner)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else {
        (false, trimmed.strip_prefix('+').unwrap_or(trimmed))
    };

    let compact: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();
    if compact.is_empty() {
        return Err(malformed("no digits"));
    }

    let mut parts = compact.split(format.decimal_separator);
    let integer_part = parts.next().unwrap_or_default();
    let fraction_part = parts.next();
    if parts.next().is_some() {
        return Err(malformed("more than one decimal separator"));
    }

    let integer_digits = match format.thousands_separator {
        Some(sep) if integer_part.contains(sep) => {
            let groups: Vec<&str> = integer_part.split(sep).collect();
            let well_formed = groups.iter().enumerate().all(|(i, group)| {
                let len_ok = if i == 0 {
                    (1..=3).contains(&group.len())
                } else {
                    group.len() == 3
                };
                len_ok && is_digits(group)
            });
            if !well_formed {
                return Err(malformed("misplaced thousands separator"));
            }
            groups.concat()
        }
        _ => integer_part.to_string(),
    };

    if !integer_digits.is_empty() && !is_digits(&integer_digits) {
        return Err(malformed("unexpected character"));
    }

    let mut normalized = if integer_digits.is_empty() {
        "0".to_string()
    } else {
        integer_digits
    };

    if let Some(fraction) = fraction_part {
        if !is_digits(fraction) {
            return Err(malformed("invalid fractional part"));
        }
        normalized.push('.');
        normalized.push_str(fraction);
    }

    let value = BigDecimal::from_str(&normalized).map_err(|e| malformed(&e.to_string()))?;
    Ok(if negative { -value } else { value })
}

/// Parse an optional cell; blank cells are `None`
pub fn parse_optional_amount(
    raw: Option<&str>,
    format: &AmountFormat,
) -> Result<Option<BigDecimal>, AmountError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_amount(text, format).map(Some),
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_parse_bank_format() {
        let format = AmountFormat::default();
        assert_eq!(parse_amount("1.050.000,00", &format).unwrap(), dec("1050000.00"));
        assert_eq!(parse_amount("500,01", &format).unwrap(), dec("500.01"));
        assert_eq!(parse_amount("  -2.500,5 ", &format).unwrap(), dec("-2500.5"));
        assert_eq!(parse_amount("(1.234,50)", &format).unwrap(), dec("-1234.50"));
        assert_eq!(parse_amount("$ 900", &format).unwrap(), dec("900"));
        assert_eq!(parse_amount(",50", &format).unwrap(), dec("0.50"));
    }

    #[test]
    fn test_parse_plain_format() {
        let format = AmountFormat::plain();
        assert_eq!(parse_amount("500.00", &format).unwrap(), dec("500.00"));
        assert_eq!(parse_amount("+12", &format).unwrap(), dec("12"));
    }

    #[test]
    fn test_rejects_ambiguous_grouping() {
        let format = AmountFormat::default();
        assert!(matches!(
            parse_amount("500.00", &format),
            Err(AmountError::Malformed { .. })
        ));
        assert!(parse_amount("1.05.000", &format).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let format = AmountFormat::default();
        assert_eq!(parse_amount("   ", &format), Err(AmountError::Empty));
        assert!(parse_amount("abc", &format).is_err());
        assert!(parse_amount("12,3,4", &format).is_err());
        assert!(parse_amount("12,", &format).is_err());
        assert!(parse_amount("-", &format).is_err());
        assert!(parse_amount("1e5", &format).is_err());
    }

    #[test]
    fn test_parse_optional_amount() {
        let format = AmountFormat::default();
        assert_eq!(parse_optional_amount(None, &format).unwrap(), None);
        assert_eq!(parse_optional_amount(Some("  "), &format).unwrap(), None);
        assert_eq!(
            parse_optional_amount(Some("10,00"), &format).unwrap(),
            Some(dec("10.00"))
        );
        assert!(parse_optional_amount(Some("x"), &format).is_err());
    }
}
