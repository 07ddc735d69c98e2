//! Hash index of bank records by normalized check number

use std::collections::HashMap;

use crate::types::*;

/// Read-only lookup of bank records by check key, built once per run
#[derive(Debug)]
pub struct BankIndex<'a> {
    by_check: HashMap<&'a str, Vec<&'a BankRecord>>,
    unindexed: Vec<&'a BankRecord>,
    record_count: usize,
}

impl<'a> BankIndex<'a> {
    /// Index every bank record that carries a check number
    pub fn build(records: &'a [BankRecord]) -> Self {
        let mut by_check: HashMap<&'a str, Vec<&'a BankRecord>> =
            HashMap::with_capacity(records.len());
        let mut unindexed = Vec::new();

        for record in records {
            match record.check_key() {
                Some(key) => by_check.entry(key).or_default().push(record),
                None => unindexed.push(record),
            }
        }

        Self {
            by_check,
            unindexed,
            record_count: records.len(),
        }
    }

    /// All bank records sharing a check key
    pub fn lookup(&self, key: &str) -> &[&'a BankRecord] {
        self.by_check.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when more than one bank record carries the key
    pub fn is_duplicate(&self, key: &str) -> bool {
        self.lookup(key).len() > 1
    }

    /// Check keys carried by more than one bank record, sorted
    pub fn duplicate_keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = self
            .by_check
            .iter()
            .filter(|(_, records)| records.len() > 1)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// One warning per duplicated check key, sorted by key
    pub fn duplicates(&self) -> Vec<DataQualityWarning> {
        self.duplicate_keys()
            .into_iter()
            .map(|key| DataQualityWarning::DuplicateCheckNumber {
                check: key.to_string(),
                bank_rows: self.lookup(key).iter().map(|r| r.row).collect(),
            })
            .collect()
    }

    /// Bank records with no usable check number
    pub fn unindexed(&self) -> &[&'a BankRecord] {
        &self.unindexed
    }

    /// Number of distinct check keys
    pub fn key_count(&self) -> usize {
        self.by_check.len()
    }

    /// Number of bank records the index was built from
    pub fn len(&self) -> usize {
        self.record_count
    }

    /// True when built from no records
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn bank() -> Vec<BankRecord> {
        vec![
            BankRecord::new(0, "100234", BigDecimal::from(400)),
            BankRecord::new(1, "00100235", BigDecimal::from(500)),
            BankRecord::new(2, "", BigDecimal::from(-12)),
            BankRecord::new(3, "100235", BigDecimal::from(500)),
        ]
    }

    #[test]
    fn test_lookup() {
        let records = bank();
        let index = BankIndex::build(&records);

        assert_eq!(index.len(), 4);
        assert_eq!(index.key_count(), 2);
        assert_eq!(index.lookup("100234").len(), 1);
        assert_eq!(index.lookup("100234")[0].row, 0);
        assert!(index.lookup("999999").is_empty());
    }

    #[test]
    fn test_duplicates_are_reported() {
        let records = bank();
        let index = BankIndex::build(&records);

        assert!(index.is_duplicate("100235"));
        assert!(!index.is_duplicate("100234"));
        assert_eq!(
            index.duplicates(),
            vec![DataQualityWarning::DuplicateCheckNumber {
                check: "100235".to_string(),
                bank_rows: vec![1, 3],
            }]
        );
    }

    #[test]
    fn test_records_without_check_are_kept_aside() {
        let records = bank();
        let index = BankIndex::build(&records);

        assert_eq!(index.unindexed().len(), 1);
        assert_eq!(index.unindexed()[0].row, 2);
    }

    #[test]
    fn test_non_numeric_check_fields_stay_unindexed() {
        let records = vec![
            BankRecord::new(0, "100234.0", BigDecimal::from(500)),
            BankRecord::new(1, "12/13", BigDecimal::from(7)),
            BankRecord::new(2, "100-234", BigDecimal::from(9)),
        ];
        let index = BankIndex::build(&records);

        assert_eq!(index.lookup("100234").len(), 1);
        assert!(index.lookup("1002340").is_empty());
        assert!(index.lookup("1213").is_empty());
        assert_eq!(
            index.unindexed().iter().map(|r| r.row).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_empty() {
        let index = BankIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.duplicates().is_empty());
    }
}
