//! Expansion of batch registration ranges into individual registration numbers.

use std::collections::BTreeSet;

use crate::data::{Batch, BatchId};
use crate::error::AllocationError;

/// Uppercases and trims a registration number so comparisons ignore case and padding spaces.
pub fn normalize_reg(reg: &str) -> String {
    reg.trim().to_uppercase()
}

/// Splits a registration number into its prefix and maximal trailing digit run.
///
/// Returns `None` when there is no trailing digit.
pub fn split_reg(reg: &str) -> Option<(&str, &str)> {
    let digits_at = reg
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    Some(reg.split_at(digits_at))
}

/// Normalizes an exclusion list once so lookups are exact.
pub fn normalize_exclusions<'a>(
    excluded: impl IntoIterator<Item = &'a String>,
) -> BTreeSet<String> {
    excluded
        .into_iter()
        .map(|r| normalize_reg(r))
        .filter(|r| !r.is_empty())
        .collect()
}

/// A parsed `start_reg..=end_reg` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegRange {
    pub prefix: String,
    /// Digit width of `start_reg`, used to zero-pad every generated number.
    pub width: usize,
    pub start: u64,
    pub end: u64,
}

impl RegRange {
    pub fn parse(batch_id: BatchId, batch: &Batch) -> Result<Self, AllocationError> {
        let start_reg = normalize_reg(&batch.start_reg);
        let end_reg = normalize_reg(&batch.end_reg);
        let malformed = |reason: String| AllocationError::MalformedBatchRange {
            batch: batch_id,
            reason,
        };

        let (prefix, start_digits) = split_reg(&start_reg)
            .ok_or_else(|| malformed(format!("{start_reg:?} has no trailing number")))?;
        let (end_prefix, end_digits) = split_reg(&end_reg)
            .ok_or_else(|| malformed(format!("{end_reg:?} has no trailing number")))?;
        if prefix != end_prefix {
            return Err(malformed(format!(
                "prefixes differ: {prefix:?} vs {end_prefix:?}"
            )));
        }

        let start: u64 = start_digits
            .parse()
            .map_err(|_| malformed(format!("{start_reg:?} number is out of range")))?;
        let end: u64 = end_digits
            .parse()
            .map_err(|_| malformed(format!("{end_reg:?} number is out of range")))?;
        if end < start {
            return Err(AllocationError::InvertedBatchRange {
                batch: batch_id,
                start_reg,
                end_reg,
            });
        }

        Ok(Self {
            prefix: prefix.to_string(),
            width: start_digits.len(),
            start,
            end,
        })
    }

    /// Number of registrations in the range before exclusions.
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).saturating_add(1)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self, number: u64) -> String {
        format!("{}{:0width$}", self.prefix, number, width = self.width)
    }

    /// True when `reg` is exactly one of the numbers this range generates.
    pub fn generates(&self, reg: &str) -> bool {
        let reg = normalize_reg(reg);
        self.numeric_match(&reg)
            .is_some_and(|number| self.format(number) == reg)
    }

    /// Matches on prefix and numeric value only, ignoring zero-padding.
    pub fn numeric_match(&self, reg: &str) -> Option<u64> {
        let (prefix, digits) = split_reg(reg)?;
        let number: u64 = digits.parse().ok()?;
        (prefix == self.prefix && (self.start..=self.end).contains(&number)).then_some(number)
    }

    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (self.start..=self.end).map(|n| self.format(n))
    }

    /// Registrations left after removing normalized `excluded` entries.
    pub fn student_count(&self, excluded: &BTreeSet<String>) -> usize {
        let removed = excluded.iter().filter(|r| self.generates(r)).count();
        self.len().saturating_sub(removed)
    }

    /// Ascending registrations, skipping normalized `excluded` entries.
    pub fn expand(&self, excluded: &BTreeSet<String>) -> Vec<String> {
        self.iter().filter(|reg| !excluded.contains(reg)).collect()
    }
}

/// Parses every batch range, failing on the first malformed or inverted one.
pub fn parse_ranges(batches: &[Batch]) -> Result<Vec<RegRange>, AllocationError> {
    batches
        .iter()
        .enumerate()
        .map(|(i, batch)| RegRange::parse(BatchId(i), batch))
        .collect()
}

/// Expands a single batch with a raw exclusion list.
pub fn expand_batch(
    batch_id: BatchId,
    batch: &Batch,
    excluded: &BTreeSet<String>,
) -> Result<Vec<String>, AllocationError> {
    let excluded = normalize_exclusions(excluded);
    Ok(RegRange::parse(batch_id, batch)?.expand(&excluded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(start: &str, end: &str) -> Batch {
        Batch {
            branch: "CSE".into(),
            year: "2".into(),
            subject: None,
            start_reg: start.into(),
            end_reg: end.into(),
        }
    }

    #[test]
    fn expands_with_padding_and_exclusions() {
        let excluded = BTreeSet::from([" cse003 ".to_string()]);
        let regs = expand_batch(BatchId(0), &batch("cse001", "CSE005"), &excluded).unwrap();
        assert_eq!(regs, vec!["CSE001", "CSE002", "CSE004", "CSE005"]);
    }

    #[test]
    fn padding_follows_start_width() {
        let regs = expand_batch(BatchId(0), &batch("21BCS098", "21BCS0101"), &BTreeSet::new())
            .unwrap();
        assert_eq!(regs.first().map(String::as_str), Some("21BCS098"));
        assert_eq!(regs.last().map(String::as_str), Some("21BCS101"));
        assert_eq!(regs.len(), 4);
    }

    #[test]
    fn prefix_may_contain_digits() {
        let (prefix, digits) = split_reg("21BCS007").unwrap();
        assert_eq!(prefix, "21BCS");
        assert_eq!(digits, "007");
        assert_eq!(split_reg("0042"), Some(("", "0042")));
        assert_eq!(split_reg("CSE"), None);
    }

    #[test]
    fn missing_digits_is_malformed() {
        let err = RegRange::parse(BatchId(2), &batch("CSE", "CSE010")).unwrap_err();
        assert!(matches!(err, AllocationError::MalformedBatchRange { batch: BatchId(2), .. }));
    }

    #[test]
    fn prefix_mismatch_is_malformed() {
        let err = RegRange::parse(BatchId(0), &batch("CSE001", "ECE010")).unwrap_err();
        assert!(matches!(err, AllocationError::MalformedBatchRange { .. }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = RegRange::parse(BatchId(1), &batch("CSE010", "CSE001")).unwrap_err();
        assert_eq!(
            err,
            AllocationError::InvertedBatchRange {
                batch: BatchId(1),
                start_reg: "CSE010".into(),
                end_reg: "CSE001".into(),
            }
        );
    }

    #[test]
    fn student_count_ignores_foreign_exclusions() {
        let range = RegRange::parse(BatchId(0), &batch("CSE001", "CSE010")).unwrap();
        let excluded = normalize_exclusions(&[
            "CSE002".to_string(),
            "CSE2".to_string(),
            "ECE003".to_string(),
            "CSE011".to_string(),
        ]);
        assert_eq!(range.student_count(&excluded), 9);
        assert_eq!(range.expand(&excluded).len(), 9);
    }

    #[test]
    fn numeric_match_ignores_padding() {
        let range = RegRange::parse(BatchId(0), &batch("CSE001", "CSE010")).unwrap();
        assert_eq!(range.numeric_match("CSE7"), Some(7));
        assert!(!range.generates("CSE7"));
        assert_eq!(range.numeric_match("CSE011"), None);
    }
}
