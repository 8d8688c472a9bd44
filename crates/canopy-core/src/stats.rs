// ── Summary statistics ──
//
// Folds over whatever list a screen currently holds (filtered or not).

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// A single headline number shown above an entity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: StatValue,
}

impl Stat {
    pub fn count(label: &'static str, value: u64) -> Self {
        Self {
            label,
            value: StatValue::Count(value),
        }
    }

    pub fn amount(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value: StatValue::Amount(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(u64),
    Amount(f64),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Amount(v) => write!(f, "{v:.1}"),
        }
    }
}

pub fn total<T>(records: &[T]) -> u64 {
    u64::try_from(records.len()).unwrap_or(u64::MAX)
}

pub fn count_where<T>(records: &[T], pred: impl Fn(&T) -> bool) -> u64 {
    u64::try_from(records.iter().filter(|r| pred(r)).count()).unwrap_or(u64::MAX)
}

pub fn sum_counts<T>(records: &[T], value: impl Fn(&T) -> u32) -> u64 {
    records.iter().map(|r| u64::from(value(r))).sum()
}

/// Sum of an optional decimal column; missing values count as zero.
pub fn sum_amounts<T>(records: &[T], value: impl Fn(&T) -> Option<f64>) -> f64 {
    records.iter().filter_map(value).sum()
}

/// Mean over the records that have a value, zero for none.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn average<T>(records: &[T], value: impl Fn(&T) -> Option<f64>) -> f64 {
    let values: Vec<f64> = records.iter().filter_map(value).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Number of distinct non-empty values.
pub fn distinct<'a, T: 'a>(records: &'a [T], value: impl Fn(&'a T) -> &'a str) -> u64 {
    let set: HashSet<&str> = records
        .iter()
        .map(value)
        .filter(|v| !v.trim().is_empty())
        .collect();
    u64::try_from(set.len()).unwrap_or(u64::MAX)
}
