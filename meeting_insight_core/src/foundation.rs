use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::NumericRange;
use crate::error::{InsightError, Result};

// ---------------------------------------------------------------------
// Sentiment buckets
// ---------------------------------------------------------------------

/// Ordinal sentiment of a scale value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBucket {
    Negative,
    Neutral,
    Positive,
}

impl SentimentBucket {
    /// 0, 1, 2 for Negative, Neutral, Positive.
    pub fn ordinal(self) -> u8 {
        match self {
            SentimentBucket::Negative => 0,
            SentimentBucket::Neutral => 1,
            SentimentBucket::Positive => 2,
        }
    }

    /// Number of buckets between `self` and `other`.
    pub fn distance(self, other: SentimentBucket) -> u8 {
        self.ordinal().abs_diff(other.ordinal())
    }
}

/// Bucket a scale value: `< low` is Negative, `[low, high)` is Neutral,
/// `>= high` is Positive.
pub fn map_to_sentiment_bucket(value: f64, range: NumericRange) -> SentimentBucket {
    let (low, high) = range.thresholds();
    if value < low {
        SentimentBucket::Negative
    } else if value < high {
        SentimentBucket::Neutral
    } else {
        SentimentBucket::Positive
    }
}

/// Bucket ordinals as floats, ready for `standard_deviation`.
pub fn bucket_ordinals(values: &[f64], range: NumericRange) -> Vec<f64> {
    values
        .iter()
        .map(|v| f64::from(map_to_sentiment_bucket(*v, range).ordinal()))
        .collect()
}

// ---------------------------------------------------------------------
// Central tendency and spread
// ---------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (denominator `n - 1`). `None` for fewer than
/// two values: no spread signal, not an error.
pub fn standard_deviation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    sum_of_squares(values).map(|ss| (ss / (values.len() - 1) as f64).sqrt())
}

/// Population standard deviation (denominator `n`).
pub fn population_standard_deviation(values: &[f64]) -> Option<f64> {
    sum_of_squares(values).map(|ss| (ss / values.len() as f64).sqrt())
}

/// Sum of squared deviations from the mean. Exactly zero for constant
/// input, where the rounded mean could otherwise leave a residue.
fn sum_of_squares(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    if values.iter().all(|x| *x == first) {
        return Some(0.0);
    }
    let mu = mean(values)?;
    Some(values.iter().map(|x| (x - mu) * (x - mu)).sum())
}

/// Weighted mean; equal weights when `weights` is `None`.
///
/// Zero-weight entries stay in the denominator. Returns `None` for empty
/// input or when the weights sum to zero, never `0/0`.
pub fn weighted_average(values: &[f64], weights: Option<&[f64]>) -> Result<Option<f64>> {
    let Some(weights) = weights else {
        return Ok(mean(values));
    };
    if weights.len() != values.len() {
        return Err(InsightError::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }
    let total: f64 = weights.iter().sum();
    if values.is_empty() || total == 0.0 || !total.is_finite() {
        return Ok(None);
    }
    let num: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Ok(Some(num / total))
}

/// Mean of a non-empty list; collapses repeated ratings into one opinion.
pub fn synthesize(values: &[f64]) -> Option<f64> {
    mean(values)
}

// ---------------------------------------------------------------------
// Proportions
// ---------------------------------------------------------------------

/// Fraction of `values` satisfying `condition`; `None` (not 0) on empty input.
pub fn percent_satisfying_condition<T, F>(values: &[T], condition: F) -> Option<f64>
where
    F: Fn(&T) -> bool,
{
    if values.is_empty() {
        return None;
    }
    let hits = values.iter().filter(|v| condition(v)).count();
    Some(hits as f64 / values.len() as f64)
}

/// Frequency of each distinct value, or relative frequency when `normalize`.
pub fn counts<K>(values: &[K], normalize: bool) -> BTreeMap<K, f64>
where
    K: Ord + Clone,
{
    let mut out: BTreeMap<K, f64> = BTreeMap::new();
    for v in values {
        *out.entry(v.clone()).or_insert(0.0) += 1.0;
    }
    if normalize {
        let n = values.len() as f64;
        for c in out.values_mut() {
            *c /= n;
        }
    }
    out
}

/// Group by value, sum the weights per group, divide by the total weight.
///
/// Empty input gives an empty map; a non-empty input whose weights sum to
/// zero is undefined (`None`).
pub fn percent_of_total<K>(values_and_weights: &[(K, f64)]) -> Option<BTreeMap<K, f64>>
where
    K: Ord + Clone,
{
    if values_and_weights.is_empty() {
        return Some(BTreeMap::new());
    }
    let total: f64 = values_and_weights.iter().map(|(_, w)| *w).sum();
    if total == 0.0 || !total.is_finite() {
        return None;
    }
    let mut out: BTreeMap<K, f64> = BTreeMap::new();
    for (k, w) in values_and_weights {
        *out.entry(k.clone()).or_insert(0.0) += *w;
    }
    for share in out.values_mut() {
        *share /= total;
    }
    Some(out)
}

/// Per-element `(x - mean) / population_stddev`.
///
/// `None` for empty input or when every value is equal (zero spread).
pub fn zscore(values: &[f64]) -> Option<Vec<f64>> {
    let mu = mean(values)?;
    let sd = population_standard_deviation(values)?;
    if sd == 0.0 {
        return None;
    }
    Some(values.iter().map(|x| (x - mu) / sd).collect())
}
