use crate::error::{InsightError, Result};

/// Number of participating items.
pub fn engagement_raw<T>(values: &[T]) -> usize {
    values.len()
}

/// Believability-weighted engagement: the sum of contributor weights.
pub fn engagement_believability<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    weights.into_iter().sum()
}

/// `len(values) / max_count`.
///
/// A `max_count` below `max(1, len(values))` is a caller bug and fails
/// instead of producing a ratio above one or dividing by zero.
pub fn engagement_relative<T>(values: &[T], max_count: usize) -> Result<f64> {
    let count = engagement_raw(values);
    if max_count < count.max(1) {
        return Err(InsightError::InconsistentDenominator { count, max_count });
    }
    Ok(count as f64 / max_count as f64)
}

/// Ratio above `threshold` and more than `min_responses` responses.
///
/// `None` when there are no participants: "no participants" is a different
/// claim from "no quorum".
pub fn quorum_exists<T>(
    responses: &[T],
    number_participants: usize,
    threshold: f64,
    min_responses: usize,
) -> Option<bool> {
    if number_participants == 0 {
        return None;
    }
    let n = engagement_raw(responses);
    Some(n as f64 / number_participants as f64 > threshold && n > min_responses)
}

/// Did responders bring more than `threshold` believability in total?
pub fn sufficient_believability_engagement(weights: &[f64], threshold: f64) -> bool {
    engagement_believability(weights.iter().copied()) > threshold
}
