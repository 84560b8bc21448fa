//! Divisiveness (spread of opinions) and polarization (balance between the poles).

use crate::cfg::{InsightCfg, PolarizationCfg};
use crate::entities::{NumericRange, QuestionType, ResponseValue};
use crate::error::Result;
use crate::foundation::{
    bucket_ordinals, map_to_sentiment_bucket, percent_satisfying_condition, standard_deviation,
    SentimentBucket,
};

/// Code assigned to answers matching the most common categorical choice.
const MAJORITY_CODE: f64 = 1.0;
/// Code assigned to every other categorical answer.
const OTHER_CODE: f64 = 2.0;

/// Numeric sequence whose standard deviation is the divisiveness.
///
/// - Likert/Scale/Rating: raw values, or sentiment bucket ordinals when
///   `map_to_sentiment`.
/// - Binary: the configured yes/no codes.
/// - Categorical: 1 for answers equal to the most common choice (first seen
///   wins a tie), 2 for everything else. This measures how lopsided the vote
///   is rather than any numeric spread.
pub fn coded_values(
    values: &[ResponseValue],
    question_type: QuestionType,
    map_to_sentiment: bool,
    cfg: &InsightCfg,
) -> Result<Vec<f64>> {
    match question_type {
        QuestionType::Likert | QuestionType::Scale | QuestionType::Rating => {
            let raw = values
                .iter()
                .map(|v| v.expect_numeric(question_type))
                .collect::<Result<Vec<f64>>>()?;
            match question_type.numeric_range() {
                Some(range) if map_to_sentiment => Ok(bucket_ordinals(&raw, range)),
                _ => Ok(raw),
            }
        }
        QuestionType::Binary => values
            .iter()
            .map(|v| v.expect_binary(&cfg.binary).map(|a| a.code(&cfg.binary)))
            .collect(),
        QuestionType::Categorical => {
            let choices = values
                .iter()
                .map(ResponseValue::expect_choice)
                .collect::<Result<Vec<&str>>>()?;
            let majority = most_common(&choices);
            Ok(choices
                .iter()
                .map(|c| if Some(*c) == majority { MAJORITY_CODE } else { OTHER_CODE })
                .collect())
        }
    }
}

/// Most frequent entry; ties go to the one seen first.
fn most_common<'a>(choices: &[&'a str]) -> Option<&'a str> {
    let mut tally: Vec<(&'a str, usize)> = Vec::new();
    for c in choices {
        match tally.iter().position(|(seen, _)| seen == c) {
            Some(i) => tally[i].1 += 1,
            None => tally.push((*c, 1)),
        }
    }
    let mut best: Option<(&'a str, usize)> = None;
    for (c, n) in tally {
        if best.map_or(true, |(_, b)| n > b) {
            best = Some((c, n));
        }
    }
    best.map(|(c, _)| c)
}

/// Standard deviation of the coded answers. Fewer than two answers give 0:
/// no divisiveness.
pub fn divisiveness_stat(
    values: &[ResponseValue],
    question_type: QuestionType,
    map_to_sentiment: bool,
    cfg: &InsightCfg,
) -> Result<f64> {
    let coded = coded_values(values, question_type, map_to_sentiment, cfg)?;
    Ok(standard_deviation(&coded).unwrap_or(0.0))
}

/// Balance between positive and negative opinions on the 1-to-10 scale:
/// `min(pos/neg, neg/pos)`, 1.0 when perfectly balanced, 0 when either pole
/// is empty.
pub fn polarizing_stat(values: &[f64]) -> f64 {
    let buckets: Vec<SentimentBucket> = values
        .iter()
        .map(|v| map_to_sentiment_bucket(*v, NumericRange::OneToTen))
        .collect();
    let negative = percent_satisfying_condition(&buckets, |b| *b == SentimentBucket::Negative);
    let positive = percent_satisfying_condition(&buckets, |b| *b == SentimentBucket::Positive);
    match (negative, positive) {
        (Some(neg), Some(pos)) if neg > 0.0 && pos > 0.0 => (pos / neg).min(neg / pos),
        _ => 0.0,
    }
}

/// Polarizing iff raw spread, bucketed spread and pole balance all clear
/// their thresholds. Spread alone without a split between the poles is not
/// polarization.
pub fn is_polarizing(values: &[f64], thresholds: &PolarizationCfg) -> bool {
    let (Some(raw_sd), Some(mapped_sd)) = (
        standard_deviation(values),
        standard_deviation(&bucket_ordinals(values, NumericRange::OneToTen)),
    ) else {
        return false;
    };
    raw_sd > thresholds.std_scale
        && mapped_sd > thresholds.std_mapped_scale
        && polarizing_stat(values) > thresholds.poles
}
