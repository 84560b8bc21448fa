use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cfg::InsightCfg;
use crate::entities::{BinaryAnswer, NumericRange, QuestionType, ResponseValue};
use crate::error::Result;
use crate::foundation::{map_to_sentiment_bucket, SentimentBucket};

/// Does answer `a` disagree with answer `b` on a question of this type?
///
/// Choices disagree when they differ. Numeric answers disagree only when
/// they land in different sentiment buckets AND sit more than
/// `cfg.disagreement_threshold` apart, so a 6 against a 7 is not a
/// disagreement.
pub fn disagrees_with(
    a: &ResponseValue,
    b: &ResponseValue,
    question_type: QuestionType,
    cfg: &InsightCfg,
) -> Result<bool> {
    match question_type {
        QuestionType::Categorical => Ok(a.expect_choice()? != b.expect_choice()?),
        QuestionType::Binary => Ok(a.expect_binary(&cfg.binary)? != b.expect_binary(&cfg.binary)?),
        QuestionType::Likert | QuestionType::Scale | QuestionType::Rating => {
            let x = a.expect_numeric(question_type)?;
            let y = b.expect_numeric(question_type)?;
            let range = question_type.numeric_range().unwrap_or(NumericRange::OneToTen);
            let far_away = (x - y).abs() > cfg.disagreement_threshold;
            Ok(far_away && bucketed_disagreement(x, y, range) != 0)
        }
    }
}

/// Bucket distance between two values.
pub fn bucketed_disagreement(x1: f64, x2: f64, range: NumericRange) -> u8 {
    map_to_sentiment_bucket(x1, range).distance(map_to_sentiment_bucket(x2, range))
}

/// Two aggregate 1-to-10 views disagree substantively when they are more
/// than `threshold_high` apart and fall in different sentiment buckets.
pub fn substantive_disagreement(x1: f64, x2: f64, threshold_high: f64) -> bool {
    (x1 - x2).abs() > threshold_high && bucketed_disagreement(x1, x2, NumericRange::OneToTen) != 0
}

/// The group an answer falls into for uniqueness.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResponseBucket {
    Sentiment(SentimentBucket),
    Binary(BinaryAnswer),
    Choice(String),
}

pub fn response_bucket(
    value: &ResponseValue,
    question_type: QuestionType,
    cfg: &InsightCfg,
) -> Result<ResponseBucket> {
    match question_type {
        QuestionType::Categorical => Ok(ResponseBucket::Choice(value.expect_choice()?.to_string())),
        QuestionType::Binary => Ok(ResponseBucket::Binary(value.expect_binary(&cfg.binary)?)),
        QuestionType::Likert | QuestionType::Scale | QuestionType::Rating => {
            let x = value.expect_numeric(question_type)?;
            let range = question_type.numeric_range().unwrap_or(NumericRange::OneToTen);
            Ok(ResponseBucket::Sentiment(map_to_sentiment_bucket(x, range)))
        }
    }
}

/// One flag per answer: is it in a small minority bucket?
///
/// For each answer, take the share of all *other* answers in its bucket. It
/// is unique iff that share is strictly below `1 - unique_disagreement`.
/// With fewer than two answers there is nobody to compare to and nothing is
/// unique.
pub fn unique_choice(
    values: &[ResponseValue],
    question_type: QuestionType,
    unique_disagreement: f64,
    cfg: &InsightCfg,
) -> Result<Vec<bool>> {
    let buckets = values
        .iter()
        .map(|v| response_bucket(v, question_type, cfg))
        .collect::<Result<Vec<_>>>()?;
    if buckets.len() < 2 {
        return Ok(vec![false; buckets.len()]);
    }

    let mut sizes: BTreeMap<&ResponseBucket, usize> = BTreeMap::new();
    for b in &buckets {
        *sizes.entry(b).or_insert(0) += 1;
    }

    let others = (buckets.len() - 1) as f64;
    let cutoff = 1.0 - unique_disagreement;
    Ok(buckets
        .iter()
        .map(|b| {
            let peers = sizes.get(b).copied().unwrap_or(1) - 1;
            (peers as f64 / others) < cutoff
        })
        .collect())
}
