//! Believable choice: the believability-weighted answer to a question.
//!
//! Each weight is the believability of the person who gave that answer, so
//! a choice wins on the combined weight of the people who chose it.

use log::trace;

use crate::cfg::InsightCfg;
use crate::entities::{QuestionType, ResponseValue};
use crate::error::Result;
use crate::foundation::{percent_of_total, weighted_average};

/// Believable choice for one question's answers.
///
/// - Zero (or non-finite) total weight: `None`.
/// - Likert/Scale: the weighted mean as `ResponseValue::Numeric`.
/// - Categorical/Binary: the choice whose weighted share is strictly above
///   `cfg.majority_threshold`, else `None`. Yes/No answers are reported
///   under the configured canonical label.
/// - Any other type: `None`.
pub fn believable_choice(
    values_and_weights: &[(ResponseValue, f64)],
    question_type: QuestionType,
    cfg: &InsightCfg,
) -> Result<Option<ResponseValue>> {
    let total: f64 = values_and_weights.iter().map(|(_, w)| *w).sum();
    if total == 0.0 || !total.is_finite() {
        trace!("believable_choice: total believability {total}, no choice");
        return Ok(None);
    }

    match question_type {
        QuestionType::Likert | QuestionType::Scale => {
            believable_choice_numeric(values_and_weights, question_type)
        }
        QuestionType::Categorical | QuestionType::Binary => {
            believable_choice_categorical(values_and_weights, question_type, cfg)
        }
        QuestionType::Rating => Ok(None),
    }
}

fn believable_choice_numeric(
    values_and_weights: &[(ResponseValue, f64)],
    question_type: QuestionType,
) -> Result<Option<ResponseValue>> {
    let mut values = Vec::with_capacity(values_and_weights.len());
    let mut weights = Vec::with_capacity(values_and_weights.len());
    for (v, w) in values_and_weights {
        values.push(v.expect_numeric(question_type)?);
        weights.push(*w);
    }
    Ok(weighted_average(&values, Some(&weights))?.map(ResponseValue::Numeric))
}

fn believable_choice_categorical(
    values_and_weights: &[(ResponseValue, f64)],
    question_type: QuestionType,
    cfg: &InsightCfg,
) -> Result<Option<ResponseValue>> {
    let mut keyed: Vec<(String, f64)> = Vec::with_capacity(values_and_weights.len());
    for (v, w) in values_and_weights {
        let key = match question_type {
            QuestionType::Binary => v.expect_binary(&cfg.binary)?.label(&cfg.binary).to_string(),
            _ => v.expect_choice()?.to_string(),
        };
        keyed.push((key, *w));
    }

    let Some(shares) = percent_of_total(&keyed) else {
        return Ok(None);
    };

    // Strict `>`: a choice sitting exactly on the threshold is not a clear winner.
    let mut best: Option<(&String, f64)> = None;
    for (choice, share) in &shares {
        if *share > cfg.majority_threshold && best.map_or(true, |(_, s)| *share > s) {
            best = Some((choice, *share));
        }
    }
    trace!("believable_choice: shares {shares:?}, winner {best:?}");
    Ok(best.map(|(choice, _)| ResponseValue::Choice(choice.clone())))
}
