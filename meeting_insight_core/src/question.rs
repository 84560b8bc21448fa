//! Question-level insights.
//!
//! Per question the data flows in one direction: responses, then believable
//! choice and quorum, then per-person assertions derived from them.

use log::debug;

use crate::assertion::{Assertion, Entity, Measure};
use crate::cfg::InsightCfg;
use crate::choice::believable_choice;
use crate::disagreement::{disagrees_with, substantive_disagreement, unique_choice};
use crate::divisiveness::divisiveness_stat;
use crate::engagement::{quorum_exists, sufficient_believability_engagement};
use crate::entities::{Question, QuestionType, ResponseValue};
use crate::error::{InsightError, Result};
use crate::foundation::{mean, weighted_average};

fn question_entity(question: &Question) -> Entity {
    Entity::Question(question.id.clone())
}

/// Believable choice on a question; `Undefined` when there is none.
pub fn believable_choice_on_question(question: &Question, cfg: &InsightCfg) -> Result<Assertion> {
    question.validate(cfg)?;
    let choice = believable_choice(&question.values_and_weights(), question.question_type, cfg)?;
    debug!("question {}: believable choice {:?}", question.id, choice);
    Ok(Assertion::system(
        question_entity(question),
        choice,
        Measure::BelievableChoice,
    ))
}

/// Quorum on a question given the number of meeting participants.
///
/// `Undefined` when there are no participants, `Bool` otherwise.
pub fn quorum_exists_on_question(
    question: &Question,
    number_participants: usize,
    cfg: &InsightCfg,
) -> Assertion {
    let quorum = quorum_exists(
        &question.responses,
        number_participants,
        cfg.quorum_threshold,
        cfg.quorum_min_responses,
    );
    Assertion::system(question_entity(question), quorum, Measure::Quorum)
}

pub(crate) fn nubby(question: &Question, map_to_sentiment: bool, cfg: &InsightCfg) -> Result<bool> {
    if question.responses.len() < 2 {
        return Ok(false);
    }
    // Choice questions are always coded, so only numeric raw spread uses the raw bar.
    let threshold = if map_to_sentiment || !question.question_type.is_numeric() {
        cfg.nubby_threshold_mapped
    } else {
        cfg.nubby_threshold_raw
    };
    let stat = divisiveness_stat(&question.values(), question.question_type, map_to_sentiment, cfg)?;
    debug!(
        "question {}: divisiveness {stat:.4} against {threshold} (mapped: {map_to_sentiment})",
        question.id
    );
    Ok(stat > threshold)
}

/// Nubby: sentiment-bucketed divisiveness above `cfg.nubby_threshold_mapped`.
/// Fewer than two responses is never nubby.
pub fn is_nubby_question(question: &Question, cfg: &InsightCfg) -> Result<Assertion> {
    question.validate(cfg)?;
    Ok(Assertion::system(
        question_entity(question),
        nubby(question, true, cfg)?,
        Measure::NubbyQuestion,
    ))
}

/// Nubby on raw numeric spread, against `cfg.nubby_threshold_raw`.
pub fn is_nubby_question_raw(question: &Question, cfg: &InsightCfg) -> Result<Assertion> {
    question.validate(cfg)?;
    Ok(Assertion::system(
        question_entity(question),
        nubby(question, false, cfg)?,
        Measure::NubbyQuestion,
    ))
}

/// Nubby and a quorum answered it.
pub fn nubby_question_with_quorum(
    question: &Question,
    number_participants: usize,
    cfg: &InsightCfg,
) -> Result<Assertion> {
    question.validate(cfg)?;
    let quorum = quorum_exists_on_question(question, number_participants, cfg);
    let result = quorum.value.is_true() && nubby(question, true, cfg)?;
    Ok(Assertion::system(
        question_entity(question),
        result,
        Measure::NubbyQuestionWithQuorum,
    ))
}

/// Believable consensus: quorum, enough total believability and a
/// believable choice. This is a terminal decision, so a missing quorum
/// gives `false`, not `Undefined`.
pub fn believable_consensus_exists(
    question: &Question,
    number_participants: usize,
    cfg: &InsightCfg,
) -> Result<Assertion> {
    question.validate(cfg)?;
    let quorum = quorum_exists_on_question(question, number_participants, cfg)
        .value
        .is_true();
    let believable_engagement =
        sufficient_believability_engagement(&question.believabilities(), cfg.consensus_believability);
    let choice = believable_choice(&question.values_and_weights(), question.question_type, cfg)?;
    let result = quorum && believable_engagement && choice.is_some();
    debug!(
        "question {}: consensus {result} (quorum {quorum}, believability {believable_engagement}, choice {})",
        question.id,
        choice.is_some()
    );
    Ok(Assertion::system(
        question_entity(question),
        result,
        Measure::BelievableConsensus,
    ))
}

/// One flag per response: does it disagree with the believable choice?
/// All false when there is no believable choice.
pub(crate) fn out_of_sync_flags(question: &Question, cfg: &InsightCfg) -> Result<Vec<bool>> {
    let choice: Option<ResponseValue> =
        believable_choice(&question.values_and_weights(), question.question_type, cfg)?;
    let Some(choice) = choice else {
        return Ok(vec![false; question.responses.len()]);
    };
    question
        .responses
        .iter()
        .map(|r| disagrees_with(&r.value, &choice, question.question_type, cfg))
        .collect()
}

/// Out-of-sync assertion for every responder.
pub fn out_of_sync_people_on_question(question: &Question, cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    question.validate(cfg)?;
    let flags = out_of_sync_flags(question, cfg)?;
    Ok(question
        .responses
        .iter()
        .zip(flags)
        .map(|(r, oos)| Assertion::system(Entity::Person(r.source.id.clone()), oos, Measure::OutOfSync))
        .collect())
}

/// Uniqueness assertion for every responder, with `cfg.unique_disagreement`.
pub fn unique_responses(question: &Question, cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    question.validate(cfg)?;
    let flags = unique_choice(
        &question.values(),
        question.question_type,
        cfg.unique_disagreement,
        cfg,
    )?;
    Ok(question
        .responses
        .iter()
        .zip(flags)
        .map(|(r, unique)| {
            Assertion::system(Entity::Person(r.source.id.clone()), unique, Measure::UniqueResponse)
        })
        .collect())
}

/// Out of sync AND unique, per responder.
pub fn uniquely_out_of_sync(question: &Question, cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    question.validate(cfg)?;
    let oos = out_of_sync_flags(question, cfg)?;
    let unique = unique_choice(
        &question.values(),
        question.question_type,
        cfg.unique_disagreement,
        cfg,
    )?;
    Ok(question
        .responses
        .iter()
        .zip(oos.into_iter().zip(unique))
        .map(|(r, (o, u))| {
            Assertion::system(
                Entity::Person(r.source.id.clone()),
                o && u,
                Measure::UniquelyOutOfSync,
            )
        })
        .collect())
}

/// For a "rate this section" question: does the believability-weighted
/// rating substantively disagree with the plain average?
///
/// `Undefined` when there are no responses or no believability at all.
pub fn believable_and_overall_sentiment_disagree(
    question: &Question,
    cfg: &InsightCfg,
) -> Result<Assertion> {
    if question.question_type != QuestionType::Rating {
        return Err(InsightError::UnsupportedQuestionType {
            operation: "believable_and_overall_sentiment_disagree",
            question_type: question.question_type,
        });
    }
    question.validate(cfg)?;

    let values = question
        .responses
        .iter()
        .map(|r| r.value.expect_numeric(question.question_type))
        .collect::<Result<Vec<f64>>>()?;
    let weights = question.believabilities();

    let believable = weighted_average(&values, Some(&weights))?;
    let overall = mean(&values);
    let value = match (believable, overall) {
        (Some(b), Some(o)) => {
            debug!("question {}: believable sentiment {b:.3}, overall {o:.3}", question.id);
            Some(substantive_disagreement(b, o, cfg.substantive_threshold))
        }
        _ => None,
    };
    Ok(Assertion::system(
        question_entity(question),
        value,
        Measure::SentimentDisagreement,
    ))
}
