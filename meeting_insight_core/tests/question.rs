mod common;

use common::*;
use meeting_insight_core::*;
use pretty_assertions::assert_eq;

#[test]
fn believable_choice_assertion() {
    init_logger();
    let cfg = InsightCfg::default();
    let q = question(
        "binary",
        QuestionType::Binary,
        &[("alice", 0.9, "Yes"), ("bob", 0.05, "No")],
    );
    let a = believable_choice_on_question(&q, &cfg).unwrap();
    assert_eq!(a.source, Entity::System);
    assert_eq!(a.target, Entity::Question("binary".to_string()));
    assert_eq!(a.measure, Measure::BelievableChoice);
    assert_eq!(a.value.as_text(), Some("Yes"));

    let scale = question("scale", QuestionType::Scale, &[("alice", 0.5, 8.0), ("bob", 0.5, 6.0)]);
    let a = believable_choice_on_question(&scale, &cfg).unwrap();
    assert!(approx(a.value.as_float().unwrap(), 7.0));

    let rating = rating_fixture();
    assert!(believable_choice_on_question(&rating, &cfg).unwrap().value.is_undefined());
}

#[test]
fn quorum_without_participants_is_undefined() {
    let cfg = InsightCfg::default();
    let q = likert_fixture();
    assert!(quorum_exists_on_question(&q, 0, &cfg).value.is_undefined());
    assert_eq!(quorum_exists_on_question(&q, 5, &cfg).value, AssertionValue::Bool(true));
    assert_eq!(quorum_exists_on_question(&q, 10, &cfg).value, AssertionValue::Bool(false));
}

#[test]
fn nubby_on_buckets_and_on_raw_spread() {
    let cfg = InsightCfg::default();

    assert!(is_nubby_question(&likert_fixture(), &cfg).unwrap().value.is_true());
    assert!(is_nubby_question_raw(&likert_fixture(), &cfg).unwrap().value.is_true());

    // All positive: spread without a bucket change.
    let positive = numeric_question("positive", QuestionType::Scale, &[7.0, 8.0, 9.0, 10.0]);
    assert!(!is_nubby_question(&positive, &cfg).unwrap().value.is_true());
    assert!(is_nubby_question_raw(&positive, &cfg).unwrap().value.is_true());

    // Raw spread of exactly 1.0 does not clear the raw bar.
    let tight = numeric_question("tight", QuestionType::Scale, &[6.0, 7.0, 8.0]);
    assert_eq!(is_nubby_question_raw(&tight, &cfg).unwrap().value, AssertionValue::Bool(false));

    let lonely = numeric_question("lonely", QuestionType::Scale, &[1.0]);
    assert_eq!(is_nubby_question(&lonely, &cfg).unwrap().value, AssertionValue::Bool(false));
}

#[test]
fn nubby_with_quorum_needs_both() {
    let cfg = InsightCfg::default();
    let q = likert_fixture();
    assert!(nubby_question_with_quorum(&q, 5, &cfg).unwrap().value.is_true());
    assert_eq!(
        nubby_question_with_quorum(&q, 10, &cfg).unwrap().value,
        AssertionValue::Bool(false)
    );
    // No participants: no quorum, so a definite no.
    assert_eq!(
        nubby_question_with_quorum(&q, 0, &cfg).unwrap().value,
        AssertionValue::Bool(false)
    );
}

#[test]
fn consensus_needs_quorum_believability_and_choice() {
    let cfg = InsightCfg::default();
    let agreed = |b: f64| {
        question(
            "agreed",
            QuestionType::Scale,
            &[("a", b, 8.0), ("b", b, 8.0), ("c", b, 9.0), ("d", b, 9.0), ("e", b, 8.0)],
        )
    };

    let q = agreed(0.2);
    assert!(believable_consensus_exists(&q, 5, &cfg).unwrap().value.is_true());
    assert!(believable_consensus_exists(&q, 6, &cfg).unwrap().value.is_true());
    // 5 of 7 is under the ratio.
    assert_eq!(
        believable_consensus_exists(&q, 7, &cfg).unwrap().value,
        AssertionValue::Bool(false)
    );
    // No participants is a definite no here, not undefined.
    assert_eq!(
        believable_consensus_exists(&q, 0, &cfg).unwrap().value,
        AssertionValue::Bool(false)
    );

    // Total believability 0.5.
    let q = agreed(0.1);
    assert_eq!(
        believable_consensus_exists(&q, 5, &cfg).unwrap().value,
        AssertionValue::Bool(false)
    );
}

#[test]
fn consensus_needs_a_choice() {
    let cfg = InsightCfg::default();
    let split = question(
        "split",
        QuestionType::Categorical,
        &[("a", 0.3, "x"), ("b", 0.3, "x"), ("c", 0.3, "y"), ("d", 0.3, "y"), ("e", 0.3, "z")],
    );
    assert_eq!(
        believable_consensus_exists(&split, 5, &cfg).unwrap().value,
        AssertionValue::Bool(false)
    );
}

fn believers_and_dissenter() -> Question {
    question(
        "direction",
        QuestionType::Scale,
        &[("a", 0.9, 9.0), ("b", 0.9, 9.0), ("c", 0.9, 9.0), ("d", 0.1, 2.0)],
    )
}

#[test]
fn out_of_sync_against_believable_choice() {
    let cfg = InsightCfg::default();
    let q = believers_and_dissenter();
    let oos = out_of_sync_people_on_question(&q, &cfg).unwrap();
    assert_eq!(targets(&oos), vec!["a", "b", "c", "d"]);
    assert_eq!(bools(&oos), vec![Some(false), Some(false), Some(false), Some(true)]);
    assert!(oos.iter().all(|a| a.measure == Measure::OutOfSync));
}

#[test]
fn nobody_out_of_sync_without_a_choice() {
    let cfg = InsightCfg::default();
    let q = question("unweighted", QuestionType::Scale, &[("a", 0.0, 9.0), ("b", 0.0, 1.0)]);
    let oos = out_of_sync_people_on_question(&q, &cfg).unwrap();
    assert_eq!(bools(&oos), vec![Some(false), Some(false)]);
}

#[test]
fn uniquely_out_of_sync_needs_both() {
    let cfg = InsightCfg::default();

    let q = believers_and_dissenter();
    assert_eq!(
        bools(&unique_responses(&q, &cfg).unwrap()),
        vec![Some(false), Some(false), Some(false), Some(true)]
    );
    assert_eq!(
        bools(&uniquely_out_of_sync(&q, &cfg).unwrap()),
        vec![Some(false), Some(false), Some(false), Some(true)]
    );

    // Two dissenters are out of sync together, so neither is unique.
    let pair = question(
        "pair",
        QuestionType::Scale,
        &[("a", 0.9, 9.0), ("b", 0.9, 9.0), ("c", 0.1, 2.0), ("d", 0.1, 2.0)],
    );
    assert_eq!(
        bools(&out_of_sync_people_on_question(&pair, &cfg).unwrap()),
        vec![Some(false), Some(false), Some(true), Some(true)]
    );
    assert_eq!(bools(&uniquely_out_of_sync(&pair, &cfg).unwrap()), vec![Some(false); 4]);
}

#[test]
fn rating_sentiment_disagreement() {
    let cfg = InsightCfg::default();
    // Believable view ~8.73, overall ~5.33.
    let a = believable_and_overall_sentiment_disagree(&rating_fixture(), &cfg).unwrap();
    assert_eq!(a.measure, Measure::SentimentDisagreement);
    assert!(a.value.is_true());

    let agreeing = question("agreeing", QuestionType::Rating, &[("a", 0.5, 8.0), ("b", 0.1, 7.0)]);
    let a = believable_and_overall_sentiment_disagree(&agreeing, &cfg).unwrap();
    assert_eq!(a.value, AssertionValue::Bool(false));

    let unweighted = question("unweighted", QuestionType::Rating, &[("a", 0.0, 8.0)]);
    let a = believable_and_overall_sentiment_disagree(&unweighted, &cfg).unwrap();
    assert!(a.value.is_undefined());
}

#[test]
fn rating_sentiment_rejects_other_types() {
    let cfg = InsightCfg::default();
    let err = believable_and_overall_sentiment_disagree(&likert_fixture(), &cfg).unwrap_err();
    assert!(matches!(
        err,
        InsightError::UnsupportedQuestionType { question_type: QuestionType::Likert, .. }
    ));
}

#[test]
fn invalid_questions_are_rejected() {
    let cfg = InsightCfg::default();

    let wrong_kind = question("wrong", QuestionType::Scale, &[("a", 0.5, "seven")]);
    assert!(matches!(
        is_nubby_question(&wrong_kind, &cfg).unwrap_err(),
        InsightError::ValueTypeMismatch { .. }
    ));

    let off_scale = numeric_question("off", QuestionType::Likert, &[1.0, 7.0]);
    assert!(believable_choice_on_question(&off_scale, &cfg).is_err());

    let bad_person = question("bad", QuestionType::Scale, &[("a", 1.5, 5.0)]);
    assert!(matches!(
        out_of_sync_people_on_question(&bad_person, &cfg).unwrap_err(),
        InsightError::InvalidBelievability { .. }
    ));
}

#[test]
fn repeated_responder_is_rejected() {
    let cfg = InsightCfg::default();
    // One person answering four times must not pass for a quorum of two.
    let q = question(
        "q",
        QuestionType::Scale,
        &[("a", 0.9, 9.0), ("a", 0.9, 9.0), ("a", 0.9, 9.0), ("a", 0.9, 9.0)],
    );
    assert!(matches!(
        q.validate(&cfg).unwrap_err(),
        InsightError::DuplicateResponse { ref person, .. } if person == "a"
    ));
    assert!(matches!(
        believable_consensus_exists(&q, 2, &cfg).unwrap_err(),
        InsightError::DuplicateResponse { .. }
    ));

    let mut m = Meeting::new("m1");
    m.participants = vec![person("a", 0.9), person("b", 0.9)];
    m.questions.push(q);
    assert!(significantly_out_of_sync_in_meeting(&m, &cfg).is_err());
}
