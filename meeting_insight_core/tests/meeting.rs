mod common;

use std::collections::HashMap;

use common::*;
use meeting_insight_core::*;
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------
// Dot shares
// ---------------------------------------------------------------------

#[test]
fn subject_with_every_dot_is_frequently_dotted() {
    let cfg = InsightCfg::default();
    let dots = vec![dot("adam", "bob", 5.0), dot("charlie", "bob", 6.0)];
    let result = frequently_dotted_subjects(&dots, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["bob"]);
    assert_eq!(bools(&result), vec![Some(true)]);
    assert_eq!(result[0].measure, Measure::FrequentlyDotted);
}

/// 100 dots: w 80, v 11, z 6, x 3.
fn hundred_dots() -> Vec<Dot> {
    let mut dots = Vec::new();
    for (subject, n) in [("w", 80), ("v", 11), ("z", 6), ("x", 3)] {
        for _ in 0..n {
            dots.push(dot("author", subject, 7.0));
        }
    }
    dots
}

#[test]
fn frequently_dotted_two_tiers() {
    let cfg = InsightCfg::default();
    let result = frequently_dotted_subjects(&hundred_dots(), &cfg).unwrap();
    assert_eq!(targets(&result), vec!["v", "w", "x", "z"]);
    // z: 6% on its own is too little, but six dots clear the volume tier.
    assert_eq!(bools(&result), vec![Some(true), Some(true), Some(false), Some(true)]);

    assert!(frequently_dotted_subjects(&[], &cfg).unwrap().is_empty());
}

#[test]
fn primary_participants_by_share_or_volume() {
    let cfg = InsightCfg::default();
    let result = primary_participants(&hundred_dots(), &cfg);
    assert_eq!(targets(&result), vec!["v", "w", "x", "z"]);
    // v: 11% with more than ten dots.
    assert_eq!(bools(&result), vec![Some(true), Some(true), Some(false), Some(false)]);
}

#[test]
fn notable_is_primary_or_believable() {
    let cfg = InsightCfg::default();
    let mut m = meeting("m1", &[("ann", 0.0), ("ben", 0.3), ("cat", 0.0)]);
    m.dots = vec![dot("ann", "cat", 8.0), dot("ben", "cat", 9.0)];

    let result = notable_participants(&m, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["ann", "ben", "cat"]);
    assert_eq!(bools(&result), vec![Some(false), Some(true), Some(true)]);
}

// ---------------------------------------------------------------------
// Significantly out of sync
// ---------------------------------------------------------------------

#[test]
fn lone_dissenter_is_significantly_out_of_sync() {
    init_logger();
    let cfg = InsightCfg::default();
    let people = [("p1", 0.9), ("p2", 0.9), ("p3", 0.9), ("p4", 0.9), ("p5", 0.0)];
    let mut m = meeting("m1", &people);
    for i in 0..3 {
        let answers: Vec<(&str, f64, f64)> = people
            .iter()
            .map(|(p, b)| (*p, *b, if *p == "p5" { 2.0 } else { 9.0 }))
            .collect();
        m.questions.push(question(&format!("q{i}"), QuestionType::Scale, &answers));
    }

    // Counts [0, 0, 0, 0, 3]: p5 sits at z = 2.0, above even the higher bar.
    let result = significantly_out_of_sync_in_meeting(&m, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["p1", "p2", "p3", "p4", "p5"]);
    assert_eq!(
        bools(&result),
        vec![Some(false), Some(false), Some(false), Some(false), Some(true)]
    );
}

#[test]
fn notable_participants_face_the_lower_bar() {
    let cfg = InsightCfg::default();
    let mut m = meeting("m1", &[("a", 0.9), ("b", 0.9), ("c", 0.0), ("d", 0.5)]);
    m.questions.push(question(
        "q",
        QuestionType::Scale,
        &[("a", 0.9, 9.0), ("b", 0.9, 9.0), ("c", 0.0, 2.0), ("d", 0.5, 2.0)],
    ));

    // Counts [0, 0, 1, 1] give z = [-1, -1, 1, 1]: only notable d clears 0.8.
    let result = significantly_out_of_sync_in_meeting(&m, &cfg).unwrap();
    assert_eq!(bools(&result), vec![Some(false), Some(false), Some(false), Some(true)]);
}

#[test]
fn nobody_stands_out_when_counts_are_equal() {
    let cfg = InsightCfg::default();
    let mut m = meeting("m1", &[("a", 0.5), ("b", 0.5)]);
    m.questions.push(question("q", QuestionType::Scale, &[("a", 0.5, 8.0), ("b", 0.5, 8.0)]));
    let result = significantly_out_of_sync_in_meeting(&m, &cfg).unwrap();
    assert_eq!(bools(&result), vec![Some(false), Some(false)]);

    let empty = Meeting::new("empty");
    assert!(significantly_out_of_sync_in_meeting(&empty, &cfg).unwrap().is_empty());
}

#[test]
fn meeting_validation_runs_first() {
    let cfg = InsightCfg::default();
    let mut m = meeting("m1", &[("a", 0.5), ("a", 0.5)]);
    assert!(matches!(
        significantly_out_of_sync_in_meeting(&m, &cfg).unwrap_err(),
        InsightError::DuplicateParticipant { .. }
    ));

    m.participants.pop();
    m.dots.push(dot("a", "a", 5.0));
    assert!(matches!(
        notable_participants(&m, &cfg).unwrap_err(),
        InsightError::InvalidDot { .. }
    ));

    m.dots = vec![dot("a", "b", 11.0)];
    assert!(polarizing_participants(&m, &cfg).is_err());
}

// ---------------------------------------------------------------------
// Meeting nubbiness
// ---------------------------------------------------------------------

#[test]
fn nubbiness_classes() {
    let bins = InsightCfg::default().meeting_nubbiness_bins;
    assert_eq!(MeetingNubbiness::classify(0.0, &bins), MeetingNubbiness::NotNubby);
    assert_eq!(MeetingNubbiness::classify(0.19, &bins), MeetingNubbiness::NotNubby);
    assert_eq!(MeetingNubbiness::classify(0.2, &bins), MeetingNubbiness::LessNubby);
    assert_eq!(MeetingNubbiness::classify(0.5, &bins), MeetingNubbiness::SomewhatNubby);
    assert_eq!(MeetingNubbiness::classify(0.6, &bins), MeetingNubbiness::Nubby);
    assert_eq!(MeetingNubbiness::classify(0.8, &bins), MeetingNubbiness::VeryNubby);

    assert!(MeetingNubbiness::Nubby.is_nubby());
    assert!(!MeetingNubbiness::SomewhatNubby.is_nubby());
}

#[test]
fn calm_meeting_is_not_nubby() {
    let cfg = InsightCfg::default();
    let mut m = Meeting::new("calm");
    m.questions.push(numeric_question("q", QuestionType::Scale, &[8.0, 9.0, 8.0]));

    assert_eq!(meeting_nubbiness_score(&m, &cfg).unwrap(), 0.0);
    let a = meeting_nubbiness(&m, &cfg).unwrap();
    assert_eq!(a.target, Entity::Meeting("calm".to_string()));
    assert_eq!(a.value, AssertionValue::Nubbiness(MeetingNubbiness::NotNubby));
}

#[test]
fn single_nubby_question_is_halved() {
    let cfg = InsightCfg::default();
    let mut m = Meeting::new("one");
    m.questions.push(likert_fixture());
    m.questions.push(numeric_question("calm", QuestionType::Scale, &[8.0, 9.0]));

    assert!(approx(meeting_nubbiness_score(&m, &cfg).unwrap(), 0.5));
    assert_eq!(
        meeting_nubbiness(&m, &cfg).unwrap().value,
        AssertionValue::Nubbiness(MeetingNubbiness::SomewhatNubby)
    );
}

#[test]
fn several_nubby_questions_average() {
    let cfg = InsightCfg::default();
    let mut m = Meeting::new("many");
    m.questions.push(likert_fixture());
    m.questions.push(numeric_question("split", QuestionType::Scale, &[1.0, 1.0, 10.0, 10.0]));
    m.questions.push(numeric_question("calm", QuestionType::Scale, &[8.0, 9.0]));

    // Mapped spreads 1.0 and sqrt(4/3); the calm question is left out.
    let expected = (1.0 + (4.0_f64 / 3.0).sqrt()) / 2.0;
    assert!(approx(meeting_nubbiness_score(&m, &cfg).unwrap(), expected));
    assert_eq!(
        meeting_nubbiness(&m, &cfg).unwrap().value,
        AssertionValue::Nubbiness(MeetingNubbiness::VeryNubby)
    );
}

// ---------------------------------------------------------------------
// Dots polarization
// ---------------------------------------------------------------------

#[test]
fn author_opinions_are_synthesized() {
    let dots = vec![
        dot("adam", "bob", 10.0),
        dot("adam", "bob", 6.0),
        dot("charlie", "bob", 1.0),
    ];
    let opinions = synthesize_author_opinions(&dots);
    assert_eq!(opinions[&PersonId::from("bob")], vec![8.0, 1.0]);
}

#[test]
fn subjects_become_polarizing_as_opinions_split() {
    let cfg = InsightCfg::default();
    let mut dots = vec![dot("adam", "bob", 10.0), dot("adam", "bob", 10.0)];
    let result = dots_on_subjects_are_polarizing(&dots, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["bob"]);
    assert_eq!(bools(&result), vec![Some(false)]);

    dots.push(dot("charlie", "bob", 1.0));
    dots.push(dot("charlie", "bob", 1.0));
    dots.push(dot("bob", "adam", 10.0));
    let result = dots_on_subjects_are_polarizing(&dots, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["adam", "bob"]);
    assert_eq!(bools(&result), vec![Some(false), Some(true)]);

    dots.push(dot("charlie", "adam", 1.0));
    dots.push(dot("charlie", "adam", 1.0));
    dots.push(dot("bob", "adam", 10.0));
    dots.push(dot("bob", "adam", 10.0));
    let result = dots_on_subjects_are_polarizing(&dots, &cfg).unwrap();
    assert_eq!(bools(&result), vec![Some(true), Some(true)]);
    assert!(result.iter().all(|a| a.measure == Measure::Polarizing));
}

fn people() -> [(&'static str, f64); 3] {
    [("adam", 0.5), ("bob", 0.5), ("charlie", 0.5)]
}

#[test]
fn polarizing_participants_need_frequency_and_split() {
    let cfg = InsightCfg::default();

    let mut m = meeting("m", &people());
    assert!(polarizing_participants(&m, &cfg).unwrap().is_empty());

    m.dots = vec![dot("adam", "bob", 1.0), dot("bob", "charlie", 10.0)];
    let result = polarizing_participants(&m, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["bob", "charlie"]);
    assert_eq!(bools(&result), vec![Some(false), Some(false)]);

    m.dots = vec![dot("bob", "adam", 1.0), dot("charlie", "adam", 10.0)];
    let result = polarizing_participants(&m, &cfg).unwrap();
    assert_eq!(targets(&result), vec!["adam"]);
    assert_eq!(bools(&result), vec![Some(true)]);
    assert_eq!(result[0].measure, Measure::PolarizingParticipant);

    // Each author is torn, so the synthesized opinions agree.
    m.dots = vec![
        dot("bob", "adam", 1.0),
        dot("charlie", "adam", 10.0),
        dot("bob", "adam", 10.0),
        dot("charlie", "adam", 1.0),
    ];
    let result = polarizing_participants(&m, &cfg).unwrap();
    assert_eq!(bools(&result), vec![Some(false)]);
}

#[test]
fn meeting_dots_as_one_group() {
    let cfg = InsightCfg::default();
    let mut m = meeting("m", &people());
    m.dots = vec![
        dot("adam", "bob", 1.0),
        dot("bob", "adam", 1.0),
        dot("charlie", "adam", 10.0),
        dot("adam", "charlie", 10.0),
    ];
    let result = dots_in_meeting_are_polarizing(&m, None, &cfg).unwrap();
    assert_eq!(targets(&result), vec![ALL_DOTS_LABEL]);
    assert_eq!(bools(&result), vec![Some(true)]);
}

#[test]
fn meeting_dots_grouped_by_action() {
    let cfg = InsightCfg::default();
    let mut m = meeting("m", &people());
    m.dots = vec![
        dot("adam", "bob", 1.0).with_attribute("listening"),
        dot("bob", "adam", 10.0).with_attribute("listening"),
        dot("charlie", "adam", 1.0).with_attribute("clarity"),
        dot("adam", "charlie", 10.0).with_attribute("clarity"),
        dot("bob", "charlie", 8.0).with_attribute("ideas"),
        dot("charlie", "bob", 8.0).with_attribute("ideas"),
        dot("charlie", "adam", 1.0).with_attribute("unmapped"),
        dot("adam", "bob", 1.0),
    ];
    let actions = HashMap::from([
        ("listening".to_string(), "communication".to_string()),
        ("clarity".to_string(), "communication".to_string()),
        ("ideas".to_string(), "thinking".to_string()),
    ]);

    let result = dots_in_meeting_are_polarizing(&m, Some(&actions), &cfg).unwrap();
    assert_eq!(targets(&result), vec!["communication", "thinking"]);
    assert_eq!(bools(&result), vec![Some(true), Some(false)]);
}
