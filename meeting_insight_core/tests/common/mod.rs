#![allow(dead_code)]

use meeting_insight_core::*;

pub const EPS: f64 = 1e-9;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn person(id: &str, believability: f64) -> Person {
    Person::new(id).with_believability(believability)
}

/// Question answered by `(person, believability, value)` triples.
pub fn question<V>(id: &str, question_type: QuestionType, answers: &[(&str, f64, V)]) -> Question
where
    V: Clone + Into<ResponseValue>,
{
    answers
        .iter()
        .fold(Question::new(id, id, question_type), |q, (p, b, v)| {
            q.with_response(person(p, *b), v.clone())
        })
}

/// Question where every responder has the same believability.
pub fn numeric_question(id: &str, question_type: QuestionType, values: &[f64]) -> Question {
    values
        .iter()
        .enumerate()
        .fold(Question::new(id, id, question_type), |q, (i, v)| {
            q.with_response(person(&format!("p{i}"), 0.5), *v)
        })
}

/// Likert `[1, 2, 3, 4, 4]`: two negative, one neutral, two positive.
pub fn likert_fixture() -> Question {
    numeric_question("likert", QuestionType::Likert, &[1.0, 2.0, 3.0, 4.0, 4.0])
}

/// "Rate this section": Adam (0.45) gives 10, Bob and Charlie (0.05) give 1 and 5.
pub fn rating_fixture() -> Question {
    question(
        "rate-the-section",
        QuestionType::Rating,
        &[("adam", 0.45, 10.0), ("bob", 0.05, 1.0), ("charlie", 0.05, 5.0)],
    )
}

pub fn dot(author: &str, subject: &str, value: f64) -> Dot {
    Dot::new(author, subject, value)
}

/// Meeting whose participants are `(id, believability)` pairs.
pub fn meeting(id: &str, people: &[(&str, f64)]) -> Meeting {
    let mut m = Meeting::new(id);
    m.participants = people.iter().map(|(p, b)| person(p, *b)).collect();
    m
}

pub fn bools(assertions: &[Assertion]) -> Vec<Option<bool>> {
    assertions.iter().map(|a| a.value.as_bool()).collect()
}

pub fn targets(assertions: &[Assertion]) -> Vec<String> {
    assertions
        .iter()
        .map(|a| match &a.target {
            Entity::Person(id) => id.to_string(),
            Entity::Question(id) | Entity::Meeting(id) | Entity::Label(id) => id.clone(),
            Entity::System => "system".to_string(),
        })
        .collect()
}
