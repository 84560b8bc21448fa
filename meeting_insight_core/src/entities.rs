//! Entity graph consumed by every insight: people, questions, responses, dots, meetings.
//!
//! Entities are plain data. The functions in this crate only read them; the
//! narrowed views they need (values, value/weight pairs, believabilities) are
//! built as fresh vectors by the projection methods below.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfg::{BinaryCfg, InsightCfg};
use crate::error::{InsightError, Result};

/// Believability of a person the data provider has no score for.
///
/// Near zero rather than zero so a room of unscored people still has a
/// non-zero believability total. `Person::new` and deserialized `Person`s
/// use this constant; `InsightCfg::default_believability` is applied only
/// where records are turned into entities (the supervisor's adapter).
pub const DEFAULT_BELIEVABILITY: f64 = 0.01;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub name: Option<String>,
    /// Relative weight of this person's opinion, in [0, 1].
    #[serde(default = "default_believability")]
    pub believability: f64,
}

fn default_believability() -> f64 {
    DEFAULT_BELIEVABILITY
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(id),
            name: None,
            believability: DEFAULT_BELIEVABILITY,
        }
    }

    pub fn with_believability(mut self, believability: f64) -> Self {
        self.believability = believability;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.believability.is_finite() || !(0.0..=1.0).contains(&self.believability) {
            return Err(InsightError::InvalidBelievability {
                person: self.id.to_string(),
                believability: self.believability,
            });
        }
        Ok(())
    }
}

/// Fixed numeric scales and their sentiment thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumericRange {
    OneToTen,
    OneToFive,
}

impl NumericRange {
    /// `(low, high)` sentiment thresholds.
    pub fn thresholds(self) -> (f64, f64) {
        match self {
            NumericRange::OneToTen => (5.0, 7.0),
            NumericRange::OneToFive => (2.5, 3.5),
        }
    }

    /// Inclusive `(min, max)` of the scale.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            NumericRange::OneToTen => (1.0, 10.0),
            NumericRange::OneToFive => (1.0, 5.0),
        }
    }

    pub fn contains(self, value: f64) -> bool {
        let (lo, hi) = self.bounds();
        value.is_finite() && value >= lo && value <= hi
    }
}

/// The dispatch key for every numeric-mapping and aggregation branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    /// 1-to-5 agreement scale.
    Likert,
    /// 1-to-10 scale.
    Scale,
    Categorical,
    /// Yes/No.
    Binary,
    /// "Rate this section", 1-to-10.
    Rating,
}

impl QuestionType {
    /// Scale of numeric answers; `None` for choice questions.
    pub fn numeric_range(self) -> Option<NumericRange> {
        match self {
            QuestionType::Likert => Some(NumericRange::OneToFive),
            QuestionType::Scale | QuestionType::Rating => Some(NumericRange::OneToTen),
            QuestionType::Categorical | QuestionType::Binary => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.numeric_range().is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BinaryAnswer {
    No,
    Yes,
}

impl BinaryAnswer {
    pub fn parse(s: &str, cfg: &BinaryCfg) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(cfg.yes_label.trim()) {
            Some(BinaryAnswer::Yes)
        } else if s.eq_ignore_ascii_case(cfg.no_label.trim()) {
            Some(BinaryAnswer::No)
        } else {
            None
        }
    }

    pub fn code(self, cfg: &BinaryCfg) -> f64 {
        match self {
            BinaryAnswer::Yes => cfg.yes_code,
            BinaryAnswer::No => cfg.no_code,
        }
    }

    /// Canonical label from the config.
    pub fn label(self, cfg: &BinaryCfg) -> &str {
        match self {
            BinaryAnswer::Yes => cfg.yes_label.trim(),
            BinaryAnswer::No => cfg.no_label.trim(),
        }
    }
}

/// Raw answer: a number on a scale, or a named choice (categorical and yes/no).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Numeric(f64),
    Choice(String),
}

impl ResponseValue {
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            ResponseValue::Numeric(v) => Some(*v),
            ResponseValue::Choice(_) => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ResponseValue::Numeric(_) => None,
            ResponseValue::Choice(s) => Some(s),
        }
    }

    /// Numeric value checked against the question type's scale.
    pub fn expect_numeric(&self, question_type: QuestionType) -> Result<f64> {
        match (self, question_type.numeric_range()) {
            (ResponseValue::Numeric(v), Some(range)) if range.contains(*v) => Ok(*v),
            _ => Err(InsightError::value_type_mismatch(question_type, self)),
        }
    }

    pub fn expect_binary(&self, cfg: &BinaryCfg) -> Result<BinaryAnswer> {
        self.as_choice()
            .and_then(|s| BinaryAnswer::parse(s, cfg))
            .ok_or_else(|| InsightError::value_type_mismatch(QuestionType::Binary, self))
    }

    pub fn expect_choice(&self) -> Result<&str> {
        self.as_choice()
            .ok_or_else(|| InsightError::value_type_mismatch(QuestionType::Categorical, self))
    }

    /// Check this value against a question type.
    pub fn check(&self, question_type: QuestionType, cfg: &InsightCfg) -> Result<()> {
        match question_type {
            QuestionType::Likert | QuestionType::Scale | QuestionType::Rating => {
                self.expect_numeric(question_type).map(|_| ())
            }
            QuestionType::Binary => self.expect_binary(&cfg.binary).map(|_| ()),
            QuestionType::Categorical => self.expect_choice().map(|_| ()),
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseValue::Numeric(v) => write!(f, "{v}"),
            ResponseValue::Choice(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for ResponseValue {
    fn from(v: f64) -> Self {
        ResponseValue::Numeric(v)
    }
}

impl From<i32> for ResponseValue {
    fn from(v: i32) -> Self {
        ResponseValue::Numeric(f64::from(v))
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        ResponseValue::Choice(s.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(s: String) -> Self {
        ResponseValue::Choice(s)
    }
}

/// One person's answer to a question. Believability is read from `source`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub source: Person,
    pub value: ResponseValue,
}

impl Response {
    pub fn new(source: Person, value: impl Into<ResponseValue>) -> Self {
        Self {
            source,
            value: value.into(),
        }
    }
}

/// A rating one person gives another on the 1-to-10 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub author: PersonId,
    pub subject: PersonId,
    pub value: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Attribute rated, used to group dots by action.
    #[serde(default)]
    pub attribute: Option<String>,
}

impl Dot {
    pub fn new(author: impl Into<String>, subject: impl Into<String>, value: f64) -> Self {
        Self {
            author: PersonId::new(author),
            subject: PersonId::new(subject),
            value,
            confidence: None,
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| InsightError::InvalidDot {
            author: self.author.to_string(),
            subject: self.subject.to_string(),
            reason,
        };
        if self.author == self.subject {
            return Err(invalid("author and subject must differ".to_string()));
        }
        if !NumericRange::OneToTen.contains(self.value) {
            return Err(invalid(format!("value {} outside the 1-to-10 scale", self.value)));
        }
        if let Some(c) = self.confidence {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(invalid(format!("confidence {c} outside [0, 1]")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Question {
    pub fn new(id: impl Into<String>, title: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            question_type,
            responses: Vec::new(),
        }
    }

    pub fn with_response(mut self, source: Person, value: impl Into<ResponseValue>) -> Self {
        self.responses.push(Response::new(source, value));
        self
    }

    /// Every responder is valid and answers once, and every value fits the
    /// question type.
    pub fn validate(&self, cfg: &InsightCfg) -> Result<()> {
        let mut responders = HashSet::new();
        for r in &self.responses {
            r.source.validate()?;
            if !responders.insert(&r.source.id) {
                return Err(InsightError::DuplicateResponse {
                    question: self.id.clone(),
                    person: r.source.id.to_string(),
                });
            }
            r.value.check(self.question_type, cfg)?;
        }
        Ok(())
    }

    pub fn values(&self) -> Vec<ResponseValue> {
        self.responses.iter().map(|r| r.value.clone()).collect()
    }

    pub fn values_and_weights(&self) -> Vec<(ResponseValue, f64)> {
        self.responses
            .iter()
            .map(|r| (r.value.clone(), r.source.believability))
            .collect()
    }

    pub fn believabilities(&self) -> Vec<f64> {
        self.responses.iter().map(|r| r.source.believability).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub participants: Vec<Person>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub dots: Vec<Dot>,
}

impl Meeting {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn participant(&self, id: &PersonId) -> Option<&Person> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn validate(&self, cfg: &InsightCfg) -> Result<()> {
        let mut seen = HashSet::new();
        for p in &self.participants {
            p.validate()?;
            if !seen.insert(&p.id) {
                return Err(InsightError::DuplicateParticipant {
                    meeting: self.id.clone(),
                    person: p.id.to_string(),
                });
            }
        }
        for q in &self.questions {
            q.validate(cfg)?;
        }
        for d in &self.dots {
            d.validate()?;
        }
        Ok(())
    }
}
