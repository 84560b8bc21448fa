//! The uniform output type: "System asserts X about Y".

use serde::{Deserialize, Serialize};

use crate::entities::{PersonId, ResponseValue};

/// Who an assertion is made by, or about.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Entity {
    System,
    Person(PersonId),
    Question(String),
    Meeting(String),
    /// Free-form grouping key, e.g. an action name.
    Label(String),
}

/// Nubbiness level of a whole meeting, lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingNubbiness {
    NotNubby,
    LessNubby,
    SomewhatNubby,
    Nubby,
    VeryNubby,
}

impl MeetingNubbiness {
    /// Class for a score given four increasing bin edges; a score equal to
    /// an edge falls in the upper class.
    pub fn classify(score: f64, bins: &[f64; 4]) -> Self {
        match bins.iter().filter(|edge| score >= **edge).count() {
            0 => MeetingNubbiness::NotNubby,
            1 => MeetingNubbiness::LessNubby,
            2 => MeetingNubbiness::SomewhatNubby,
            3 => MeetingNubbiness::Nubby,
            _ => MeetingNubbiness::VeryNubby,
        }
    }

    pub fn is_nubby(self) -> bool {
        self >= MeetingNubbiness::Nubby
    }
}

/// `Undefined` means "not computable" and is distinct from `Bool(false)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AssertionValue {
    Bool(bool),
    Float(f64),
    Text(String),
    Nubbiness(MeetingNubbiness),
    Undefined,
}

impl AssertionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AssertionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AssertionValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AssertionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, AssertionValue::Undefined)
    }

    /// `true` only for `Bool(true)`.
    pub fn is_true(&self) -> bool {
        matches!(self, AssertionValue::Bool(true))
    }
}

impl From<bool> for AssertionValue {
    fn from(b: bool) -> Self {
        AssertionValue::Bool(b)
    }
}

impl From<Option<bool>> for AssertionValue {
    fn from(b: Option<bool>) -> Self {
        b.map_or(AssertionValue::Undefined, AssertionValue::Bool)
    }
}

impl From<Option<ResponseValue>> for AssertionValue {
    fn from(v: Option<ResponseValue>) -> Self {
        match v {
            Some(ResponseValue::Numeric(x)) => AssertionValue::Float(x),
            Some(ResponseValue::Choice(s)) => AssertionValue::Text(s),
            None => AssertionValue::Undefined,
        }
    }
}

/// What an assertion measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    BelievableChoice,
    Quorum,
    BelievableConsensus,
    NubbyQuestion,
    NubbyQuestionWithQuorum,
    OutOfSync,
    UniqueResponse,
    UniquelyOutOfSync,
    SignificantlyOutOfSync,
    FrequentlyDotted,
    PrimaryParticipant,
    NotableParticipant,
    Polarizing,
    PolarizingParticipant,
    SentimentDisagreement,
    MeetingNubbiness,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub source: Entity,
    pub target: Entity,
    pub value: AssertionValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub measure: Measure,
}

impl Assertion {
    /// An assertion made by the system itself.
    pub fn system(target: Entity, value: impl Into<AssertionValue>, measure: Measure) -> Self {
        Self {
            source: Entity::System,
            target,
            value: value.into(),
            confidence: None,
            measure,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Person id of the target, if the target is a person.
    pub fn target_person(&self) -> Option<&PersonId> {
        match &self.target {
            Entity::Person(id) => Some(id),
            _ => None,
        }
    }
}
