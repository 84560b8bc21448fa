//! Error types for insight computations.
//!
//! Missing data is never an error here: it is reported as `None` or
//! `AssertionValue::Undefined`. These variants are reserved for inputs a
//! caller should never have produced.

use thiserror::Error;

use crate::entities::QuestionType;

#[derive(Debug, Error)]
pub enum InsightError {
    /// `engagement_relative` was given a denominator smaller than its numerator.
    #[error("inconsistent denominator: {count} items against a maximum of {max_count}")]
    InconsistentDenominator { count: usize, max_count: usize },

    /// Values and weights do not line up one-to-one.
    #[error("length mismatch: {values} values, {weights} weights")]
    LengthMismatch { values: usize, weights: usize },

    /// A response value does not fit the declared question type.
    #[error("value {value} is not valid for a {question_type:?} question")]
    ValueTypeMismatch {
        question_type: QuestionType,
        value: String,
    },

    #[error("person {person} has believability {believability}, expected a finite value in [0, 1]")]
    InvalidBelievability { person: String, believability: f64 },

    #[error("invalid dot from {author} to {subject}: {reason}")]
    InvalidDot {
        author: String,
        subject: String,
        reason: String,
    },

    #[error("{person} answered question {question} more than once")]
    DuplicateResponse { question: String, person: String },

    #[error("participant {person} listed twice in meeting {meeting}")]
    DuplicateParticipant { meeting: String, person: String },

    #[error("{operation} is not defined for {question_type:?} questions")]
    UnsupportedQuestionType {
        operation: &'static str,
        question_type: QuestionType,
    },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl InsightError {
    pub fn value_type_mismatch(question_type: QuestionType, value: impl ToString) -> Self {
        Self::ValueTypeMismatch {
            question_type,
            value: value.to_string(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
