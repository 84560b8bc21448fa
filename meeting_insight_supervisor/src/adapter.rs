//! Data-provider adapter layer: turn flat records into `meeting_insight_core::Meeting`s.
//!
//! Records are what a data-access layer emits: rows keyed by string ids,
//! believability possibly missing. This module resolves the ids, fills in
//! believability and hands back a validated entity graph. It never mutates
//! the records it is given.
//!
//! Products provide a `MeetingBuilder` (or use the provided `BasicMeetingBuilder`).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meeting_insight_core::{
    Dot, InsightCfg, InsightError, Meeting, Person, Question, QuestionType, Response,
    ResponseValue,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub person_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Raw believability; missing or non-finite values fall back to the default.
    #[serde(default)]
    pub believability: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_id: String,
    #[serde(default)]
    pub title: String,
    pub question_type: QuestionType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question_id: String,
    pub person_id: String,
    pub value: ResponseValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotRecord {
    pub author_id: String,
    pub subject_id: String,
    pub value: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub attribute: Option<String>,
}

/// Everything the data provider knows about one meeting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecords {
    pub meeting_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
    #[serde(default)]
    pub responses: Vec<ResponseRecord>,
    #[serde(default)]
    pub dots: Vec<DotRecord>,
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("meeting {meeting}: unknown person {person}")]
    UnknownPerson { meeting: String, person: String },

    #[error("meeting {meeting}: unknown question {question}")]
    UnknownQuestion { meeting: String, question: String },

    #[error("meeting {meeting}: person {person} listed twice")]
    DuplicatePerson { meeting: String, person: String },

    #[error("meeting {meeting}: question {question} listed twice")]
    DuplicateQuestion { meeting: String, question: String },

    #[error("meeting {meeting}: {person} answered question {question} more than once")]
    DuplicateResponse {
        meeting: String,
        question: String,
        person: String,
    },

    #[error(transparent)]
    Insight(#[from] InsightError),
}

/// Believability normalization.
///
/// Missing or non-finite scores become `default`; everything else is
/// clamped into [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct BelievabilityNormalizer {
    pub default: f64,
}

impl Default for BelievabilityNormalizer {
    fn default() -> Self {
        Self {
            default: meeting_insight_core::DEFAULT_BELIEVABILITY,
        }
    }
}

impl BelievabilityNormalizer {
    /// Normalizer whose default is `cfg.default_believability`.
    pub fn for_cfg(cfg: &InsightCfg) -> Self {
        Self {
            default: cfg.default_believability,
        }
    }

    pub fn normalize(&self, raw: Option<f64>) -> f64 {
        match raw {
            Some(b) if b.is_finite() => b.clamp(0.0, 1.0),
            _ => self.default,
        }
    }
}

/// Trait: build one `Meeting` from a data provider's records.
///
/// `cfg` is the effective cfg of that meeting; the built meeting must be
/// valid under it.
pub trait MeetingBuilder {
    fn build(&self, records: &MeetingRecords, cfg: &InsightCfg) -> Result<Meeting, AdapterError>;
}

/// Builder that resolves ids within a single `MeetingRecords`:
/// - every listed person becomes a participant
/// - responses and dots must reference listed people and questions
/// - a person answers each question at most once
/// - the finished meeting is validated against the cfg passed to `build`
#[derive(Clone, Debug, Default)]
pub struct BasicMeetingBuilder {
    /// Fixed normalizer. `None` takes the default believability from the
    /// cfg passed to `build`.
    pub normalizer: Option<BelievabilityNormalizer>,
}

impl BasicMeetingBuilder {
    pub fn with_normalizer(normalizer: BelievabilityNormalizer) -> Self {
        Self {
            normalizer: Some(normalizer),
        }
    }

    fn normalizer_for(&self, cfg: &InsightCfg) -> BelievabilityNormalizer {
        self.normalizer
            .unwrap_or_else(|| BelievabilityNormalizer::for_cfg(cfg))
    }
}

fn lookup<'a>(
    people: &'a HashMap<&str, Person>,
    meeting_id: &str,
    person_id: &str,
) -> Result<&'a Person, AdapterError> {
    people.get(person_id).ok_or_else(|| AdapterError::UnknownPerson {
        meeting: meeting_id.to_string(),
        person: person_id.to_string(),
    })
}

impl MeetingBuilder for BasicMeetingBuilder {
    fn build(&self, records: &MeetingRecords, cfg: &InsightCfg) -> Result<Meeting, AdapterError> {
        let meeting_id = &records.meeting_id;
        let normalizer = self.normalizer_for(cfg);

        let mut people: HashMap<&str, Person> = HashMap::new();
        let mut participants = Vec::with_capacity(records.people.len());
        for rec in &records.people {
            let mut person = Person::new(rec.person_id.as_str())
                .with_believability(normalizer.normalize(rec.believability));
            if let Some(name) = &rec.name {
                person = person.with_name(name.as_str());
            }
            if people.insert(rec.person_id.as_str(), person.clone()).is_some() {
                return Err(AdapterError::DuplicatePerson {
                    meeting: meeting_id.clone(),
                    person: rec.person_id.clone(),
                });
            }
            participants.push(person);
        }

        let mut questions: Vec<Question> = Vec::with_capacity(records.questions.len());
        let mut question_index: HashMap<&str, usize> = HashMap::new();
        for rec in &records.questions {
            if question_index
                .insert(rec.question_id.as_str(), questions.len())
                .is_some()
            {
                return Err(AdapterError::DuplicateQuestion {
                    meeting: meeting_id.clone(),
                    question: rec.question_id.clone(),
                });
            }
            questions.push(Question::new(
                rec.question_id.as_str(),
                rec.title.as_str(),
                rec.question_type,
            ));
        }

        let mut answered: HashSet<(usize, &str)> = HashSet::new();
        for rec in &records.responses {
            let idx = *question_index
                .get(rec.question_id.as_str())
                .ok_or_else(|| AdapterError::UnknownQuestion {
                    meeting: meeting_id.clone(),
                    question: rec.question_id.clone(),
                })?;
            let source = lookup(&people, meeting_id, &rec.person_id)?.clone();
            if !answered.insert((idx, rec.person_id.as_str())) {
                return Err(AdapterError::DuplicateResponse {
                    meeting: meeting_id.clone(),
                    question: rec.question_id.clone(),
                    person: rec.person_id.clone(),
                });
            }
            questions[idx]
                .responses
                .push(Response::new(source, rec.value.clone()));
        }

        let mut dots = Vec::with_capacity(records.dots.len());
        for rec in &records.dots {
            let author = lookup(&people, meeting_id, &rec.author_id)?;
            let subject = lookup(&people, meeting_id, &rec.subject_id)?;
            dots.push(Dot {
                author: author.id.clone(),
                subject: subject.id.clone(),
                value: rec.value,
                confidence: rec.confidence,
                attribute: rec.attribute.clone(),
            });
        }

        let meeting = Meeting {
            id: meeting_id.clone(),
            name: records.name.clone(),
            participants,
            questions,
            dots,
        };
        meeting.validate(cfg)?;
        Ok(meeting)
    }
}

/// Helper: build a batch of meetings, keeping each result next to its meeting id.
///
/// `cfg_for` resolves the effective cfg of each meeting id.
/// Sharding/concurrency is handled by the supervisor.
pub fn build_meeting_batch<'c, B, F>(
    builder: &B,
    records: &[MeetingRecords],
    cfg_for: F,
) -> Vec<(String, Result<Meeting, AdapterError>)>
where
    B: MeetingBuilder,
    F: Fn(&str) -> &'c InsightCfg,
{
    records
        .iter()
        .map(|r| (r.meeting_id.clone(), builder.build(r, cfg_for(&r.meeting_id))))
        .collect()
}
