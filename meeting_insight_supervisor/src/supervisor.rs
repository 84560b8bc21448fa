//! Sharded insight supervisor.
//!
//! Evaluates the full battery of insights for a batch of meetings:
//! - applies per-meeting cfg overrides
//! - shards meetings by `meeting_id` (deterministic)
//! - runs every question-level and meeting-level insight from the core
//! - records failures per meeting instead of aborting the batch
//!
//! No IO. No async. Meetings share nothing, so each shard runs on its own
//! scoped thread and results are merged and sorted at the end.

use std::collections::HashMap;
use std::thread;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use meeting_insight_core::{
    believable_and_overall_sentiment_disagree, believable_choice_on_question,
    believable_consensus_exists, dots_in_meeting_are_polarizing, dots_on_subjects_are_polarizing,
    frequently_dotted_subjects, is_nubby_question, meeting_nubbiness, meeting_nubbiness_score,
    notable_participants, nubby_question_with_quorum, out_of_sync_people_on_question,
    polarizing_participants, primary_participants, quorum_exists_on_question,
    significantly_out_of_sync_in_meeting, uniquely_out_of_sync, Assertion, InsightCfg,
    InsightError, Meeting, Question, QuestionType,
};

use crate::adapter::{build_meeting_batch, MeetingBuilder, MeetingRecords};

/// Every question-level insight for one question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionReport {
    pub question_id: String,
    pub question_type: QuestionType,
    pub responses: usize,
    pub believable_choice: Assertion,
    pub quorum: Assertion,
    pub believable_consensus: Assertion,
    pub nubby: Assertion,
    pub nubby_with_quorum: Assertion,
    pub out_of_sync: Vec<Assertion>,
    pub uniquely_out_of_sync: Vec<Assertion>,
    /// Only computed for rating questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_disagreement: Option<Assertion>,
}

/// Every insight for one meeting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeetingReport {
    pub meeting_id: String,
    pub questions: Vec<QuestionReport>,
    pub significantly_out_of_sync: Vec<Assertion>,
    pub notable_participants: Vec<Assertion>,
    pub primary_participants: Vec<Assertion>,
    pub frequently_dotted: Vec<Assertion>,
    pub polarizing_subjects: Vec<Assertion>,
    pub polarizing_participants: Vec<Assertion>,
    pub polarizing_dots: Vec<Assertion>,
    pub nubbiness_score: f64,
    pub nubbiness: Assertion,
}

/// A meeting that could not be built or evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingFailure {
    pub meeting_id: String,
    pub error: String,
}

/// Result of a batch. Both lists are sorted by `meeting_id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub reports: Vec<MeetingReport>,
    pub failures: Vec<MeetingFailure>,
}

impl Evaluation {
    pub fn report(&self, meeting_id: &str) -> Option<&MeetingReport> {
        self.reports.iter().find(|r| r.meeting_id == meeting_id)
    }

    fn push(&mut self, meeting_id: String, result: Result<MeetingReport, String>) {
        match result {
            Ok(report) => self.reports.push(report),
            Err(error) => {
                warn!("meeting {meeting_id}: {error}");
                self.failures.push(MeetingFailure { meeting_id, error });
            }
        }
    }

    fn sort(&mut self) {
        self.reports.sort_by(|a, b| a.meeting_id.cmp(&b.meeting_id));
        self.failures.sort_by(|a, b| a.meeting_id.cmp(&b.meeting_id));
    }
}

/// Deterministic FNV-1a hash (stable across runs).
fn fnv1a_u64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn shard_index(meeting_id: &str, shard_count: usize) -> usize {
    if shard_count <= 1 {
        return 0;
    }
    (fnv1a_u64(meeting_id) as usize) % shard_count
}

/// A sharded supervisor.
///
/// - `shards == 1` evaluates on the calling thread.
/// - `shards > 1` evaluates each non-empty shard on a scoped thread.
#[derive(Debug)]
pub struct InsightSupervisor {
    cfg: InsightCfg,
    /// Optional per-meeting cfg overrides.
    cfg_overrides: HashMap<String, InsightCfg>,
    /// Optional attribute -> action map for grouping dots.
    actions: Option<HashMap<String, String>>,
    shards: usize,
}

impl InsightSupervisor {
    /// Create a supervisor with `shards` (concurrency count). `shards=1` is the default.
    pub fn new(shards: usize, cfg: InsightCfg) -> Self {
        Self {
            cfg,
            cfg_overrides: HashMap::new(),
            actions: None,
            shards: shards.max(1),
        }
    }

    pub fn shards(&self) -> usize {
        self.shards
    }

    /// Override cfg for a specific `meeting_id`.
    pub fn set_cfg_override(&mut self, meeting_id: impl Into<String>, cfg: InsightCfg) {
        self.cfg_overrides.insert(meeting_id.into(), cfg);
    }

    /// Remove cfg override for a specific `meeting_id`.
    pub fn clear_cfg_override(&mut self, meeting_id: &str) {
        self.cfg_overrides.remove(meeting_id);
    }

    /// Group dot polarization by action instead of over all dots.
    pub fn set_action_map(&mut self, actions: HashMap<String, String>) {
        self.actions = Some(actions);
    }

    pub fn clear_action_map(&mut self) {
        self.actions = None;
    }

    fn cfg_for(&self, meeting_id: &str) -> &InsightCfg {
        self.cfg_overrides.get(meeting_id).unwrap_or(&self.cfg)
    }

    fn evaluate_question(
        question: &Question,
        number_participants: usize,
        cfg: &InsightCfg,
    ) -> Result<QuestionReport, InsightError> {
        let sentiment_disagreement = match question.question_type {
            QuestionType::Rating => Some(believable_and_overall_sentiment_disagree(question, cfg)?),
            _ => None,
        };
        Ok(QuestionReport {
            question_id: question.id.clone(),
            question_type: question.question_type,
            responses: question.responses.len(),
            believable_choice: believable_choice_on_question(question, cfg)?,
            quorum: quorum_exists_on_question(question, number_participants, cfg),
            believable_consensus: believable_consensus_exists(question, number_participants, cfg)?,
            nubby: is_nubby_question(question, cfg)?,
            nubby_with_quorum: nubby_question_with_quorum(question, number_participants, cfg)?,
            out_of_sync: out_of_sync_people_on_question(question, cfg)?,
            uniquely_out_of_sync: uniquely_out_of_sync(question, cfg)?,
            sentiment_disagreement,
        })
    }

    /// Evaluate every insight for one meeting with its effective cfg.
    pub fn evaluate_meeting(&self, meeting: &Meeting) -> Result<MeetingReport, InsightError> {
        let cfg = self.cfg_for(&meeting.id);
        meeting.validate(cfg)?;

        let number_participants = meeting.participants.len();
        let questions = meeting
            .questions
            .iter()
            .map(|q| Self::evaluate_question(q, number_participants, cfg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MeetingReport {
            meeting_id: meeting.id.clone(),
            questions,
            significantly_out_of_sync: significantly_out_of_sync_in_meeting(meeting, cfg)?,
            notable_participants: notable_participants(meeting, cfg)?,
            primary_participants: primary_participants(&meeting.dots, cfg),
            frequently_dotted: frequently_dotted_subjects(&meeting.dots, cfg)?,
            polarizing_subjects: dots_on_subjects_are_polarizing(&meeting.dots, cfg)?,
            polarizing_participants: polarizing_participants(meeting, cfg)?,
            polarizing_dots: dots_in_meeting_are_polarizing(meeting, self.actions.as_ref(), cfg)?,
            nubbiness_score: meeting_nubbiness_score(meeting, cfg)?,
            nubbiness: meeting_nubbiness(meeting, cfg)?,
        })
    }

    /// Evaluate a batch of meetings.
    ///
    /// Deterministic for a given input and any shard count: reports and
    /// failures are sorted by `meeting_id`.
    pub fn evaluate(&self, meetings: &[Meeting]) -> Evaluation {
        // Group meetings by shard; within a shard, evaluate in meeting id order.
        let mut shard_meetings: Vec<Vec<&Meeting>> = vec![Vec::new(); self.shards];
        for m in meetings {
            shard_meetings[shard_index(&m.id, self.shards)].push(m);
        }
        for v in &mut shard_meetings {
            v.sort_by(|a, b| a.id.cmp(&b.id));
        }

        let run_shard = |idx: usize, batch: &[&Meeting]| -> Vec<(String, Result<MeetingReport, String>)> {
            debug!("shard {idx}: evaluating {} meetings", batch.len());
            batch
                .iter()
                .map(|m| (m.id.clone(), self.evaluate_meeting(m).map_err(|e| e.to_string())))
                .collect()
        };

        let mut out = Evaluation::default();
        if self.shards == 1 {
            for (id, result) in run_shard(0, &shard_meetings[0]) {
                out.push(id, result);
            }
        } else {
            let results = thread::scope(|s| {
                let handles: Vec<_> = shard_meetings
                    .iter()
                    .enumerate()
                    .filter(|(_, batch)| !batch.is_empty())
                    .map(|(idx, batch)| s.spawn(move || run_shard(idx, batch)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect::<Vec<_>>()
            });
            for (id, result) in results.into_iter().flatten() {
                out.push(id, result);
            }
        }

        out.sort();
        out
    }

    /// Build meetings from provider records, then evaluate them.
    ///
    /// Each meeting is built and validated with its effective cfg, override
    /// included. Records that fail to build are reported as failures next to
    /// the meetings that failed evaluation.
    pub fn ingest<B: MeetingBuilder>(&self, builder: &B, records: &[MeetingRecords]) -> Evaluation {
        let mut built = Vec::with_capacity(records.len());
        let mut build_failures = Vec::new();
        for (meeting_id, result) in build_meeting_batch(builder, records, |id| self.cfg_for(id)) {
            match result {
                Ok(meeting) => built.push(meeting),
                Err(e) => build_failures.push((meeting_id, e.to_string())),
            }
        }

        let mut out = self.evaluate(&built);
        for (meeting_id, error) in build_failures {
            out.push(meeting_id, Err(error));
        }
        out.sort();
        out
    }
}
