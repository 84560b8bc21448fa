//! meeting_insight_supervisor
//!
//! Outside-world facing orchestration layer for `meeting_insight_core`.
//!
//! Responsibilities:
//! - convert data-provider records into validated `Meeting`s via adapters
//! - shard meetings by `meeting_id` (deterministic)
//! - invoke every core insight and collect per-meeting reports
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no insight logic (lives in core)

pub mod adapter;
pub mod supervisor;

pub use adapter::{
    AdapterError,
    MeetingBuilder,
    BasicMeetingBuilder,
    BelievabilityNormalizer,
    PersonRecord,
    QuestionRecord,
    ResponseRecord,
    DotRecord,
    MeetingRecords,
    build_meeting_batch,
};

pub use supervisor::{
    InsightSupervisor,
    Evaluation,
    MeetingReport,
    QuestionReport,
    MeetingFailure,
};
