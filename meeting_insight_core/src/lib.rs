pub mod error;
pub mod cfg;
pub mod entities;
pub mod assertion;

pub mod foundation;
pub mod engagement;
pub mod choice;
pub mod divisiveness;
pub mod disagreement;

pub mod question;
pub mod meeting;
pub mod dots;

pub use error::{InsightError, Result};
pub use cfg::{InsightCfg, PolarizationCfg, FrequentDotsCfg, PrimaryCfg, BinaryCfg};
pub use entities::{
    Person, PersonId, Question, QuestionType, NumericRange, Response, ResponseValue,
    BinaryAnswer, Dot, Meeting, DEFAULT_BELIEVABILITY,
};
pub use assertion::{Assertion, AssertionValue, Entity, Measure, MeetingNubbiness};

pub use foundation::{
    SentimentBucket, map_to_sentiment_bucket, bucket_ordinals, mean, standard_deviation,
    population_standard_deviation, weighted_average, synthesize, percent_satisfying_condition,
    counts, percent_of_total, zscore,
};
pub use engagement::{
    engagement_raw, engagement_believability, engagement_relative, quorum_exists,
    sufficient_believability_engagement,
};
pub use choice::believable_choice;
pub use divisiveness::{coded_values, divisiveness_stat, polarizing_stat, is_polarizing};
pub use disagreement::{
    disagrees_with, bucketed_disagreement, substantive_disagreement, unique_choice,
    ResponseBucket, response_bucket,
};

pub use question::{
    believable_choice_on_question, quorum_exists_on_question, is_nubby_question,
    is_nubby_question_raw, nubby_question_with_quorum, believable_consensus_exists,
    out_of_sync_people_on_question, unique_responses, uniquely_out_of_sync,
    believable_and_overall_sentiment_disagree,
};
pub use meeting::{
    frequently_dotted_subjects, primary_participants, notable_participants,
    significantly_out_of_sync_in_meeting, meeting_nubbiness_score, meeting_nubbiness,
};
pub use dots::{
    ALL_DOTS_LABEL, synthesize_author_opinions, dots_on_subjects_are_polarizing,
    polarizing_participants, dots_in_meeting_are_polarizing,
};
