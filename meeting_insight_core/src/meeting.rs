//! Meeting-level insights: who gets dotted, who matters, who is out of sync
//! more than their peers, and how nubby the meeting was overall.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::assertion::{Assertion, AssertionValue, Entity, MeetingNubbiness, Measure};
use crate::cfg::{FrequentDotsCfg, InsightCfg, PrimaryCfg};
use crate::divisiveness::divisiveness_stat;
use crate::engagement::engagement_relative;
use crate::entities::{Dot, Meeting, PersonId};
use crate::error::Result;
use crate::foundation::{mean, zscore};
use crate::question::{nubby, out_of_sync_flags};

// ---------------------------------------------------------------------
// Dot shares
// ---------------------------------------------------------------------

/// Dots received per subject, in subject id order.
fn dots_by_subject(dots: &[Dot]) -> BTreeMap<&PersonId, Vec<&Dot>> {
    let mut out: BTreeMap<&PersonId, Vec<&Dot>> = BTreeMap::new();
    for dot in dots {
        out.entry(&dot.subject).or_default().push(dot);
    }
    out
}

fn is_frequent(share: f64, count: usize, t: &FrequentDotsCfg) -> bool {
    (share > t.min_pct_1 && count > t.min_count_1) || (share > t.min_pct_2 && count > t.min_count_2)
}

fn is_primary(share: f64, count: usize, t: &PrimaryCfg) -> bool {
    share > t.min_share || (count > t.min_count && share > t.min_share_with_count)
}

/// One assertion per dotted subject: is this subject dotted frequently?
///
/// Either a high share on its own, or a moderate share backed by volume,
/// is enough (see `FrequentDotsCfg`).
pub fn frequently_dotted_subjects(dots: &[Dot], cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    let total = dots.len();
    dots_by_subject(dots)
        .into_iter()
        .map(|(subject, received)| {
            let share = engagement_relative(&received, total)?;
            let frequent = is_frequent(share, received.len(), &cfg.frequent_dots);
            debug!(
                "subject {subject}: {} of {total} dots ({share:.3}), frequent {frequent}",
                received.len()
            );
            Ok(Assertion::system(
                Entity::Person(subject.clone()),
                frequent,
                Measure::FrequentlyDotted,
            ))
        })
        .collect()
}

fn primary_subjects(dots: &[Dot], cfg: &PrimaryCfg) -> HashSet<PersonId> {
    let total = dots.len() as f64;
    dots_by_subject(dots)
        .into_iter()
        .filter(|(_, received)| is_primary(received.len() as f64 / total, received.len(), cfg))
        .map(|(subject, _)| subject.clone())
        .collect()
}

/// One assertion per dotted subject: did the meeting revolve around them?
pub fn primary_participants(dots: &[Dot], cfg: &InsightCfg) -> Vec<Assertion> {
    let total = dots.len() as f64;
    dots_by_subject(dots)
        .into_iter()
        .map(|(subject, received)| {
            let primary = is_primary(received.len() as f64 / total, received.len(), &cfg.primary);
            Assertion::system(Entity::Person(subject.clone()), primary, Measure::PrimaryParticipant)
        })
        .collect()
}

/// Notable participants are primary participants or have any believability
/// at all. One assertion per participant, in participant order.
pub fn notable_participants(meeting: &Meeting, cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    meeting.validate(cfg)?;
    let notable = notable_flags(meeting, cfg);
    Ok(meeting
        .participants
        .iter()
        .zip(notable)
        .map(|(p, n)| Assertion::system(Entity::Person(p.id.clone()), n, Measure::NotableParticipant))
        .collect())
}

fn notable_flags(meeting: &Meeting, cfg: &InsightCfg) -> Vec<bool> {
    let primary = primary_subjects(&meeting.dots, &cfg.primary);
    meeting
        .participants
        .iter()
        .map(|p| primary.contains(&p.id) || p.believability > 0.0)
        .collect()
}

// ---------------------------------------------------------------------
// Significantly out of sync
// ---------------------------------------------------------------------

/// Flags participants who were out of sync on unusually many questions.
///
/// Out-of-sync counts are z-scored across every participant, responders or
/// not. Notable participants are flagged above `cfg.oos_threshold_low`,
/// everyone else above `cfg.oos_threshold_high`. When every participant has
/// the same count nobody stands out and all are `false`.
pub fn significantly_out_of_sync_in_meeting(
    meeting: &Meeting,
    cfg: &InsightCfg,
) -> Result<Vec<Assertion>> {
    meeting.validate(cfg)?;

    let index: BTreeMap<&PersonId, usize> = meeting
        .participants
        .iter()
        .enumerate()
        .map(|(i, p)| (&p.id, i))
        .collect();

    let mut counts = vec![0.0_f64; meeting.participants.len()];
    for question in &meeting.questions {
        let flags = out_of_sync_flags(question, cfg)?;
        for (response, oos) in question.responses.iter().zip(flags) {
            if !oos {
                continue;
            }
            match index.get(&response.source.id) {
                Some(i) => counts[*i] += 1.0,
                None => debug!(
                    "meeting {}: responder {} on {} is not a participant",
                    meeting.id, response.source.id, question.id
                ),
            }
        }
    }

    let notable = notable_flags(meeting, cfg);
    let scores = zscore(&counts);
    debug!("meeting {}: out-of-sync counts {counts:?}, z {scores:?}", meeting.id);

    Ok(meeting
        .participants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let flagged = match &scores {
                Some(z) if notable[i] => z[i] > cfg.oos_threshold_low,
                Some(z) => z[i] > cfg.oos_threshold_high,
                None => false,
            };
            Assertion::system(
                Entity::Person(p.id.clone()),
                flagged,
                Measure::SignificantlyOutOfSync,
            )
        })
        .collect())
}

// ---------------------------------------------------------------------
// Meeting nubbiness
// ---------------------------------------------------------------------

/// Nubbiness score in [0, ~1]: mean sentiment-bucketed divisiveness of the
/// nubby questions, halved when only one question is nubby. 0 when none is.
pub fn meeting_nubbiness_score(meeting: &Meeting, cfg: &InsightCfg) -> Result<f64> {
    meeting.validate(cfg)?;
    let mut stats = Vec::new();
    for question in &meeting.questions {
        if nubby(question, true, cfg)? {
            stats.push(divisiveness_stat(
                &question.values(),
                question.question_type,
                true,
                cfg,
            )?);
        }
    }
    let factor = if stats.len() == 1 { 0.5 } else { 1.0 };
    Ok(mean(&stats).map_or(0.0, |m| m * factor))
}

/// Classified meeting nubbiness, targeting the meeting.
pub fn meeting_nubbiness(meeting: &Meeting, cfg: &InsightCfg) -> Result<Assertion> {
    let score = meeting_nubbiness_score(meeting, cfg)?;
    let class = MeetingNubbiness::classify(score, &cfg.meeting_nubbiness_bins);
    debug!("meeting {}: nubbiness {score:.3} -> {class:?}", meeting.id);
    Ok(Assertion::system(
        Entity::Meeting(meeting.id.clone()),
        AssertionValue::Nubbiness(class),
        Measure::MeetingNubbiness,
    ))
}
