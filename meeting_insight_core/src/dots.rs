//! Polarization read from dots.
//!
//! An author may dot the same subject many times; those dots are collapsed
//! into one opinion (their mean) before any spread is measured, so a prolific
//! author counts once.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::assertion::{Assertion, Entity, Measure};
use crate::cfg::InsightCfg;
use crate::divisiveness::is_polarizing;
use crate::entities::{Dot, Meeting, PersonId};
use crate::error::Result;
use crate::foundation::synthesize;
use crate::meeting::frequently_dotted_subjects;

/// Label used when the dots of a meeting are judged as a single group.
pub const ALL_DOTS_LABEL: &str = "all_dots";

/// Synthesized author opinions per subject, one value per distinct author.
pub fn synthesize_author_opinions(dots: &[Dot]) -> BTreeMap<PersonId, Vec<f64>> {
    let mut by_pair: BTreeMap<(&PersonId, &PersonId), Vec<f64>> = BTreeMap::new();
    for dot in dots {
        by_pair
            .entry((&dot.subject, &dot.author))
            .or_default()
            .push(dot.value);
    }

    let mut out: BTreeMap<PersonId, Vec<f64>> = BTreeMap::new();
    for ((subject, _author), values) in by_pair {
        if let Some(opinion) = synthesize(&values) {
            out.entry(subject.clone()).or_default().push(opinion);
        }
    }
    out
}

/// One assertion per dotted subject: are the opinions they received polarizing?
pub fn dots_on_subjects_are_polarizing(dots: &[Dot], cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    for dot in dots {
        dot.validate()?;
    }
    Ok(synthesize_author_opinions(dots)
        .into_iter()
        .map(|(subject, opinions)| {
            let polarizing = is_polarizing(&opinions, &cfg.polarization);
            debug!("subject {subject}: opinions {opinions:?}, polarizing {polarizing}");
            Assertion::system(Entity::Person(subject), polarizing, Measure::Polarizing)
        })
        .collect())
}

/// Subjects who are both frequently dotted and polarizing.
pub fn polarizing_participants(meeting: &Meeting, cfg: &InsightCfg) -> Result<Vec<Assertion>> {
    meeting.validate(cfg)?;
    let frequent = frequently_dotted_subjects(&meeting.dots, cfg)?;
    let polarizing: HashMap<PersonId, bool> = dots_on_subjects_are_polarizing(&meeting.dots, cfg)?
        .into_iter()
        .filter_map(|a| {
            let flag = a.value.is_true();
            a.target_person().cloned().map(|id| (id, flag))
        })
        .collect();

    Ok(frequent
        .into_iter()
        .filter_map(|f| {
            let subject = f.target_person()?.clone();
            let both = f.value.is_true() && polarizing.get(&subject).copied().unwrap_or(false);
            Some(Assertion::system(
                Entity::Person(subject),
                both,
                Measure::PolarizingParticipant,
            ))
        })
        .collect())
}

/// Are the raw dot values of a meeting polarizing?
///
/// Without `by_action` every dot is judged together under
/// [`ALL_DOTS_LABEL`]. With it, dots are grouped by the action their
/// attribute maps to and each group is judged on its own; dots whose
/// attribute is missing or unmapped are left out.
pub fn dots_in_meeting_are_polarizing(
    meeting: &Meeting,
    by_action: Option<&HashMap<String, String>>,
    cfg: &InsightCfg,
) -> Result<Vec<Assertion>> {
    meeting.validate(cfg)?;

    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    match by_action {
        None => {
            groups.insert(
                ALL_DOTS_LABEL,
                meeting.dots.iter().map(|d| d.value).collect(),
            );
        }
        Some(actions) => {
            for dot in &meeting.dots {
                let action = dot
                    .attribute
                    .as_deref()
                    .and_then(|attr| actions.get(attr));
                match action {
                    Some(action) => groups.entry(action.as_str()).or_default().push(dot.value),
                    None => debug!(
                        "meeting {}: dot {} -> {} has no action for attribute {:?}",
                        meeting.id, dot.author, dot.subject, dot.attribute
                    ),
                }
            }
        }
    }

    Ok(groups
        .into_iter()
        .map(|(label, values)| {
            let polarizing = is_polarizing(&values, &cfg.polarization);
            Assertion::system(Entity::Label(label.to_string()), polarizing, Measure::Polarizing)
        })
        .collect())
}
