use super::Chart;
use crate::note::NoteKind;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of a validation pass.
///
/// `passed` only reflects the hard checks (missing sync pair, hold note with
/// both links); everything else lands in `reasons` as an advisory finding.
/// Broken reciprocal links and lonely notes are tolerated oddities in real
/// chart data, while the hard conditions indicate genuine corruption.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub reasons: Vec<String>,
}

/// Re-derives and checks every invariant the linker is supposed to have
/// established. Read-only; data problems are reported, never raised.
pub fn validate(chart: &Chart) -> ValidationReport {
    let notes = chart.notes();
    let mut passed = true;
    let mut reasons = Vec::new();
    let mut flick_group_counts: HashMap<i32, u32> = HashMap::new();

    for (i, note) in notes.iter().enumerate() {
        match note.kind {
            NoteKind::TapOrFlick => {
                if note.is_sync && note.sync_pair.is_none() {
                    reasons.push(format!("Missing sync pair note at note ID #{}.", note.id));
                    passed = false;
                }
                if note.is_flick() {
                    *flick_group_counts.entry(note.group_id).or_insert(0) += 1;
                }
            }
            NoteKind::Hold => {
                if note.is_sync && note.sync_pair.is_none() {
                    reasons.push(format!("Missing sync pair note at note ID #{}.", note.id));
                    passed = false;
                }
                if note.next_hold.is_some() && note.prev_hold.is_some() {
                    reasons.push(format!(
                        "Note #{} has both previous and next hold notes.",
                        note.id
                    ));
                    passed = false;
                }
                if let Some(j) = note.next_hold {
                    if notes.get(j).map_or(true, |n| n.prev_hold != Some(i)) {
                        reasons.push(format!(
                            "Broken next hold link detected at note ID #{}.",
                            note.id
                        ));
                    }
                }
                if let Some(j) = note.prev_hold {
                    if notes.get(j).map_or(true, |n| n.next_hold != Some(i)) {
                        reasons.push(format!(
                            "Broken previous hold link detected at note ID #{}.",
                            note.id
                        ));
                    }
                }
                if note.next_hold.is_none() && note.prev_hold.is_none() {
                    reasons.push(format!("Note #{} is a lonely hold note.", note.id));
                }
            }
            NoteKind::Slide => {
                if note.is_sync && note.sync_pair.is_none() {
                    reasons.push(format!("Missing sync pair note at note ID #{}.", note.id));
                    passed = false;
                }
                if let Some(j) = note.next_slide {
                    if notes.get(j).map_or(true, |n| n.prev_slide != Some(i)) {
                        reasons.push(format!(
                            "Broken next slide link detected at note ID #{}.",
                            note.id
                        ));
                    }
                }
                if let Some(j) = note.prev_slide {
                    if notes.get(j).map_or(true, |n| n.next_slide != Some(i)) {
                        reasons.push(format!(
                            "Broken previous slide link detected at note ID #{}.",
                            note.id
                        ));
                    }
                }
                if note.next_slide.is_none() && note.prev_slide.is_none() {
                    reasons.push(format!("Note #{} is a lonely slide note.", note.id));
                }
            }
            NoteKind::Other(_) => {}
        }
    }

    let mut small_groups: Vec<i32> = flick_group_counts
        .iter()
        .filter(|(_, count)| **count < 2)
        .map(|(group, _)| *group)
        .collect();
    small_groups.sort_unstable();
    for group in small_groups {
        reasons.push(format!(
            "Flick group #{} does not contain enough notes (at least 2).",
            group
        ));
    }

    debug!(
        "Validated chart: passed={}, {} finding(s).",
        passed,
        reasons.len()
    );
    ValidationReport { passed, reasons }
}
