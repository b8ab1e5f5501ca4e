use super::LinkError;
use crate::note::{Note, NoteKind};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Fills every relationship slot of a timing-sorted note arena.
///
/// One forward pass over the arena, index `i` ascending. Tap-or-flick notes
/// get sync pairing and flick chaining, holds get sync pairing and end
/// matching, slides get sync pairing and slide chaining with a flick-bridge
/// fallback. Records of any other kind are left untouched.
///
/// All slots are cleared up front, so the pass is idempotent over its input.
pub(crate) fn link_notes(notes: &mut [Note]) -> Result<(), LinkError> {
    for note in notes.iter_mut() {
        note.clear_links();
    }

    // Whole-chart group membership, consulted for the soft warning when a
    // group chain scan comes up empty. A terminal member of a well-formed
    // group must not warn.
    let mut group_sizes: HashMap<i32, usize> = HashMap::new();
    for note in notes.iter() {
        *group_sizes.entry(note.group_id).or_insert(0) += 1;
    }

    // Tap-or-flick notes claimed as hold ends; consulted so a claimed end is
    // not re-processed as a chain head when the outer scan reaches it.
    let mut matched_hold_ends: HashSet<usize> = HashSet::new();

    for i in 0..notes.len() {
        match notes[i].kind {
            NoteKind::TapOrFlick => {
                if notes[i].is_sync {
                    let pair = find_sync_pair(notes, i)?;
                    notes[i].sync_pair = Some(pair);
                }
                if notes[i].is_flick() {
                    let group = notes[i].group_id;
                    let found = scan_forward(notes, i + 1, |n| {
                        n.is_flick() && n.group_id != 0 && n.group_id == group
                    });
                    match found {
                        Some(j) => {
                            notes[i].next_flick = Some(j);
                            notes[j].prev_flick = Some(i);
                            if notes[j].is_slide() {
                                notes[i].next_slide = Some(j);
                                notes[j].prev_slide = Some(i);
                            }
                        }
                        None => {
                            if group_sizes.get(&group).copied().unwrap_or(0) < 2 {
                                warn!(
                                    "Not enough flick notes to form a group at note ID #{}, group ID {}.",
                                    notes[i].id, group
                                );
                            }
                        }
                    }
                }
            }
            NoteKind::Hold => {
                if notes[i].is_sync {
                    let pair = find_sync_pair(notes, i)?;
                    notes[i].sync_pair = Some(pair);
                }
                if matched_hold_ends.remove(&i) {
                    continue;
                }
                let finish = notes[i].finish_position;
                let j = scan_forward(notes, i + 1, |n| {
                    !n.is_hold() && !n.is_slide() && n.finish_position == finish
                })
                .ok_or(LinkError::MissingHoldEnd { id: notes[i].id })?;
                notes[i].next_hold = Some(j);
                notes[j].prev_hold = Some(i);
                // An end note follows the trail of its hold head, so the
                // start lane recorded for it in source data is unreliable
                // and is replaced with the head's.
                notes[j].start_position = notes[i].start_position;
                matched_hold_ends.insert(j);
            }
            NoteKind::Slide => {
                if notes[i].is_sync {
                    let pair = find_sync_pair(notes, i)?;
                    notes[i].sync_pair = Some(pair);
                }
                if matched_hold_ends.remove(&i) {
                    continue;
                }
                let group = notes[i].group_id;
                let next_slide = scan_forward(notes, i + 1, |n| {
                    n.is_slide() && n.group_id != 0 && n.group_id == group
                });
                if let Some(j) = next_slide {
                    notes[i].next_slide = Some(j);
                    notes[j].prev_slide = Some(i);
                } else if let Some(j) = scan_forward(notes, i + 1, |n| {
                    n.is_flick() && n.group_id != 0 && n.group_id == group
                }) {
                    // A slide run may terminate in a flick gesture: the slide
                    // takes the flick as its next-flick, the flick takes the
                    // slide as its prev-slide.
                    notes[i].next_flick = Some(j);
                    notes[j].prev_slide = Some(i);
                } else if group_sizes.get(&group).copied().unwrap_or(0) < 2 {
                    warn!(
                        "Not enough slide notes to form a group at note ID #{}, group ID {}.",
                        notes[i].id, group
                    );
                }
            }
            NoteKind::Other(_) => {}
        }
    }

    Ok(())
}

/// First index `>= start` whose note satisfies `pred`.
fn scan_forward<P>(notes: &[Note], start: usize, pred: P) -> Option<usize>
where
    P: Fn(&Note) -> bool,
{
    notes
        .iter()
        .enumerate()
        .skip(start)
        .find_map(|(index, note)| pred(note).then_some(index))
}

/// First other note anywhere in the chart with identical timing and the sync
/// flag set. Partners can precede the current note in scan order, so the
/// whole arena is searched, not just the forward remainder.
fn find_sync_pair(notes: &[Note], i: usize) -> Result<usize, LinkError> {
    let timing = notes[i].hit_timing;
    notes
        .iter()
        .enumerate()
        // Timing comparison is exact: the upstream producer supplies
        // bit-identical values for simultaneous notes.
        .find_map(|(index, note)| {
            (index != i && note.hit_timing == timing && note.is_sync).then_some(index)
        })
        .ok_or(LinkError::MissingSyncPartner { id: notes[i].id })
}
