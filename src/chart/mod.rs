pub mod link;
pub mod validate;

pub use validate::{ValidationReport, validate};

use crate::note::{FlickKind, Note, NoteKind};
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

/// A linking failure. Linking is all-or-nothing: a chart either fully links
/// or is rejected with the first unmatchable note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    MissingSyncPartner { id: i32 },
    MissingHoldEnd { id: i32 },
    UnsupportedFlickGeometry { id: i32 },
    NotPlayable { id: i32 },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::MissingSyncPartner { id } => {
                write!(f, "Missing sync pair note at note ID #{}.", id)
            }
            LinkError::MissingHoldEnd { id } => {
                write!(f, "Missing end hold note at note ID #{}.", id)
            }
            LinkError::UnsupportedFlickGeometry { id } => {
                write!(f, "Unsupported flick type for slide note at note ID #{}.", id)
            }
            LinkError::NotPlayable { id } => {
                write!(f, "Note ID #{} is not a playable note.", id)
            }
        }
    }
}

impl Error for LinkError {}

/// The playable sub-type a formatter emits, with its wire code.
///
/// A slide bridged into a flick is reclassified by the lane direction of the
/// bridge; see [`Chart::effective_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectiveKind {
    Tap,
    FlickLeft,
    FlickRight,
    Hold,
    Slide,
}

impl EffectiveKind {
    pub fn code(self) -> i32 {
        match self {
            EffectiveKind::Tap => 0,
            EffectiveKind::FlickLeft => 1,
            EffectiveKind::FlickRight => 2,
            EffectiveKind::Hold => 3,
            EffectiveKind::Slide => 4,
        }
    }
}

/// An ordered, cross-linked collection of note records for one chart.
///
/// Notes live in a single owned arena sorted ascending by hit timing; every
/// relationship slot is an index into that arena. The order is load-bearing
/// for the forward-scanning link rules and is preserved after linking, so
/// downstream consumers can treat the chart as immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    notes: Vec<Note>,
}

impl Chart {
    /// Builds a chart from an unordered batch of raw records: sorts by hit
    /// timing (stable, so timing ties keep their input order) and runs the
    /// linking pass.
    pub fn from_records(mut notes: Vec<Note>) -> Result<Chart, LinkError> {
        notes.sort_by(|a, b| {
            a.hit_timing
                .partial_cmp(&b.hit_timing)
                .unwrap_or(Ordering::Equal)
        });
        let mut chart = Chart { notes };
        chart.link()?;
        Ok(chart)
    }

    /// Re-runs the linking pass. All relationship slots are cleared first,
    /// so linking an already-linked chart reproduces identical slots.
    pub fn link(&mut self) -> Result<(), LinkError> {
        link::link_notes(&mut self.notes)?;
        debug!("Linked chart with {} notes.", self.notes.len());
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Re-derives every invariant the linker is supposed to have established.
    pub fn validate(&self) -> ValidationReport {
        validate(self)
    }

    /// The playable sub-type of the note at `index`, as a formatter sees it.
    ///
    /// Taps and flicks report their own sub-status, holds report `Hold`. A
    /// slide whose bridged flick finishes on a higher lane becomes a right
    /// flick, on a lower lane a left flick; equal lanes leave no direction to
    /// derive and fail with [`LinkError::UnsupportedFlickGeometry`]. A slide
    /// with no bridge stays `Slide`.
    pub fn effective_kind(&self, index: usize) -> Result<EffectiveKind, LinkError> {
        let note = &self.notes[index];
        match note.kind {
            NoteKind::TapOrFlick => Ok(match note.flick {
                FlickKind::Tap => EffectiveKind::Tap,
                FlickKind::FlickLeft => EffectiveKind::FlickLeft,
                FlickKind::FlickRight => EffectiveKind::FlickRight,
            }),
            NoteKind::Hold => Ok(EffectiveKind::Hold),
            NoteKind::Slide => match note.next_flick {
                Some(flick_index) => {
                    let flick = &self.notes[flick_index];
                    if flick.finish_position > note.finish_position {
                        Ok(EffectiveKind::FlickRight)
                    } else if flick.finish_position < note.finish_position {
                        Ok(EffectiveKind::FlickLeft)
                    } else {
                        Err(LinkError::UnsupportedFlickGeometry { id: note.id })
                    }
                }
                None => Ok(EffectiveKind::Slide),
            },
            NoteKind::Other(_) => Err(LinkError::NotPlayable { id: note.id }),
        }
    }
}
