//! Chart structure reconstruction for CGSS-style rhythm game scores.
//!
//! Score data arrives as a flat list of note records; the relationships that
//! make it playable — which notes form a held gesture, which chain into a
//! flick or slide combo, which are hit simultaneously — are only implied by
//! shared timing, lane and group attributes. This crate rebuilds that
//! structure:
//!
//! - [`note::Note`] is the atomic record with its derived predicates and
//!   index-based relationship slots.
//! - [`chart::Chart`] owns the timing-sorted note arena and runs the linking
//!   pass that fills the slots, rejecting charts with unmatchable notes.
//! - [`chart::validate`] re-derives every linking invariant and reports
//!   findings without mutating or failing.
//! - [`tabular`] round-trips the canonical comma-separated record schema.
//!
//! Acquiring records from files or score bundles, command-line handling and
//! rendering to downstream beatmap formats are all left to callers.

pub mod chart;
pub mod note;
pub mod tabular;

pub use chart::{Chart, EffectiveKind, LinkError, ValidationReport, validate};
pub use note::{FlickKind, Note, NoteKind};
