//! Canonical tabular form of a chart.
//!
//! One comma-separated record per line under a fixed header, the same schema
//! the raw records arrive in. Serialization sorts by note ID and is exact
//! under re-parsing, which keeps diff-based regression tests independent of
//! whatever container the records were originally pulled from. This module
//! only ever touches in-memory text; reading files or score bundles is the
//! caller's business.

use crate::chart::{Chart, LinkError};
use crate::note::{FlickKind, Note, NoteKind};
use log::info;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Field order of the canonical schema.
pub const HEADER: &str = "id,hitTiming,type,subStatus,startPosition,finishPosition,isSync,groupId";

const FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingHeader,
    InvalidFormat { line: usize, what: String },
    Link(LinkError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingHeader => {
                write!(f, "Missing or malformed header row (expected '{}').", HEADER)
            }
            ParseError::InvalidFormat { line, what } => {
                write!(f, "Invalid record on line {}: {}.", line, what)
            }
            ParseError::Link(e) => write!(f, "{}", e),
        }
    }
}

impl Error for ParseError {}

impl From<LinkError> for ParseError {
    fn from(err: LinkError) -> Self {
        ParseError::Link(err)
    }
}

/// Parses the canonical tabular form into raw, unlinked note records.
/// Blank lines are skipped; anything else malformed is an error.
pub fn parse_records(text: &str) -> Result<Vec<Note>, ParseError> {
    let mut lines = text.lines().enumerate();

    let header = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .map(|(_, line)| line.trim());
    if header != Some(HEADER) {
        return Err(ParseError::MissingHeader);
    }

    let mut records = Vec::new();
    for (index, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(parse_record(line, index + 1)?);
    }
    info!("Parsed {} note records.", records.len());
    Ok(records)
}

/// Parses and links in one step.
pub fn parse_chart(text: &str) -> Result<Chart, ParseError> {
    let records = parse_records(text)?;
    Ok(Chart::from_records(records)?)
}

/// Serializes a chart back into the canonical tabular form: header row, one
/// record per line, sorted ascending by note ID regardless of timing order.
/// Timings use the shortest decimal form that re-parses to the same value.
pub fn write_records(chart: &Chart) -> String {
    let mut sorted: Vec<&Note> = chart.notes().iter().collect();
    sorted.sort_by_key(|note| note.id);

    let mut out = String::with_capacity((sorted.len() + 1) * 32);
    out.push_str(HEADER);
    out.push('\n');
    for note in sorted {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            note.id,
            note.hit_timing,
            note.kind.code(),
            note.flick.code(),
            note.start_position,
            note.finish_position,
            note.is_sync as u8,
            note.group_id,
        ));
    }
    out
}

fn parse_record(line: &str, line_number: usize) -> Result<Note, ParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::InvalidFormat {
            line: line_number,
            what: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    }

    let id: i32 = field(fields[0], line_number, "id")?;
    let hit_timing: f64 = field(fields[1], line_number, "hitTiming")?;
    let kind = NoteKind::from_code(field(fields[2], line_number, "type")?);
    let flick = FlickKind::from_code(field(fields[3], line_number, "subStatus")?).ok_or_else(
        || ParseError::InvalidFormat {
            line: line_number,
            what: format!("subStatus '{}' out of range", fields[3].trim()),
        },
    )?;
    let start_position: i32 = field(fields[4], line_number, "startPosition")?;
    let finish_position: i32 = field(fields[5], line_number, "finishPosition")?;
    let is_sync = match fields[6].trim() {
        "0" => false,
        "1" => true,
        other => {
            return Err(ParseError::InvalidFormat {
                line: line_number,
                what: format!("isSync '{}' is not 0 or 1", other),
            });
        }
    };
    let group_id: i32 = field(fields[7], line_number, "groupId")?;

    Ok(Note::new(
        id,
        hit_timing,
        kind,
        flick,
        start_position,
        finish_position,
        is_sync,
        group_id,
    ))
}

fn field<T: FromStr>(raw: &str, line: usize, name: &str) -> Result<T, ParseError> {
    raw.trim().parse().map_err(|_| ParseError::InvalidFormat {
        line,
        what: format!("{} '{}' is not a valid value", name, raw.trim()),
    })
}
