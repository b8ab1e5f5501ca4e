use serde::{Deserialize, Serialize};
use std::fmt;

/// The recorded classification of a note. Score data carries more codes than
/// the three playable kinds (timing markers and the like); those are kept as
/// `Other` with their raw code so a chart can be written back untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    TapOrFlick,
    Hold,
    Slide,
    Other(i32),
}

impl NoteKind {
    pub fn code(self) -> i32 {
        match self {
            NoteKind::TapOrFlick => 1,
            NoteKind::Hold => 2,
            NoteKind::Slide => 3,
            NoteKind::Other(code) => code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => NoteKind::TapOrFlick,
            2 => NoteKind::Hold,
            3 => NoteKind::Slide,
            code => NoteKind::Other(code),
        }
    }
}

/// Sub-status of a tap-or-flick note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlickKind {
    Tap,
    FlickLeft,
    FlickRight,
}

impl FlickKind {
    pub fn code(self) -> i32 {
        match self {
            FlickKind::Tap => 0,
            FlickKind::FlickLeft => 1,
            FlickKind::FlickRight => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(FlickKind::Tap),
            1 => Some(FlickKind::FlickLeft),
            2 => Some(FlickKind::FlickRight),
            _ => None,
        }
    }
}

/// One hit event of a chart.
///
/// The relationship slots (`next_hold`, `sync_pair`, ...) are indices into the
/// owning [`Chart`](crate::chart::Chart)'s note arena. They start empty and are
/// filled by the linking pass; the arena owns every note, a slot is a lookup
/// relation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i32,
    pub hit_timing: f64,
    pub kind: NoteKind,
    pub flick: FlickKind,
    pub start_position: i32,
    pub finish_position: i32,
    pub is_sync: bool,
    pub group_id: i32,

    #[serde(default)]
    pub next_hold: Option<usize>,
    #[serde(default)]
    pub prev_hold: Option<usize>,
    #[serde(default)]
    pub next_flick: Option<usize>,
    #[serde(default)]
    pub prev_flick: Option<usize>,
    #[serde(default)]
    pub next_slide: Option<usize>,
    #[serde(default)]
    pub prev_slide: Option<usize>,
    #[serde(default)]
    pub sync_pair: Option<usize>,
}

impl Note {
    /// Creates an unlinked note record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i32,
        hit_timing: f64,
        kind: NoteKind,
        flick: FlickKind,
        start_position: i32,
        finish_position: i32,
        is_sync: bool,
        group_id: i32,
    ) -> Self {
        Note {
            id,
            hit_timing,
            kind,
            flick,
            start_position,
            finish_position,
            is_sync,
            group_id,
            next_hold: None,
            prev_hold: None,
            next_flick: None,
            prev_flick: None,
            next_slide: None,
            prev_slide: None,
            sync_pair: None,
        }
    }

    pub(crate) fn clear_links(&mut self) {
        self.next_hold = None;
        self.prev_hold = None;
        self.next_flick = None;
        self.prev_flick = None;
        self.next_slide = None;
        self.prev_slide = None;
        self.sync_pair = None;
    }

    pub fn is_flick(&self) -> bool {
        self.kind == NoteKind::TapOrFlick
            && matches!(self.flick, FlickKind::FlickLeft | FlickKind::FlickRight)
    }

    pub fn is_tap(&self) -> bool {
        self.kind == NoteKind::TapOrFlick && self.flick == FlickKind::Tap
    }

    pub fn is_hold(&self) -> bool {
        self.kind == NoteKind::Hold
    }

    pub fn is_hold_start(&self) -> bool {
        self.kind == NoteKind::Hold && self.next_hold.is_some()
    }

    /// Hold ends are tap-or-flick notes claimed by a hold head, never holds
    /// themselves.
    pub fn is_hold_end(&self) -> bool {
        self.kind == NoteKind::TapOrFlick && self.prev_hold.is_some()
    }

    pub fn is_slide(&self) -> bool {
        self.kind == NoteKind::Slide
    }

    pub fn is_slide_start(&self) -> bool {
        self.kind == NoteKind::Slide && self.next_slide.is_some()
    }

    pub fn is_slide_midway(&self) -> bool {
        self.kind == NoteKind::Slide && self.next_slide.is_some() && self.prev_slide.is_some()
    }

    pub fn is_slide_end(&self) -> bool {
        self.kind == NoteKind::Slide && self.prev_slide.is_some()
    }

    /// True for the three playable kinds a formatter should emit.
    pub fn is_gaming_note(&self) -> bool {
        matches!(
            self.kind,
            NoteKind::TapOrFlick | NoteKind::Hold | NoteKind::Slide
        )
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Timing: {}, Type: {:?}",
            self.id, self.hit_timing, self.kind
        )
    }
}
