use chartlink::tabular::{self, HEADER};
use chartlink::{EffectiveKind, FlickKind, LinkError, NoteKind};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// A miniature chart exercising every relation: a sync pair, a hold with its
// end, a three-note slide group and a slide bridging into a flick. Record
// order is deliberately not timing order. The type-91 row stands in for the
// non-playable markers real score data carries.
fn sample_text() -> String {
    let rows = [
        "1,0.0,91,0,0,0,0,0",
        "2,1.0,1,0,2,2,1,0",
        "3,1.0,2,0,4,4,1,0",
        "5,2.0,1,0,1,4,0,0",
        "4,1.5,3,0,1,1,0,5",
        "6,2.5,3,0,2,2,0,5",
        "7,3.0,3,0,3,3,0,5",
        "8,4.0,3,0,2,2,0,6",
        "9,4.5,1,2,4,4,0,6",
    ];
    format!("{}\n{}\n", HEADER, rows.join("\n"))
}

#[test]
fn full_chart_links_every_relation() {
    init_logging();
    let chart = tabular::parse_chart(&sample_text()).unwrap();
    assert_eq!(chart.len(), 9);

    let notes = chart.notes();
    let idx = |id: i32| notes.iter().position(|n| n.id == id).unwrap();

    // Sync pair across a tap and a hold on the same timing.
    assert_eq!(notes[idx(2)].sync_pair, Some(idx(3)));
    assert_eq!(notes[idx(3)].sync_pair, Some(idx(2)));
    assert_eq!(notes[idx(2)].hit_timing, notes[idx(3)].hit_timing);

    // Hold #3 (lane 4) ends at tap #5, which inherits the head's start lane
    // in place of the lane-1 value its record carries.
    assert_eq!(notes[idx(3)].next_hold, Some(idx(5)));
    assert_eq!(notes[idx(5)].prev_hold, Some(idx(3)));
    assert_eq!(notes[idx(5)].start_position, 4);

    // Slide group 5 chains in timing order.
    assert_eq!(notes[idx(4)].next_slide, Some(idx(6)));
    assert_eq!(notes[idx(6)].next_slide, Some(idx(7)));
    assert_eq!(notes[idx(7)].prev_slide, Some(idx(6)));
    assert!(notes[idx(6)].is_slide_midway());

    // Slide #8 bridges into flick #9.
    assert_eq!(notes[idx(8)].next_flick, Some(idx(9)));
    assert_eq!(notes[idx(9)].prev_slide, Some(idx(8)));

    // The bridge leaves slide #8 without slide links and group 6 with a
    // single flick member. Both are advisory findings only; the verdict
    // stays a pass.
    let report = chart.validate();
    assert!(report.passed, "findings: {:?}", report.reasons);
    assert_eq!(
        report.reasons,
        [
            "Note #8 is a lonely slide note.",
            "Flick group #6 does not contain enough notes (at least 2).",
        ]
    );
}

#[test]
fn round_trip_preserves_linked_structure() {
    init_logging();
    let chart = tabular::parse_chart(&sample_text()).unwrap();
    let written = tabular::write_records(&chart);
    let reparsed = tabular::parse_chart(&written).unwrap();

    // Field-for-field, relationship slots included.
    assert_eq!(chart, reparsed);

    // Writing again is a fixed point.
    assert_eq!(written, tabular::write_records(&reparsed));
}

#[test]
fn round_trip_keeps_non_playable_rows() {
    init_logging();
    let chart = tabular::parse_chart(&sample_text()).unwrap();
    let written = tabular::write_records(&chart);
    assert!(written.lines().any(|l| l.starts_with("1,") && l.contains(",91,")));
    let reparsed = tabular::parse_chart(&written).unwrap();
    assert_eq!(reparsed.notes()[0].kind, NoteKind::Other(91));
}

#[test]
fn effective_kinds_match_the_wire_codes() {
    init_logging();
    let chart = tabular::parse_chart(&sample_text()).unwrap();
    let notes = chart.notes();
    let idx = |id: i32| notes.iter().position(|n| n.id == id).unwrap();

    assert_eq!(chart.effective_kind(idx(2)).unwrap(), EffectiveKind::Tap);
    assert_eq!(chart.effective_kind(idx(3)).unwrap(), EffectiveKind::Hold);
    assert_eq!(chart.effective_kind(idx(4)).unwrap(), EffectiveKind::Slide);
    // Slide #8 (lane 2) bridges into a flick on lane 4: reclassified right.
    assert_eq!(
        chart.effective_kind(idx(8)).unwrap(),
        EffectiveKind::FlickRight
    );
    assert_eq!(chart.effective_kind(idx(8)).unwrap().code(), 2);
    assert_eq!(
        chart.effective_kind(idx(1)),
        Err(LinkError::NotPlayable { id: 1 })
    );

    // Formatters filter on is_gaming_note before asking for kinds.
    let playable = notes.iter().filter(|n| n.is_gaming_note()).count();
    assert_eq!(playable, 8);
}

#[test]
fn missing_sync_partner_rejects_the_whole_chart() {
    init_logging();
    let text = format!("{}\n1,2.0,1,0,3,3,1,0\n2,3.0,1,0,4,4,0,0\n", HEADER);
    assert_eq!(
        tabular::parse_chart(&text).unwrap_err(),
        tabular::ParseError::Link(LinkError::MissingSyncPartner { id: 1 })
    );
}

#[test]
fn lone_flick_group_warns_softly_end_to_end() {
    init_logging();
    let text = format!("{}\n1,1.0,1,1,3,3,0,7\n", HEADER);
    let chart = tabular::parse_chart(&text).unwrap();
    assert_eq!(chart.notes()[0].flick, FlickKind::FlickLeft);
    let report = chart.validate();
    assert!(report.passed);
    assert_eq!(
        report.reasons,
        ["Flick group #7 does not contain enough notes (at least 2)."]
    );
}

#[test]
fn linked_chart_serializes_for_regression_diffs() {
    init_logging();
    let chart = tabular::parse_chart(&sample_text()).unwrap();
    let json = serde_json::to_string_pretty(&chart).unwrap();
    assert!(json.contains("\"sync_pair\""));

    let report = chart.validate();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"passed\":true"));
}
