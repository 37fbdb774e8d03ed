//! Header resolution: synonyms, whitespace handling, all-or-nothing errors.

mod common;

use rollcall_core::{
    field_resolver::{resolve, LogicalField},
    RawRow, RedistributionConfig, RollCallEngine, RosterError,
};

fn labels(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn resolves_spreadsheet_headers_with_line_breaks() {
    let map = resolve(&labels(&[
        "Therapist\nName",
        "Ward",
        "Present?",
        "Must See (P1)\n  Total",
        "P2 Total\n(P2/1)",
        "P3 Total",
        "Can help?",
        "Need  help?",
        "Notes",
    ]))
    .expect("all fields resolve");

    assert_eq!(map.get(LogicalField::Name), Some("Therapist\nName"));
    assert_eq!(map.get(LogicalField::MustSee), Some("Must See (P1)\n  Total"));
    assert_eq!(map.get(LogicalField::P2Composite), Some("P2 Total\n(P2/1)"));
    assert_eq!(map.get(LogicalField::P3), Some("P3 Total"));
    assert_eq!(map.get(LogicalField::NeedHelp), Some("Need  help?"));
    assert_eq!(map.get(LogicalField::TraineeLed), None);
}

#[test]
fn alternative_synonyms_are_accepted() {
    let map = resolve(&labels(&[
        "Staff",
        "Location",
        "Attendance",
        "MS",
        "Priority 2",
        "Priority 3",
        "Spare capacity",
        "Help needed",
        "Comments",
        "Trainee cases",
    ]))
    .expect("all fields resolve");

    assert_eq!(map.get(LogicalField::Name), Some("Staff"));
    assert_eq!(map.get(LogicalField::Ward), Some("Location"));
    assert_eq!(map.get(LogicalField::Present), Some("Attendance"));
    assert_eq!(map.get(LogicalField::CanHelp), Some("Spare capacity"));
    assert_eq!(map.get(LogicalField::TraineeLed), Some("Trainee cases"));
}

#[test]
fn short_keywords_need_whole_words() {
    // "Items" must not be read as an MS column.
    let err = resolve(&labels(&[
        "Name", "Ward", "Present", "Items", "P2", "P3", "Can help", "Need help", "Notes",
    ]))
    .unwrap_err();
    assert_eq!(err.missing, vec![LogicalField::MustSee]);
}

#[test]
fn every_missing_required_field_is_listed() {
    let err = resolve(&labels(&["Name", "Ward", "Notes"])).unwrap_err();
    assert_eq!(
        err.missing,
        vec![
            LogicalField::Present,
            LogicalField::MustSee,
            LogicalField::P2Composite,
            LogicalField::P3,
            LogicalField::CanHelp,
            LogicalField::NeedHelp,
        ]
    );
    let message = err.to_string();
    assert!(message.contains("MS total"));
    assert!(message.contains("need help"));
}

#[test]
fn schema_error_aborts_the_run_without_a_report() {
    common::init_logging();
    let rows = vec![RawRow::new()
        .with("Name", "A")
        .with("Ward", "X")
        .with("Present", "no")];

    match RollCallEngine::new(RedistributionConfig::default()).run(&rows) {
        Err(RosterError::Schema(e)) => assert!(e.missing.contains(&LogicalField::MustSee)),
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[test]
fn labels_from_later_rows_count() {
    common::init_logging();
    let rows = vec![
        RawRow::new().with("Name", "A").with("Ward", "X"),
        RawRow::new()
            .with("Name", "B")
            .with("Present", "yes")
            .with("MS total", 0u32)
            .with("P2 total", "")
            .with("P3 total", 0u32)
            .with("Can help", "")
            .with("Need help", "")
            .with("Notes", ""),
    ];

    let report = RollCallEngine::default().run(&rows).expect("columns resolve across rows");
    assert_eq!(report.summary.records, 2);
}
