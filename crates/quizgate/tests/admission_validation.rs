use std::sync::Arc;

use quizgate::config::AdmissionConfig;
use quizgate::workflows::admission::{
    AdmissionCheck, AdmissionError, AdmissionRange, AdmissionServiceError, AdmissionValidator,
    EntryKind, StaticAdmissionRanges,
};

const RANGES: &str = r#"[
    {
        "_id": "r-cs-3-a",
        "department": "CS",
        "year": 3,
        "section": "A",
        "regular_entry": { "start": "y22cs001", "end": "y22cs060" },
        "lateral_entry": { "start": "l23cs201", "end": "l23cs215" }
    },
    {
        "_id": "r-cs-3-a-old",
        "department": "CS",
        "year": 3,
        "section": "A",
        "is_active": false,
        "regular_entry": { "start": "y21cs001", "end": "y21cs999" },
        "lateral_entry": { "start": "l22cs001", "end": "l22cs999" }
    }
]"#;

fn validator() -> AdmissionValidator<StaticAdmissionRanges> {
    let ranges: Vec<AdmissionRange> = serde_json::from_str(RANGES).expect("ranges parse");
    AdmissionValidator::new(
        Arc::new(StaticAdmissionRanges::new(ranges)),
        AdmissionConfig::default(),
    )
}

fn check(department: &str, year: u8, section: &str, admission_number: &str) -> AdmissionCheck {
    AdmissionCheck {
        department: department.to_string(),
        year,
        section: section.to_string(),
        admission_number: admission_number.to_string(),
    }
}

fn admission_error(result: Result<impl std::fmt::Debug, AdmissionServiceError>) -> AdmissionError {
    match result {
        Err(AdmissionServiceError::Admission(error)) => error,
        other => panic!("expected an admission error, got {other:?}"),
    }
}

#[test]
fn inactive_ranges_are_ignored() {
    let validator = validator();

    let range = validator.range_for("CS", 3, "A").expect("active range");
    assert_eq!(range.id, "r-cs-3-a");

    let error = admission_error(validator.validate(&check("CS", 3, "A", "y21cs500")));
    assert_eq!(
        error,
        AdmissionError::OutOfRange {
            kind: EntryKind::Regular,
            start: "y22cs001".to_string(),
            end: "y22cs060".to_string(),
        }
    );
}

#[test]
fn lateral_entries_use_their_own_range() {
    let validator = validator();

    let outcome = validator
        .validate(&check("CS", 3, "A", " l23cs207 "))
        .expect("lateral entry accepted");
    assert_eq!(outcome.entry, EntryKind::Lateral);
    assert_eq!(outcome.admission_number, "l23cs207");
    assert_eq!(outcome.ordinal, 207);

    let error = admission_error(validator.validate(&check("CS", 3, "A", "l23cs045")));
    assert_eq!(error.code(), "out_of_range");
}

#[test]
fn unknown_cohorts_and_malformed_numbers_are_rejected() {
    let validator = validator();

    let error = admission_error(validator.validate(&check("EE", 3, "A", "y22ee010")));
    assert_eq!(error.code(), "no_range_defined");

    let error = admission_error(validator.validate(&check("CS", 3, "A", "y22cs1x")));
    assert_eq!(
        error,
        AdmissionError::InvalidFormat {
            value: "y22cs1x".to_string()
        }
    );
}
