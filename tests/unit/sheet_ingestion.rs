use rounds_core::domain::ballot::{ingest_rows, validate_allocations, SheetRow};
use rounds_core::domain::VotingConfig;
use rounds_core::foundation::{ApplicationId, RoundError};
use std::collections::BTreeSet;

#[test]
fn test_negative_allocation_names_the_sheet_row() {
    let rows = vec![SheetRow::new("app-a", Some("10")), SheetRow::new("app-b", Some("-1"))];
    let err = ingest_rows(&rows).unwrap_err();
    // First data row is row 2; the bad row is row 3.
    assert!(matches!(err, RoundError::RowParseError { row: 3, ref value } if value == "-1"));
}

#[test]
fn test_non_numeric_allocation_is_a_parse_error() {
    let rows = vec![SheetRow::new("app-a", Some("ten"))];
    let err = ingest_rows(&rows).unwrap_err();
    assert!(matches!(err, RoundError::RowParseError { row: 2, .. }));
}

#[test]
fn test_repeated_application_id_is_rejected() {
    let rows = vec![
        SheetRow::new("app-a", Some("10")),
        SheetRow::new("app-b", Some("5")),
        SheetRow::new("app-a", Some("7")),
    ];
    let err = ingest_rows(&rows).unwrap_err();
    assert!(matches!(err, RoundError::DuplicateRow { row: 4, ref application_id } if application_id == "app-a"));
}

#[test]
fn test_empty_and_zero_rows_are_dropped() {
    let rows = vec![
        SheetRow::new("app-a", Some("10")),
        SheetRow::new("app-b", None),
        SheetRow::new("app-c", Some("0")),
        SheetRow::new("app-d", Some(" ")),
    ];
    let map = ingest_rows(&rows).expect("ingest");
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&ApplicationId::from("app-a")), Some(&10));
}

#[test]
fn test_ingested_rows_flow_into_allocation_validation() {
    let config = VotingConfig { max_votes_per_voter: 12, max_votes_per_project_per_voter: 10, allowed_voter_ids: Default::default() };
    let approved: BTreeSet<ApplicationId> = [ApplicationId::from("app-a"), ApplicationId::from("app-b")].into();

    let within = ingest_rows(&[SheetRow::new("app-a", Some("10")), SheetRow::new("app-b", Some("2"))]).expect("ingest");
    assert!(validate_allocations(&within, &config, &approved).is_ok());

    let over_budget = ingest_rows(&[SheetRow::new("app-a", Some("10")), SheetRow::new("app-b", Some("3"))]).expect("ingest");
    let err = validate_allocations(&over_budget, &config, &approved).unwrap_err();
    assert!(matches!(err, RoundError::BudgetExceeded { total: 13, max: 12 }));

    let unknown = ingest_rows(&[SheetRow::new("app-x", Some("1"))]).expect("ingest");
    let err = validate_allocations(&unknown, &config, &approved).unwrap_err();
    assert!(matches!(err, RoundError::InvalidApplicationReference { ref ids } if ids == &vec!["app-x".to_string()]));
}
