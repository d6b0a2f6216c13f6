use chrono::{TimeZone, Utc};
use scanplan_core::db::open_db_in_memory;
use scanplan_core::{
    DocumentStore, ExpenseRow, FinanceDocument, KeyValueRepository, Link, LoadOutcome, Profile,
    SqliteKeyValueRepository, StudyDocument, StudyService, Tone, Upload,
};
use serde_json::{json, Value};

fn sample_study() -> StudyDocument {
    StudyDocument {
        profile: Profile {
            subject: "Physics".to_string(),
            marks: 5,
            tone: Tone::Detailed,
            ..Profile::default()
        },
        uploads: vec![Upload {
            name: "optics.pdf".to_string(),
            kind: "pdf".to_string(),
            size: 360_000,
            pages: 3,
        }],
        links: vec![Link {
            url: "https://example.com/lecture".to_string(),
            added_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        }],
        manual_text: "Snell's law".to_string(),
        ..StudyDocument::default()
    }
}

#[test]
fn load_without_entry_yields_defaults() {
    let conn = open_db_in_memory().unwrap();
    let store: DocumentStore<_, StudyDocument> =
        DocumentStore::new(SqliteKeyValueRepository::new(&conn));

    let report = store.load_report().unwrap();
    assert_eq!(report.outcome, LoadOutcome::Missing);
    assert_eq!(report.document, StudyDocument::default());
}

#[test]
fn save_then_load_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let store: DocumentStore<_, StudyDocument> =
        DocumentStore::new(SqliteKeyValueRepository::new(&conn));

    let document = sample_study();
    store.save(&document).unwrap();

    let report = store.load_report().unwrap();
    assert_eq!(report.outcome, LoadOutcome::Loaded);
    assert_eq!(report.document, document);
}

#[test]
fn documents_use_fixed_namespace_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    DocumentStore::<_, StudyDocument>::new(SqliteKeyValueRepository::new(&conn))
        .save(&StudyDocument::default())
        .unwrap();
    DocumentStore::<_, FinanceDocument>::new(SqliteKeyValueRepository::new(&conn))
        .save(&FinanceDocument::default())
        .unwrap();

    assert_eq!(
        repo.keys().unwrap(),
        vec![
            "finance_planner_data".to_string(),
            "studyscan_data".to_string()
        ]
    );
}

#[test]
fn partial_payload_is_completed_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.set_item(
        "studyscan_data",
        &json!({ "uploads": [{ "name": "a.pdf", "type": "pdf", "size": 10, "pages": 1 }] })
            .to_string(),
    )
    .unwrap();

    let store: DocumentStore<_, StudyDocument> = DocumentStore::new(repo);
    let document = store.load().unwrap();

    assert_eq!(document.uploads.len(), 1);
    assert_eq!(document.profile, Profile::default());
    assert!(document.questions.is_empty());

    let serialized = serde_json::to_value(&document).unwrap();
    let defaults = serde_json::to_value(StudyDocument::default()).unwrap();
    for field in defaults.as_object().unwrap().keys() {
        assert!(serialized.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn nested_profile_fields_fall_back_individually() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.set_item(
        "studyscan_data",
        &json!({ "profile": { "marks": 15, "strictMode": false } }).to_string(),
    )
    .unwrap();

    let document = DocumentStore::<_, StudyDocument>::new(repo).load().unwrap();
    assert_eq!(document.profile.marks, 15);
    assert!(!document.profile.strict_mode);
    assert_eq!(document.profile.class_level, "Degree");
}

#[test]
fn malformed_entry_recovers_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.set_item("finance_planner_data", "{\"income\": 5").unwrap();

    let store: DocumentStore<_, FinanceDocument> = DocumentStore::new(repo);
    let report = store.load_report().unwrap();
    assert_eq!(report.outcome, LoadOutcome::Malformed);
    assert_eq!(report.document, FinanceDocument::default());
}

#[test]
fn wrong_typed_field_is_dropped_but_rest_is_kept() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.set_item(
        "finance_planner_data",
        &json!({
            "income": 40000,
            "expenses": [{ "name": "Rent", "amount": 12000 }],
            "goalYears": "soon"
        })
        .to_string(),
    )
    .unwrap();

    let report = DocumentStore::<_, FinanceDocument>::new(repo)
        .load_report()
        .unwrap();
    assert_eq!(
        report.outcome,
        LoadOutcome::Recovered {
            dropped_fields: vec!["goalYears".to_string()]
        }
    );
    assert_eq!(report.document.income, 40000.0);
    assert_eq!(
        report.document.expenses,
        vec![ExpenseRow {
            name: "Rent".to_string(),
            amount: 12000.0
        }]
    );
    assert_eq!(report.document.goal_years, 0.0);
}

#[test]
fn clear_removes_entry_and_next_load_is_default() {
    let conn = open_db_in_memory().unwrap();
    let store: DocumentStore<_, StudyDocument> =
        DocumentStore::new(SqliteKeyValueRepository::new(&conn));

    store.save(&sample_study()).unwrap();
    assert!(store.clear().unwrap());
    assert!(!store.clear().unwrap());
    assert_eq!(store.load().unwrap(), StudyDocument::default());
}

#[test]
fn stored_layout_uses_browser_field_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    DocumentStore::<_, StudyDocument>::new(SqliteKeyValueRepository::new(&conn))
        .save(&sample_study())
        .unwrap();

    let raw = repo.get_item("studyscan_data").unwrap().unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["uploads"][0]["type"], "pdf");
    assert_eq!(value["links"][0]["addedAt"], "2025-03-01T09:30:00Z");
    assert_eq!(value["profile"]["tone"], "detailed");
    assert_eq!(value["manualText"], "Snell's law");
}

#[test]
fn non_text_entry_recovers_to_defaults_and_scan_still_runs() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES ('studyscan_data', x'FFFE7B');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value)
         VALUES ('finance_planner_data', CAST(x'7BFF7D' AS TEXT));",
        [],
    )
    .unwrap();

    let report = DocumentStore::<_, StudyDocument>::new(SqliteKeyValueRepository::new(&conn))
        .load_report()
        .unwrap();
    assert_eq!(report.outcome, LoadOutcome::Malformed);
    assert_eq!(report.document, StudyDocument::default());

    let report = DocumentStore::<_, FinanceDocument>::new(SqliteKeyValueRepository::new(&conn))
        .load_report()
        .unwrap();
    assert_eq!(report.outcome, LoadOutcome::Malformed);

    let service = StudyService::new(SqliteKeyValueRepository::new(&conn));
    let doc = service.run_scan().unwrap();
    assert_eq!(doc.questions.len(), 8);
    assert_eq!(
        DocumentStore::<_, StudyDocument>::new(SqliteKeyValueRepository::new(&conn))
            .load_report()
            .unwrap()
            .outcome,
        LoadOutcome::Loaded
    );
}

#[test]
fn unparsable_marks_keep_stored_profile() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.set_item(
        "studyscan_data",
        &json!({
            "profile": { "subject": "History", "board": "ICSE", "marks": null, "tone": "casual" },
            "manualText": "Mughal era"
        })
        .to_string(),
    )
    .unwrap();

    let report = DocumentStore::<_, StudyDocument>::new(repo)
        .load_report()
        .unwrap();
    assert_eq!(report.outcome, LoadOutcome::Loaded);
    assert_eq!(report.document.profile.subject, "History");
    assert_eq!(report.document.profile.board, "ICSE");
    assert_eq!(report.document.profile.template_marks(), 10);
    assert_eq!(report.document.profile.tone, Tone::Detailed);
}
