use scanplan_core::db::{open_db, open_db_in_memory};
use scanplan_core::{KeyValueRepository, RepoError, SqliteKeyValueRepository};

#[test]
fn set_get_and_overwrite() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    assert_eq!(repo.get_item("studyscan_data").unwrap(), None);

    repo.set_item("studyscan_data", r#"{"manualText":"a"}"#).unwrap();
    repo.set_item("studyscan_data", r#"{"manualText":"b"}"#).unwrap();

    assert_eq!(
        repo.get_item("studyscan_data").unwrap().as_deref(),
        Some(r#"{"manualText":"b"}"#)
    );
    assert_eq!(repo.keys().unwrap(), vec!["studyscan_data".to_string()]);
}

#[test]
fn remove_reports_whether_entry_existed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    repo.set_item("finance_planner_data", "{}").unwrap();
    assert!(repo.remove_item("finance_planner_data").unwrap());
    assert!(!repo.remove_item("finance_planner_data").unwrap());
    assert_eq!(repo.get_item("finance_planner_data").unwrap(), None);
}

#[test]
fn namespaces_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    repo.set_item("b_key", "2").unwrap();
    repo.set_item("a_key", "1").unwrap();
    repo.remove_item("b_key").unwrap();

    assert_eq!(repo.keys().unwrap(), vec!["a_key".to_string()]);
    assert_eq!(repo.get_item("a_key").unwrap().as_deref(), Some("1"));
}

#[test]
fn blank_key_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    let err = repo.set_item("  ", "value").unwrap_err();
    assert!(matches!(err, RepoError::InvalidKey(_)));
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        SqliteKeyValueRepository::new(&conn)
            .set_item("studyscan_data", "{}")
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    assert_eq!(repo.get_item("studyscan_data").unwrap().as_deref(), Some("{}"));
}

#[test]
fn blob_value_is_reported_as_unreadable() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES ('studyscan_data', x'FFFE7B');",
        [],
    )
    .unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    match repo.get_item("studyscan_data").unwrap_err() {
        RepoError::UnreadableValue { key, reason } => {
            assert_eq!(key, "studyscan_data");
            assert!(reason.to_lowercase().contains("blob"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(repo.remove_item("studyscan_data").unwrap());
}
