use schoolhub_core::{KvRepository, RepoError, SqliteKvRepository, StorageConfig};

fn open_memory() -> SqliteKvRepository {
    SqliteKvRepository::open_in_memory(&StorageConfig::default()).unwrap()
}

#[test]
fn get_missing_key_returns_none() {
    let repo = open_memory();
    assert_eq!(repo.get("session.current_user").unwrap(), None);
}

#[test]
fn put_overwrites_existing_value() {
    let repo = open_memory();
    repo.put("k", "first").unwrap();
    repo.put("k", "second").unwrap();

    assert_eq!(repo.get("k").unwrap().as_deref(), Some("second"));
    let rows: i64 = repo
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn delete_is_idempotent() {
    let repo = open_memory();
    repo.put("k", "v").unwrap();

    assert!(repo.delete("k").unwrap());
    assert!(!repo.delete("k").unwrap());
    assert_eq!(repo.get("k").unwrap(), None);
}

#[test]
fn empty_key_is_rejected() {
    let repo = open_memory();
    assert!(matches!(repo.put("", "v"), Err(RepoError::InvalidKey)));
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");

    let repo = SqliteKvRepository::open(&path, &StorageConfig::default()).unwrap();
    repo.put("k", "persisted").unwrap();
    drop(repo);

    let reopened = SqliteKvRepository::open(&path, &StorageConfig::default()).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("persisted"));
}
