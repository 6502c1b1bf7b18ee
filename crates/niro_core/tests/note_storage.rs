use niro_core::db::{open_db, open_db_in_memory};
use niro_core::{
    KeyValueStore, KvError, KvNoteRepository, KvResult, Note, NoteColor, NoteDraft,
    NoteRepository, NoteValidationError, RepoError, SqliteKeyValueStore, NOTES_STORAGE_KEY,
};
use std::cell::Cell;
use std::rc::Rc;

fn note(id: &str, title: &str, content: &str, at: i64) -> Note {
    Note::with_id(id, NoteDraft::new(title, content, NoteColor::Sky), at)
}

/// SQLite store whose reads can be switched to fail, as a busy database would.
struct FlakyReadStore<'conn> {
    inner: SqliteKeyValueStore<'conn>,
    fail_reads: Rc<Cell<bool>>,
}

impl KeyValueStore for FlakyReadStore<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(KvError::MissingRequiredTable("kv_store"));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.inner.set(key, value)
    }
}

#[test]
fn list_all_on_fresh_storage_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert!(repo.list_all().is_empty());
}

#[test]
fn upsert_appends_then_replaces_in_place() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    repo.upsert(&note("a", "first", "", 1)).unwrap();
    repo.upsert(&note("b", "second", "", 2)).unwrap();

    let mut edited = note("a", "first", "now with body", 1);
    edited.last_modified = 3;
    repo.upsert(&edited).unwrap();
    repo.upsert(&edited).unwrap();

    let listed = repo.list_all();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], edited);
    assert_eq!(listed[1].id, "b");
    assert_eq!(listed.iter().filter(|n| n.id == "a").count(), 1);
}

#[test]
fn remove_drops_matching_note_and_ignores_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    repo.upsert(&note("a", "keep", "", 1)).unwrap();
    repo.upsert(&note("b", "drop", "", 1)).unwrap();

    repo.remove("b").unwrap();
    repo.remove("missing").unwrap();

    let ids = repo
        .list_all()
        .into_iter()
        .map(|n| n.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a".to_string()]);
}

#[test]
fn empty_note_is_never_persisted() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let err = repo.upsert(&note("a", "", "", 1)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::EmptyNote)
    ));
    assert!(repo.list_all().is_empty());
}

#[test]
fn malformed_blob_fails_soft_to_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store.set(NOTES_STORAGE_KEY, "{not json").unwrap();

    let repo = KvNoteRepository::new(store);
    assert!(repo.list_all().is_empty());
}

#[test]
fn incompatible_shape_fails_soft_and_next_write_recovers() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store
        .set(NOTES_STORAGE_KEY, r#"[{"id": 7, "headline": "old shape"}]"#)
        .unwrap();

    let mut repo = KvNoteRepository::new(store);
    assert!(repo.list_all().is_empty());

    repo.upsert(&note("a", "fresh", "", 1)).unwrap();
    assert_eq!(repo.list_all().len(), 1);
}

#[test]
fn blob_is_stored_under_fixed_namespace_as_json_array() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    repo.upsert(&note("a", "t", "c", 42)).unwrap();

    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let blob = store.get(NOTES_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value[0]["id"], "a");
    assert_eq!(value[0]["color"], "#38bdf8");
    assert_eq!(value[0]["createdAt"], 42);
    assert_eq!(value[0]["lastModified"], 42);
}

#[test]
fn namespaces_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let mut default_repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let other_repo =
        KvNoteRepository::with_key(SqliteKeyValueStore::try_new(&conn).unwrap(), "other-notes");

    default_repo.upsert(&note("a", "t", "", 1)).unwrap();
    assert!(other_repo.list_all().is_empty());
}

#[test]
fn collection_survives_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    {
        let conn = open_db(&path).unwrap();
        let mut repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        repo.upsert(&note("a", "durable", "", 1)).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let listed = repo.list_all();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "durable");
}

#[test]
fn storage_read_error_aborts_writes_without_touching_collection() {
    let conn = open_db_in_memory().unwrap();
    let fail_reads = Rc::new(Cell::new(false));
    let mut repo = KvNoteRepository::new(FlakyReadStore {
        inner: SqliteKeyValueStore::try_new(&conn).unwrap(),
        fail_reads: Rc::clone(&fail_reads),
    });
    for id in ["a", "b", "c"] {
        repo.upsert(&note(id, id, "", 1)).unwrap();
    }

    fail_reads.set(true);
    assert!(repo.list_all().is_empty());
    let err = repo.upsert(&note("d", "d", "", 2)).unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
    let err = repo.remove("a").unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));

    fail_reads.set(false);
    let ids = repo
        .list_all()
        .into_iter()
        .map(|n| n.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, ["a", "b", "c"]);
}
