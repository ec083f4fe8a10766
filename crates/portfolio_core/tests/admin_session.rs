mod common;

use common::{project, StubApi};
use portfolio_core::{
    AdminSession, CollectionKind, ContentItem, DataMode, LoadState, LocalStorage,
    ModeSwitch, OfflineApi, OpOutcome, SeedSource, SeedSources, SqliteLocalStorage, StorageError,
    StorageResult, MODE_STORAGE_KEY,
};
use serde_json::json;

/// Local storage whose mode flag can be read but never written.
struct RejectModeWrites(SqliteLocalStorage);

impl LocalStorage for RejectModeWrites {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.0.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if key == MODE_STORAGE_KEY {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        self.0.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.0.remove_item(key)
    }
}

#[test]
fn fresh_session_starts_in_mock_mode_with_every_collection_loaded() {
    let session = AdminSession::open(
        SqliteLocalStorage::in_memory().unwrap(),
        OfflineApi,
        SeedSources::builtin(),
    );

    assert_eq!(session.mode(), DataMode::Mock);
    let statuses = session.statuses();
    assert_eq!(statuses.len(), CollectionKind::ALL.len());
    assert!(statuses.iter().all(|status| status.state == LoadState::Ready));
    assert!(statuses.iter().all(|status| status.error.is_none()));
    assert_eq!(
        session.value(CollectionKind::Projects).ids(),
        vec!["project-1", "project-2"]
    );
}

#[test]
fn mode_flag_is_persisted_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.sqlite3");

    {
        let mut session = AdminSession::open(
            SqliteLocalStorage::open(&path).unwrap(),
            OfflineApi,
            SeedSources::builtin(),
        );
        assert!(session.set_mode(DataMode::Live).unwrap());
        assert!(!session.set_mode(DataMode::Live).unwrap());
        assert_eq!(
            session.storage().get_item(MODE_STORAGE_KEY).unwrap().as_deref(),
            Some("false")
        );
    }

    let session = AdminSession::new(
        SqliteLocalStorage::open(&path).unwrap(),
        OfflineApi,
        SeedSources::builtin(),
    );
    assert_eq!(session.mode(), DataMode::Live);
}

#[test]
fn switching_to_live_reloads_from_api() {
    let api = StubApi::new()
        .with_admin(CollectionKind::Projects, json!([project("srv", "Server")]));
    let mut session = AdminSession::open(
        SqliteLocalStorage::in_memory().unwrap(),
        &api,
        SeedSources::builtin(),
    );
    assert_eq!(
        session.value(CollectionKind::Projects).ids(),
        vec!["project-1", "project-2"]
    );

    assert_eq!(session.toggle_mode().unwrap(), DataMode::Live);

    assert_eq!(session.mode_generation(), 1);
    assert_eq!(session.value(CollectionKind::Projects).ids(), vec!["srv"]);
    let posts = session.store(CollectionKind::Posts);
    assert_eq!(
        posts.error(),
        Some("Could not reach /api/admin/posts; using local data.")
    );
}

#[test]
fn live_mock_live_round_trip_keeps_last_snapshot() {
    let api = StubApi::new()
        .with_admin(CollectionKind::Projects, json!([project("srv", "Server")]));
    let storage = SqliteLocalStorage::in_memory().unwrap();
    storage.set_item(MODE_STORAGE_KEY, "false").unwrap();
    let mut session = AdminSession::open(storage, &api, SeedSources::builtin());
    assert_eq!(session.mode(), DataMode::Live);

    session.set_mode(DataMode::Mock).unwrap();
    assert_eq!(session.value(CollectionKind::Projects).ids(), vec!["srv"]);
    assert_eq!(session.store(CollectionKind::Projects).error(), None);

    api.fail_reads.set(true);
    session.set_mode(DataMode::Live).unwrap();

    assert_eq!(session.value(CollectionKind::Projects).ids(), vec!["srv"]);
    assert_eq!(
        session.store(CollectionKind::Projects).source(),
        Some(&SeedSource::LocalStorage)
    );
    assert_eq!(
        session.store(CollectionKind::Projects).error(),
        Some("Could not reach /api/admin/projects; using local data.")
    );
    assert_eq!(session.mode_generation(), 2);
}

#[test]
fn failed_mode_write_leaves_session_unchanged() {
    let mut session = AdminSession::open(
        RejectModeWrites(SqliteLocalStorage::in_memory().unwrap()),
        OfflineApi,
        SeedSources::builtin(),
    );
    let token = session.token();

    let err = session.set_mode(DataMode::Live).unwrap_err();

    assert!(matches!(err, StorageError::InvalidKey(_)));
    assert_eq!(session.mode(), DataMode::Mock);
    assert_eq!(session.mode_generation(), 0);
    assert!(!token.is_cancelled());
    let projects = session.store(CollectionKind::Projects);
    assert_eq!(projects.state(), LoadState::Ready);
    assert_eq!(projects.source(), Some(&SeedSource::Bundled("mock".to_string())));
    assert_eq!(projects.error(), None);
}

#[test]
fn mode_change_cancels_previous_token() {
    let storage = SqliteLocalStorage::in_memory().unwrap();
    let mut switch = ModeSwitch::load(&storage);
    let first = switch.token();

    assert_eq!(switch.toggle(&storage).unwrap(), DataMode::Live);

    assert!(first.is_cancelled());
    assert!(!switch.token().is_cancelled());
    assert_eq!(switch.generation(), 1);
}

#[test]
fn save_creates_unknown_and_updates_known_records() {
    let mut session = AdminSession::open(
        SqliteLocalStorage::in_memory().unwrap(),
        OfflineApi,
        SeedSources::builtin(),
    );

    let created = ContentItem::with_id("p9").field("title", "Nine");
    assert_eq!(
        session.save(CollectionKind::Projects, created).unwrap(),
        OpOutcome::Applied
    );
    let renamed = ContentItem::with_id("project-1").field("title", "Renamed");
    session.save(CollectionKind::Projects, renamed).unwrap();

    let projects = session.value(CollectionKind::Projects);
    assert_eq!(projects.ids(), vec!["p9", "project-1", "project-2"]);
    assert_eq!(
        projects.find("project-1").unwrap().get("title"),
        Some(&json!("Renamed"))
    );
}

#[test]
fn offline_live_session_degrades_but_keeps_local_edits() {
    let storage = SqliteLocalStorage::in_memory().unwrap();
    storage.set_item(MODE_STORAGE_KEY, "false").unwrap();
    let mut session = AdminSession::open(storage, OfflineApi, SeedSources::builtin());

    let outcome = session
        .create(CollectionKind::Projects, ContentItem::with_id("p9"))
        .unwrap();
    assert_eq!(outcome.error(), Some("Create failed. Working locally."));

    let outcome = session.remove(CollectionKind::Projects, "p9").unwrap();
    assert_eq!(outcome.error(), Some("Delete failed. Working locally."));
    assert_eq!(session.value(CollectionKind::Projects).ids()[0], "p9");
}

#[test]
fn import_replaces_collection_locally() {
    let api = StubApi::new();
    let mut session = AdminSession::open(
        SqliteLocalStorage::in_memory().unwrap(),
        &api,
        SeedSources::builtin(),
    );
    let calls_before = api.calls().len();

    session.replace(
        CollectionKind::Experience,
        json!([{"_id": "e1", "company": "Initech"}]),
    );

    assert_eq!(session.value(CollectionKind::Experience).ids(), vec!["e1"]);
    assert_eq!(api.calls().len(), calls_before);
    let stored = session
        .storage()
        .get_item("portfolio_experience")
        .unwrap()
        .unwrap();
    assert!(stored.contains("Initech"));
}
