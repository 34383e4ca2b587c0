use std::fs;

use chrono::{NaiveDate, Utc};
use tabi_core::{EntityStore, PlanDraft, PlanService};
use tabi_domain::TripBook;
use tabi_storage_json::{load_book_from_path, save_book_to_path, JsonEntityStore, StoragePaths};
use tempfile::tempdir;

fn draft() -> PlanDraft {
    PlanDraft::new(
        "Hakone",
        NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
        NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
    )
    .with_budget(Some(40_000.0))
}

#[test]
fn saved_book_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let mut store = JsonEntityStore::open(paths.clone(), "Family Trips").expect("open store");

    let created = PlanService::create(&draft(), Utc::now()).expect("create plan");
    store.stage(&created.changes);
    assert_eq!(store.pending(), 4);
    store.save().expect("save");
    assert_eq!(store.pending(), 0);

    let saved = store.load().expect("load");
    let reopened = JsonEntityStore::open(paths.clone(), "Family Trips").expect("reopen store");
    let loaded: TripBook = reopened.load().expect("load reopened");
    assert_eq!(loaded, saved);
    assert_eq!(loaded.schedules_for(created.id).len(), 3);
    assert_eq!(
        JsonEntityStore::list_books(&paths).expect("list books"),
        vec!["family_trips".to_string()]
    );
}

#[test]
fn failed_write_keeps_committed_book_and_staged_changes() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let mut store = JsonEntityStore::open(paths.clone(), "trips").expect("open store");

    fs::remove_dir_all(&paths.data_root).expect("remove data dir");
    fs::write(&paths.data_root, b"not a directory").expect("block data dir");

    let created = PlanService::create(&draft(), Utc::now()).expect("create plan");
    store.stage(&created.changes);
    let err = store.save().expect_err("write must fail");
    assert!(err.is_persistence());
    assert!(store.load().expect("load").plans.is_empty());
    assert_eq!(store.pending(), created.changes.len());

    store.discard();
    assert_eq!(store.pending(), 0);
}

#[test]
fn saves_rotate_backups_within_retention() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let mut store =
        JsonEntityStore::open_with_retention(paths.clone(), "trips", 2).expect("open store");

    for note in ["one", "two", "three"] {
        store.backup(Some(note)).expect("backup");
    }
    let backups = store.list_backups().expect("list backups");
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|backup| backup.created_at.is_some()));
    assert!(backups
        .iter()
        .all(|backup| backup.path.starts_with(paths.backup_root.join("trips"))));

    let created = PlanService::create(&draft(), Utc::now()).expect("create plan");
    store.stage(&created.changes);
    store.save().expect("first save");
    store.stage(&PlanService::delete(&store.load().unwrap(), created.id).unwrap());
    store.save().expect("second save");
    assert!(store.list_backups().expect("list backups").len() <= 2);
}

#[test]
fn restore_replaces_book_and_drops_staged_changes() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let mut store = JsonEntityStore::open(paths, "trips").expect("open store");

    let created = PlanService::create(&draft(), Utc::now()).expect("create plan");
    store.stage(&created.changes);
    store.save().expect("save");
    let info = store.backup(Some("with hakone")).expect("backup");
    assert!(info.id.ends_with("_with-hakone.json"));

    let book = store.load().expect("load");
    store.stage(&PlanService::delete(&book, created.id).expect("delete"));
    store.save().expect("save deletion");
    assert!(store.load().expect("load").plans.is_empty());

    store.stage(&created.changes);
    let restored = store.restore(&info.id).expect("restore");
    assert_eq!(restored.plans.len(), 1);
    assert_eq!(store.pending(), 0);
    assert!(store.restore("missing.json").is_err());
}

#[test]
fn restore_only_reads_from_the_backup_directory() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let mut store = JsonEntityStore::open(paths, "trips").expect("open store");

    let created = PlanService::create(&draft(), Utc::now()).expect("create plan");
    store.stage(&created.changes);
    store.save().expect("save");

    let outside = dir.path().join("elsewhere.json");
    save_book_to_path(&TripBook::new("Elsewhere", Utc::now()), &outside).expect("write outside");

    for id in ["../../elsewhere.json", "..", "nested/trips.json", "..\\elsewhere.json", ""] {
        assert!(store.restore(id).is_err(), "`{id}` must be rejected");
    }
    assert_eq!(store.load().expect("load").plans.len(), 1);
}

#[test]
fn restore_snapshots_the_current_book_first() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let mut store =
        JsonEntityStore::open_with_retention(paths, "trips", 10).expect("open store");

    let created = PlanService::create(&draft(), Utc::now()).expect("create plan");
    store.stage(&created.changes);
    store.save().expect("save");
    let info = store.backup(Some("full")).expect("backup");

    let book = store.load().expect("load");
    store.stage(&PlanService::delete(&book, created.id).expect("delete"));
    store.save().expect("save deletion");
    let has_empty_snapshot = |store: &JsonEntityStore| {
        store.list_backups().expect("list backups").iter().any(|backup| {
            load_book_from_path(&backup.path)
                .map(|book| book.plans.is_empty())
                .unwrap_or(false)
        })
    };
    assert!(!has_empty_snapshot(&store));

    store.restore(&info.id).expect("restore");
    assert_eq!(store.load().expect("load").plans.len(), 1);
    assert!(has_empty_snapshot(&store));
}
