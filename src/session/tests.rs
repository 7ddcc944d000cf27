use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;

fn session(path: &str, stamps: &[f64], spend: u64) -> AudioSession {
    AudioSession {
        id: Some(1),
        name: "Session 1".to_string(),
        file_path: PathBuf::from(path),
        time_stamp: stamps.to_vec(),
        duration: 120,
        spend_time: spend,
        finished_times: 5,
    }
}

#[test]
fn diff_reports_only_changed_fields() {
    let current = session("/old", &[0.1, 0.2], 30);
    let other = session("/new", &[0.1, 0.2, 0.3], 35);

    let expected: SessionDiff = [
        (Column::FilePath, FieldValue::from("/new")),
        (Column::TimeStamp, FieldValue::from("0.1,0.2,0.3")),
        (Column::SpendTime, FieldValue::from(35)),
    ]
    .into_iter()
    .collect();

    assert_eq!(current.diff(&other), expected);
}

#[test]
fn diff_of_equal_sessions_is_empty() {
    let a = session("/same", &[0.0, 4.5], 30);
    assert!(a.diff(&a.clone()).is_empty());
}

#[test]
fn diff_ignores_identity() {
    let a = session("/same", &[0.0], 30);
    let mut b = a.clone();
    b.id = Some(99);
    assert!(a.diff(&b).is_empty());
}

#[test]
fn time_stamps_round_trip_through_text() {
    assert_eq!(format_time_stamps(&[]), "");
    assert_eq!(format_time_stamps(&[0.0, 12.5, 3.0]), "0,12.5,3");
    assert_eq!(parse_time_stamps(""), Vec::<f64>::new());
    assert_eq!(parse_time_stamps("0, 12.5,3.0"), vec![0.0, 12.5, 3.0]);
}

#[test]
fn parse_time_stamps_skips_garbage() {
    assert_eq!(parse_time_stamps("1.5,,abc,2,NaN"), vec![1.5, 2.0]);
}

#[test]
fn record_converts_to_session() {
    let record = Record {
        id: 7,
        name: "lesson.mp3".to_string(),
        file_path: "/data/audio/lesson.mp3".to_string(),
        time_stamp: "0,4.25".to_string(),
        added: "2026-01-01 10:00:00".to_string(),
        duration: 95,
        spend_time: 12,
        finished_times: 2,
    };

    let s = AudioSession::from(record);
    assert_eq!(s.id, Some(7));
    assert_eq!(s.name, "lesson.mp3");
    assert_eq!(s.file_path, PathBuf::from("/data/audio/lesson.mp3"));
    assert_eq!(s.time_stamp, vec![0.0, 4.25]);
    assert_eq!(s.duration, 95);
    assert_eq!(s.spend_time, 12);
    assert_eq!(s.finished_times, 2);
}

#[test]
fn store_creates_and_finds_by_name() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert!(store.find_by_name("a.mp3").unwrap().is_none());

    let created = store.create("a.mp3", Path::new("/audio/a.mp3")).unwrap();
    assert_eq!(created.name, "a.mp3");
    assert_eq!(created.file_path, "/audio/a.mp3");
    assert_eq!(created.time_stamp, "");
    assert_eq!(created.duration, 0);
    assert_eq!(created.spend_time, 0);
    assert_eq!(created.finished_times, 0);
    assert!(!created.added.is_empty());

    let found = store.find_by_name("a.mp3").unwrap().unwrap();
    assert_eq!(found, created);
}

#[test]
fn store_updates_only_given_fields() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let created = store.create("a.mp3", Path::new("/audio/a.mp3")).unwrap();

    let changes: SessionDiff = [
        (Column::TimeStamp, FieldValue::from("0,2.5")),
        (Column::SpendTime, FieldValue::from(41)),
    ]
    .into_iter()
    .collect();
    store.update_fields(created.id, &changes).unwrap();

    let found = store.find_by_name("a.mp3").unwrap().unwrap();
    assert_eq!(found.time_stamp, "0,2.5");
    assert_eq!(found.spend_time, 41);
    assert_eq!(found.file_path, "/audio/a.mp3");
    assert_eq!(found.finished_times, 0);

    store.update_fields(created.id, &SessionDiff::default()).unwrap();
}

#[test]
fn store_lists_in_creation_order() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.create("b.mp3", Path::new("/audio/b.mp3")).unwrap();
    store.create("a.mp3", Path::new("/audio/a.mp3")).unwrap();

    let names: Vec<String> = store.list_all().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["b.mp3".to_string(), "a.mp3".to_string()]);
}

#[test]
fn store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("nested").join("shadowing.db");
    {
        let mut store = SqliteStore::open(&db).unwrap();
        store.create("a.mp3", Path::new("/audio/a.mp3")).unwrap();
    }
    let store = SqliteStore::open(&db).unwrap();
    assert!(store.find_by_name("a.mp3").unwrap().is_some());
}

#[test]
fn find_or_create_imports_new_files() {
    let src = tempdir().unwrap();
    let data = tempdir().unwrap();
    let audio_dir = data.path().join("audio");
    let source = src.path().join("lesson.mp3");
    fs::write(&source, b"not really audio").unwrap();

    let mut reconciler = SessionReconciler::new(SqliteStore::open_in_memory().unwrap(), &audio_dir);
    let lookup = reconciler.find_or_create(&source).unwrap();
    assert!(!lookup.is_existing());

    let s = lookup.into_session();
    assert!(s.id.is_some());
    assert_eq!(s.name, "lesson.mp3");
    assert_eq!(s.file_path, audio_dir.join("lesson.mp3"));
    assert!(s.time_stamp.is_empty());
    assert_eq!((s.duration, s.spend_time, s.finished_times), (0, 0, 0));
    assert!(audio_dir.join("lesson.mp3").is_file());
}

#[test]
fn find_or_create_reuses_existing_session() {
    let src = tempdir().unwrap();
    let data = tempdir().unwrap();
    let source = src.path().join("lesson.mp3");
    fs::write(&source, b"x").unwrap();

    let mut reconciler = SessionReconciler::new(SqliteStore::open_in_memory().unwrap(), data.path());
    let first = reconciler.find_or_create(&source).unwrap().into_session();
    let second = reconciler.find_or_create(&source).unwrap();

    assert!(second.is_existing());
    assert_eq!(second.into_session().id, first.id);
    assert_eq!(reconciler.list().unwrap().len(), 1);
}

#[test]
fn find_or_create_reuses_stored_copy_without_session() {
    let src = tempdir().unwrap();
    let data = tempdir().unwrap();
    let source = src.path().join("lesson.mp3");
    fs::write(&source, b"new").unwrap();
    fs::write(data.path().join("lesson.mp3"), b"old").unwrap();

    let mut reconciler = SessionReconciler::new(SqliteStore::open_in_memory().unwrap(), data.path());
    let s = reconciler.find_or_create(&source).unwrap().into_session();

    assert_eq!(s.file_path, data.path().join("lesson.mp3"));
    assert_eq!(fs::read(data.path().join("lesson.mp3")).unwrap(), b"old");
}

#[test]
fn flush_writes_diff_and_adopts_snapshot() {
    let data = tempdir().unwrap();
    let src = tempdir().unwrap();
    let source = src.path().join("lesson.mp3");
    fs::write(&source, b"x").unwrap();

    let mut reconciler = SessionReconciler::new(SqliteStore::open_in_memory().unwrap(), data.path());
    let mut persisted = reconciler.find_or_create(&source).unwrap().into_session();

    let mut current = persisted.clone();
    current.time_stamp = vec![0.0, 3.5];
    current.spend_time = 9;
    current.finished_times = 1;

    assert!(reconciler.flush(&mut persisted, current.clone()).unwrap());
    assert_eq!(persisted, current);
    assert!(!reconciler.flush(&mut persisted, current.clone()).unwrap());

    let stored = reconciler.list().unwrap().remove(0);
    assert_eq!(stored.time_stamp, vec![0.0, 3.5]);
    assert_eq!(stored.spend_time, 9);
    assert_eq!(stored.finished_times, 1);
}

#[test]
fn flush_never_writes_unsaved_sessions() {
    let data = tempdir().unwrap();
    let mut reconciler = SessionReconciler::new(SqliteStore::open_in_memory().unwrap(), data.path());
    let mut persisted = AudioSession::new("x.mp3", "/tmp/x.mp3");
    let mut current = persisted.clone();
    current.spend_time = 3;

    assert!(!reconciler.flush(&mut persisted, current).unwrap());
    assert_eq!(persisted.spend_time, 0);
    assert!(reconciler.list().unwrap().is_empty());
}
