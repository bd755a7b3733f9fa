use codeplans_core::storage::{read_schedule, write_schedule, DEFAULT_PLAN_FILE, EXAMPLE_PLAN_FILE};
use codeplans_core::{
    EventEdit, EventStore, PlanFiles, PlannerError, PlannerService, RandomIdSource, Schedule,
    StorageError, StoreError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

fn seeded_store() -> EventStore<RandomIdSource<StdRng>> {
    EventStore::with_id_source(RandomIdSource::with_rng(StdRng::seed_from_u64(3)))
}

fn sample_store() -> EventStore<RandomIdSource<StdRng>> {
    let mut store = seeded_store();
    store.add_event("monday", "09:00", "10:00", "Standup").unwrap();
    store.add_event("monday", "08:00", "08:30", "Coffee").unwrap();
    store.add_event("saturday", "11:00", "13:00", "Market \"run\"").unwrap();
    store
}

#[test]
fn serialize_then_deserialize_round_trips() {
    let store = sample_store();
    let text = store.serialize().unwrap();
    let restored = EventStore::<RandomIdSource>::deserialize(&text).unwrap();
    assert_eq!(&restored, store.schedule());
}

#[test]
fn round_trip_ignores_emptied_days() {
    let mut store = sample_store();
    let id = store.get_events("saturday").unwrap()[0].id.clone();
    store.edit_event("saturday", &id, EventEdit::Delete).unwrap();

    let text = store.serialize().unwrap();
    assert!(!text.contains("saturday"));
    let restored = EventStore::<RandomIdSource>::deserialize(&text).unwrap();
    assert_eq!(&restored, store.schedule());
}

#[test]
fn serialize_is_stable() {
    let store = sample_store();
    assert_eq!(store.serialize().unwrap(), store.serialize().unwrap());
}

#[test]
fn serialize_writes_weekdays_before_sorted_unknown_days() {
    let event = r#"{"E1": {"start_time": "09:00", "end_time": "10:00", "title": "x"}}"#;
    let text = format!(
        r#"{{"zulu": {event}, "sunday": {event}, "Funday": {event}, "monday": {event}}}"#
    );
    let json = EventStore::<RandomIdSource>::deserialize(&text)
        .unwrap()
        .to_json()
        .unwrap();

    let position = |key: &str| json.find(&format!("\"{key}\"")).unwrap();
    assert!(position("monday") < position("sunday"));
    assert!(position("sunday") < position("Funday"));
    assert!(position("Funday") < position("zulu"));
}

#[test]
fn deserialize_rejects_malformed_text() {
    for text in ["", "{", "[1, 2]", r#"{"monday": "nope"}"#] {
        let err = EventStore::<RandomIdSource>::deserialize(text).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)), "{text}");
    }
}

#[test]
fn deserialize_keeps_stored_values_verbatim() {
    let text = r#"{"Funday": {"abc": {"start_time": "9:5", "end_time": "", "title": ""}}}"#;
    let schedule = EventStore::<RandomIdSource>::deserialize(text).unwrap();
    let bucket = schedule.bucket("Funday");
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].id.as_str(), "abc");
    assert_eq!(bucket[0].start_time, "9:5");
}

#[test]
fn write_then_read_file_round_trips_and_creates_workdir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CodePlans").join(DEFAULT_PLAN_FILE);
    let store = sample_store();

    write_schedule(&path, store.schedule()).unwrap();
    assert!(path.is_file());
    assert!(!path.with_extension("json.tmp").exists());

    let loaded = read_schedule(&path).unwrap();
    assert_eq!(&loaded, store.schedule());
}

#[test]
fn read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_schedule(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn read_invalid_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "not json").unwrap();
    let err = read_schedule(&path).unwrap_err();
    assert!(matches!(err, StorageError::Parse { .. }));
}

#[test]
fn failed_load_leaves_schedule_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = PlannerService::with_store(sample_store(), PlanFiles::new(dir.path()));
    let before = planner.store().schedule().clone();

    planner.select_file("does-not-exist").unwrap();
    let err = planner.load().unwrap_err();
    assert!(matches!(err, PlannerError::Storage(StorageError::Io { .. })));
    assert_eq!(planner.store().schedule(), &before);

    fs::write(dir.path().join("garbage.json"), "{oops").unwrap();
    planner.select_file("garbage").unwrap();
    let err = planner.load().unwrap_err();
    assert!(matches!(err, PlannerError::Storage(StorageError::Parse { .. })));
    assert_eq!(planner.store().schedule(), &before);
}

#[test]
fn save_and_load_through_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let files = PlanFiles::new(dir.path().join("CodePlans"));
    let mut planner = PlannerService::with_store(sample_store(), files.clone());
    assert!(!planner.has_saved_plans());

    planner.select_file("week42").unwrap();
    let saved_to = planner.save().unwrap().to_path_buf();
    assert_eq!(saved_to, files.workdir().join("week42.json"));

    let mut fresh = PlannerService::with_store(seeded_store(), files);
    fresh.select_file("week42").unwrap();
    assert_eq!(fresh.load().unwrap(), 3);
    assert_eq!(fresh.store().schedule(), planner.store().schedule());
}

#[test]
fn default_file_is_detected_after_save() {
    let dir = tempfile::tempdir().unwrap();
    let planner = PlannerService::with_store(sample_store(), PlanFiles::new(dir.path()));
    planner.save().unwrap();
    assert!(planner.has_saved_plans());
    assert_eq!(planner.active_path(), dir.path().join(DEFAULT_PLAN_FILE));
}

#[test]
fn empty_schedule_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let planner = PlannerService::with_store(seeded_store(), PlanFiles::new(dir.path()));
    let err = planner.save().unwrap_err();
    assert!(matches!(err, PlannerError::NothingToSave));
    assert!(!dir.path().join(DEFAULT_PLAN_FILE).exists());
}

#[test]
fn failed_save_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let files = PlanFiles::new(dir.path());
    let planner = PlannerService::with_store(sample_store(), files.clone());
    planner.save().unwrap();
    let original = fs::read_to_string(files.default_path()).unwrap();

    // A directory squatting on the temp path makes the write fail.
    fs::create_dir(files.default_path().with_extension("json.tmp")).unwrap();
    let mut changed = PlannerService::with_store(seeded_store(), files.clone());
    changed
        .store_mut()
        .add_event("friday", "17:00", "18:00", "Other")
        .unwrap();
    let err = changed.save().unwrap_err();
    assert!(matches!(err, PlannerError::Storage(StorageError::Io { .. })));
    assert_eq!(fs::read_to_string(files.default_path()).unwrap(), original);
}

#[test]
fn install_example_writes_verbatim_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    let files = PlanFiles::new(dir.path());
    let mut planner = PlannerService::with_store(seeded_store(), files.clone());
    let body = r#"{"tuesday": {"EX0001": {"start_time": "10:00", "end_time": "11:00", "title": "Example"}}}"#;

    assert_eq!(planner.install_example(body).unwrap(), 1);
    assert_eq!(fs::read_to_string(dir.path().join(EXAMPLE_PLAN_FILE)).unwrap(), body);
    assert_eq!(planner.active_path(), files.example_path());
    assert_eq!(planner.store().get_events("tuesday").unwrap()[0].title, "Example");
}

#[test]
fn invalid_example_leaves_schedule_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = PlannerService::with_store(sample_store(), PlanFiles::new(dir.path()));
    let before: Schedule = planner.store().schedule().clone();

    let err = planner.install_example("<html>rate limited</html>").unwrap_err();
    assert!(matches!(err, PlannerError::Storage(StorageError::Parse { .. })));
    assert_eq!(planner.store().schedule(), &before);
}

#[test]
fn invalid_example_does_not_become_the_active_file() {
    let dir = tempfile::tempdir().unwrap();
    let files = PlanFiles::new(dir.path());
    let mut planner = PlannerService::with_store(sample_store(), files.clone());

    planner.install_example("<html>rate limited</html>").unwrap_err();
    assert_eq!(planner.active_path(), files.default_path());

    planner.save().unwrap();
    assert_eq!(
        fs::read_to_string(files.example_path()).unwrap(),
        "<html>rate limited</html>"
    );
    assert!(read_schedule(&files.default_path()).is_ok());
}
