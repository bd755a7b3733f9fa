use codeplans_core::{
    validate_day, validate_time, EventEdit, EventId, EventStore, RandomIdSource, StoreError,
    ValidationError, Weekday,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_store() -> EventStore<RandomIdSource<StdRng>> {
    EventStore::with_id_source(RandomIdSource::with_rng(StdRng::seed_from_u64(42)))
}

#[test]
fn validate_day_accepts_every_weekday_in_any_case() {
    for day in Weekday::ALL {
        assert_eq!(validate_day(day.as_str()).unwrap(), day);
        assert_eq!(validate_day(&day.as_str().to_uppercase()).unwrap(), day);
    }
    assert!(matches!(
        validate_day("funday"),
        Err(ValidationError::InvalidDay(_))
    ));
}

#[test]
fn validate_time_rejects_examples_from_the_prompt_protocol() {
    assert!(validate_time("13:30").is_ok());
    for value in ["25:00", "9:5", "abc"] {
        assert!(matches!(
            validate_time(value),
            Err(ValidationError::InvalidTime(_))
        ));
    }
}

#[test]
fn add_then_get_returns_the_event() {
    let mut store = seeded_store();
    let id = store
        .add_event("monday", "13:30", "15:00", "Standup")
        .unwrap();

    let events = store.get_events("monday").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, id);
    assert_eq!(events[0].start_time, "13:30");
    assert_eq!(events[0].end_time, "15:00");
    assert_eq!(events[0].title, "Standup");
}

#[test]
fn add_normalizes_day_case() {
    let mut store = seeded_store();
    store.add_event("TuEsDaY", "10:00", "11:00", "Gym").unwrap();
    assert_eq!(store.get_events("tuesday").unwrap().len(), 1);
}

#[test]
fn add_rejects_invalid_input_without_mutation() {
    let mut store = seeded_store();

    let err = store.add_event("someday", "10:00", "11:00", "x").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::InvalidDay(_))));

    let err = store.add_event("monday", "10:00", "24:00", "x").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::InvalidTime(_))));

    let err = store.add_event("monday", "10:00", "11:00", " ").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));

    assert!(store.is_empty());
}

#[test]
fn end_time_may_precede_start_time() {
    let mut store = seeded_store();
    store.add_event("friday", "23:00", "01:00", "Night shift").unwrap();
    assert_eq!(store.get_events("friday").unwrap().len(), 1);
}

#[test]
fn get_events_sorts_stably_by_start_time() {
    let mut store = seeded_store();
    let nine = store.add_event("monday", "09:00", "10:00", "nine").unwrap();
    let eight_a = store.add_event("monday", "08:00", "08:30", "eight a").unwrap();
    let eight_b = store.add_event("monday", "08:00", "09:30", "eight b").unwrap();

    let ids: Vec<EventId> = store
        .get_events("monday")
        .unwrap()
        .into_iter()
        .map(|event| event.id.clone())
        .collect();
    assert_eq!(ids, vec![eight_a, eight_b, nine]);
}

#[test]
fn get_events_is_idempotent_and_empty_for_unused_days() {
    let mut store = seeded_store();
    store.add_event("monday", "12:00", "13:00", "Lunch").unwrap();
    store.add_event("monday", "07:00", "08:00", "Run").unwrap();

    let first = store.get_events("monday").unwrap();
    let second = store.get_events("monday").unwrap();
    assert_eq!(first, second);
    assert!(store.get_events("sunday").unwrap().is_empty());
    assert!(matches!(
        store.get_events("noday"),
        Err(StoreError::Validation(ValidationError::InvalidDay(_)))
    ));
}

#[test]
fn week_lists_all_days_in_order() {
    let mut store = seeded_store();
    store.add_event("sunday", "10:00", "11:00", "Brunch").unwrap();
    store.add_event("wednesday", "18:00", "19:00", "Choir").unwrap();

    let week = store.week();
    let days: Vec<Weekday> = week.iter().map(|(day, _)| *day).collect();
    assert_eq!(days, Weekday::ALL.to_vec());
    assert_eq!(week[2].1.len(), 1);
    assert_eq!(week[6].1.len(), 1);
    assert!(week[0].1.is_empty());
}

#[test]
fn delete_removes_event_and_unknown_id_is_not_found() {
    let mut store = seeded_store();
    let keep = store.add_event("monday", "08:00", "09:00", "keep").unwrap();
    let drop = store.add_event("monday", "10:00", "11:00", "drop").unwrap();

    store.edit_event("monday", &drop, EventEdit::Delete).unwrap();
    let ids: Vec<&EventId> = store
        .get_events("monday")
        .unwrap()
        .into_iter()
        .map(|event| &event.id)
        .collect();
    assert_eq!(ids, vec![&keep]);

    let err = store
        .edit_event("monday", &drop, EventEdit::Delete)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { day: Weekday::Monday, .. }));

    let err = store
        .delete_event("tuesday", &EventId::new("ZZZZZZ"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { day: Weekday::Tuesday, .. }));
}

#[test]
fn deleting_last_event_keeps_day_listable_as_empty() {
    let mut store = seeded_store();
    let id = store.add_event("thursday", "08:00", "09:00", "only").unwrap();
    let removed = store.delete_event("thursday", &id).unwrap();
    assert_eq!(removed.title, "only");
    assert!(store.get_events("thursday").unwrap().is_empty());
    assert!(store.is_empty());
}

#[test]
fn moving_day_keeps_id_and_fields() {
    let mut store = seeded_store();
    let id = store.add_event("monday", "13:30", "15:00", "Standup").unwrap();

    store
        .edit_event("monday", &id, EventEdit::Day("Tuesday".to_string()))
        .unwrap();

    assert!(store.get_events("monday").unwrap().is_empty());
    let moved = store.get_events("tuesday").unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, id);
    assert_eq!(moved[0].start_time, "13:30");
    assert_eq!(moved[0].end_time, "15:00");
    assert_eq!(moved[0].title, "Standup");
}

#[test]
fn moving_to_same_day_is_a_no_op() {
    let mut store = seeded_store();
    let id = store.add_event("monday", "13:30", "15:00", "Standup").unwrap();
    store
        .edit_event("monday", &id, EventEdit::Day("monday".to_string()))
        .unwrap();
    assert_eq!(store.get_events("monday").unwrap().len(), 1);
}

#[test]
fn moving_onto_existing_id_is_rejected_atomically() {
    let text = r#"{
        "monday": {"SAME01": {"start_time": "08:00", "end_time": "09:00", "title": "mon"}},
        "tuesday": {"SAME01": {"start_time": "10:00", "end_time": "11:00", "title": "tue"}}
    }"#;
    let schedule = EventStore::<RandomIdSource>::deserialize(text).unwrap();
    let mut store = EventStore::from_schedule(schedule, RandomIdSource::new());
    let before = store.schedule().clone();

    let err = store
        .edit_event(
            "monday",
            &EventId::new("SAME01"),
            EventEdit::Day("tuesday".to_string()),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { day: Weekday::Tuesday, .. }));
    assert_eq!(store.schedule(), &before);
    assert_eq!(store.get_events("tuesday").unwrap()[0].title, "tue");
}

#[test]
fn moving_to_invalid_day_changes_nothing() {
    let mut store = seeded_store();
    let id = store.add_event("monday", "08:00", "09:00", "x").unwrap();
    let err = store
        .edit_event("monday", &id, EventEdit::Day("nowhere".to_string()))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::InvalidDay(_))));
    assert_eq!(store.get_events("monday").unwrap().len(), 1);
}

#[test]
fn editing_times_validates_and_resorts() {
    let mut store = seeded_store();
    let early = store.add_event("monday", "08:00", "09:00", "early").unwrap();
    let late = store.add_event("monday", "10:00", "11:00", "late").unwrap();

    store
        .edit_event("monday", &early, EventEdit::StartTime("12:00".to_string()))
        .unwrap();
    store
        .edit_event("monday", &early, EventEdit::EndTime("12:45".to_string()))
        .unwrap();
    let err = store
        .edit_event("monday", &late, EventEdit::StartTime("7:00".to_string()))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::InvalidTime(_))));

    let events = store.get_events("monday").unwrap();
    assert_eq!(events[0].id, late);
    assert_eq!(events[0].start_time, "10:00");
    assert_eq!(events[1].id, early);
    assert_eq!(events[1].end_time, "12:45");
}

#[test]
fn empty_title_edit_is_rejected_without_mutation() {
    let mut store = seeded_store();
    let id = store.add_event("monday", "08:00", "09:00", "keep me").unwrap();

    let err = store
        .edit_event("monday", &id, EventEdit::Title(String::new()))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));
    assert_eq!(store.get_event("monday", &id).unwrap().title, "keep me");

    store
        .edit_event("monday", &id, EventEdit::Title("renamed".to_string()))
        .unwrap();
    assert_eq!(store.get_event("monday", &id).unwrap().title, "renamed");
}

#[test]
fn editing_unknown_id_is_not_found() {
    let mut store = seeded_store();
    store.add_event("monday", "08:00", "09:00", "x").unwrap();
    let err = store
        .edit_event(
            "monday",
            &EventId::new("NOPE00"),
            EventEdit::Title("y".to_string()),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn generated_ids_are_unique_across_days() {
    let mut store = seeded_store();
    let mut seen = std::collections::HashSet::new();
    for (idx, day) in Weekday::ALL.iter().cycle().take(200).enumerate() {
        let start = format!("{:02}:00", idx % 24);
        let id = store.add_event(day.as_str(), &start, &start, "e").unwrap();
        assert!(seen.insert(id));
    }
}
