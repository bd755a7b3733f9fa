//! Event store operations over one owned `Schedule`.
//!
//! # Responsibility
//! - Validate input, generate ids and mutate day buckets.
//! - Sort events by start time for display.
//!
//! # Invariants
//! - New ids are unique across the whole store at generation time.
//! - A day move never overwrites an event already stored under the target day.
//! - Sorting is stable: equal start times keep bucket order.

use crate::model::event::{
    validate_time, validate_title, Event, EventId, EVENT_ID_ALPHABET, EVENT_ID_LEN,
};
use crate::model::weekday::{validate_day, Weekday};
use crate::model::ValidationError;
use crate::store::schedule::Schedule;
use log::debug;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: usize = 32;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for event store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    /// No event with this id exists under the given day.
    NotFound { day: Weekday, id: EventId },
    /// The target bucket already holds an event with this id.
    DuplicateId { day: Weekday, id: EventId },
    /// Schedule text is not a JSON object of the expected shape.
    Parse(serde_json::Error),
    /// Schedule could not be encoded.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { day, id } => {
                write!(f, "could not find an event with id {id} on {day}")
            }
            Self::DuplicateId { day, id } => {
                write!(f, "{day} already has an event with id {id}")
            }
            Self::Parse(err) => write!(f, "invalid schedule data: {err}"),
            Self::Encode(err) => write!(f, "failed to encode schedule: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Parse(err) | Self::Encode(err) => Some(err),
            Self::NotFound { .. } | Self::DuplicateId { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Source of fresh event ids.
pub trait IdSource {
    fn next_id(&mut self) -> EventId;
}

/// Draws ids uniformly from `EVENT_ID_ALPHABET`.
pub struct RandomIdSource<R = ThreadRng> {
    rng: R,
}

impl RandomIdSource<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomIdSource<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomIdSource<R> {
    /// Uses a caller-provided generator, e.g. a seeded `StdRng` in tests.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> IdSource for RandomIdSource<R> {
    fn next_id(&mut self) -> EventId {
        let id: String = (0..EVENT_ID_LEN)
            .map(|_| {
                let idx = self.rng.random_range(0..EVENT_ID_ALPHABET.len());
                char::from(EVENT_ID_ALPHABET[idx])
            })
            .collect();
        EventId::new(id)
    }
}

/// One field-level change requested for an existing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEdit {
    /// Move to another day, keeping id and fields.
    Day(String),
    StartTime(String),
    EndTime(String),
    /// Replace the title; empty titles are rejected.
    Title(String),
    Delete,
}

/// Owned weekly schedule with validated mutation APIs.
pub struct EventStore<I = RandomIdSource> {
    schedule: Schedule,
    ids: I,
}

impl EventStore<RandomIdSource> {
    /// Creates an empty store with random id generation.
    pub fn new() -> Self {
        Self::with_id_source(RandomIdSource::new())
    }
}

impl Default for EventStore<RandomIdSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdSource> EventStore<I> {
    pub fn with_id_source(ids: I) -> Self {
        Self::from_schedule(Schedule::new(), ids)
    }

    /// Creates a store around a previously loaded schedule snapshot.
    pub fn from_schedule(schedule: Schedule, ids: I) -> Self {
        Self { schedule, ids }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Replaces the whole schedule, returning the previous one.
    pub fn replace_schedule(&mut self, schedule: Schedule) -> Schedule {
        std::mem::replace(&mut self.schedule, schedule)
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// Adds an event and returns its generated id.
    ///
    /// # Errors
    /// - `Validation` when the day, either time or the title is invalid.
    /// - `DuplicateId` when no unique id could be drawn.
    pub fn add_event(
        &mut self,
        day: &str,
        start: &str,
        end: &str,
        title: &str,
    ) -> StoreResult<EventId> {
        let day = validate_day(day)?;
        validate_time(start)?;
        validate_time(end)?;
        validate_title(title)?;

        let id = self.fresh_id(day)?;
        self.schedule
            .bucket_mut(day.as_str())
            .push(Event::new(id.clone(), start, end, title));
        debug!("event=event_add module=store status=ok day={day} id={id}");
        Ok(id)
    }

    /// Returns events for `day` sorted ascending by start time.
    pub fn get_events(&self, day: &str) -> StoreResult<Vec<&Event>> {
        let day = validate_day(day)?;
        Ok(self.events_on(day))
    }

    /// Returns all seven weekdays, monday first, with their sorted events.
    pub fn week(&self) -> Vec<(Weekday, Vec<&Event>)> {
        Weekday::ALL
            .into_iter()
            .map(|day| (day, self.events_on(day)))
            .collect()
    }

    /// Looks up one event by day and id.
    pub fn get_event(&self, day: &str, id: &EventId) -> StoreResult<&Event> {
        let day = validate_day(day)?;
        self.schedule
            .bucket(day.as_str())
            .iter()
            .find(|event| &event.id == id)
            .ok_or_else(|| StoreError::NotFound { day, id: id.clone() })
    }

    /// Applies one edit to an existing event.
    ///
    /// All new values are validated before anything is mutated.
    ///
    /// # Errors
    /// - `Validation` for an invalid day, time, new day or empty title.
    /// - `NotFound` when `id` is not stored under `day`.
    /// - `DuplicateId` when moving onto a day that already has `id`.
    pub fn edit_event(&mut self, day: &str, id: &EventId, edit: EventEdit) -> StoreResult<()> {
        let day = validate_day(day)?;
        match edit {
            EventEdit::Day(target) => self.move_event(day, id, validate_day(&target)?),
            EventEdit::StartTime(value) => {
                validate_time(&value)?;
                self.event_mut(day, id)?.start_time = value;
                Ok(())
            }
            EventEdit::EndTime(value) => {
                validate_time(&value)?;
                self.event_mut(day, id)?.end_time = value;
                Ok(())
            }
            EventEdit::Title(value) => {
                validate_title(&value)?;
                self.event_mut(day, id)?.title = value;
                Ok(())
            }
            EventEdit::Delete => self.delete_event(day.as_str(), id).map(|_| ()),
        }
    }

    /// Removes an event and returns it. The day bucket stays present.
    pub fn delete_event(&mut self, day: &str, id: &EventId) -> StoreResult<Event> {
        let day = validate_day(day)?;
        let bucket = self
            .schedule
            .existing_bucket_mut(day.as_str())
            .ok_or_else(|| StoreError::NotFound { day, id: id.clone() })?;
        let idx = bucket
            .iter()
            .position(|event| &event.id == id)
            .ok_or_else(|| StoreError::NotFound { day, id: id.clone() })?;
        let removed = bucket.remove(idx);
        debug!("event=event_delete module=store status=ok day={day} id={id}");
        Ok(removed)
    }

    /// Encodes the schedule as canonical JSON text.
    pub fn serialize(&self) -> StoreResult<String> {
        self.schedule.to_json().map_err(StoreError::Encode)
    }

    /// Decodes schedule text without touching any store.
    ///
    /// # Errors
    /// - `Parse` when the text is not a JSON object of day -> id -> event objects.
    pub fn deserialize(text: &str) -> StoreResult<Schedule> {
        Schedule::from_json(text).map_err(StoreError::Parse)
    }

    /// Sorted events for an already validated day.
    pub fn events_on(&self, day: Weekday) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.schedule.bucket(day.as_str()).iter().collect();
        sort_chronologically(&mut events);
        events
    }

    fn event_mut(&mut self, day: Weekday, id: &EventId) -> StoreResult<&mut Event> {
        self.schedule
            .existing_bucket_mut(day.as_str())
            .and_then(|bucket| bucket.iter_mut().find(|event| &event.id == id))
            .ok_or_else(|| StoreError::NotFound { day, id: id.clone() })
    }

    fn move_event(&mut self, from: Weekday, id: &EventId, to: Weekday) -> StoreResult<()> {
        let idx = self
            .schedule
            .bucket(from.as_str())
            .iter()
            .position(|event| &event.id == id)
            .ok_or_else(|| StoreError::NotFound { day: from, id: id.clone() })?;
        if from == to {
            return Ok(());
        }
        if self
            .schedule
            .bucket(to.as_str())
            .iter()
            .any(|event| &event.id == id)
        {
            return Err(StoreError::DuplicateId { day: to, id: id.clone() });
        }

        let event = self.schedule.bucket_mut(from.as_str()).remove(idx);
        self.schedule.bucket_mut(to.as_str()).push(event);
        debug!("event=event_move module=store status=ok from={from} to={to} id={id}");
        Ok(())
    }

    fn fresh_id(&mut self, day: Weekday) -> StoreResult<EventId> {
        let mut candidate = self.ids.next_id();
        let mut attempts = 1;
        while self.schedule.contains_id(&candidate) {
            if attempts == MAX_ID_ATTEMPTS {
                return Err(StoreError::DuplicateId { day, id: candidate });
            }
            candidate = self.ids.next_id();
            attempts += 1;
        }
        Ok(candidate)
    }
}

/// Stable sort by parsed start time; malformed start times go last.
pub fn sort_chronologically(events: &mut [&Event]) {
    events.sort_by_key(|event| match event.start_minutes() {
        Some(minutes) => (false, minutes),
        None => (true, 0),
    });
}
