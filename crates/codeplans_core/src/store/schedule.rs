//! Schedule container and its persisted JSON shape.
//!
//! # Responsibility
//! - Hold day key -> event bucket mappings in memory.
//! - Define the canonical JSON object written to and read from plan files.
//!
//! # Invariants
//! - Buckets keep insertion order; display order is computed by callers.
//! - Empty buckets are never serialized and never affect equality.
//! - Unknown day keys and malformed field values read from JSON are kept verbatim.
//!
//! Wire shape:
//! `{ "<day>": { "<EVENT_ID>": { "start_time": "HH:MM", "end_time": "HH:MM", "title": "..." } } }`

use crate::model::event::{Event, EventId};
use crate::model::weekday::Weekday;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Formatter;

/// Full weekly schedule: day key -> events in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    days: BTreeMap<String, Vec<Event>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events stored under `day` in bucket order, empty when the day is absent.
    pub fn bucket(&self, day: &str) -> &[Event] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable bucket for `day`, created when absent.
    pub(crate) fn bucket_mut(&mut self, day: &str) -> &mut Vec<Event> {
        self.days.entry(day.to_string()).or_default()
    }

    pub(crate) fn existing_bucket_mut(&mut self, day: &str) -> Option<&mut Vec<Event>> {
        self.days.get_mut(day)
    }

    /// Appends an event to a day bucket, creating the bucket if needed.
    ///
    /// An event with the same id in the same bucket is replaced in place.
    pub fn insert(&mut self, day: &str, event: Event) {
        let bucket = self.bucket_mut(day);
        match bucket.iter_mut().find(|existing| existing.id == event.id) {
            Some(existing) => *existing = event,
            None => bucket.push(event),
        }
    }

    /// Returns whether any event id in any bucket equals `id`.
    pub fn contains_id(&self, id: &EventId) -> bool {
        self.days
            .values()
            .flatten()
            .any(|event| &event.id == id)
    }

    /// Total number of events across all buckets.
    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Returns `true` when no bucket holds an event.
    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// Encodes this schedule as pretty-printed canonical JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Decodes a schedule from JSON text.
    ///
    /// Only the object shape is checked; day names and time strings are not validated.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Non-empty buckets in persisted order: weekdays monday..sunday, then
    /// unknown keys lexicographically.
    fn persisted_buckets(&self) -> impl Iterator<Item = (&str, &[Event])> {
        let known = Weekday::ALL
            .into_iter()
            .filter_map(move |day| self.days.get_key_value(day.as_str()));
        let unknown = self
            .days
            .iter()
            .filter(|(key, _)| Weekday::ALL.iter().all(|day| day.as_str() != key.as_str()));
        known
            .chain(unknown)
            .filter(|(_, events)| !events.is_empty())
            .map(|(key, events)| (key.as_str(), events.as_slice()))
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        let lhs = self.days.iter().filter(|(_, events)| !events.is_empty());
        let rhs = other.days.iter().filter(|(_, events)| !events.is_empty());
        lhs.eq(rhs)
    }
}

impl Eq for Schedule {}

#[derive(Serialize)]
struct EventRecordRef<'a> {
    start_time: &'a str,
    end_time: &'a str,
    title: &'a str,
}

#[derive(Deserialize)]
struct EventRecord {
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    end_time: String,
    #[serde(default)]
    title: String,
}

struct BucketRef<'a>(&'a [Event]);

impl Serialize for BucketRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for event in self.0 {
            map.serialize_entry(
                event.id.as_str(),
                &EventRecordRef {
                    start_time: &event.start_time,
                    end_time: &event.end_time,
                    title: &event.title,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (day, events) in self.persisted_buckets() {
            map.serialize_entry(day, &BucketRef(events))?;
        }
        map.end()
    }
}

/// Bucket decoded in document order.
struct Bucket(Vec<Event>);

impl<'de> Deserialize<'de> for Bucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketVisitor;

        impl<'de> Visitor<'de> for BucketVisitor {
            type Value = Bucket;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object keyed by event id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Bucket, A::Error> {
                let mut events: Vec<Event> = Vec::new();
                while let Some((id, record)) = access.next_entry::<String, EventRecord>()? {
                    let event = Event {
                        id: EventId::new(id),
                        start_time: record.start_time,
                        end_time: record.end_time,
                        title: record.title,
                    };
                    // Last duplicate key wins, as with any JSON object.
                    match events.iter_mut().find(|existing| existing.id == event.id) {
                        Some(existing) => *existing = event,
                        None => events.push(event),
                    }
                }
                Ok(Bucket(events))
            }
        }

        deserializer.deserialize_map(BucketVisitor)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = Schedule;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object keyed by day name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schedule, A::Error> {
                let mut days = BTreeMap::new();
                while let Some((day, bucket)) = access.next_entry::<String, Bucket>()? {
                    days.insert(day, bucket.0);
                }
                Ok(Schedule { days })
            }
        }

        deserializer.deserialize_map(ScheduleVisitor)
    }
}
