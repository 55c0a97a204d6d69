//! Event → calendar item transformation.
//!
//! Output is serialized in camelCase for the rendering collaborator, with
//! derived values carried under `extendedProps`.

use chrono_tz::Tz;
use serde::Serialize;

use crate::constants::LIMITED_SPOTS_THRESHOLD;
use crate::derive::{TimeOfDay, clean_title, extract_committee, time_of_day};
use crate::event::Event;

/// An event in the shape the calendar renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub id: i64,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub class_names: Vec<String>,
    pub extended_props: ExtendedProps,
}

/// Display metadata derived from the event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedProps {
    pub committee: String,
    pub time_of_day: TimeOfDay,
    pub clean_title: String,
    pub event: Event,
}

/// Style classes: `time-<derived>`, then `is-full`, then `spots-limited`.
pub fn class_names(event: &Event, time: TimeOfDay) -> Vec<String> {
    let mut classes = vec![format!("time-{}", time.as_str())];

    if event.is_full {
        classes.push("is-full".to_string());
    }

    if matches!(event.spots_available, Some(n) if n > 0 && n <= LIMITED_SPOTS_THRESHOLD) {
        classes.push("spots-limited".to_string());
    }

    classes
}

impl CalendarItem {
    pub fn from_event(event: &Event, tz: Option<Tz>) -> Self {
        let time = time_of_day(event, tz);

        CalendarItem {
            id: event.id,
            title: event.name.clone(),
            start: event.start.clone(),
            end: event.end.clone(),
            url: event.url.clone(),
            class_names: class_names(event, time),
            extended_props: ExtendedProps {
                committee: extract_committee(event),
                time_of_day: time,
                clean_title: clean_title(event),
                event: event.clone(),
            },
        }
    }
}

/// One item per event, same order. Never drops anything.
pub fn transform(events: &[Event], tz: Option<Tz>) -> Vec<CalendarItem> {
    events
        .iter()
        .map(|event| CalendarItem::from_event(event, tz))
        .collect()
}
