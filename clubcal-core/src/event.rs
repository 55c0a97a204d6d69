//! Club event records as published in the events feed.
//!
//! Events are produced by the upstream sync job and are read-only here.
//! Optional fields fall back to defaults so a sparse record still renders.
//! `start` and `end` are kept verbatim and parsed on demand, since a feed
//! value that does not parse must still yield an event (shown as all-day).

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{blank_as_none, null_as_default};

/// A club event (one element of the feed's `events` array).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,

    /// Display name, optionally prefixed with "Committee: ".
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,

    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// HTML description as provided by the sync job.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `category:value` classifiers and bare flags. Membership only.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeSet<String>,

    /// Remaining registrations; `None` means unlimited.
    #[serde(default)]
    pub spots_available: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_full: bool,

    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_enabled: Option<bool>,

    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
}

impl Event {
    /// Minimal event, mostly useful for hosts building records by hand.
    pub fn new(id: i64, name: &str, start: &str, end: &str) -> Self {
        Event {
            id,
            name: name.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            location: None,
            description: None,
            tags: BTreeSet::new(),
            spots_available: None,
            is_full: false,
            url: None,
            registration_url: None,
            registration_enabled: None,
            access_level: None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Values of every `<prefix><value>` tag, e.g. `tag_values("committee:")`.
    pub fn tag_values<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags.iter().filter_map(move |t| t.strip_prefix(prefix))
    }

    pub fn start_time(&self) -> Option<EventTime> {
        EventTime::parse(&self.start)
    }

    pub fn end_time(&self) -> Option<EventTime> {
        EventTime::parse(&self.end)
    }

    /// Registration is open unless the feed says otherwise.
    pub fn registration_enabled(&self) -> bool {
        self.registration_enabled.unwrap_or(true)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A parsed `start`/`end` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTime {
    /// Timestamp carrying its own UTC offset (the normal feed shape).
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock time without an offset.
    Floating(NaiveDateTime),
    /// Date without a time of day.
    Date(NaiveDate),
}

const FLOATING_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

impl EventTime {
    /// Parse a feed timestamp. Returns `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(EventTime::Zoned(dt));
        }

        for format in FLOATING_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(EventTime::Floating(dt));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(EventTime::Date)
    }

    /// Wall-clock time of this value.
    ///
    /// Zoned values are shifted into `tz` when given, otherwise read in their
    /// own offset. Date-only values have no wall-clock time.
    pub fn local(&self, tz: Option<Tz>) -> Option<NaiveDateTime> {
        match self {
            EventTime::Zoned(dt) => Some(match tz {
                Some(tz) => dt.with_timezone(&tz).naive_local(),
                None => dt.naive_local(),
            }),
            EventTime::Floating(dt) => Some(*dt),
            EventTime::Date(_) => None,
        }
    }

    pub fn local_date(&self, tz: Option<Tz>) -> NaiveDate {
        match self {
            EventTime::Zoned(dt) => match tz {
                Some(tz) => dt.with_timezone(&tz).date_naive(),
                None => dt.date_naive(),
            },
            EventTime::Floating(dt) => dt.date(),
            EventTime::Date(d) => *d,
        }
    }

    /// Absolute instant. Floating and date values are read in `tz`, or UTC.
    pub fn to_utc(&self, tz: Option<Tz>) -> Option<DateTime<Utc>> {
        let naive = match self {
            EventTime::Zoned(dt) => return Some(dt.with_timezone(&Utc)),
            EventTime::Floating(dt) => *dt,
            EventTime::Date(d) => d.and_hms_opt(0, 0, 0)?,
        };

        match tz {
            Some(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            None => Some(naive.and_utc()),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}
