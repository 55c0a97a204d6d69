//! Committee, title and time-of-day derivation.
//!
//! The sync job usually tags events with `committee:*` and `time:*`, but not
//! every record is guaranteed to carry them. These functions fall back to the
//! event name and start time. They are used for both filtering and display,
//! so the same event always derives the same values.

use std::fmt;

use chrono::{Datelike, Timelike, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{COMMITTEE_COLON_LIMIT, FALLBACK_COMMITTEE};
use crate::event::Event;

/// Byte index of the committee separator, if the first colon sits before
/// character offset 30.
fn committee_colon(name: &str) -> Option<usize> {
    name.char_indices()
        .take(COMMITTEE_COLON_LIMIT)
        .find(|&(_, c)| c == ':')
        .map(|(idx, _)| idx)
}

/// Committee that runs the event.
///
/// `committee:<value>` tag first (hyphens read as spaces), then a
/// "Committee: Title" name prefix, then "General".
pub fn extract_committee(event: &Event) -> String {
    if let Some(value) = event.tag_values("committee:").next() {
        return value.replace('-', " ");
    }

    if let Some(idx) = committee_colon(&event.name) {
        return event.name[..idx].trim().to_string();
    }

    FALLBACK_COMMITTEE.to_string()
}

/// Event name without its committee prefix.
pub fn clean_title(event: &Event) -> String {
    match committee_colon(&event.name) {
        Some(idx) => event.name[idx + 1..].trim().to_string(),
        None => event.name.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    AllDay,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::AllDay => "allday",
        }
    }

    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            TimeOfDay::Morning
        } else if hour < 17 {
            TimeOfDay::Afternoon
        } else {
            TimeOfDay::Evening
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time of day of the event.
///
/// A `time:*` tag is authoritative. Otherwise the local hour of `start`
/// decides; a start that does not parse (or has no time) is `AllDay`.
pub fn time_of_day(event: &Event, tz: Option<Tz>) -> TimeOfDay {
    const TAG_ORDER: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    if let Some(tagged) = TAG_ORDER
        .into_iter()
        .find(|t| event.has_tag(&format!("time:{}", t.as_str())))
    {
        return tagged;
    }

    // Unrecognized time:* values fall through to the start time.
    event
        .start_time()
        .and_then(|t| t.local(tz))
        .map(|dt| TimeOfDay::from_hour(dt.hour()))
        .unwrap_or(TimeOfDay::AllDay)
}

/// Whether the event starts on a Saturday or Sunday.
pub fn is_weekend(event: &Event, tz: Option<Tz>) -> bool {
    event
        .start_time()
        .map(|t| matches!(t.local_date(tz).weekday(), Weekday::Sat | Weekday::Sun))
        .unwrap_or(false)
}
