//! Detail popup payload.

use chrono_tz::Tz;
use serde::Serialize;

use crate::derive::{clean_title, extract_committee, is_weekend};
use crate::event::Event;

/// Everything the popup shows for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: i64,
    /// Popup header.
    pub committee: String,
    pub title: String,
    pub when: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_full: bool,
    pub spots_available: Option<i64>,
    pub is_weekend: bool,
    pub url: Option<String>,
    pub registration_url: Option<String>,
    pub registration_enabled: bool,
}

impl EventDetails {
    pub fn from_event(event: &Event, tz: Option<Tz>) -> Self {
        EventDetails {
            id: event.id,
            committee: extract_committee(event),
            title: clean_title(event),
            when: format_when(event, tz),
            location: event.location.clone(),
            description: event.description.clone(),
            is_full: event.is_full,
            spots_available: event.spots_available,
            is_weekend: is_weekend(event, tz),
            url: event.url.clone(),
            registration_url: event.registration_url.clone(),
            registration_enabled: event.registration_enabled(),
        }
    }

    /// Availability line. Both fields are shown as given, even when the
    /// feed is inconsistent about them.
    pub fn availability(&self) -> String {
        let spots = match self.spots_available {
            Some(1) => Some("1 spot left".to_string()),
            Some(n) => Some(format!("{n} spots left")),
            None => None,
        };

        match (self.is_full, spots) {
            (true, Some(spots)) => format!("Full ({spots})"),
            (true, None) => "Full".to_string(),
            (false, Some(spots)) => spots,
            (false, None) => "Open".to_string(),
        }
    }
}

/// Human-readable date/time range, e.g. "Thu, Mar 20, 2025 · 9:00 AM – 11:00 AM".
pub fn format_when(event: &Event, tz: Option<Tz>) -> String {
    let Some(start) = event.start_time() else {
        return if event.start.trim().is_empty() {
            "Date to be announced".to_string()
        } else {
            event.start.clone()
        };
    };

    let date = start.local_date(tz).format("%a, %b %-d, %Y").to_string();

    let Some(start_local) = start.local(tz) else {
        return format!("{date} (all day)");
    };

    let start_clock = start_local.format("%-I:%M %p").to_string();

    match event.end_time().and_then(|end| end.local(tz)) {
        Some(end_local) if end_local.date() == start_local.date() => {
            format!("{date} · {start_clock} – {}", end_local.format("%-I:%M %p"))
        }
        Some(end_local) => format!(
            "{date} · {start_clock} – {}",
            end_local.format("%a, %b %-d, %-I:%M %p")
        ),
        None => format!("{date} · {start_clock}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: &str, end: &str) -> Event {
        Event::new(5, "Arts: Gallery Walk", start, end)
    }

    #[test]
    fn test_details_header_and_title() {
        let details = EventDetails::from_event(&event("2025-03-22T10:00:00-07:00", ""), None);
        assert_eq!(details.committee, "Arts");
        assert_eq!(details.title, "Gallery Walk");
        assert!(details.is_weekend);
        assert!(details.registration_enabled);
    }

    #[test]
    fn test_when_same_day() {
        let e = event("2025-03-20T09:00:00-07:00", "2025-03-20T11:30:00-07:00");
        assert_eq!(format_when(&e, None), "Thu, Mar 20, 2025 · 9:00 AM – 11:30 AM");
    }

    #[test]
    fn test_when_spanning_days() {
        let e = event("2025-03-20T18:00:00-07:00", "2025-03-21T10:00:00-07:00");
        assert_eq!(
            format_when(&e, None),
            "Thu, Mar 20, 2025 · 6:00 PM – Fri, Mar 21, 10:00 AM"
        );
    }

    #[test]
    fn test_when_without_usable_times() {
        assert_eq!(format_when(&event("2025-03-22", ""), None), "Sat, Mar 22, 2025 (all day)");
        assert_eq!(format_when(&event("2025-03-20T09:00:00-07:00", "later"), None), "Thu, Mar 20, 2025 · 9:00 AM");
        assert_eq!(format_when(&event("TBD", ""), None), "TBD");
        assert_eq!(format_when(&event("", ""), None), "Date to be announced");
    }

    #[test]
    fn test_availability_shows_both_fields() {
        let mut e = event("", "");
        let mut details = EventDetails::from_event(&e, None);
        assert_eq!(details.availability(), "Open");

        e.spots_available = Some(1);
        details = EventDetails::from_event(&e, None);
        assert_eq!(details.availability(), "1 spot left");

        e.is_full = true;
        e.spots_available = Some(4);
        details = EventDetails::from_event(&e, None);
        assert_eq!(details.availability(), "Full (4 spots left)");

        e.spots_available = None;
        details = EventDetails::from_event(&e, None);
        assert_eq!(details.availability(), "Full");
    }
}
