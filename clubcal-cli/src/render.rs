//! Colored terminal rendering for clubcal types.

use chrono_tz::Tz;
use clubcal_core::details::EventDetails;
use clubcal_core::derive::TimeOfDay;
use clubcal_core::event::EventTime;
use clubcal_core::{CalendarItem, FilterChip};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for FilterChip {
    fn render(&self) -> String {
        format!("[{} ×]", self.label()).cyan().to_string()
    }
}

/// A calendar item shown as one row, with its clock read in `tz` so it
/// agrees with the day heading and time-of-day colour.
pub struct ItemRow<'a> {
    pub item: &'a CalendarItem,
    pub tz: Option<Tz>,
}

impl Render for ItemRow<'_> {
    fn render(&self) -> String {
        let item = self.item;
        let time = EventTime::parse(&item.start)
            .and_then(|t| t.local(self.tz))
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "all-day".to_string());

        let time = format!("{:>7}", time);
        let time = match item.extended_props.time_of_day {
            TimeOfDay::Morning => time.yellow().to_string(),
            TimeOfDay::Afternoon => time.green().to_string(),
            TimeOfDay::Evening => time.magenta().to_string(),
            TimeOfDay::AllDay => time,
        };

        let committee = format!("[{}]", item.extended_props.committee);
        let mut line = format!(
            "{} {} {} {}",
            time,
            item.extended_props.clean_title,
            committee.dimmed(),
            format!("#{}", item.id).dimmed()
        );

        if item.class_names.iter().any(|c| c == "is-full") {
            line.push_str(&format!(" {}", "full".red()));
        } else if item.class_names.iter().any(|c| c == "spots-limited") {
            line.push_str(&format!(" {}", "few spots".yellow()));
        }

        line
    }
}

impl Render for EventDetails {
    fn render(&self) -> String {
        let mut lines = vec![
            self.committee.dimmed().to_string(),
            self.title.bold().to_string(),
            self.when.clone(),
        ];

        if let Some(location) = &self.location {
            lines.push(format!("📍 {}", location));
        }

        let availability = self.availability();
        lines.push(if self.is_full {
            availability.red().to_string()
        } else {
            availability.green().to_string()
        });

        if let Some(description) = &self.description {
            lines.push(String::new());
            lines.push(description.clone());
        }

        if self.registration_enabled {
            if let Some(url) = &self.registration_url {
                lines.push(String::new());
                lines.push(format!("{} {}", "Register:".bold(), url));
            }
        }

        if let Some(url) = &self.url {
            lines.push(format!("{} {}", "Details:".bold(), url.underline()));
        }

        lines.join("\n")
    }
}
