use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clubcal_core::date_range::DateRange;
use clubcal_core::event::EventTime;
use clubcal_core::taxonomy::{Facet, quick_filter};
use clubcal_core::{CalendarItem, Widget};
use owo_colors::OwoColorize;

use crate::FilterArgs;
use crate::render::{ItemRow, Render};

pub async fn run(
    mut widget: Widget,
    range: DateRange,
    filters: &FilterArgs,
    refresh: bool,
    json: bool,
) -> Result<()> {
    super::load(&mut widget, refresh).await?;
    apply_filters(&mut widget, filters)?;

    let items = widget.event_source(&range);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let chips = widget.chips();
    if !chips.is_empty() {
        let rendered: Vec<String> = chips.iter().map(|c| c.render()).collect();
        println!("{} {}\n", "Filters:".dimmed(), rendered.join(" "));
    }

    if items.is_empty() {
        println!("{}", "No events found".dimmed());
    } else {
        print_grouped(&items, widget.timezone());
    }

    println!(
        "\n{}",
        format!(
            "Showing {} of {} events",
            widget.filtered_count(),
            widget.total_count()
        )
        .dimmed()
    );

    Ok(())
}

fn apply_filters(widget: &mut Widget, args: &FilterArgs) -> Result<()> {
    let facets = [
        (Facet::InterestArea, "--interest", &args.interest),
        (Facet::Committee, "--committee", &args.committee),
        (Facet::Cost, "--cost", &args.cost),
        (Facet::TimeOfDay, "--time", &args.time),
    ];

    for (facet, flag, value) in facets {
        if value.is_none() {
            continue;
        }
        if !widget.config().facet_enabled(facet) {
            anyhow::bail!("The {} filter ({}) is disabled in the config", facet.label(), flag);
        }
        widget.set_facet(facet, value.as_deref());
    }

    let enabled: Vec<&'static str> = widget.quick_filters().iter().map(|q| q.id).collect();

    for id in &args.quick {
        if !enabled.iter().any(|q| *q == id.as_str()) {
            let reason = if quick_filter(id).is_some() {
                "is disabled in the config"
            } else {
                "is not a known quick filter"
            };
            anyhow::bail!("'{}' {}. Available: {}", id, reason, enabled.join(", "));
        }

        if !widget.filter_state().quick_filters.contains(id) {
            widget.toggle_quick_filter(id);
        }
    }

    Ok(())
}

/// Items in start order for day grouping. Unparseable starts go last.
fn sorted_for_display(items: &[CalendarItem], tz: Option<Tz>) -> Vec<&CalendarItem> {
    let mut sorted: Vec<&CalendarItem> = items.iter().collect();
    sorted.sort_by_key(|item| {
        let start = EventTime::parse(&item.start).and_then(|t| t.to_utc(tz));
        (start.is_none(), start)
    });
    sorted
}

/// Print items grouped under a heading per day.
fn print_grouped(items: &[CalendarItem], tz: Option<Tz>) {
    let mut current_date: Option<String> = None;

    for item in sorted_for_display(items, tz) {
        let date_label = EventTime::parse(&item.start)
            .map(|t| format_date_label(t.local_date(tz), today(tz)))
            .unwrap_or_else(|| "Undated".to_string());

        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label.bold());
            current_date = Some(date_label);
        }

        println!("  {}", ItemRow { item, tz }.render());
    }
}

fn today(tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => chrono::Local::now().date_naive(),
    }
}

/// Human-readable day label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}
