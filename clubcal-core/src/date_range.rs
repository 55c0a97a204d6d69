//! Visible date range for the pull-based event source.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::constants::DEFAULT_RANGE_DAYS;
use crate::event::{Event, EventTime};

/// Date range requested by the renderer.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        DateRange { from: None, to: None }
    }

    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parse command-line bounds. Days are cut at midnight in `tz`, or UTC
    /// when no timezone is set.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD; defaults to today
    /// - `to`: YYYY-MM-DD, defaults to +DEFAULT_RANGE_DAYS
    pub fn from_args(from: Option<&str>, to: Option<&str>, tz: Option<Tz>) -> Result<Self, String> {
        Self::from_args_at(from, to, tz, Utc::now())
    }

    pub fn from_args_at(
        from: Option<&str>,
        to: Option<&str>,
        tz: Option<Tz>,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        let today = EventTime::Zoned(now.fixed_offset()).local_date(tz);

        let from_dt = match from {
            Some("start") => None,
            Some(s) => Some(day_start(parse_date(s)?, tz)?),
            None => Some(day_start(today, tz)?),
        };

        let to_dt = match to {
            Some(s) => Some(day_end(parse_date(s)?, tz)?),
            None => Some(now + Duration::days(DEFAULT_RANGE_DAYS)),
        };

        if let (Some(from), Some(to)) = (from_dt, to_dt) {
            if from > to {
                return Err(format!("Range start {} is after its end {}", from.date_naive(), to.date_naive()));
            }
        }

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }

    /// Whether the event overlaps the range.
    ///
    /// Events whose start cannot be parsed are always included, since there
    /// is no date to exclude them by. An unparseable end is read as the start.
    /// Date-only values last until the end of their day.
    pub fn overlaps(&self, event: &Event, tz: Option<Tz>) -> bool {
        let Some(start_time) = event.start_time() else {
            return true;
        };
        let Some(start) = start_time.to_utc(tz) else {
            return true;
        };
        let end = event
            .end_time()
            .or(Some(start_time))
            .and_then(|t| match t {
                EventTime::Date(date) => day_end(date, tz).ok(),
                other => other.to_utc(tz),
            })
            .filter(|end| *end >= start)
            .unwrap_or(start);

        let after_from = self.from.is_none_or(|from| end >= from);
        let before_to = self.to.is_none_or(|to| start <= to);

        after_from && before_to
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

/// First instant of `date` in `tz` (UTC when unset).
fn day_start(date: NaiveDate, tz: Option<Tz>) -> Result<DateTime<Utc>, String> {
    EventTime::Date(date)
        .to_utc(tz)
        .ok_or_else(|| format!("{date} has no midnight in the display timezone"))
}

/// Last second of `date` in `tz` (UTC when unset).
fn day_end(date: NaiveDate, tz: Option<Tz>) -> Result<DateTime<Utc>, String> {
    let next = date
        .succ_opt()
        .ok_or_else(|| format!("{date} is out of range"))?;
    Ok(day_start(next, tz)? - Duration::seconds(1))
}
