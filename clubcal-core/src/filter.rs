//! Filter engine.
//!
//! [`filter`] is pure and order-preserving: it reads a [`FilterState`] and
//! returns the events that pass every active facet and quick filter.

use std::collections::BTreeSet;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::derive::{extract_committee, time_of_day};
use crate::event::Event;
use crate::taxonomy::{Facet, quick_filter};

/// Current facet selections and active quick filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub interest_area: Option<String>,
    pub committee: Option<String>,
    pub cost: Option<String>,
    pub time_of_day: Option<String>,
    pub quick_filters: BTreeSet<String>,
}

/// One active selection, as shown in a removable chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterChip {
    Facet {
        facet: Facet,
        value: String,
        label: String,
    },
    QuickFilter {
        id: String,
        label: String,
    },
}

impl FilterChip {
    pub fn label(&self) -> &str {
        match self {
            FilterChip::Facet { label, .. } | FilterChip::QuickFilter { label, .. } => label,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::InterestArea => self.interest_area.as_deref(),
            Facet::Committee => self.committee.as_deref(),
            Facet::Cost => self.cost.as_deref(),
            Facet::TimeOfDay => self.time_of_day.as_deref(),
        }
    }

    /// Select `value` for `facet`; `None` or an empty string clears it.
    pub fn set(&mut self, facet: Facet, value: Option<&str>) {
        let value = value.filter(|v| !v.is_empty()).map(str::to_string);
        let slot = match facet {
            Facet::InterestArea => &mut self.interest_area,
            Facet::Committee => &mut self.committee,
            Facet::Cost => &mut self.cost,
            Facet::TimeOfDay => &mut self.time_of_day,
        };
        *slot = value;
    }

    /// Flip a quick filter. Returns whether it is now active.
    pub fn toggle_quick_filter(&mut self, id: &str) -> bool {
        if self.quick_filters.remove(id) {
            false
        } else {
            self.quick_filters.insert(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.get(*f).is_none()) && self.quick_filters.is_empty()
    }

    /// Active selections in facet order, then quick filters.
    pub fn chips(&self) -> Vec<FilterChip> {
        let facets = Facet::ALL.into_iter().filter_map(|facet| {
            self.get(facet).map(|value| FilterChip::Facet {
                facet,
                value: value.to_string(),
                label: format!("{}: {}", facet.label(), facet.option_label(value)),
            })
        });

        let quick = self.quick_filters.iter().map(|id| FilterChip::QuickFilter {
            id: id.clone(),
            label: quick_filter(id)
                .map(|q| q.label.to_string())
                .unwrap_or_else(|| id.clone()),
        });

        facets.chain(quick).collect()
    }

    /// Drop the selection a chip stands for.
    pub fn remove_chip(&mut self, chip: &FilterChip) {
        match chip {
            FilterChip::Facet { facet, value, .. } => {
                if self.get(*facet) == Some(value.as_str()) {
                    self.set(*facet, None);
                }
            }
            FilterChip::QuickFilter { id, .. } => {
                self.quick_filters.remove(id);
            }
        }
    }

    /// Whether `event` passes every active condition.
    pub fn matches(&self, event: &Event, tz: Option<Tz>) -> bool {
        if let Some(area) = &self.interest_area {
            if !event.has_tag(&Facet::InterestArea.tag(area)) {
                return false;
            }
        }

        if let Some(committee) = &self.committee {
            let tagged = event.has_tag(&Facet::Committee.tag(committee));
            if !tagged && extract_committee(event).to_lowercase() != committee.to_lowercase() {
                return false;
            }
        }

        if let Some(cost) = &self.cost {
            if !event.has_tag(&Facet::Cost.tag(cost)) {
                return false;
            }
        }

        if let Some(time) = &self.time_of_day {
            let tagged = event.has_tag(&Facet::TimeOfDay.tag(time));
            if !tagged && time_of_day(event, tz).as_str() != time {
                return false;
            }
        }

        // Unknown ids pass.
        self.quick_filters
            .iter()
            .filter_map(|id| quick_filter(id))
            .all(|q| q.rule.matches(event))
    }
}

/// Events passing `state`, in their original order.
pub fn filter(events: &[Event], state: &FilterState, tz: Option<Tz>) -> Vec<Event> {
    events
        .iter()
        .filter(|event| state.matches(event, tz))
        .cloned()
        .collect()
}
