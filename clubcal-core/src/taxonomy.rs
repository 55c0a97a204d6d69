//! Static tag taxonomy: facet categories and quick-filter rules.
//!
//! Option lists are presented in the order written here, never sorted or
//! derived from data. The one exception is the committee facet, whose
//! options come from the loaded events (see [`committee_options`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::derive::extract_committee;
use crate::event::Event;

/// A single-value filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    InterestArea,
    Committee,
    Cost,
    TimeOfDay,
}

/// One selectable value of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub id: String,
    pub label: String,
}

impl FacetOption {
    fn from_static(&(id, label): &(&str, &str)) -> Self {
        FacetOption {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

const INTEREST_AREAS: &[(&str, &str)] = &[
    ("hiking", "Hiking"),
    ("walking", "Walking"),
    ("dining", "Dining Out"),
    ("wine", "Wine Tasting"),
    ("book-club", "Book Club"),
    ("games", "Games"),
    ("arts", "Arts & Culture"),
    ("golf", "Golf"),
    ("travel", "Travel"),
    ("social", "Social"),
    ("volunteering", "Volunteering"),
];

const COSTS: &[(&str, &str)] = &[
    ("free", "Free"),
    ("under-25", "Under $25"),
    ("under-50", "Under $50"),
    ("over-50", "$50+"),
];

const TIMES_OF_DAY: &[(&str, &str)] = &[
    ("morning", "Morning"),
    ("afternoon", "Afternoon"),
    ("evening", "Evening"),
];

impl Facet {
    /// Display order of the facet dropdowns.
    pub const ALL: [Facet; 4] = [
        Facet::InterestArea,
        Facet::Committee,
        Facet::Cost,
        Facet::TimeOfDay,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Facet::InterestArea => "interest_area",
            Facet::Committee => "committee",
            Facet::Cost => "cost",
            Facet::TimeOfDay => "time_of_day",
        }
    }

    pub fn from_id(id: &str) -> Option<Facet> {
        Facet::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facet::InterestArea => "Interest Area",
            Facet::Committee => "Committee",
            Facet::Cost => "Cost",
            Facet::TimeOfDay => "Time of Day",
        }
    }

    pub fn tag_prefix(&self) -> &'static str {
        match self {
            Facet::InterestArea => "activity:",
            Facet::Committee => "committee:",
            Facet::Cost => "cost:",
            Facet::TimeOfDay => "time:",
        }
    }

    /// The tag an event carries when it has `value` for this facet.
    pub fn tag(&self, value: &str) -> String {
        format!("{}{}", self.tag_prefix(), value)
    }

    /// Author-defined options. Empty for the committee facet.
    pub fn static_options(&self) -> Vec<FacetOption> {
        let table: &[(&str, &str)] = match self {
            Facet::InterestArea => INTEREST_AREAS,
            Facet::Committee => &[],
            Facet::Cost => COSTS,
            Facet::TimeOfDay => TIMES_OF_DAY,
        };
        table.iter().map(FacetOption::from_static).collect()
    }

    /// Label of a known option, falling back to the raw value.
    pub fn option_label(&self, value: &str) -> String {
        self.static_options()
            .into_iter()
            .find(|o| o.id == value)
            .map(|o| o.label)
            .unwrap_or_else(|| value.to_string())
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Committee options present in `events`, deduplicated case-insensitively
/// and sorted by label.
pub fn committee_options(events: &[Event]) -> Vec<FacetOption> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();

    for event in events {
        let committee = extract_committee(event);
        seen.entry(committee.to_lowercase()).or_insert(committee);
    }

    seen.into_values()
        .map(|name| FacetOption {
            id: name.clone(),
            label: name,
        })
        .collect()
}

// =============================================================================
// Quick filters
// =============================================================================

/// How a quick filter decides whether an event passes.
#[derive(Debug, Clone, Copy)]
pub enum QuickFilterRule {
    /// The event must carry this exact tag.
    RequiredTag(&'static str),
    /// The event must satisfy this predicate.
    Predicate(fn(&Event) -> bool),
}

impl QuickFilterRule {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            QuickFilterRule::RequiredTag(tag) => event.has_tag(tag),
            QuickFilterRule::Predicate(predicate) => predicate(event),
        }
    }
}

/// A toggleable filter applied on top of the facets.
#[derive(Debug, Clone, Copy)]
pub struct QuickFilter {
    pub id: &'static str,
    pub label: &'static str,
    pub rule: QuickFilterRule,
}

/// Not full, and either unlimited or with at least one spot left.
///
/// `availability:*` tags are deliberately not consulted.
pub fn has_openings(event: &Event) -> bool {
    !event.is_full && event.spots_available != Some(0)
}

fn registration_open(event: &Event) -> bool {
    event.registration_enabled()
}

/// Quick filters in display order.
pub static QUICK_FILTERS: &[QuickFilter] = &[
    QuickFilter {
        id: "hasOpenings",
        label: "Has Openings",
        rule: QuickFilterRule::Predicate(has_openings),
    },
    QuickFilter {
        id: "free",
        label: "Free",
        rule: QuickFilterRule::RequiredTag("cost:free"),
    },
    QuickFilter {
        id: "weekend",
        label: "Weekend",
        rule: QuickFilterRule::RequiredTag("day:weekend"),
    },
    QuickFilter {
        id: "newcomerFriendly",
        label: "Newcomer Friendly",
        rule: QuickFilterRule::RequiredTag("newcomer-friendly"),
    },
    QuickFilter {
        id: "registrationOpen",
        label: "Registration Open",
        rule: QuickFilterRule::Predicate(registration_open),
    },
];

pub fn quick_filter(id: &str) -> Option<&'static QuickFilter> {
    QUICK_FILTERS.iter().find(|q| q.id == id)
}
