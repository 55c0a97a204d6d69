//! Core of the clubcal events calendar.
//!
//! This crate turns a club's published events feed into calendar items:
//! - `taxonomy` and `derive` for facets, quick filters and derived fields
//! - `filter` and `transform` for the pure filter → display pipeline
//! - `store` and `cache` for fetching the feed behind a time-boxed cache
//! - `widget` for one host-facing calendar instance

pub mod cache;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod derive;
pub mod details;
pub mod error;
pub mod event;
pub mod feed;
pub mod filter;
mod serde_helpers;
pub mod store;
pub mod taxonomy;
pub mod transform;
pub mod widget;

pub use error::{ClubCalError, ClubCalResult};
pub use event::{Event, EventTime};
pub use filter::{FilterChip, FilterState, filter};
pub use transform::{CalendarItem, transform};
pub use widget::{ClickAction, DisplayState, Widget};
