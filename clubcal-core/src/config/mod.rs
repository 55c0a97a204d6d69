//! Configuration types for clubcal.

pub mod display;
mod widget_config;

pub use display::{CalendarView, ClickBehavior, FacetSettings, QuickFilterSettings};
pub use widget_config::WidgetConfig;
