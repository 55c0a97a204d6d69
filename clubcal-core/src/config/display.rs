//! Presentation options read from configuration.

use serde::{Deserialize, Serialize};

/// Initial calendar view handed to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    List,
}

/// What a click on an event does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickBehavior {
    /// Open the detail popup.
    #[default]
    Popup,
    /// Follow the event's URL.
    Link,
    /// Open the popup and offer the link.
    Both,
}

fn enabled_by_default() -> bool {
    true
}

/// Per-facet enable/label override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacetSettings {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub label: Option<String>,
}

/// Per-quick-filter enable/label override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuickFilterSettings {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub label: Option<String>,
}
