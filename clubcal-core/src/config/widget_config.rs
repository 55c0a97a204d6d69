//! Widget configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::config::display::{CalendarView, ClickBehavior, FacetSettings, QuickFilterSettings};
use crate::constants::{DEFAULT_CACHE_MINUTES, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::error::{ClubCalError, ClubCalResult};
use crate::taxonomy::{Facet, QuickFilter};

static DEFAULT_CONTAINER: &str = "#clubcalendar";
static DEFAULT_TITLE: &str = "Club Events";
static DEFAULT_THEME: &str = "default";
static ENV_PREFIX: &str = "CLUBCAL";

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_cache_minutes() -> i64 {
    DEFAULT_CACHE_MINUTES
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

/// Configuration for one widget instance.
///
/// Read from ~/.config/clubcal/config.toml (optional), then `CLUBCAL_*`
/// environment variables. Nested keys use `__`, e.g.
/// `CLUBCAL_FACETS__COST__ENABLED=false`.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    /// URL of the events feed. Required to initialize a widget.
    pub feed_url: Option<String>,

    #[serde(default = "default_container")]
    pub container: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub default_view: CalendarView,

    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default)]
    pub facets: HashMap<Facet, FacetSettings>,

    #[serde(default)]
    pub quick_filters: HashMap<String, QuickFilterSettings>,

    #[serde(default)]
    pub click_behavior: ClickBehavior,

    #[serde(default)]
    pub show_past_events: bool,

    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: i64,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// IANA timezone used for "local" times. Defaults to each timestamp's own offset.
    pub timezone: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            feed_url: None,
            container: default_container(),
            title: default_title(),
            default_view: CalendarView::default(),
            theme: default_theme(),
            facets: HashMap::new(),
            quick_filters: HashMap::new(),
            click_behavior: ClickBehavior::default(),
            show_past_events: false,
            cache_minutes: default_cache_minutes(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            timezone: None,
        }
    }
}

impl WidgetConfig {
    pub fn with_feed_url(feed_url: &str) -> Self {
        WidgetConfig {
            feed_url: Some(feed_url.to_string()),
            ..Self::default()
        }
    }

    pub fn config_path() -> ClubCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                ClubCalError::Configuration("Could not determine config directory".into())
            })?
            .join("clubcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path` (or the default location) layered under the environment.
    pub fn load(path: Option<&Path>) -> ClubCalResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        Self::load_from(&path, env_source())
    }

    pub(crate) fn load_from(path: &Path, env: Environment) -> ClubCalResult<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()
            .map_err(|e| ClubCalError::Configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ClubCalError::Configuration(e.to_string()))
    }

    /// Parse a TOML document directly.
    pub fn from_toml(contents: &str) -> ClubCalResult<Self> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .map_err(|e| ClubCalError::Configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ClubCalError::Configuration(e.to_string()))
    }

    /// Check everything a widget needs before it can start.
    pub fn validate(&self) -> ClubCalResult<()> {
        self.feed_url()?;
        self.display_timezone()?;

        if self.cache_minutes < 0 {
            return Err(ClubCalError::Configuration(format!(
                "cache_minutes must not be negative (got {})",
                self.cache_minutes
            )));
        }

        Ok(())
    }

    fn raw_feed_url(&self) -> Option<&str> {
        self.feed_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether a non-blank feed URL is set, valid or not.
    pub fn has_feed_url(&self) -> bool {
        self.raw_feed_url().is_some()
    }

    /// The configured feed URL, checked for shape.
    pub fn feed_url(&self) -> ClubCalResult<url::Url> {
        let raw = self
            .raw_feed_url()
            .ok_or_else(|| ClubCalError::Configuration("No feed URL configured".into()))?;

        let parsed = url::Url::parse(raw)
            .map_err(|e| ClubCalError::Configuration(format!("Invalid feed URL '{raw}': {e}")))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ClubCalError::Configuration(format!(
                "Unsupported feed URL scheme '{other}'"
            ))),
        }
    }

    pub fn display_timezone(&self) -> ClubCalResult<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>().map_err(|_| {
                    ClubCalError::Configuration(format!("Unknown timezone '{name}'"))
                })
            })
            .transpose()
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::minutes(self.cache_minutes.max(0))
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn facet_enabled(&self, facet: Facet) -> bool {
        self.facets.get(&facet).is_none_or(|s| s.enabled)
    }

    pub fn facet_label(&self, facet: Facet) -> String {
        self.facets
            .get(&facet)
            .and_then(|s| s.label.clone())
            .unwrap_or_else(|| facet.label().to_string())
    }

    // Keys may come back lowercased from the environment, so ids match loosely.
    fn quick_filter_settings(&self, id: &str) -> Option<&QuickFilterSettings> {
        self.quick_filters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, settings)| settings)
    }

    pub fn quick_filter_enabled(&self, quick: &QuickFilter) -> bool {
        self.quick_filter_settings(quick.id).is_none_or(|s| s.enabled)
    }

    pub fn quick_filter_label(&self, quick: &QuickFilter) -> String {
        self.quick_filter_settings(quick.id)
            .and_then(|s| s.label.clone())
            .unwrap_or_else(|| quick.label.to_string())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ClubCalResult<()> {
        let contents = format!(
            "\
# clubcal configuration

# URL of the events feed (required):
# feed_url = \"https://example.org/newcomers/events.json\"

# title = \"{DEFAULT_TITLE}\"
# container = \"{DEFAULT_CONTAINER}\"
# theme = \"{DEFAULT_THEME}\"

# month, week or list:
# default_view = \"month\"

# popup, link or both:
# click_behavior = \"popup\"

# show_past_events = false
# cache_minutes = {DEFAULT_CACHE_MINUTES}
# fetch_timeout_secs = {DEFAULT_FETCH_TIMEOUT_SECS}

# Timezone for time-of-day and dates (defaults to each event's own offset):
# timezone = \"America/Los_Angeles\"

# [facets.committee]
# enabled = false

# [facets.interest_area]
# label = \"Activity\"

# [quick_filters.weekend]
# enabled = false
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
