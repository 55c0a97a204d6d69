//! One calendar widget instance.
//!
//! A [`Widget`] owns its configuration, event store, filter state and popup
//! state. Instances share nothing, so a host can run several side by side.
//! Every mutating operation takes `&mut self`: a second refresh cannot start
//! while the first is still awaiting the network, so refreshes on one
//! instance are serialized and the later one's result is what remains.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::{ClickBehavior, WidgetConfig};
use crate::date_range::DateRange;
use crate::details::EventDetails;
use crate::error::{ClubCalError, ClubCalResult};
use crate::event::Event;
use crate::feed::FeedMetadata;
use crate::filter::{FilterChip, FilterState, filter};
use crate::store::EventStore;
use crate::taxonomy::{Facet, FacetOption, QUICK_FILTERS, committee_options};
use crate::transform::{CalendarItem, transform};

/// What the host should show in place of (or over) the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum DisplayState {
    Loading,
    Ready,
    FeedError(String),
    RendererUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FeedStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Result of a click on an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickAction {
    Popup { details: EventDetails },
    Link { url: String },
    Both { details: EventDetails, url: String },
}

/// An enabled facet dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetView {
    pub facet: Facet,
    pub label: String,
    pub options: Vec<FacetOption>,
    pub selected: Option<String>,
}

/// An enabled quick-filter toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickFilterView {
    pub id: &'static str,
    pub label: String,
    pub active: bool,
}

pub struct Widget {
    config: WidgetConfig,
    tz: Option<Tz>,
    store: EventStore,
    events: Vec<Event>,
    filters: FilterState,
    status: FeedStatus,
    renderer_error: Option<String>,
    open_popup: Option<i64>,
}

impl Widget {
    /// Initialize a widget. Fails with a configuration error when the feed
    /// URL is missing or any setting is invalid.
    pub fn new(config: WidgetConfig) -> ClubCalResult<Self> {
        config.validate()?;

        let tz = config.display_timezone()?;
        let store = EventStore::from_config(&config)?;

        Ok(Widget {
            config,
            tz,
            store,
            events: Vec::new(),
            filters: FilterState::new(),
            status: FeedStatus::Loading,
            renderer_error: None,
            open_popup: None,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.tz
    }

    pub fn metadata(&self) -> &FeedMetadata {
        self.store.metadata()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load events, using the cache when it is still fresh.
    pub async fn load(&mut self) -> ClubCalResult<()> {
        self.status = FeedStatus::Loading;
        let result = self.store.fetch_events().await;
        self.apply_fetch(result)
    }

    /// Bypass the cache and reload from the feed.
    pub async fn refresh(&mut self) -> ClubCalResult<()> {
        self.status = FeedStatus::Loading;
        let result = self.store.refresh().await;
        self.apply_fetch(result)
    }

    fn apply_fetch(&mut self, result: ClubCalResult<Vec<Event>>) -> ClubCalResult<()> {
        match result {
            Ok(events) => {
                self.events = events;
                self.status = FeedStatus::Ready;

                if let Some(id) = self.open_popup {
                    if self.find(id).is_none() {
                        self.open_popup = None;
                    }
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load events: {e}");
                self.status = FeedStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Record that the calendar renderer could not be loaded.
    pub fn renderer_failed(&mut self, reason: &str) -> ClubCalError {
        tracing::warn!("calendar renderer unavailable: {reason}");
        self.renderer_error = Some(reason.to_string());
        ClubCalError::RendererUnavailable(reason.to_string())
    }

    /// Renderer failures take precedence: without a renderer there is
    /// nothing to show feed state on.
    pub fn display_state(&self) -> DisplayState {
        if let Some(reason) = &self.renderer_error {
            return DisplayState::RendererUnavailable(reason.clone());
        }

        match &self.status {
            FeedStatus::Loading => DisplayState::Loading,
            FeedStatus::Ready => DisplayState::Ready,
            FeedStatus::Failed(message) => DisplayState::FeedError(message.clone()),
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_facet(&mut self, facet: Facet, value: Option<&str>) {
        self.filters.set(facet, value);
    }

    pub fn toggle_quick_filter(&mut self, id: &str) -> bool {
        self.filters.toggle_quick_filter(id)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        self.filters.chips()
    }

    pub fn remove_chip(&mut self, chip: &FilterChip) {
        self.filters.remove_chip(chip);
    }

    /// Enabled facets with their effective labels and options.
    pub fn facets(&self) -> Vec<FacetView> {
        Facet::ALL
            .into_iter()
            .filter(|f| self.config.facet_enabled(*f))
            .map(|facet| FacetView {
                facet,
                label: self.config.facet_label(facet),
                options: self.facet_options(facet),
                selected: self.filters.get(facet).map(str::to_string),
            })
            .collect()
    }

    pub fn facet_options(&self, facet: Facet) -> Vec<FacetOption> {
        match facet {
            Facet::Committee => committee_options(&self.events),
            _ => facet.static_options(),
        }
    }

    pub fn quick_filters(&self) -> Vec<QuickFilterView> {
        QUICK_FILTERS
            .iter()
            .filter(|q| self.config.quick_filter_enabled(q))
            .map(|q| QuickFilterView {
                id: q.id,
                label: self.config.quick_filter_label(q),
                active: self.filters.quick_filters.contains(q.id),
            })
            .collect()
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn total_count(&self) -> usize {
        self.events.len()
    }

    pub fn filtered_events(&self) -> Vec<Event> {
        filter(&self.events, &self.filters, self.tz)
    }

    pub fn filtered_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| self.filters.matches(e, self.tz))
            .count()
    }

    /// Calendar items for the renderer's visible range.
    pub fn event_source(&self, range: &DateRange) -> Vec<CalendarItem> {
        self.event_source_at(range, Utc::now())
    }

    /// Like [`Widget::event_source`], with past events judged against `now`.
    pub fn event_source_at(&self, range: &DateRange, now: DateTime<Utc>) -> Vec<CalendarItem> {
        let mut range = *range;
        if !self.config.show_past_events {
            range.from = Some(range.from.map_or(now, |from| from.max(now)));
        }

        let visible: Vec<Event> = self
            .filtered_events()
            .into_iter()
            .filter(|e| range.overlaps(e, self.tz))
            .collect();

        transform(&visible, self.tz)
    }

    fn find(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn details(&self, id: i64) -> ClubCalResult<EventDetails> {
        self.find(id)
            .map(|e| EventDetails::from_event(e, self.tz))
            .ok_or(ClubCalError::EventNotFound(id))
    }

    // =========================================================================
    // Clicks & popup
    // =========================================================================

    /// React to a click on event `id` according to the click behavior.
    /// Link clicks on events without a URL open the popup instead.
    pub fn handle_click(&mut self, id: i64) -> ClubCalResult<ClickAction> {
        let details = self.details(id)?;
        let url = details.url.clone();

        let action = match (self.config.click_behavior, url) {
            (ClickBehavior::Link, Some(url)) => ClickAction::Link { url },
            (ClickBehavior::Both, Some(url)) => ClickAction::Both { details, url },
            _ => ClickAction::Popup { details },
        };

        if !matches!(action, ClickAction::Link { .. }) {
            self.open_popup = Some(id);
        }

        Ok(action)
    }

    pub fn open_popup(&self) -> Option<EventDetails> {
        self.open_popup.and_then(|id| self.details(id).ok())
    }

    /// Close the popup if one is open. Returns whether anything was closed.
    pub fn close_popup(&mut self) -> bool {
        self.open_popup.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: i64, name: &str, start: &str, tags: &[&str]) -> Event {
        let mut event = Event::new(id, name, start, "");
        event.tags = tags.iter().map(|t| t.to_string()).collect();
        event
    }

    fn loaded(config: WidgetConfig, events: Vec<Event>) -> Widget {
        let mut widget = Widget::new(config).unwrap();
        widget.apply_fetch(Ok(events)).unwrap();
        widget
    }

    fn config() -> WidgetConfig {
        WidgetConfig::with_feed_url("https://example.org/events.json")
    }

    fn sample() -> Vec<Event> {
        let mut limited = event(
            2,
            "Wine: Tasting",
            "2025-03-20T18:00:00-07:00",
            &["cost:under-50", "time:evening"],
        );
        limited.spots_available = Some(3);
        limited.url = Some("https://example.org/event-2".to_string());

        let mut full = event(3, "Dining: Supper Club", "2025-03-21T18:30:00-07:00", &["cost:free"]);
        full.is_full = true;

        vec![
            event(
                1,
                "Hiking: Morning Loop",
                "2025-03-20T08:00:00-07:00",
                &["cost:free", "time:morning"],
            ),
            limited,
            full,
        ]
    }

    fn march_1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_requires_feed_url() {
        let err = Widget::new(WidgetConfig::default()).err().unwrap();
        assert!(matches!(err, ClubCalError::Configuration(_)));
    }

    #[test]
    fn test_starts_loading_with_empty_filters() {
        let widget = Widget::new(config()).unwrap();
        assert_eq!(widget.display_state(), DisplayState::Loading);
        assert!(widget.filter_state().is_empty());
        assert_eq!(widget.total_count(), 0);
    }

    #[test]
    fn test_counts_follow_filters() {
        let mut widget = loaded(config(), sample());
        assert_eq!(widget.display_state(), DisplayState::Ready);
        assert_eq!(widget.total_count(), 3);
        assert_eq!(widget.filtered_count(), 3);

        widget.set_facet(Facet::Cost, Some("free"));
        assert_eq!(widget.filtered_count(), 2);

        widget.toggle_quick_filter("hasOpenings");
        assert_eq!(widget.filtered_count(), 1);
        assert_eq!(widget.filtered_events()[0].id, 1);

        widget.clear_filters();
        assert_eq!(widget.filtered_count(), 3);
        assert_eq!(widget.total_count(), 3);
    }

    #[test]
    fn test_chip_removal_updates_filters() {
        let mut widget = loaded(config(), sample());
        widget.set_facet(Facet::Cost, Some("free"));
        widget.toggle_quick_filter("hasOpenings");

        let chip = widget.chips().into_iter().next().unwrap();
        widget.remove_chip(&chip);

        assert_eq!(widget.filter_state().cost, None);
        assert_eq!(widget.filtered_count(), 2);
    }

    #[test]
    fn test_event_source_hides_past_events() {
        let widget = loaded(config(), sample());
        let range = DateRange::unbounded();

        let now = Utc.with_ymd_and_hms(2025, 3, 21, 12, 0, 0).unwrap();
        let ids: Vec<i64> = widget.event_source_at(&range, now).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3]);

        let ids: Vec<i64> = widget.event_source_at(&range, march_1()).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_all_day_event_today_stays_visible() {
        let widget = loaded(config(), vec![event(1, "Picnic", "2025-03-21", &[])]);
        let range = DateRange::unbounded();

        let midday = Utc.with_ymd_and_hms(2025, 3, 21, 12, 0, 0).unwrap();
        assert_eq!(widget.event_source_at(&range, midday).len(), 1);

        let next_day = Utc.with_ymd_and_hms(2025, 3, 22, 0, 0, 1).unwrap();
        assert!(widget.event_source_at(&range, next_day).is_empty());
    }

    #[test]
    fn test_event_source_shows_past_when_configured() {
        let mut cfg = config();
        cfg.show_past_events = true;
        let widget = loaded(cfg, sample());

        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(widget.event_source_at(&DateRange::unbounded(), now).len(), 3);
    }

    #[test]
    fn test_event_source_applies_range_and_filters() {
        let mut widget = loaded(config(), sample());
        let range = DateRange::new(
            Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 20, 23, 59, 59).unwrap(),
        );

        let ids: Vec<i64> = widget.event_source_at(&range, march_1()).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1]);

        widget.set_facet(Facet::Cost, Some("under-50"));
        let items = widget.event_source_at(&DateRange::unbounded(), march_1());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].class_names, vec!["time-evening", "spots-limited"]);
    }

    #[test]
    fn test_click_popup_and_close() {
        let mut widget = loaded(config(), sample());

        let action = widget.handle_click(1).unwrap();
        let ClickAction::Popup { details } = action else {
            panic!("expected popup, got {action:?}");
        };
        assert_eq!(details.committee, "Hiking");
        assert_eq!(widget.open_popup().map(|d| d.id), Some(1));

        assert!(widget.close_popup());
        assert!(!widget.close_popup());
        assert!(widget.open_popup().is_none());
    }

    #[test]
    fn test_click_link_behavior() {
        let mut cfg = config();
        cfg.click_behavior = ClickBehavior::Link;
        let mut widget = loaded(cfg, sample());

        assert_eq!(
            widget.handle_click(2).unwrap(),
            ClickAction::Link {
                url: "https://example.org/event-2".to_string()
            }
        );
        assert!(widget.open_popup().is_none());

        // No URL: falls back to the popup.
        assert!(matches!(widget.handle_click(1).unwrap(), ClickAction::Popup { .. }));
        assert!(widget.open_popup().is_some());
    }

    #[test]
    fn test_click_both_behavior() {
        let mut cfg = config();
        cfg.click_behavior = ClickBehavior::Both;
        let mut widget = loaded(cfg, sample());

        let action = widget.handle_click(2).unwrap();
        assert!(matches!(action, ClickAction::Both { ref url, .. } if url == "https://example.org/event-2"));
        assert_eq!(widget.open_popup().map(|d| d.id), Some(2));
    }

    #[test]
    fn test_click_unknown_event() {
        let mut widget = loaded(config(), sample());
        assert!(matches!(widget.handle_click(99), Err(ClubCalError::EventNotFound(99))));
    }

    #[test]
    fn test_popup_closes_when_event_disappears() {
        let mut widget = loaded(config(), sample());
        widget.handle_click(3).unwrap();

        widget.apply_fetch(Ok(sample().into_iter().take(2).collect())).unwrap();
        assert!(widget.open_popup().is_none());
    }

    #[test]
    fn test_feed_error_keeps_previous_events() {
        let mut widget = loaded(config(), sample());
        let result = widget.apply_fetch(Err(ClubCalError::Fetch("HTTP 500".into())));

        assert!(result.is_err());
        assert!(matches!(widget.display_state(), DisplayState::FeedError(_)));
        assert_eq!(widget.total_count(), 3);
    }

    #[test]
    fn test_renderer_failure_is_distinct() {
        let mut widget = loaded(config(), sample());
        let err = widget.renderer_failed("script blocked");

        assert!(matches!(err, ClubCalError::RendererUnavailable(_)));
        assert_eq!(
            widget.display_state(),
            DisplayState::RendererUnavailable("script blocked".to_string())
        );
    }

    #[test]
    fn test_facets_respect_overrides() {
        let mut cfg = WidgetConfig::from_toml(
            r#"
            [facets.cost]
            enabled = false

            [facets.interest_area]
            label = "Activity"

            [quick_filters.weekend]
            enabled = false
            "#,
        )
        .unwrap();
        cfg.feed_url = Some("https://example.org/events.json".to_string());
        let mut widget = loaded(cfg, sample());
        widget.toggle_quick_filter("free");

        let facets = widget.facets();
        let ids: Vec<Facet> = facets.iter().map(|f| f.facet).collect();
        assert_eq!(ids, vec![Facet::InterestArea, Facet::Committee, Facet::TimeOfDay]);
        assert_eq!(facets[0].label, "Activity");

        let committees: Vec<&str> = facets[1].options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(committees, vec!["Dining", "Hiking", "Wine"]);

        let quick = widget.quick_filters();
        assert!(quick.iter().all(|q| q.id != "weekend"));
        assert!(quick.iter().any(|q| q.id == "free" && q.active));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = loaded(config(), sample());
        let b = loaded(config(), sample());

        a.set_facet(Facet::Cost, Some("free"));
        assert_eq!(a.filtered_count(), 2);
        assert_eq!(b.filtered_count(), 3);
    }
}
