// End-to-end widget tests against a mock feed server.
use chrono::{TimeZone, Utc};
use clubcal_core::config::WidgetConfig;
use clubcal_core::date_range::DateRange;
use clubcal_core::taxonomy::Facet;
use clubcal_core::{DisplayState, Widget};
use mockito::Server;

const FEED: &str = r#"{
    "events": [
        {"id": 1, "name": "Hiking: Morning Loop", "start": "2025-03-20T08:00:00-07:00",
         "end": "2025-03-20T10:00:00-07:00", "tags": ["cost:free", "time:morning"]},
        {"id": 2, "name": "Wine: Tasting", "start": "2025-03-20T18:00:00-07:00",
         "end": "2025-03-20T20:00:00-07:00", "tags": ["cost:under-50", "time:evening"],
         "spotsAvailable": 3},
        {"id": 3, "name": "Dining: Supper Club", "start": "2025-03-21T18:30:00-07:00",
         "end": "2025-03-21T21:00:00-07:00", "tags": ["cost:free"], "isFull": true},
        {"name": "Broken record without id"}
    ]
}"#;

async fn widget_for(server: &Server) -> Widget {
    let mut config = WidgetConfig::with_feed_url(&format!("{}/events.json", server.url()));
    config.show_past_events = true;
    Widget::new(config).unwrap()
}

fn ids(widget: &Widget) -> Vec<i64> {
    widget.filtered_events().iter().map(|e| e.id).collect()
}

#[tokio::test]
async fn test_cost_and_has_openings_scenario() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events.json")
        .with_status(200)
        .with_body(FEED)
        .create_async()
        .await;

    let mut widget = widget_for(&server).await;
    widget.load().await.unwrap();

    assert_eq!(widget.display_state(), DisplayState::Ready);
    assert_eq!(widget.total_count(), 3);

    widget.set_facet(Facet::Cost, Some("free"));
    assert_eq!(ids(&widget), vec![1, 3]);

    widget.toggle_quick_filter("hasOpenings");
    assert_eq!(ids(&widget), vec![1]);
    assert_eq!(widget.filtered_count(), 1);

    let items = widget.event_source(&DateRange::unbounded());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].class_names, vec!["time-morning"]);
}

#[tokio::test]
async fn test_failed_load_then_manual_refresh() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", "/events.json")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let mut widget = widget_for(&server).await;
    assert!(widget.load().await.is_err());
    assert!(matches!(widget.display_state(), DisplayState::FeedError(_)));
    failing.assert_async().await;
    failing.remove_async().await;

    let ok = server
        .mock("GET", "/events.json")
        .with_status(200)
        .with_body(FEED)
        .expect(1)
        .create_async()
        .await;

    widget.refresh().await.unwrap();
    assert_eq!(widget.display_state(), DisplayState::Ready);
    assert_eq!(widget.total_count(), 3);
    ok.assert_async().await;
}

#[tokio::test]
async fn test_repeated_load_uses_cache() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/events.json")
        .with_status(200)
        .with_body(FEED)
        .expect(1)
        .create_async()
        .await;

    let mut widget = widget_for(&server).await;
    widget.load().await.unwrap();
    widget.load().await.unwrap();

    assert_eq!(widget.total_count(), 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_past_events_hidden_by_default() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events.json")
        .with_status(200)
        .with_body(FEED)
        .create_async()
        .await;

    let config = WidgetConfig::with_feed_url(&format!("{}/events.json", server.url()));
    let mut widget = Widget::new(config).unwrap();
    widget.load().await.unwrap();

    let now = Utc.with_ymd_and_hms(2025, 3, 21, 12, 0, 0).unwrap();
    let items = widget.event_source_at(&DateRange::unbounded(), now);
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3]);
}
