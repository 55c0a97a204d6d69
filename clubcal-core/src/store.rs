//! Event store: fetches the feed over HTTP behind a time-boxed cache.

use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::cache::EventCache;
use crate::config::WidgetConfig;
use crate::error::{ClubCalError, ClubCalResult};
use crate::event::Event;
use crate::feed::{Feed, FeedMetadata};

pub struct EventStore {
    feed_url: Option<Url>,
    client: reqwest::Client,
    timeout: std::time::Duration,
    cache: EventCache,
    metadata: FeedMetadata,
}

impl EventStore {
    pub fn new(
        feed_url: Option<Url>,
        cache_ttl: Duration,
        timeout: std::time::Duration,
    ) -> ClubCalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClubCalError::Fetch(format!("Failed to build HTTP client: {e}")))?;

        Ok(EventStore {
            feed_url,
            client,
            timeout,
            cache: EventCache::new(cache_ttl),
            metadata: FeedMetadata::default(),
        })
    }

    /// Build a store from config. A missing feed URL is accepted here and
    /// reported by the first fetch; a malformed one is rejected now.
    pub fn from_config(config: &WidgetConfig) -> ClubCalResult<Self> {
        let feed_url = if config.has_feed_url() {
            Some(config.feed_url()?)
        } else {
            None
        };

        Self::new(feed_url, config.cache_duration(), config.fetch_timeout())
    }

    pub fn feed_url(&self) -> Option<&Url> {
        self.feed_url.as_ref()
    }

    /// Metadata of the last fetched feed.
    pub fn metadata(&self) -> &FeedMetadata {
        &self.metadata
    }

    pub fn cache(&self) -> &EventCache {
        &self.cache
    }

    /// Events from cache if fresh, otherwise from the feed.
    pub async fn fetch_events(&mut self) -> ClubCalResult<Vec<Event>> {
        self.fetch_events_at(Utc::now()).await
    }

    /// Drop the cache entry and fetch from the feed regardless of expiry.
    pub async fn refresh(&mut self) -> ClubCalResult<Vec<Event>> {
        tracing::debug!("clearing event cache for manual refresh");
        self.cache.clear();
        self.fetch_events().await
    }

    pub async fn fetch_events_at(&mut self, now: DateTime<Utc>) -> ClubCalResult<Vec<Event>> {
        let url = self
            .feed_url
            .clone()
            .ok_or_else(|| ClubCalError::Configuration("No feed URL configured".into()))?;

        if let Some(events) = self.cache.get(now) {
            tracing::debug!("serving {} events from cache", events.len());
            return Ok(events.to_vec());
        }

        tracing::debug!("cache miss, fetching {url}");
        let feed = self.fetch_remote(&url).await?;

        tracing::info!(
            "fetched {} events from {url} ({} skipped)",
            feed.events.len(),
            feed.skipped
        );

        self.metadata = feed.metadata;
        self.cache.store(feed.events.clone(), now);

        Ok(feed.events)
    }

    async fn fetch_remote(&self, url: &Url) -> ClubCalResult<Feed> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("feed request failed: {e}");
                if e.is_timeout() {
                    ClubCalError::Fetch(format!(
                        "Request to {url} timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    ClubCalError::Fetch(format!("Request to {url} failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("feed returned HTTP {status}");
            return Err(ClubCalError::Fetch(format!("HTTP {status} from {url}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClubCalError::Fetch(format!("Failed to read response body: {e}")))?;

        Feed::parse(&body)
    }
}
