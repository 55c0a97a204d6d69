//! Time-boxed in-memory cache for the last fetched feed.
//!
//! Callers pass the current time in, so expiry does not depend on the wall
//! clock during tests.

use chrono::{DateTime, Duration, Utc};

use crate::event::Event;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub events: Vec<Event>,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct EventCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl EventCache {
    pub fn new(ttl: Duration) -> Self {
        EventCache { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached events, unless missing or expired at `now`.
    pub fn get(&self, now: DateTime<Utc>) -> Option<&[Event]> {
        self.entry
            .as_ref()
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.events.as_slice())
    }

    /// Store `events`, valid until `now + ttl`. Replaces any previous entry.
    pub fn store(&mut self, events: Vec<Event>, now: DateTime<Utc>) {
        self.entry = Some(CacheEntry {
            events,
            fetched_at: now,
            expires_at: now + self.ttl,
        });
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    fn events() -> Vec<Event> {
        vec![Event::new(1, "Coffee", "2025-03-21T09:00:00Z", "")]
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = EventCache::new(Duration::minutes(5));
        assert!(cache.get(t0()).is_none());
    }

    #[test]
    fn test_hit_until_expiry() {
        let mut cache = EventCache::new(Duration::minutes(5));
        cache.store(events(), t0());

        assert_eq!(cache.get(t0()).map(|e| e.len()), Some(1));
        assert!(cache.get(t0() + Duration::minutes(4)).is_some());
        assert!(cache.get(t0() + Duration::minutes(5)).is_none());
        assert_eq!(cache.entry().unwrap().expires_at, t0() + Duration::minutes(5));
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let mut cache = EventCache::new(Duration::zero());
        cache.store(events(), t0());
        assert!(cache.get(t0()).is_none());
    }

    #[test]
    fn test_clear() {
        let mut cache = EventCache::new(Duration::minutes(5));
        cache.store(events(), t0());
        cache.clear();
        assert!(cache.get(t0()).is_none());
        assert!(cache.entry().is_none());
    }
}
