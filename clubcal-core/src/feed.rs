//! The events feed document.
//!
//! The sync job publishes `{"events": [...], "_generated": ..., ...}`. Each
//! element of `events` is decoded on its own so that one malformed record is
//! dropped instead of failing the batch.

use serde::Deserialize;

use crate::error::{ClubCalError, ClubCalResult};
use crate::event::Event;
use crate::serde_helpers::{null_as_default, ok_or_none};

/// Sync metadata carried alongside the events. Fields of an unexpected
/// type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedMetadata {
    #[serde(rename = "_generated", default, deserialize_with = "ok_or_none")]
    pub generated: Option<String>,

    #[serde(rename = "_orgId", default, deserialize_with = "ok_or_none")]
    pub org_id: Option<String>,

    #[serde(rename = "eventCount", default, deserialize_with = "ok_or_none")]
    pub event_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<serde_json::Value>,

    #[serde(flatten)]
    metadata: FeedMetadata,
}

/// A decoded feed.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub events: Vec<Event>,
    pub metadata: FeedMetadata,
    /// Records that could not be decoded.
    pub skipped: usize,
}

impl Feed {
    /// Parse a feed body. Fails only when the body is not a JSON object.
    pub fn parse(body: &str) -> ClubCalResult<Self> {
        let raw: RawFeed = serde_json::from_str(body)
            .map_err(|e| ClubCalError::Fetch(format!("Invalid feed JSON: {e}")))?;

        let mut events = Vec::with_capacity(raw.events.len());
        let mut skipped = 0;

        for (index, value) in raw.events.into_iter().enumerate() {
            match serde_json::from_value::<Event>(value) {
                Ok(event) => events.push(event),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("skipping malformed event at index {index}: {e}");
                }
            }
        }

        if let Some(expected) = raw.metadata.event_count {
            if expected as usize != events.len() + skipped {
                tracing::debug!(
                    "feed declares {expected} events but contains {}",
                    events.len() + skipped
                );
            }
        }

        Ok(Feed {
            events,
            metadata: raw.metadata,
            skipped,
        })
    }
}
