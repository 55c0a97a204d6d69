/// Minutes a fetched feed stays fresh before the next fetch hits the network.
pub const DEFAULT_CACHE_MINUTES: i64 = 5;

/// Upper bound on a single feed request.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// A colon at or beyond this character offset is part of the title, not a committee separator.
pub const COMMITTEE_COLON_LIMIT: usize = 30;

/// Committee shown for events that carry neither a tag nor a prefix.
pub const FALLBACK_COMMITTEE: &str = "General";

/// Events with this many spots or fewer (but more than zero) are styled as limited.
pub const LIMITED_SPOTS_THRESHOLD: i64 = 5;

/// Days shown on either side of today when no range is given.
pub const DEFAULT_RANGE_DAYS: i64 = 30;
