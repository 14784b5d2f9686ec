use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};

use crate::store::VisitorStore;

/// Namespace shared by every daily window key.
pub const WINDOW_KEY_PREFIX: &str = "snuggle:visitors:";

/// Window lifetime, counted from the most recent write.
pub const WINDOW_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Identifier used when neither a forwarded address nor a peer address exists.
pub const FALLBACK_IDENTIFIER: &str = "127.0.0.1";

/// Windows follow the UTC+9 calendar day regardless of host time zone.
const WINDOW_UTC_OFFSET_HOURS: i64 = 9;

/// Compute the window key for the UTC+9 calendar day containing `now`.
///
/// `2024-01-01T14:59:59Z` → `snuggle:visitors:2024-01-01`
/// `2024-01-01T15:00:00Z` → `snuggle:visitors:2024-01-02`
pub fn window_key(now: DateTime<Utc>) -> String {
    let local_date = (now + TimeDelta::hours(WINDOW_UTC_OFFSET_HOURS)).date_naive();
    format!("{}{}", WINDOW_KEY_PREFIX, local_date.format("%Y-%m-%d"))
}

/// Pick the visitor identifier for a request.
///
/// Order: first entry of `X-Forwarded-For`, then the socket peer address,
/// then [`FALLBACK_IDENTIFIER`]. The value is not validated as an address.
pub fn resolve_identifier(forwarded_for: Option<&str>, remote_addr: Option<IpAddr>) -> String {
    forwarded_for
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| remote_addr.map(|ip| ip.to_string()))
        .unwrap_or_else(|| FALLBACK_IDENTIFIER.to_string())
}

/// Records visitor identifiers into the current day's window.
#[derive(Clone)]
pub struct VisitorTracker {
    store: Arc<dyn VisitorStore>,
}

impl VisitorTracker {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    pub async fn track(&self, identifier: &str) -> Result<()> {
        self.track_at(identifier, Utc::now()).await
    }

    /// Add `identifier` to the window for `now`, then reset the window's
    /// expiry to [`WINDOW_TTL`].
    ///
    /// The two store calls are not atomic: a failure between them leaves the
    /// member recorded under the previous expiry (or none, on the first
    /// write of the day).
    pub async fn track_at(&self, identifier: &str, now: DateTime<Utc>) -> Result<()> {
        let key = window_key(now);
        self.store.add_member(&key, identifier).await?;
        self.store.expire(&key, WINDOW_TTL).await?;
        Ok(())
    }
}

/// Reports the number of distinct visitors in the current day's window.
#[derive(Clone)]
pub struct VisitorCounter {
    store: Arc<dyn VisitorStore>,
}

impl VisitorCounter {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    pub async fn count(&self) -> Result<u64> {
        self.count_at(Utc::now()).await
    }

    pub async fn count_at(&self, now: DateTime<Utc>) -> Result<u64> {
        self.store.cardinality(&window_key(now)).await
    }
}
