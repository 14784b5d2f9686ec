//! Dedup store abstraction.

use std::time::Duration;

use async_trait::async_trait;

/// Set-valued key/value store with per-key expiry.
///
/// Production uses Redis (`snuggle-redis`); tests and local runs use
/// [`MemoryVisitorStore`](crate::memory::MemoryVisitorStore). Individual
/// operations must be atomic at the store level, but nothing here makes two
/// consecutive calls atomic with respect to each other.
#[async_trait]
pub trait VisitorStore: Send + Sync + 'static {
    /// Add `member` to the set at `key`, creating the key if needed.
    /// Re-adding an existing member is a no-op.
    async fn add_member(&self, key: &str, member: &str) -> anyhow::Result<()>;

    /// Set the key's time-to-live to `ttl` from now, replacing any
    /// previous expiry. A missing key is left untouched.
    async fn expire(&self, key: &str, ttl: Duration) -> anyhow::Result<()>;

    /// Number of members in the set at `key`, `0` when the key is absent.
    async fn cardinality(&self, key: &str) -> anyhow::Result<u64>;

    /// Remaining time-to-live.
    ///
    /// Returns `Ok(None)` when the key does not exist or carries no expiry.
    async fn time_to_live(&self, key: &str) -> anyhow::Result<Option<Duration>>;

    async fn ping(&self) -> anyhow::Result<()>;
}
