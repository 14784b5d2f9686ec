use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::info;

use snuggle_core::VisitorStore;

/// Redis-backed [`VisitorStore`].
///
/// Holds a single [`ConnectionManager`]: one multiplexed connection that
/// reconnects on failure. Cloning the manager is cheap and every command
/// works on its own clone, so the store can be shared across handlers
/// without a lock.
///
/// Key layout: `snuggle:visitors:<YYYY-MM-DD>` → SET of identifiers,
/// TTL 48h from the last write.
#[derive(Clone)]
pub struct RedisVisitorStore {
    conn: ConnectionManager,
}

impl RedisVisitorStore {
    /// Connect to the Redis server at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).with_context(|| format!("invalid redis url {url}"))?;
        let conn = client
            .get_connection_manager()
            .await
            .context("failed to connect to redis")?;
        info!("Redis connection manager ready");
        Ok(Self { conn })
    }

    /// Connection handle for tests that need raw commands (cleanup, TTL checks).
    pub fn conn_for_test(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl VisitorStore for RedisVisitorStore {
    async fn add_member(&self, key: &str, member: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.sadd(key, member).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let seconds = i64::try_from(ttl.as_secs()).context("ttl out of range")?;
        let _: i64 = conn.expire(key, seconds).await?;
        Ok(())
    }

    async fn cardinality(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.scard(key).await?;
        Ok(count)
    }

    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>> {
        let mut conn = self.conn.clone();
        // TTL replies -2 for a missing key and -1 for a key without expiry.
        let seconds: i64 = conn.ttl(key).await?;
        Ok(u64::try_from(seconds).ok().map(Duration::from_secs))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
