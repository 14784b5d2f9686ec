use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::store::VisitorStore;

struct Entry {
    members: HashSet<String>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process [`VisitorStore`] mirroring the Redis set/expiry semantics.
///
/// Expired keys are dropped lazily on the next access. Time is read from
/// `tokio::time`, so tests running with a paused clock can step past
/// expiry deterministically.
#[derive(Default)]
pub struct MemoryVisitorStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryVisitorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, key: &str, now: Instant) {
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
    }
}

#[async_trait]
impl VisitorStore for MemoryVisitorStore {
    async fn add_member(&self, key: &str, member: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        Self::purge_expired(&mut entries, key, Instant::now());
        entries
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                members: HashSet::new(),
                expires_at: None,
            })
            .members
            .insert(member.to_string());
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        Self::purge_expired(&mut entries, key, now);
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(now + ttl);
        }
        Ok(())
    }

    async fn cardinality(&self, key: &str) -> anyhow::Result<u64> {
        let mut entries = self.entries.lock().await;
        Self::purge_expired(&mut entries, key, Instant::now());
        Ok(entries
            .get(key)
            .map(|e| e.members.len() as u64)
            .unwrap_or(0))
    }

    async fn time_to_live(&self, key: &str) -> anyhow::Result<Option<Duration>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        Self::purge_expired(&mut entries, key, now);
        Ok(entries
            .get(key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
