//! In-memory store implementation
//!
//! Backs every collection with a `HashMap` behind a single async `RwLock`.
//! Each trait method takes the lock once and performs its whole read or
//! mutation inside it, which is what makes the per-record updates atomic:
//! concurrent `record_hit` calls on the same fingerprint serialize on the
//! write lock and none of the increments are lost.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::agents::record::{ActivityState, AgentRecord, AgentUpdate, AuditEntry};
use crate::cache::entry::{CacheDomain, CacheEntry, ConfidenceRecord, VerificationStatus};
use crate::cache::types::CacheStats;
use crate::error::{Result, StoreError};
use crate::store::RecordStore;

/// Internal collections guarded by the store lock
#[derive(Default)]
struct Collections {
    entries: HashMap<(CacheDomain, String), CacheEntry>,
    confidence: HashMap<String, ConfidenceRecord>,
    agents: HashMap<String, AgentRecord>,
    audits: Vec<AuditEntry>,
}

/// In-memory [`RecordStore`] implementation
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries in one cache domain, regardless of status
    pub async fn entry_count(&self, domain: CacheDomain) -> usize {
        let inner = self.inner.read().await;
        inner.entries.keys().filter(|(d, _)| *d == domain).count()
    }

    /// Fetch an entry without touching its access counters
    pub async fn peek_entry(&self, domain: CacheDomain, query_hash: &str) -> Option<CacheEntry> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(&(domain, query_hash.to_string()))
            .cloned()
    }

    /// Fetch a confidence record by fingerprint
    pub async fn peek_confidence(&self, query_hash: &str) -> Option<ConfidenceRecord> {
        let inner = self.inner.read().await;
        inner.confidence.get(query_hash).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_entry(&self, entry: CacheEntry) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = (entry.domain, entry.query_hash.clone());
        if inner.entries.contains_key(&key) {
            return Err(StoreError::DuplicateKey(entry.query_hash));
        }
        debug!("inserting cache entry: {}:{}", entry.domain, entry.query_hash);
        inner.entries.insert(key, entry);
        Ok(())
    }

    async fn find_verified(
        &self,
        domain: CacheDomain,
        query_hash: &str,
        query_text: &str,
    ) -> Result<Option<CacheEntry>> {
        let inner = self.inner.read().await;
        let entry = match inner.entries.get(&(domain, query_hash.to_string())) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        if entry.verification_status != VerificationStatus::Verified {
            return Ok(None);
        }

        if entry.query_text != query_text {
            // Fingerprint collision with different text; serve nothing
            warn!(
                "fingerprint collision detected for {}: stored text differs",
                query_hash
            );
            return Ok(None);
        }

        Ok(Some(entry.clone()))
    }

    async fn record_hit(&self, domain: CacheDomain, query_hash: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .entries
            .get_mut(&(domain, query_hash.to_string()))
            .ok_or_else(|| StoreError::NotFound(query_hash.to_string()))?;
        entry.mark_accessed();
        Ok(())
    }

    async fn count_with_min_access(
        &self,
        domain: CacheDomain,
        min_access_count: u64,
    ) -> Result<usize> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .filter(|((d, _), entry)| *d == domain && entry.access_count >= min_access_count)
            .count())
    }

    async fn evict_unused_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_evictable(cutoff));
        let evicted = (before - inner.entries.len()) as u64;
        if evicted > 0 {
            debug!("evicted {} stale cache entries", evicted);
        }
        Ok(evicted)
    }

    async fn cache_stats(&self, domain: CacheDomain) -> Result<CacheStats> {
        let inner = self.inner.read().await;
        let mut stats = CacheStats::default();
        let mut confidence_sum = 0.0;
        for entry in inner
            .entries
            .iter()
            .filter(|((d, _), _)| *d == domain)
            .map(|(_, entry)| entry)
        {
            stats.entries += 1;
            stats.total_hits += entry.access_count;
            confidence_sum += entry.confidence_score;
            if entry.verification_status == VerificationStatus::Verified {
                stats.verified += 1;
            }
        }
        stats.avg_confidence = confidence_sum / stats.entries.max(1) as f64;
        Ok(stats)
    }

    async fn insert_confidence(&self, record: ConfidenceRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.confidence.contains_key(&record.query_hash) {
            return Err(StoreError::DuplicateKey(record.query_hash));
        }
        inner.confidence.insert(record.query_hash.clone(), record);
        Ok(())
    }

    async fn recent_confidence(&self, limit: usize) -> Result<Vec<ConfidenceRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<_> = inner.confidence.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Option<AgentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.agents.get(agent_id).cloned())
    }

    async fn upsert_agent(&self, record: AgentRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.agents.insert(record.agent_id.clone(), record);
        Ok(())
    }

    async fn agents_inactive_since(
        &self,
        state: ActivityState,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<AgentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .agents
            .values()
            .filter(|a| {
                a.activity_state == state
                    && a.last_active_at < cutoff
                    && a.state_changed_at < cutoff
            })
            .cloned()
            .collect())
    }

    async fn update_agent(&self, agent_id: &str, update: AgentUpdate) -> Result<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .agents
            .get_mut(agent_id)
            .ok_or_else(|| StoreError::NotFound(agent_id.to_string()))?;
        update.apply(record);
        Ok(())
    }

    async fn all_agents(&self) -> Result<Vec<AgentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.agents.values().cloned().collect())
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.audits.push(entry);
        Ok(())
    }

    async fn recent_audits(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.audits.iter().rev().take(limit).cloned().collect())
    }
}
