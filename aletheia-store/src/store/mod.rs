//! The keyed record-store capability
//!
//! Every routine in this system (resolution pipeline, cache maintainer,
//! agent lifecycle manager) receives the store as an injected trait object
//! rather than reaching for a process-wide singleton, so each can be tested
//! against an in-memory fake. The contract is typed upsert/select/update/
//! delete over the three record collections plus the atomic hit increment
//! used on the cache-hit path.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::agents::record::{ActivityState, AgentRecord, AgentUpdate, AuditEntry};
use crate::cache::entry::{CacheDomain, CacheEntry, ConfidenceRecord};
use crate::cache::types::CacheStats;
use crate::error::Result;

/// Store capability shared by the pipeline and the batch routines.
///
/// Implementations must make each method atomic with respect to the records
/// it touches; in particular `record_hit` may not be a read-modify-write
/// race, concurrent hits on the same fingerprint must all land.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new cache entry. Fails with `DuplicateKey` if the fingerprint
    /// already exists in the domain; entries are immutable once created.
    async fn insert_entry(&self, entry: CacheEntry) -> Result<()>;

    /// Look up a servable entry by fingerprint.
    ///
    /// Only `Verified` entries are returned, and the stored query text must
    /// match `query_text` exactly: a colliding fingerprint with different
    /// text is treated as a miss rather than silently serving a wrong answer.
    async fn find_verified(
        &self,
        domain: CacheDomain,
        query_hash: &str,
        query_text: &str,
    ) -> Result<Option<CacheEntry>>;

    /// Atomically increment the entry's access count and refresh its
    /// last-accessed time.
    async fn record_hit(&self, domain: CacheDomain, query_hash: &str) -> Result<()>;

    /// Count entries with `access_count >= min_access_count` (observational)
    async fn count_with_min_access(
        &self,
        domain: CacheDomain,
        min_access_count: u64,
    ) -> Result<usize>;

    /// Hard-delete entries across both domains with zero accesses created
    /// before `cutoff`. Returns the number deleted.
    async fn evict_unused_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Aggregate counters over one cache domain
    async fn cache_stats(&self, domain: CacheDomain) -> Result<CacheStats>;

    /// Insert the confidence record produced alongside a cache entry
    async fn insert_confidence(&self, record: ConfidenceRecord) -> Result<()>;

    /// Most recent confidence records, newest first
    async fn recent_confidence(&self, limit: usize) -> Result<Vec<ConfidenceRecord>>;

    async fn get_agent(&self, agent_id: &str) -> Result<Option<AgentRecord>>;

    /// Insert or replace an agent record by `agent_id`
    async fn upsert_agent(&self, record: AgentRecord) -> Result<()>;

    /// Agents in `state` whose `last_active_at` and `state_changed_at` both
    /// precede `cutoff`
    async fn agents_inactive_since(
        &self,
        state: ActivityState,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<AgentRecord>>;

    /// Apply a partial update to one agent record atomically
    async fn update_agent(&self, agent_id: &str, update: AgentUpdate) -> Result<()>;

    async fn all_agents(&self) -> Result<Vec<AgentRecord>>;

    async fn append_audit(&self, entry: AuditEntry) -> Result<()>;

    /// Most recent audit entries, newest first
    async fn recent_audits(&self, limit: usize) -> Result<Vec<AuditEntry>>;
}
