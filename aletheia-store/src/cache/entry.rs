//! Cache entry and confidence record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which cache a record belongs to.
///
/// The embeddings domain exists only as a maintenance target: its entries are
/// counted and evicted alongside query entries, but nothing in this crate
/// performs similarity search over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheDomain {
    Queries,
    Embeddings,
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheDomain::Queries => write!(f, "queries"),
            CacheDomain::Embeddings => write!(f, "embeddings"),
        }
    }
}

/// Whether a cached answer may be served on future lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Eligible to be served on cache hits
    Verified,
    /// Retained for analysis, never served
    Pending,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Pending => write!(f, "pending"),
        }
    }
}

/// A cached answer for one unique query text.
///
/// `query_text` and `response_text` are fixed at creation; only the access
/// counters mutate afterwards. The entry is keyed by `query_hash` within its
/// domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content fingerprint of `query_text`, primary key within the domain
    pub query_hash: String,

    /// The original query text, kept to detect hash collisions on lookup
    pub query_text: String,

    /// The answer fixed at creation
    pub response_text: String,

    /// Heuristic quality score in [0, 1]
    pub confidence_score: f64,

    /// Gates whether this entry is served on future lookups
    pub verification_status: VerificationStatus,

    /// Incremented on every cache hit
    pub access_count: u64,

    /// Which cache this entry belongs to
    pub domain: CacheDomain,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// Last hit time
    pub last_accessed_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create a new entry with zero accesses, stamped now
    pub fn new(
        domain: CacheDomain,
        query_hash: String,
        query_text: String,
        response_text: String,
        confidence_score: f64,
        verification_status: VerificationStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            query_hash,
            query_text,
            response_text,
            confidence_score,
            verification_status,
            access_count: 0,
            domain,
            created_at: now,
            last_accessed_at: now,
        }
    }

    /// Record a cache hit (updates access count and recency)
    pub fn mark_accessed(&mut self) {
        self.access_count += 1;
        self.last_accessed_at = Utc::now();
    }

    /// Whether the maintainer may hard-delete this entry
    pub fn is_evictable(&self, cutoff: DateTime<Utc>) -> bool {
        self.access_count == 0 && self.created_at < cutoff
    }
}

/// The scoring trail of the pipeline run that produced a cache entry.
///
/// One record per entry, keyed by the same hash. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceRecord {
    /// Hash of the cache entry this record belongs to
    pub query_hash: String,

    /// Score of the first generated answer
    pub initial_score: f64,

    /// Score of the answer that was persisted
    pub final_score: f64,

    /// 0 or 1: at most one re-verification pass
    pub reprompt_count: u32,

    /// `final_score >= threshold`
    pub passed_validation: bool,

    pub created_at: DateTime<Utc>,
}

impl ConfidenceRecord {
    pub fn new(
        query_hash: String,
        initial_score: f64,
        final_score: f64,
        reprompt_count: u32,
        threshold: f64,
    ) -> Self {
        Self {
            query_hash,
            initial_score,
            final_score,
            reprompt_count,
            passed_validation: final_score >= threshold,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_entry() -> CacheEntry {
        CacheEntry::new(
            CacheDomain::Queries,
            "abc123".to_string(),
            "What is metformin?".to_string(),
            "A first-line therapy for type 2 diabetes.".to_string(),
            0.75,
            VerificationStatus::Verified,
        )
    }

    #[test]
    fn test_new_entry_starts_unread() {
        let entry = sample_entry();
        assert_eq!(entry.access_count, 0);
        assert_eq!(entry.created_at, entry.last_accessed_at);
    }

    #[test]
    fn test_mark_accessed() {
        let mut entry = sample_entry();
        entry.mark_accessed();
        entry.mark_accessed();
        assert_eq!(entry.access_count, 2);
        assert!(entry.last_accessed_at >= entry.created_at);
    }

    #[test]
    fn test_evictable_only_when_unread_and_old() {
        let mut entry = sample_entry();
        entry.created_at = Utc::now() - Duration::days(31);
        let cutoff = Utc::now() - Duration::days(30);
        assert!(entry.is_evictable(cutoff));

        // A single hit protects the entry
        entry.mark_accessed();
        assert!(!entry.is_evictable(cutoff));

        // A fresh unread entry is retained
        let fresh = sample_entry();
        assert!(!fresh.is_evictable(cutoff));
    }

    #[test]
    fn test_confidence_record_validation_flag() {
        let passed = ConfidenceRecord::new("h".to_string(), 0.45, 0.7, 1, 0.6);
        assert!(passed.passed_validation);

        let failed = ConfidenceRecord::new("h".to_string(), 0.45, 0.45, 0, 0.6);
        assert!(!failed.passed_validation);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&VerificationStatus::Verified).unwrap();
        assert_eq!(json, "\"verified\"");
        let json = serde_json::to_string(&CacheDomain::Embeddings).unwrap();
        assert_eq!(json, "\"embeddings\"");
    }
}
