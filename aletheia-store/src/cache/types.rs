//! Report and scope types for cache maintenance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which cache domains a reload pass covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadScope {
    All,
    Queries,
    Embeddings,
}

impl ReloadScope {
    pub fn includes_queries(&self) -> bool {
        matches!(self, ReloadScope::All | ReloadScope::Queries)
    }

    pub fn includes_embeddings(&self) -> bool {
        matches!(self, ReloadScope::All | ReloadScope::Embeddings)
    }
}

impl fmt::Display for ReloadScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadScope::All => write!(f, "all"),
            ReloadScope::Queries => write!(f, "queries"),
            ReloadScope::Embeddings => write!(f, "embeddings"),
        }
    }
}

impl FromStr for ReloadScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ReloadScope::All),
            "queries" => Ok(ReloadScope::Queries),
            "embeddings" => Ok(ReloadScope::Embeddings),
            other => Err(format!("unknown cache scope: {}", other)),
        }
    }
}

/// Aggregate counters over one cache domain, computed in a single pass
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheStats {
    /// Entries in the domain, regardless of status
    pub entries: usize,

    /// Entries currently servable
    pub verified: usize,

    /// Sum of `access_count` across the domain
    pub total_hits: u64,

    /// Mean `confidence_score`; 0 for an empty domain
    pub avg_confidence: f64,
}

/// Outcome of one maintenance pass
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReloadReport {
    /// Query entries meeting the access threshold
    pub reloaded_queries: usize,

    /// Embedding entries meeting the access threshold
    pub reloaded_embeddings: usize,

    /// Stale unused entries hard-deleted across both domains
    pub cleaned_count: u64,
}
