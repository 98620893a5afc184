//! Periodic cache maintenance
//!
//! One pass does two unrelated things, matching the store as it exists:
//! an observational reload that counts entries meeting an access threshold,
//! and an unconditional sweep that hard-deletes entries nobody ever read
//! once they outlive the retention window. The sweep runs regardless of the
//! requested scope or threshold.

use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::entry::CacheDomain;
use crate::cache::types::{ReloadReport, ReloadScope};
use crate::error::Result;
use crate::store::RecordStore;

/// Unused entries older than this are evicted
pub const RETENTION_DAYS: i64 = 30;

/// Upper bound accepted for `min_access_count`
pub const MAX_MIN_ACCESS_COUNT: u64 = 1000;

/// Reloads access statistics and evicts stale unused entries
#[derive(Clone)]
pub struct CacheMaintainer {
    store: Arc<dyn RecordStore>,
}

impl CacheMaintainer {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Run one maintenance pass.
    ///
    /// `min_access_count` is clamped to `[0, 1000]`. Reload counts cover the
    /// domains selected by `scope`; eviction always covers both domains and
    /// removes entries with `access_count == 0` created more than
    /// [`RETENTION_DAYS`] ago.
    pub async fn reload(&self, scope: ReloadScope, min_access_count: u64) -> Result<ReloadReport> {
        let min_access = min_access_count.min(MAX_MIN_ACCESS_COUNT);

        let mut report = ReloadReport::default();

        if scope.includes_queries() {
            report.reloaded_queries = self
                .store
                .count_with_min_access(CacheDomain::Queries, min_access)
                .await?;
            info!("reloaded {} query cache entries", report.reloaded_queries);
        }

        if scope.includes_embeddings() {
            report.reloaded_embeddings = self
                .store
                .count_with_min_access(CacheDomain::Embeddings, min_access)
                .await?;
            info!(
                "reloaded {} embedding cache entries",
                report.reloaded_embeddings
            );
        }

        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);
        report.cleaned_count = self.store.evict_unused_before(cutoff).await?;

        // Audit trail is best-effort; the pass already did its work
        if let Err(e) = self
            .store
            .append_audit(crate::agents::record::AuditEntry::new(
                "cache_reload",
                format!(
                    "Cache reload complete: {} queries, {} embeddings reloaded. {} old entries cleaned.",
                    report.reloaded_queries, report.reloaded_embeddings, report.cleaned_count
                ),
                json!({
                    "scope": scope.to_string(),
                    "min_access_count": min_access,
                    "reloaded_queries": report.reloaded_queries,
                    "reloaded_embeddings": report.reloaded_embeddings,
                    "cleaned_count": report.cleaned_count,
                }),
            ))
            .await
        {
            warn!("failed to write reload audit entry: {}", e);
        }

        Ok(report)
    }
}
