//! Point-in-time system reporting
//!
//! Assembles one read-only snapshot across every collection: agent breakdown
//! with per-agent details, cache counters per domain, verification outcomes
//! over the recent confidence records, and recent audit-log activity. Nothing
//! here mutates the store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agents::record::{ActivityState, AgentRecord};
use crate::cache::entry::CacheDomain;
use crate::error::Result;
use crate::store::RecordStore;

/// Confidence records sampled into the verification aggregates
pub const CONFIDENCE_SAMPLE: usize = 100;

/// Audit rows sampled into the log counters
pub const AUDIT_SAMPLE: usize = 20;

const AUDIT_PREVIEW: usize = 5;

/// One snapshot over agents, caches, verification outcomes, and logs
#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub timestamp: DateTime<Utc>,
    pub agents: AgentBreakdown,
    pub performance: PerformanceStats,
    pub cache: CacheOverview,
    pub verification: VerificationStats,
    pub logs: LogOverview,
}

/// Per-state agent counts plus the full records
#[derive(Debug, Clone, Serialize)]
pub struct AgentBreakdown {
    pub total: usize,
    pub active: usize,
    pub idle: usize,
    pub terminated: usize,
    /// Every record, most recently active first
    pub details: Vec<AgentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceStats {
    pub total_memory_mb: u64,
    pub avg_cpu_usage: f64,
    /// Mean over active agents only; 0 when none are active
    pub avg_response_latency_ms: u64,
}

/// Counters over both cache domains
#[derive(Debug, Clone, Serialize)]
pub struct CacheOverview {
    pub query_cache_size: usize,
    pub embeddings_cache_size: usize,
    pub verified_queries: usize,
    /// Mean confidence over the query domain
    pub avg_confidence: f64,
    /// Accumulated hits across both domains
    pub total_cache_hits: u64,
}

/// Outcomes over the most recent confidence records
#[derive(Debug, Clone, Serialize)]
pub struct VerificationStats {
    pub total_records: usize,
    pub passed_validation: usize,
    /// Mean of `final_score - initial_score`; negative means answers got
    /// worse on re-verification
    pub avg_improvement: f64,
    pub total_reprompts: u64,
}

/// Recent audit-log activity
#[derive(Debug, Clone, Serialize)]
pub struct LogOverview {
    pub recent_count: usize,
    /// Rows per `log_type` within the sample
    pub counts: BTreeMap<String, usize>,
    pub recent_entries: Vec<LogLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogLine {
    pub log_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Builds [`SystemReport`] snapshots from an injected store
#[derive(Clone)]
pub struct SystemReporter {
    store: Arc<dyn RecordStore>,
}

impl SystemReporter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Assemble one report, stamped now
    pub async fn report(&self) -> Result<SystemReport> {
        let mut agents = self.store.all_agents().await?;
        agents.sort_by(|a, b| b.last_active_at.cmp(&a.last_active_at));

        let count_in = |state: ActivityState| {
            agents.iter().filter(|a| a.activity_state == state).count()
        };
        let active = count_in(ActivityState::Active);
        let total_cpu: f64 = agents.iter().map(|a| a.cpu_usage).sum();
        let active_latency: u64 = agents
            .iter()
            .filter(|a| a.activity_state == ActivityState::Active)
            .map(|a| a.response_latency_ms)
            .sum();

        let performance = PerformanceStats {
            total_memory_mb: agents.iter().map(|a| a.memory_mb).sum(),
            avg_cpu_usage: total_cpu / agents.len().max(1) as f64,
            avg_response_latency_ms: active_latency / active.max(1) as u64,
        };

        let queries = self.store.cache_stats(CacheDomain::Queries).await?;
        let embeddings = self.store.cache_stats(CacheDomain::Embeddings).await?;
        let cache = CacheOverview {
            query_cache_size: queries.entries,
            embeddings_cache_size: embeddings.entries,
            verified_queries: queries.verified,
            avg_confidence: queries.avg_confidence,
            total_cache_hits: queries.total_hits + embeddings.total_hits,
        };

        let records = self.store.recent_confidence(CONFIDENCE_SAMPLE).await?;
        let improvement: f64 = records
            .iter()
            .map(|r| r.final_score - r.initial_score)
            .sum();
        let verification = VerificationStats {
            total_records: records.len(),
            passed_validation: records.iter().filter(|r| r.passed_validation).count(),
            avg_improvement: improvement / records.len().max(1) as f64,
            total_reprompts: records.iter().map(|r| u64::from(r.reprompt_count)).sum(),
        };

        let audits = self.store.recent_audits(AUDIT_SAMPLE).await?;
        let mut counts = BTreeMap::new();
        for audit in &audits {
            *counts.entry(audit.log_type.clone()).or_insert(0) += 1;
        }
        let logs = LogOverview {
            recent_count: audits.len(),
            counts,
            recent_entries: audits
                .iter()
                .take(AUDIT_PREVIEW)
                .map(|a| LogLine {
                    log_type: a.log_type.clone(),
                    message: a.message.clone(),
                    created_at: a.created_at,
                })
                .collect(),
        };

        Ok(SystemReport {
            timestamp: Utc::now(),
            agents: AgentBreakdown {
                total: agents.len(),
                active,
                idle: count_in(ActivityState::Idle),
                terminated: count_in(ActivityState::Terminated),
                details: agents,
            },
            performance,
            cache,
            verification,
            logs,
        })
    }
}
