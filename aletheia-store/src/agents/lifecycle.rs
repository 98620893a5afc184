//! Agent lifecycle management
//!
//! Transitions simulated worker agents between activity states and reclaims
//! their resource footprint. One optimization pass takes a single threshold
//! snapshot, terminates stale idle agents, idles stale active agents, then
//! records aggregate stats in the audit log.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::agents::record::{ActivityState, AgentRecord, AgentUpdate, AuditEntry, SystemStats};
use crate::error::Result;
use crate::store::RecordStore;

/// Default inactivity threshold, in minutes
pub const DEFAULT_INACTIVE_MINUTES: i64 = 5;

/// Accepted range for the inactivity threshold, in minutes
pub const MIN_INACTIVE_MINUTES: i64 = 1;
pub const MAX_INACTIVE_MINUTES: i64 = 1440;

/// Outcome of one optimization pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub terminated_count: usize,
    pub idled_count: usize,
    pub memory_freed_mb: u64,
    pub stats: SystemStats,
}

/// Transitions agent records and reclaims simulated resources
#[derive(Clone)]
pub struct AgentLifecycleManager {
    store: Arc<dyn RecordStore>,
}

impl AgentLifecycleManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Run one optimization pass.
    ///
    /// Both scans compare against the same cutoff, snapshotted once at entry.
    /// Idle agents past the cutoff are terminated and their memory reported
    /// as freed (the record stays, marked Terminated). Active agents past the
    /// cutoff are idled with cpu reset and memory halved. Re-running within
    /// the same threshold window makes no further transitions: a transition
    /// stamps `state_changed_at`, which the scans also check.
    pub async fn optimize(&self, inactive_threshold_minutes: i64) -> Result<OptimizeReport> {
        let minutes = inactive_threshold_minutes.clamp(MIN_INACTIVE_MINUTES, MAX_INACTIVE_MINUTES);
        let cutoff = Utc::now() - Duration::minutes(minutes);

        // Idle -> Terminated
        let stale_idle = self
            .store
            .agents_inactive_since(ActivityState::Idle, cutoff)
            .await?;
        let mut memory_freed_mb = 0u64;
        let mut terminated_ids = Vec::with_capacity(stale_idle.len());
        for agent in &stale_idle {
            self.store
                .update_agent(&agent.agent_id, AgentUpdate::terminate())
                .await?;
            memory_freed_mb += agent.memory_mb;
            terminated_ids.push(agent.agent_id.clone());
        }
        let terminated_count = terminated_ids.len();

        if terminated_count > 0 {
            self.audit(AuditEntry::new(
                "agent_cleanup",
                format!(
                    "Terminated {} idle agents, freed {}MB memory",
                    terminated_count, memory_freed_mb
                ),
                json!({
                    "terminated_agents": terminated_ids,
                    "memory_freed_mb": memory_freed_mb,
                }),
            ))
            .await;
        }

        // Active -> Idle
        let stale_active = self
            .store
            .agents_inactive_since(ActivityState::Active, cutoff)
            .await?;
        for agent in &stale_active {
            self.store
                .update_agent(&agent.agent_id, AgentUpdate::idle(agent.memory_mb / 2))
                .await?;
        }
        let idled_count = stale_active.len();

        let stats = SystemStats::from_agents(&self.store.all_agents().await?);

        info!(
            "optimization complete: terminated {}, idled {} agents, freed {}MB",
            terminated_count, idled_count, memory_freed_mb
        );

        self.audit(AuditEntry::new(
            "optimization",
            format!(
                "Optimization complete: terminated {}, idled {} agents",
                terminated_count, idled_count
            ),
            json!({
                "memory_freed_mb": memory_freed_mb,
                "total_agents": stats.total_agents,
                "active_agents": stats.active_agents,
                "idle_agents": stats.idle_agents,
                "terminated_agents": stats.terminated_agents,
                "total_memory_mb": stats.total_memory_mb,
                "avg_cpu_usage": stats.avg_cpu_usage,
            }),
        ))
        .await;

        Ok(OptimizeReport {
            terminated_count,
            idled_count,
            memory_freed_mb,
            stats,
        })
    }

    /// Mark an agent Active with a fresh resource reading, creating the
    /// record if it does not exist yet.
    ///
    /// This is the upsert identity: a terminated id passed here comes back
    /// as a fresh Active record, which is the only sanctioned way out of
    /// Terminated.
    pub async fn touch(
        &self,
        agent_id: &str,
        cpu_usage: f64,
        memory_mb: u64,
        response_latency_ms: u64,
    ) -> Result<AgentRecord> {
        let mut record = match self.store.get_agent(agent_id).await? {
            Some(existing) if existing.activity_state != ActivityState::Terminated => existing,
            _ => AgentRecord::new(agent_id),
        };

        let now = Utc::now();
        if record.activity_state != ActivityState::Active {
            record.state_changed_at = now;
        }
        record.activity_state = ActivityState::Active;
        record.cpu_usage = cpu_usage;
        record.memory_mb = memory_mb;
        record.response_latency_ms = response_latency_ms;
        record.last_active_at = now;

        self.store.upsert_agent(record.clone()).await?;
        Ok(record)
    }

    async fn audit(&self, entry: AuditEntry) {
        if let Err(e) = self.store.append_audit(entry).await {
            warn!("failed to write audit entry: {}", e);
        }
    }
}
