//! Worker-agent records and system statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Resource-lifecycle state of a simulated worker agent.
///
/// Within one optimization pass a record only moves in the
/// Active -> Idle -> Terminated direction. A terminated agent may later be
/// re-created fresh under the same id via the upsert path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    Active,
    Idle,
    Terminated,
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityState::Active => write!(f, "active"),
            ActivityState::Idle => write!(f, "idle"),
            ActivityState::Terminated => write!(f, "terminated"),
        }
    }
}

/// One worker agent's resource footprint, keyed by `agent_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Stable identifier, upsert target
    pub agent_id: String,

    pub activity_state: ActivityState,

    /// Reset to 0 on transition to Idle
    pub cpu_usage: f64,

    /// Halved (floor) on transition to Idle; reported as freed on termination
    pub memory_mb: u64,

    /// Set on each Active update
    pub response_latency_ms: u64,

    /// Refreshed whenever the agent is set Active
    pub last_active_at: DateTime<Utc>,

    /// When the current `activity_state` was entered.
    ///
    /// Keeps repeated optimization passes within one threshold window from
    /// cascading a just-idled agent straight into Terminated.
    pub state_changed_at: DateTime<Utc>,
}

impl AgentRecord {
    /// A fresh Active record, stamped now
    pub fn new(agent_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            agent_id: agent_id.into(),
            activity_state: ActivityState::Active,
            cpu_usage: 0.0,
            memory_mb: 0,
            response_latency_ms: 0,
            last_active_at: now,
            state_changed_at: now,
        }
    }
}

/// Partial update applied atomically to one agent record
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub activity_state: Option<ActivityState>,
    pub cpu_usage: Option<f64>,
    pub memory_mb: Option<u64>,
    pub response_latency_ms: Option<u64>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl AgentUpdate {
    /// Mark the record Terminated, leaving its resource fields as-is
    pub fn terminate() -> Self {
        Self {
            activity_state: Some(ActivityState::Terminated),
            ..Default::default()
        }
    }

    /// Mark the record Idle with a reduced footprint
    pub fn idle(memory_mb: u64) -> Self {
        Self {
            activity_state: Some(ActivityState::Idle),
            cpu_usage: Some(0.0),
            memory_mb: Some(memory_mb),
            ..Default::default()
        }
    }

    /// Apply this update to a record in place
    pub fn apply(&self, record: &mut AgentRecord) {
        if let Some(state) = self.activity_state {
            if record.activity_state != state {
                record.state_changed_at = Utc::now();
            }
            record.activity_state = state;
        }
        if let Some(cpu) = self.cpu_usage {
            record.cpu_usage = cpu;
        }
        if let Some(memory) = self.memory_mb {
            record.memory_mb = memory;
        }
        if let Some(latency) = self.response_latency_ms {
            record.response_latency_ms = latency;
        }
        if let Some(at) = self.last_active_at {
            record.last_active_at = at;
        }
    }
}

/// Aggregate view over all agent records
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SystemStats {
    pub total_agents: usize,
    pub active_agents: usize,
    pub idle_agents: usize,
    pub terminated_agents: usize,
    pub total_memory_mb: u64,
    pub avg_cpu_usage: f64,
}

impl SystemStats {
    pub fn from_agents(agents: &[AgentRecord]) -> Self {
        let total_cpu: f64 = agents.iter().map(|a| a.cpu_usage).sum();
        Self {
            total_agents: agents.len(),
            active_agents: agents
                .iter()
                .filter(|a| a.activity_state == ActivityState::Active)
                .count(),
            idle_agents: agents
                .iter()
                .filter(|a| a.activity_state == ActivityState::Idle)
                .count(),
            terminated_agents: agents
                .iter()
                .filter(|a| a.activity_state == ActivityState::Terminated)
                .count(),
            total_memory_mb: agents.iter().map(|a| a.memory_mb).sum(),
            avg_cpu_usage: total_cpu / agents.len().max(1) as f64,
        }
    }
}

/// One audit-log row written by the batch routines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub log_type: String,
    pub message: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(log_type: impl Into<String>, message: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            log_type: log_type.into(),
            message: message.into(),
            metadata,
            created_at: Utc::now(),
        }
    }
}
