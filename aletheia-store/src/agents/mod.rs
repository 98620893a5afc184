//! Worker-agent records and lifecycle management

pub mod lifecycle;
pub mod record;

pub use lifecycle::{
    AgentLifecycleManager, OptimizeReport, DEFAULT_INACTIVE_MINUTES, MAX_INACTIVE_MINUTES,
    MIN_INACTIVE_MINUTES,
};
pub use record::{ActivityState, AgentRecord, AgentUpdate, AuditEntry, SystemStats};
