//! # Aletheia Store (aletheia-store)
//!
//! Record types, the injected keyed-store capability, cache maintenance, and
//! agent lifecycle management for the Aletheia query-resolution system.
//!
//! ## Features
//!
//! - Content-addressed cache entries with access/recency counters and a
//!   verification status that gates serving
//! - A [`RecordStore`] trait so every routine takes the store as an injected
//!   capability, plus [`MemoryStore`], an async in-memory implementation
//!   with atomic per-record updates
//! - [`CacheMaintainer`]: reload statistics and evict entries nobody read
//!   within the 30-day retention window
//! - [`AgentLifecycleManager`]: Active -> Idle -> Terminated transitions with
//!   simulated resource reclamation and audit logging
//! - [`SystemReporter`]: read-only snapshots aggregating agents, cache
//!   counters, verification outcomes, and recent audit activity
//!
//! ## Example
//!
//! ```no_run
//! use aletheia_store::{CacheMaintainer, MemoryStore, ReloadScope};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let maintainer = CacheMaintainer::new(store);
//!
//!     let report = maintainer.reload(ReloadScope::All, 1).await?;
//!     println!("cleaned {} stale entries", report.cleaned_count);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cache;
pub mod error;
pub mod stats;
pub mod store;

// Re-export main types for convenience
pub use agents::{
    ActivityState, AgentLifecycleManager, AgentRecord, AgentUpdate, AuditEntry, OptimizeReport,
    SystemStats, DEFAULT_INACTIVE_MINUTES, MAX_INACTIVE_MINUTES, MIN_INACTIVE_MINUTES,
};
pub use cache::{
    fingerprint, CacheDomain, CacheEntry, CacheMaintainer, CacheStats, ConfidenceRecord,
    ReloadReport, ReloadScope, VerificationStatus, RETENTION_DAYS,
};
pub use error::{Result, StoreError};
pub use stats::{SystemReport, SystemReporter};
pub use store::{MemoryStore, RecordStore};
