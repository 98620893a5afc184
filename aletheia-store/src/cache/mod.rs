//! # Content-Addressed Response Cache
//!
//! Records and maintenance for the query-response cache:
//!
//! - **Fingerprinting**: SHA-256 content addressing of query text
//! - **Entries**: one immutable answer per unique query text, with access
//!   and recency counters mutated on hits
//! - **Verification gating**: only `Verified` entries are ever served
//! - **Maintenance**: observational reload counts plus a 30-day sweep of
//!   entries nobody ever read

pub mod entry;
pub mod hasher;
pub mod maintainer;
pub mod types;

pub use entry::{CacheDomain, CacheEntry, ConfidenceRecord, VerificationStatus};
pub use hasher::fingerprint;
pub use maintainer::{CacheMaintainer, MAX_MIN_ACCESS_COUNT, RETENTION_DAYS};
pub use types::{CacheStats, ReloadReport, ReloadScope};
