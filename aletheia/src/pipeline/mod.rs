//! Query resolution pipeline: scoring, prompts, and the resolver state machine

pub mod prompts;
pub mod resolver;
pub mod scorer;

pub use resolver::{QueryResolver, Resolution, ResolveError, ResolveRequest, ResolverConfig};
pub use scorer::ConfidenceScorer;
