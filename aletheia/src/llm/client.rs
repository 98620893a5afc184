//! Generation client contract
//!
//! The model provider is an external collaborator: the pipeline only sees
//! this trait. Failures carry the provider's signal (rate limit, quota,
//! unreachable) verbatim; no retry happens at this layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message role in a chat-style completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message in an ordered completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A completed generation: the answer text plus the provider's raw payload
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub raw: serde_json::Value,
}

/// Typed generation failures, surfaced to the caller without local retry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("rate limit exceeded")]
    RateLimited,

    #[error("service quota exceeded")]
    QuotaExceeded,

    /// Provider unreachable, errored, or timed out
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
}

/// Issues completion requests against the generative-model provider
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<Completion, GenerationError>;
}
