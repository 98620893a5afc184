//! Scripted generation client for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::client::{ChatMessage, Completion, GenerationClient, GenerationError};

/// Test double that replays queued responses and records every request.
///
/// Responses are consumed front-to-back; generating past the end of the
/// script fails with `Unavailable`.
#[derive(Default)]
pub struct MockClient {
    script: Mutex<VecDeque<Result<Completion, GenerationError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion with the given text
    pub fn push_text(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(Completion {
            text: text.into(),
            raw: serde_json::Value::Null,
        }));
    }

    /// Queue a failure
    pub fn push_error(&self, error: GenerationError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of generate calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Messages of every call, in order
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<Completion, GenerationError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Unavailable("mock script exhausted".to_string())))
    }
}
