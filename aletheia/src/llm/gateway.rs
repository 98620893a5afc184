//! HTTP generation client for OpenAI-compatible gateways

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::client::{ChatMessage, Completion, GenerationClient, GenerationError};

/// Configuration for the gateway client
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the chat-completions gateway
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-call timeout; expiry surfaces as `Unavailable`
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("ALETHEIA_GATEWAY_URL")
                .unwrap_or_else(|_| "https://ai.gateway.lovable.dev/v1".to_string()),
            api_key: std::env::var("ALETHEIA_GATEWAY_KEY").unwrap_or_default(),
            model: std::env::var("ALETHEIA_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// [`GenerationClient`] backed by an OpenAI-compatible HTTP gateway
pub struct GatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(GatewayConfig::default())
    }
}

#[async_trait]
impl GenerationClient for GatewayClient {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<Completion, GenerationError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!("sending completion request to {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&ChatRequest {
                model: &self.config.model,
                messages,
            })
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(GenerationError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => return Err(GenerationError::QuotaExceeded),
            status if !status.is_success() => {
                warn!("gateway error: {}", status);
                return Err(GenerationError::Unavailable(format!(
                    "gateway returned {}",
                    status
                )));
            }
            _ => {}
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let text = raw["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                GenerationError::Unavailable("malformed completion payload".to_string())
            })?
            .to_string();

        Ok(Completion { text, raw })
    }
}
