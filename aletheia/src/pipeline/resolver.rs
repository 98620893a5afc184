//! Query resolution pipeline
//!
//! One pass per query: hash, probe the cache, and on a miss generate, score,
//! optionally re-verify once, then persist. Cache writes are best-effort; an
//! answer that was already computed is returned even when the store write
//! fails. The re-verification call is likewise best-effort: its failure
//! degrades the result to the initial answer instead of failing the query.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use aletheia_store::{
    fingerprint, CacheDomain, CacheEntry, ConfidenceRecord, RecordStore, VerificationStatus,
};

use crate::llm::{ChatMessage, GenerationClient, GenerationError};
use crate::pipeline::prompts::{review_prompt, system_prompt};
use crate::pipeline::scorer::ConfidenceScorer;

/// Tunables for the resolution pipeline
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Answers scoring below this get one re-verification pass; entries at or
    /// above it persist as Verified
    pub confidence_threshold: f64,
    /// Longest accepted query text, in characters
    pub max_query_chars: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            max_query_chars: 2000,
        }
    }
}

/// A query to resolve
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub query_text: String,
    pub domain_hint: Option<String>,
    pub use_cache: bool,
}

impl ResolveRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            domain_hint: None,
            use_cache: true,
        }
    }

    pub fn with_domain_hint(mut self, hint: impl Into<String>) -> Self {
        self.domain_hint = Some(hint.into());
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

/// A resolved answer and how it was obtained
#[derive(Debug, Clone, serde::Serialize)]
pub struct Resolution {
    pub answer_text: String,
    pub confidence: f64,
    pub cached: bool,
    pub reprompted: bool,
}

/// Typed resolution failures
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Empty or oversized query, rejected before any store or network access
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Caller identity missing or invalid. Not raised by the pipeline itself;
    /// deployments fronted by an identity gateway surface it through this
    /// taxonomy.
    #[error("authentication required")]
    Unauthenticated,

    /// First generation call failed; nothing was cached
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Answers queries through the cache-lookup/verify/store pipeline
pub struct QueryResolver {
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn RecordStore>,
    scorer: ConfidenceScorer,
    config: ResolverConfig,
}

impl QueryResolver {
    pub fn new(client: Arc<dyn GenerationClient>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            client,
            store,
            scorer: ConfidenceScorer::new(),
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve one query.
    ///
    /// A cached verified answer is served as-is for its lifetime: hits never
    /// re-score or re-verify. On a miss the pipeline makes at most two
    /// sequential generation calls and never loops toward the threshold.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<Resolution, ResolveError> {
        let query = request.query_text.as_str();
        if query.is_empty() {
            return Err(ResolveError::InvalidInput("query text is empty".to_string()));
        }
        if query.chars().count() > self.config.max_query_chars {
            return Err(ResolveError::InvalidInput(format!(
                "query text exceeds {} characters",
                self.config.max_query_chars
            )));
        }

        let query_hash = fingerprint(query);

        if request.use_cache {
            match self
                .store
                .find_verified(CacheDomain::Queries, &query_hash, query)
                .await
            {
                Ok(Some(entry)) => {
                    // The increment is atomic at the store; losing it to a
                    // store failure is not worth failing the request over.
                    if let Err(e) = self.store.record_hit(CacheDomain::Queries, &query_hash).await {
                        warn!("failed to record cache hit for {}: {}", query_hash, e);
                    }
                    debug!("cache hit: {}", query_hash);
                    return Ok(Resolution {
                        answer_text: entry.response_text,
                        confidence: entry.confidence_score,
                        cached: true,
                        reprompted: false,
                    });
                }
                Ok(None) => debug!("cache miss: {}", query_hash),
                Err(e) => warn!("cache probe failed, treating as miss: {}", e),
            }
        }

        let messages = [
            ChatMessage::system(system_prompt(request.domain_hint.as_deref())),
            ChatMessage::user(query),
        ];
        let completion = self.client.generate(&messages).await?;

        let initial_score = self.scorer.score(&completion.text);
        let mut final_text = completion.text;
        let mut final_score = initial_score;
        let mut reprompt_count = 0u32;

        if initial_score < self.config.confidence_threshold {
            debug!(
                "initial score {:.2} below threshold, issuing re-verification",
                initial_score
            );
            let review = [ChatMessage::user(review_prompt(&final_text))];
            match self.client.generate(&review).await {
                Ok(revised) => {
                    final_score = self.scorer.score(&revised.text);
                    final_text = revised.text;
                    reprompt_count = 1;
                }
                Err(e) => {
                    warn!("re-verification call failed, keeping initial answer: {}", e);
                }
            }
        }

        let status = if final_score >= self.config.confidence_threshold {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Pending
        };

        self.persist(&query_hash, query, &final_text, initial_score, final_score, reprompt_count, status)
            .await;

        info!(
            "resolved query {} (confidence {:.2}, status {})",
            query_hash, final_score, status
        );

        Ok(Resolution {
            answer_text: final_text,
            confidence: final_score,
            cached: false,
            reprompted: reprompt_count > 0,
        })
    }

    /// Best-effort cache write; the computed answer is returned regardless
    #[allow(clippy::too_many_arguments)]
    async fn persist(
        &self,
        query_hash: &str,
        query_text: &str,
        response_text: &str,
        initial_score: f64,
        final_score: f64,
        reprompt_count: u32,
        status: VerificationStatus,
    ) {
        let entry = CacheEntry::new(
            CacheDomain::Queries,
            query_hash.to_string(),
            query_text.to_string(),
            response_text.to_string(),
            final_score,
            status,
        );
        if let Err(e) = self.store.insert_entry(entry).await {
            warn!("cache write failed for {}: {}", query_hash, e);
            return;
        }

        let record = ConfidenceRecord::new(
            query_hash.to_string(),
            initial_score,
            final_score,
            reprompt_count,
            self.config.confidence_threshold,
        );
        if let Err(e) = self.store.insert_confidence(record).await {
            warn!("confidence record write failed for {}: {}", query_hash, e);
        }
    }
}
