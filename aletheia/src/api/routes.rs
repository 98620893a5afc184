//! API routes for the Aletheia server

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use aletheia_store::{
    AgentLifecycleManager, CacheMaintainer, ReloadScope, SystemReport, SystemReporter, SystemStats,
    DEFAULT_INACTIVE_MINUTES,
};

use crate::llm::GenerationError;
use crate::pipeline::{QueryResolver, ResolveError, ResolveRequest};

/// Application state
pub struct AppState {
    pub resolver: Arc<QueryResolver>,
    pub maintainer: CacheMaintainer,
    pub lifecycle: AgentLifecycleManager,
    pub reporter: SystemReporter,
}

/// JSON error payload with an HTTP-style status
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(error: ResolveError) -> Self {
        let status = match &error {
            ResolveError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ResolveError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ResolveError::Generation(GenerationError::RateLimited) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ResolveError::Generation(GenerationError::QuotaExceeded) => {
                StatusCode::PAYMENT_REQUIRED
            }
            ResolveError::Generation(GenerationError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, error.to_string())
    }
}

impl From<aletheia_store::StoreError> for ApiError {
    fn from(error: aletheia_store::StoreError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn default_use_cache() -> bool {
    true
}

/// Resolve request body
#[derive(Deserialize)]
pub struct ResolveBody {
    pub query: String,
    pub domain: Option<String>,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

/// Resolve response
#[derive(Serialize)]
pub struct ResolveResponse {
    pub response: String,
    pub confidence: f64,
    pub cached: bool,
    pub reprompted: bool,
}

/// Resolve a query through the pipeline
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let mut request = ResolveRequest::new(body.query);
    request.domain_hint = body.domain;
    request.use_cache = body.use_cache;

    let resolution = state.resolver.resolve(&request).await?;
    Ok(Json(ResolveResponse {
        response: resolution.answer_text,
        confidence: resolution.confidence,
        cached: resolution.cached,
        reprompted: resolution.reprompted,
    }))
}

fn default_scope() -> String {
    "all".to_string()
}

fn default_min_access_count() -> u64 {
    1
}

/// Reload request body
#[derive(Deserialize)]
pub struct ReloadBody {
    #[serde(default = "default_scope")]
    pub cache_type: String,
    #[serde(default = "default_min_access_count")]
    pub min_access_count: u64,
}

/// Reload response
#[derive(Serialize)]
pub struct ReloadResponse {
    pub reloaded: ReloadedCounts,
    pub cleaned: u64,
    pub cache_type: String,
}

#[derive(Serialize)]
pub struct ReloadedCounts {
    pub queries: usize,
    pub embeddings: usize,
}

/// Run one cache maintenance pass
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReloadBody>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let scope: ReloadScope = body
        .cache_type
        .parse()
        .map_err(|e: String| ApiError::new(StatusCode::BAD_REQUEST, e))?;

    let report = state.maintainer.reload(scope, body.min_access_count).await?;
    Ok(Json(ReloadResponse {
        reloaded: ReloadedCounts {
            queries: report.reloaded_queries,
            embeddings: report.reloaded_embeddings,
        },
        cleaned: report.cleaned_count,
        cache_type: scope.to_string(),
    }))
}

fn default_threshold_minutes() -> i64 {
    DEFAULT_INACTIVE_MINUTES
}

/// Optimize request body
#[derive(Deserialize)]
pub struct OptimizeBody {
    #[serde(default = "default_threshold_minutes")]
    pub inactive_threshold_minutes: i64,
}

/// Optimize response
#[derive(Serialize)]
pub struct OptimizeResponse {
    pub optimization: OptimizationCounts,
    pub system_stats: SystemStats,
}

#[derive(Serialize)]
pub struct OptimizationCounts {
    pub terminated_count: usize,
    pub idled_count: usize,
    pub memory_freed_mb: u64,
}

/// Snapshot of agents, caches, verification outcomes, and recent logs
pub async fn system_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SystemReport>, ApiError> {
    let report = state.reporter.report().await?;
    Ok(Json(report))
}

/// Run one agent lifecycle pass
pub async fn optimize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OptimizeBody>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let report = state
        .lifecycle
        .optimize(body.inactive_threshold_minutes)
        .await?;
    Ok(Json(OptimizeResponse {
        optimization: OptimizationCounts {
            terminated_count: report.terminated_count,
            idled_count: report.idled_count,
            memory_freed_mb: report.memory_freed_mb,
        },
        system_stats: report.stats,
    }))
}
