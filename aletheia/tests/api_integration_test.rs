//! Integration tests for the HTTP API server

use reqwest::{Client, StatusCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use aletheia::api::{ApiServer, ApiServerConfig, AppState};
use aletheia::llm::{GenerationError, MockClient};
use aletheia::pipeline::QueryResolver;
use aletheia_store::{
    ActivityState, AgentLifecycleManager, AgentRecord, CacheMaintainer, MemoryStore, RecordStore,
    SystemReporter,
};
use chrono::{Duration as ChronoDuration, Utc};

const CONFIDENT_ANSWER: &str = "According to a 2019 meta-analysis, efficacy exceeded placebo.";

fn build_state(client: Arc<MockClient>, store: Arc<MemoryStore>) -> Arc<AppState> {
    Arc::new(AppState {
        resolver: Arc::new(QueryResolver::new(client, store.clone())),
        maintainer: CacheMaintainer::new(store.clone()),
        lifecycle: AgentLifecycleManager::new(store.clone()),
        reporter: SystemReporter::new(store),
    })
}

/// Test helper to start the API server in the background
async fn start_test_server(state: Arc<AppState>, port: u16) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let config = ApiServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        };

        let server = ApiServer::new(config, state);
        let _ = server.start().await;
    })
}

#[tokio::test]
async fn test_health_check() {
    let state = build_state(Arc::new(MockClient::new()), Arc::new(MemoryStore::new()));
    let port = 8091;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    // Test health check endpoint
    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_resolve_miss_then_hit() {
    let mock = Arc::new(MockClient::new());
    mock.push_text(CONFIDENT_ANSWER);
    let state = build_state(mock, Arc::new(MemoryStore::new()));
    let port = 8092;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();

    // First call generates
    let response = client
        .post(format!("http://127.0.0.1:{}/api/resolve", port))
        .json(&json!({ "query": "What treats Type 2 Diabetes?" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["response"], CONFIDENT_ANSWER);
    assert_eq!(body["cached"], false);
    assert_eq!(body["reprompted"], false);

    // Second call is served from the cache; the mock script is exhausted
    let response = client
        .post(format!("http://127.0.0.1:{}/api/resolve", port))
        .json(&json!({ "query": "What treats Type 2 Diabetes?" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["response"], CONFIDENT_ANSWER);
    assert_eq!(body["cached"], true);
}

#[tokio::test]
async fn test_resolve_empty_query() {
    let state = build_state(Arc::new(MockClient::new()), Arc::new(MemoryStore::new()));
    let port = 8093;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/resolve", port))
        .json(&json!({ "query": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_resolve_rate_limited() {
    let mock = Arc::new(MockClient::new());
    mock.push_error(GenerationError::RateLimited);
    let state = build_state(mock, Arc::new(MemoryStore::new()));
    let port = 8094;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/resolve", port))
        .json(&json!({ "query": "test" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_resolve_quota_exceeded() {
    let mock = Arc::new(MockClient::new());
    mock.push_error(GenerationError::QuotaExceeded);
    let state = build_state(mock, Arc::new(MemoryStore::new()));
    let port = 8095;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/resolve", port))
        .json(&json!({ "query": "test" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn test_reload_defaults() {
    let state = build_state(Arc::new(MockClient::new()), Arc::new(MemoryStore::new()));
    let port = 8096;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/reload", port))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["cache_type"], "all");
    assert_eq!(body["reloaded"]["queries"], 0);
    assert_eq!(body["reloaded"]["embeddings"], 0);
    assert_eq!(body["cleaned"], 0);
}

#[tokio::test]
async fn test_reload_rejects_unknown_scope() {
    let state = build_state(Arc::new(MockClient::new()), Arc::new(MemoryStore::new()));
    let port = 8097;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/reload", port))
        .json(&json!({ "cache_type": "sessions" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_optimize_transitions_stale_agents() {
    let store = Arc::new(MemoryStore::new());

    // One idle agent, stale for an hour
    let mut agent = AgentRecord::new("agent-stale");
    agent.activity_state = ActivityState::Idle;
    agent.memory_mb = 256;
    agent.last_active_at = Utc::now() - ChronoDuration::minutes(60);
    agent.state_changed_at = agent.last_active_at;
    store.upsert_agent(agent).await.unwrap();

    let state = build_state(Arc::new(MockClient::new()), store);
    let port = 8098;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/optimize", port))
        .json(&json!({ "inactive_threshold_minutes": 5 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["optimization"]["terminated_count"], 1);
    assert_eq!(body["optimization"]["idled_count"], 0);
    assert_eq!(body["optimization"]["memory_freed_mb"], 256);
    assert_eq!(body["system_stats"]["terminated_agents"], 1);
}

#[tokio::test]
async fn test_stats_snapshot() {
    let mock = Arc::new(MockClient::new());
    mock.push_text(CONFIDENT_ANSWER);
    let store = Arc::new(MemoryStore::new());

    let mut agent = AgentRecord::new("worker-1");
    agent.cpu_usage = 30.0;
    agent.memory_mb = 128;
    agent.response_latency_ms = 90;
    store.upsert_agent(agent).await.unwrap();

    let state = build_state(mock, store);
    let port = 8099;

    // Start server
    let _server_handle = start_test_server(state, port).await;
    sleep(Duration::from_secs(1)).await;

    let client = Client::new();

    // One resolve miss followed by a hit, so the cache counters move
    for _ in 0..2 {
        client
            .post(format!("http://127.0.0.1:{}/api/resolve", port))
            .json(&json!({ "query": "What treats Type 2 Diabetes?" }))
            .send()
            .await
            .unwrap();
    }

    let response = client
        .get(format!("http://127.0.0.1:{}/api/stats", port))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["agents"]["total"], 1);
    assert_eq!(body["agents"]["active"], 1);
    assert_eq!(body["agents"]["details"][0]["agent_id"], "worker-1");
    assert_eq!(body["performance"]["total_memory_mb"], 128);
    assert_eq!(body["cache"]["query_cache_size"], 1);
    assert_eq!(body["cache"]["verified_queries"], 1);
    assert_eq!(body["cache"]["total_cache_hits"], 1);
    assert_eq!(body["verification"]["total_records"], 1);
    assert_eq!(body["verification"]["passed_validation"], 1);
    assert_eq!(body["verification"]["total_reprompts"], 0);
    assert!(body["timestamp"].is_string());
}
