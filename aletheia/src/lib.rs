pub mod api;
pub mod llm;
pub mod pipeline;

pub use api::{ApiServer, ApiServerConfig, AppState};
pub use llm::{
    ChatMessage, Completion, GatewayClient, GatewayConfig, GenerationClient, GenerationError,
    MockClient, Role,
};
pub use pipeline::{
    ConfidenceScorer, QueryResolver, Resolution, ResolveError, ResolveRequest, ResolverConfig,
};
