//! Generation-provider integration

pub mod client;
pub mod gateway;
pub mod mock;

pub use client::{ChatMessage, Completion, GenerationClient, GenerationError, Role};
pub use gateway::{GatewayClient, GatewayConfig};
pub use mock::MockClient;
