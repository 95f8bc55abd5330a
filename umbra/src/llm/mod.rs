//! LLM Client module for Umbra
//!
//! Provides the completion request used to generate captions.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage, ToolCall, ToolDefinition};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown LLM provider: '{}'. Supported: anthropic",
                other
            )))
        }
    }
}
