//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait for chat-style completion.
//! All providers return `LlmResponse` with token usage and cost so the
//! conversation can keep per-role accounting.

mod openai;
mod pricing;

pub use openai::OpenAiProvider;
pub use pricing::PricingTable;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::{DocError, Result};

// =============================================================================
// Chat Messages
// =============================================================================

/// Author of a chat message from the model's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            name: Some(name.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            name: None,
        }
    }
}

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including content, usage metrics, and cost
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text (expected, not guaranteed, to be JSON)
    pub content: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Cost in USD, priced from the configured table
    pub cost_usd: f64,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

/// Token usage metrics for cost tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (completion)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Chat completion provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a conversation; `messages` starts with the system prompt
    async fn chat(&self, messages: &[ChatMessage]) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &LlmConfig, pricing: PricingTable) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config, pricing)?)),
        _ => Err(DocError::Config(format!(
            "Unknown provider: {}. Supported: openai",
            config.provider
        ))),
    }
}
