//! AI Integration Layer
//!
//! Provider abstraction, prompt rendering and the token budget guard.

pub mod prompt;
pub mod provider;
pub mod tokenizer;

pub use prompt::{PromptVars, render};
pub use provider::{
    ChatMessage, ChatRole, LlmProvider, LlmResponse, OpenAiProvider, PricingTable,
    ResponseMetadata, SharedProvider, TokenUsage, create_provider,
};
pub use tokenizer::{TokenCounter, TokenGuard};
