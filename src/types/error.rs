//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Classes
//!
//! - **Run-level**: missing prompt document, invalid scan root, invalid settings.
//!   These abort before any file is processed.
//! - **Per-file**: read failures, token-budget overflow, conversation failures.
//!   The scan loop records an artifact and moves on to the next file.
//! - **LLM**: HTTP failures from the model API, classified by [`ErrorCategory`]
//!   so log lines say *why* a conversation was abandoned.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories for LLM API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the provider
    RateLimit,
    /// Context/token limit exceeded
    TokenLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider unavailable
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Response body could not be parsed
    ParseError,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from a transport failure
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        if lower.contains("rate limit") || lower.contains("too many requests") {
            return LlmError::with_provider(ErrorCategory::RateLimit, message, provider);
        }

        if lower.contains("context length")
            || lower.contains("maximum context")
            || (lower.contains("token") && lower.contains("exceed"))
        {
            return LlmError::with_provider(ErrorCategory::TokenLimit, message, provider);
        }

        if lower.contains("api key") || lower.contains("unauthorized") {
            return LlmError::with_provider(ErrorCategory::Auth, message, provider);
        }

        if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
        {
            return LlmError::with_provider(ErrorCategory::Network, message, provider);
        }

        if lower.contains("decode") || lower.contains("json") {
            return LlmError::with_provider(ErrorCategory::ParseError, message, provider);
        }

        LlmError::with_provider(ErrorCategory::Unknown, message, provider)
    }

    /// Classify an HTTP status code
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 if message.contains("context_length_exceeded") => ErrorCategory::TokenLimit,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("LLM API error: {0}")]
    LlmApi(String),

    // -------------------------------------------------------------------------
    // Run-level Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid directory specified: {}", .0.display())]
    InvalidRoot(PathBuf),

    // -------------------------------------------------------------------------
    // Per-file Errors
    // -------------------------------------------------------------------------
    #[error("Target file corrupted: {} - Error details: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Token limit exceeded: {count} tokens (limit is {limit} tokens)")]
    TokenLimit { count: usize, limit: usize },

    #[error("Template '{name}' failed to render: {message}")]
    Template { name: String, message: String },

    #[error("Conversation failed: {0}")]
    Conversation(String),
}

impl From<LlmError> for DocError {
    fn from(err: LlmError) -> Self {
        DocError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, DocError>;

impl DocError {
    /// Create a read error for `path`
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to a single file rather than the whole run
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Read { .. }
                | Self::TokenLimit { .. }
                | Self::Template { .. }
                | Self::Conversation(_)
                | Self::Llm(_)
                | Self::LlmApi(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
