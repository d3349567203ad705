//! Configuration Types
//!
//! All settings structures with defaults matching [`crate::constants`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::constants::{conversation, network, paths, scan};
use crate::types::{DocError, Result};

/// Root settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output and input locations
    pub paths: PathsConfig,

    /// File selection and token budget
    pub scan: ScanConfig,

    /// Two-role conversation tuning
    pub conversation: ConversationConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// USD per 1K tokens, keyed by model name or model-name prefix
    pub pricing: BTreeMap<String, ModelPricing>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            scan: ScanConfig::default(),
            conversation: ConversationConfig::default(),
            llm: LlmConfig::default(),
            pricing: default_pricing(),
        }
    }
}

impl Settings {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DocError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DocError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.scan.context_size == 0 {
            return Err(DocError::Config(
                "scan.context_size must be greater than 0".to_string(),
            ));
        }

        if self.conversation.max_round < 2 {
            return Err(DocError::Config(format!(
                "conversation.max_round must allow at least one reply, got {}",
                self.conversation.max_round
            )));
        }

        if self.conversation.termination_marker.trim().is_empty() {
            return Err(DocError::Config(
                "conversation.termination_marker must not be empty".to_string(),
            ));
        }

        if encoding_rs::Encoding::for_label(self.scan.fallback_encoding.as_bytes()).is_none() {
            return Err(DocError::Config(format!(
                "Unknown fallback encoding: {}",
                self.scan.fallback_encoding
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Paths
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSON reports and error artifacts
    pub reports_dir: PathBuf,
    /// Manager revision feedback
    pub feedback_dir: PathBuf,
    /// Scan logs
    pub logs_dir: PathBuf,
    /// Rendered Markdown
    pub markdown_dir: PathBuf,
    /// Prompt document (YAML)
    pub prompts_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(paths::REPORTS_DIR),
            feedback_dir: PathBuf::from(paths::FEEDBACK_DIR),
            logs_dir: PathBuf::from(paths::LOGS_DIR),
            markdown_dir: PathBuf::from(paths::MARKDOWN_DIR),
            prompts_file: PathBuf::from(paths::PROMPTS_FILE),
        }
    }
}

// =============================================================================
// Scan
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Skip any directory whose path contains this marker
    pub checkpoint_marker: String,
    /// Skip any file whose name contains this fragment
    pub skip_fragment: String,
    /// Extra glob patterns, matched against the path relative to the scan root
    pub exclude: Vec<String>,
    /// Token ceiling per file
    pub context_size: usize,
    /// WHATWG label of the fallback decoder
    pub fallback_encoding: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            checkpoint_marker: scan::CHECKPOINT_MARKER.to_string(),
            skip_fragment: scan::SKIP_FRAGMENT.to_string(),
            exclude: Vec::new(),
            context_size: scan::CONTEXT_SIZE,
            fallback_encoding: scan::FALLBACK_ENCODING.to_string(),
        }
    }
}

// =============================================================================
// Conversation
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Maximum messages per conversation, seed included
    pub max_round: usize,
    /// Maximum generated replies per role
    pub max_auto_reply: usize,
    /// Literal that ends the conversation
    pub termination_marker: String,
    /// `NEXTSTEP` value that marks manager feedback
    pub revise_marker: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_round: conversation::MAX_ROUND,
            max_auto_reply: conversation::MAX_AUTO_REPLY,
            termination_marker: conversation::TERMINATION_MARKER.to_string(),
            revise_marker: conversation::REVISE_MARKER.to_string(),
        }
    }
}

// =============================================================================
// LLM
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: String,

    /// Model name (also read from `MODEL_NAME`)
    pub model: String,

    /// API key (also read from `OPENAI_API_KEY`); never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Custom endpoint base URL
    pub api_base: Option<String>,

    /// Per-request ceiling in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Sampling seed; a random value in 100..=999 is drawn per process when unset
    pub seed: Option<u64>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
            seed: None,
        }
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// USD per 1K tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

impl ModelPricing {
    pub const fn new(prompt_per_1k: f64, completion_per_1k: f64) -> Self {
        Self {
            prompt_per_1k,
            completion_per_1k,
        }
    }
}

fn default_pricing() -> BTreeMap<String, ModelPricing> {
    [
        ("gpt-4o", ModelPricing::new(0.0025, 0.01)),
        ("gpt-4o-mini", ModelPricing::new(0.00015, 0.0006)),
        ("gpt-4-turbo", ModelPricing::new(0.01, 0.03)),
        ("gpt-4", ModelPricing::new(0.03, 0.06)),
        ("gpt-3.5-turbo", ModelPricing::new(0.0005, 0.0015)),
    ]
    .into_iter()
    .map(|(name, price)| (name.to_string(), price))
    .collect()
}

// =============================================================================
// Tests
// =============================================================================
