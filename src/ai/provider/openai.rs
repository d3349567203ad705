//! OpenAI API Provider
//!
//! LLM provider using OpenAI's Chat Completions API in JSON mode.
//! Returns LlmResponse with token usage and a priced cost estimate.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::{ChatMessage, LlmProvider, LlmResponse, PricingTable, ResponseMetadata, TokenUsage};
use crate::config::LlmConfig;
use crate::constants::network;
use crate::types::{DocError, ErrorClassifier, Result};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1/";
const PROVIDER_NAME: &str = "openai";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    endpoint: Url,
    model: String,
    temperature: f32,
    seed: u64,
    pricing: PricingTable,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("seed", &self.seed)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig, pricing: PricingTable) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            DocError::Config(
                "OpenAI API key not found. Set OPENAI_API_KEY env var or llm.api_key in settings"
                    .to_string(),
            )
        })?;

        let endpoint = Self::endpoint(config.api_base.as_deref())?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| DocError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        let seed = config
            .seed
            .unwrap_or_else(|| rand::random_range(100..=999));

        Ok(Self {
            api_key: SecretString::from(api_key),
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            seed,
            pricing,
            client,
        })
    }

    /// `<api_base>/chat/completions`
    fn endpoint(api_base: Option<&str>) -> Result<Url> {
        let base = api_base.unwrap_or(DEFAULT_API_BASE);
        // Url::join drops the last path segment unless the base ends with '/'
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        Url::parse(&base)
            .and_then(|url| url.join("chat/completions"))
            .map_err(|e| DocError::Config(format!("Invalid api_base '{}': {}", base, e)))
    }

    fn build_request<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            seed: self.seed,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<LlmResponse> {
        debug!(
            "Sending {} messages to OpenAI (model: {}, temperature: {})",
            messages.len(),
            self.model,
            self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(messages);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify(&e.to_string(), PROVIDER_NAME))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("OpenAI API error ({}): {}", status, body),
                PROVIDER_NAME,
            )
            .into());
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DocError::LlmApi(format!("Failed to parse OpenAI response: {}", e)))?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DocError::LlmApi("No content in OpenAI response".to_string()))?;

        // the API reports the resolved model (e.g. a dated snapshot)
        let model = response_body.model.unwrap_or_else(|| self.model.clone());
        let cost_usd = self.pricing.cost(&model, &usage);

        debug!(
            "OpenAI replied in {}ms ({} tokens, ${:.5})",
            start_time.elapsed().as_millis(),
            usage.total(),
            cost_usd
        );

        Ok(LlmResponse {
            content,
            usage,
            cost_usd,
            metadata: ResponseMetadata {
                model,
                provider: PROVIDER_NAME.to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    seed: u64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}
