//! Scripted in-memory provider for conversation and pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ai::{ChatMessage, LlmProvider, LlmResponse, ResponseMetadata, TokenUsage};
use crate::types::{DocError, Result};

/// Replies with queued messages in order; `Err` entries fail that call
pub(crate) struct ScriptedProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub(crate) fn new<'a>(
        script: impl IntoIterator<Item = std::result::Result<&'a str, &'a str>>,
    ) -> Self {
        let script = script
            .into_iter()
            .map(|step| step.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            script: Mutex::new(script),
            fallback: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always replies with `content`
    pub(crate) fn repeating(content: &str) -> Self {
        let mut provider = Self::new(Vec::<std::result::Result<&str, &str>>::new());
        provider.fallback = Some(content.to_string());
        provider
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages sent on each call so far
    pub(crate) fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let step = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        let content = match (step, &self.fallback) {
            (Some(Ok(content)), _) => content,
            (Some(Err(message)), _) => return Err(DocError::LlmApi(message)),
            (None, Some(content)) => content.clone(),
            (None, None) => return Err(DocError::LlmApi("script exhausted".to_string())),
        };

        Ok(LlmResponse {
            content,
            usage: TokenUsage::from_openai(100, 50),
            cost_usd: 0.01,
            metadata: ResponseMetadata {
                model: "mock-model".to_string(),
                provider: "mock".to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
