//! Conversation Orchestrator
//!
//! Builds both system prompts for one file, runs the group chat and charges
//! the file for the model usage. Every failure inside a conversation is
//! surfaced as `DocError::Conversation` so the caller can treat it as a
//! per-file error.

use tracing::{debug, info};

use super::group_chat::{GroupChat, StopReason, TranscriptMessage};
use super::role::{Agent, Role};
use super::usage::{UsageReport, file_totals};
use crate::ai::{PromptVars, SharedProvider, render};
use crate::config::{ConversationConfig, PromptSet};
use crate::scanner::ScanTarget;
use crate::types::{DocError, Result};

/// Everything a finished conversation produced
#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    pub transcript: Vec<TranscriptMessage>,
    pub stop_reason: StopReason,
    pub manager_usage: UsageReport,
    pub coder_usage: UsageReport,
    /// Tokens charged to the file
    pub total_tokens: u64,
    /// USD charged to the file
    pub total_cost: f64,
}

/// Unique reference the coder embeds in its output
pub fn reference_token(md5: &str, stamp: &str, filename: &str) -> String {
    format!("{}_{}_{}", md5, stamp, filename)
}

pub struct Orchestrator {
    prompts: PromptSet,
    config: ConversationConfig,
    provider: SharedProvider,
}

impl Orchestrator {
    pub fn new(prompts: PromptSet, config: ConversationConfig, provider: SharedProvider) -> Self {
        Self {
            prompts,
            config,
            provider,
        }
    }

    /// Render the manager and coder system prompts for `target`
    pub fn system_prompts(&self, target: &ScanTarget, reference: &str) -> Result<(String, String)> {
        let vars = PromptVars::new()
            .set("target", &self.prompts.target)
            .set("code", &target.text)
            .set("filename", &target.filename)
            .set("reference", reference)
            .set("example_schema", &self.prompts.example_schema)
            .set("output_example", &self.prompts.output_example)
            .set("example_mermaid", &self.prompts.example_mermaid);

        let manager = render(
            Role::Manager.name(),
            &self.prompts.core_manager_agent,
            &vars,
        )?;
        let coder = render(Role::Coder.name(), &self.prompts.core_coder_agent, &vars)?;
        Ok((manager, coder))
    }

    /// Run one conversation about `target`; `stamp` is the run timestamp
    /// used in the reference token
    pub async fn converse(&self, target: &ScanTarget, stamp: &str) -> Result<ConversationOutcome> {
        self.run(target, stamp)
            .await
            .map_err(|e| match e {
                DocError::Conversation(message) => DocError::Conversation(message),
                other => DocError::Conversation(format!("{}: {}", target.filename, other)),
            })
    }

    async fn run(&self, target: &ScanTarget, stamp: &str) -> Result<ConversationOutcome> {
        let reference = reference_token(&target.md5, stamp, &target.filename);
        let (manager_prompt, coder_prompt) = self.system_prompts(target, &reference)?;

        let mut chat = GroupChat::new(
            Agent::new(Role::Manager, manager_prompt, self.config.max_auto_reply),
            Agent::new(Role::Coder, coder_prompt, self.config.max_auto_reply),
            self.config.max_round,
            self.config.termination_marker.as_str(),
        );

        debug!(
            "Starting conversation for {} with {} ({})",
            reference,
            self.provider.name(),
            self.provider.model()
        );
        let stop_reason = chat
            .run(self.provider.as_ref(), &self.prompts.autogen_manager_agent)
            .await?;

        let (transcript, manager, coder) = chat.into_parts();
        let (total_tokens, total_cost) = file_totals([manager.usage(), coder.usage()]);

        info!(
            "{}: {} messages, stopped by {:?}, {} tokens",
            target.filename,
            transcript.len(),
            stop_reason,
            total_tokens
        );

        Ok(ConversationOutcome {
            transcript,
            stop_reason,
            manager_usage: manager.usage().clone(),
            coder_usage: coder.usage().clone(),
            total_tokens,
            total_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatRole;
    use crate::config::sample_prompts;
    use crate::conversation::testing::ScriptedProvider;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn target() -> ScanTarget {
        ScanTarget::from_text(PathBuf::from("./repo/src/app.py"), "def main():\n    pass\n")
    }

    fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
        Orchestrator::new(sample_prompts(), ConversationConfig::default(), provider)
    }

    #[test]
    fn test_reference_token_format() {
        assert_eq!(
            reference_token("abc123", "20241026T100000", "app.py"),
            "abc123_20241026T100000_app.py"
        );
    }

    #[test]
    fn test_system_prompts_substitute_file_details() {
        let orchestrator = orchestrator(Arc::new(ScriptedProvider::repeating("{}")));
        let target = target();
        let (manager, coder) = orchestrator.system_prompts(&target, "ref-1").unwrap();

        assert!(manager.contains("Review documentation output"));
        assert!(manager.contains("def main():"));
        assert!(coder.contains("Document app.py as ref-1"));
        assert!(coder.contains(r#"{"NEXTSTEP": "TERMINATE"}"#));
    }

    #[tokio::test]
    async fn test_converse_charges_both_roles() {
        let provider = Arc::new(ScriptedProvider::new([
            Ok(r#"{"SUMMARY": "s", "NEXTSTEP": "REVIEW"}"#),
            Ok("TERMINATE"),
        ]));
        let outcome = orchestrator(provider.clone())
            .converse(&target(), "20241026T100000")
            .await
            .unwrap();

        assert_eq!(outcome.stop_reason, StopReason::Terminated(Role::Manager));
        assert_eq!(outcome.transcript.len(), 3);
        assert_eq!(outcome.total_tokens, 300);
        assert!((outcome.total_cost - 0.02).abs() < 1e-12);

        // the coder saw its own system prompt first and the seed as user input
        let first = &provider.requests()[0];
        assert_eq!(first[0].role, ChatRole::System);
        assert!(first[0].content.contains("_20241026T100000_app.py"));
        assert_eq!(first[1].content, "Please document the file.");
    }

    #[tokio::test]
    async fn test_template_error_is_conversation_error() {
        let mut prompts = sample_prompts();
        prompts.core_coder_agent = "Document {unknown_field}".to_string();
        let provider = Arc::new(ScriptedProvider::repeating("{}"));
        let orchestrator = Orchestrator::new(prompts, ConversationConfig::default(), provider.clone());

        let err = orchestrator.converse(&target(), "stamp").await.unwrap_err();
        assert!(matches!(err, DocError::Conversation(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_is_conversation_error() {
        let provider = Arc::new(ScriptedProvider::new([Err("upstream 500")]));
        let err = orchestrator(provider)
            .converse(&target(), "stamp")
            .await
            .unwrap_err();

        match err {
            DocError::Conversation(message) => assert!(message.contains("upstream 500")),
            other => panic!("expected conversation error, got {:?}", other),
        }
    }
}
