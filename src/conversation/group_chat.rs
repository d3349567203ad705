//! Two-party group chat
//!
//! The manager opens with a seed message; afterwards the speakers strictly
//! alternate because the only eligible candidate is always the other
//! participant. The chat stops when:
//! - a reply satisfies its author's termination predicate, or the seed is
//!   exactly the termination marker
//! - the transcript reaches `max_round` messages (seed included)
//! - the next speaker has used up its auto-reply budget

use tracing::debug;

use super::role::{Agent, Role};
use crate::ai::LlmProvider;
use crate::types::{DocError, Result};

/// One message in a conversation transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptMessage {
    pub role: Role,
    pub name: &'static str,
    pub content: String,
}

impl TranscriptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            name: role.name(),
            content: content.into(),
        }
    }
}

/// Why a chat ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A message from this role met its termination predicate
    Terminated(Role),
    MaxRound,
    /// This role was due to speak but had no replies left
    ReplyBudget(Role),
}

/// Group chat between a manager and a coder
#[derive(Debug)]
pub struct GroupChat {
    manager: Agent,
    coder: Agent,
    max_round: usize,
    termination_marker: String,
    transcript: Vec<TranscriptMessage>,
}

impl GroupChat {
    pub fn new(
        manager: Agent,
        coder: Agent,
        max_round: usize,
        termination_marker: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            coder,
            max_round,
            termination_marker: termination_marker.into(),
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    pub fn agent(&self, role: Role) -> &Agent {
        match role {
            Role::Manager => &self.manager,
            Role::Coder => &self.coder,
        }
    }

    fn agent_mut(&mut self, role: Role) -> &mut Agent {
        match role {
            Role::Manager => &mut self.manager,
            Role::Coder => &mut self.coder,
        }
    }

    /// Consume the chat, returning the transcript and both agents
    pub fn into_parts(self) -> (Vec<TranscriptMessage>, Agent, Agent) {
        (self.transcript, self.manager, self.coder)
    }

    fn push(&mut self, message: TranscriptMessage) -> bool {
        let done = message
            .role
            .is_termination(&message.content, &self.termination_marker);
        self.transcript.push(message);
        done
    }

    /// The seed is not judged by the manager's predicate; it only ends the
    /// chat when it is the bare marker
    fn push_seed(&mut self, seed: &str) -> bool {
        self.transcript.push(TranscriptMessage::new(Role::Manager, seed));
        seed.trim() == self.termination_marker
    }

    /// Run the chat to completion, starting from the manager's `seed`
    pub async fn run(&mut self, provider: &dyn LlmProvider, seed: &str) -> Result<StopReason> {
        if !self.transcript.is_empty() {
            return Err(DocError::Conversation(
                "group chat has already been run".to_string(),
            ));
        }

        let mut speaker = Role::Manager;
        if self.push_seed(seed) {
            return Ok(StopReason::Terminated(speaker));
        }

        loop {
            if self.transcript.len() >= self.max_round {
                debug!("Group chat reached max_round ({})", self.max_round);
                return Ok(StopReason::MaxRound);
            }

            speaker = speaker.other();
            if !self.agent(speaker).can_reply() {
                debug!("{} exhausted its auto-reply budget", speaker);
                return Ok(StopReason::ReplyBudget(speaker));
            }

            let messages = self.agent(speaker).messages_for(&self.transcript);
            let response = provider.chat(&messages).await?;
            debug!(
                "{} replied ({} tokens) at round {}",
                speaker,
                response.usage.total(),
                self.transcript.len() + 1
            );

            let agent = self.agent_mut(speaker);
            agent.count_reply();
            let model = if response.metadata.model.is_empty() {
                provider.model()
            } else {
                response.metadata.model.as_str()
            };
            agent
                .usage_mut()
                .record(model, &response.usage, response.cost_usd);

            if self.push(TranscriptMessage::new(speaker, response.content)) {
                return Ok(StopReason::Terminated(speaker));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::testing::ScriptedProvider;

    fn chat(max_round: usize, max_auto_reply: usize) -> GroupChat {
        GroupChat::new(
            Agent::new(Role::Manager, "manager rules".to_string(), max_auto_reply),
            Agent::new(Role::Coder, "coder rules".to_string(), max_auto_reply),
            max_round,
            "TERMINATE",
        )
    }

    #[tokio::test]
    async fn test_alternates_and_stops_on_coder_termination() {
        let provider = ScriptedProvider::new([
            Ok(r#"{"SUMMARY": "draft"}"#),
            Ok(r#"{"NEXTSTEP": "REVISE", "feedback": "add ERD"}"#),
            Ok(r#"{"SUMMARY": "final", "NEXTSTEP": "TERMINATE"}"#),
        ]);
        let mut chat = chat(20, 6);

        let reason = chat.run(&provider, "go").await.unwrap();
        assert_eq!(reason, StopReason::Terminated(Role::Coder));

        let roles: Vec<Role> = chat.transcript().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::Manager, Role::Coder, Role::Manager, Role::Coder]
        );
        // no speaker ever follows itself
        assert!(roles.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(chat.agent(Role::Coder).replies(), 2);
        assert_eq!(chat.agent(Role::Manager).replies(), 1);
    }

    #[tokio::test]
    async fn test_manager_mention_terminates() {
        let provider = ScriptedProvider::new([Ok("{}"), Ok("Approved. TERMINATE")]);
        let mut chat = chat(20, 6);

        let reason = chat.run(&provider, "go").await.unwrap();
        assert_eq!(reason, StopReason::Terminated(Role::Manager));
        assert_eq!(chat.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_round_limit_counts_seed() {
        let provider = ScriptedProvider::repeating("{}");
        let mut chat = chat(5, 100);

        let reason = chat.run(&provider, "go").await.unwrap();
        assert_eq!(reason, StopReason::MaxRound);
        assert_eq!(chat.transcript().len(), 5);
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn test_reply_budget_stops_chat() {
        let provider = ScriptedProvider::repeating("{}");
        let mut chat = chat(20, 2);

        let reason = chat.run(&provider, "go").await.unwrap();
        // seed, coder, manager, coder, manager; then the coder is out
        assert_eq!(reason, StopReason::ReplyBudget(Role::Coder));
        assert_eq!(chat.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_usage_recorded_per_role() {
        let provider = ScriptedProvider::new([Ok("{}"), Ok("TERMINATE")]);
        let mut chat = chat(20, 6);
        chat.run(&provider, "go").await.unwrap();

        let coder = chat.agent(Role::Coder).usage().first_entry().unwrap();
        assert_eq!(coder.model, "mock-model");
        assert_eq!(coder.total_tokens, 150);
        assert!(chat.agent(Role::Manager).usage().first_entry().is_some());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = ScriptedProvider::new([Ok("{}"), Err("rate limited")]);
        let mut chat = chat(20, 6);

        assert!(chat.run(&provider, "go").await.is_err());
        assert_eq!(chat.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_mentioning_marker_does_not_end_chat() {
        let provider = ScriptedProvider::new([Ok(r#"{"NEXTSTEP": "TERMINATE"}"#)]);
        let mut chat = chat(20, 6);

        let reason = chat
            .run(
                &provider,
                "Document the file. Reply TERMINATE once the JSON is approved.",
            )
            .await
            .unwrap();
        assert_eq!(reason, StopReason::Terminated(Role::Coder));
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_bare_marker_seed_ends_chat() {
        let provider = ScriptedProvider::repeating("{}");
        let mut chat = chat(20, 6);

        let reason = chat.run(&provider, "TERMINATE").await.unwrap();
        assert_eq!(reason, StopReason::Terminated(Role::Manager));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_runs_once() {
        let provider = ScriptedProvider::new([Ok("TERMINATE")]);
        let mut chat = chat(20, 6);
        chat.run(&provider, "TERMINATE").await.unwrap();
        assert!(chat.run(&provider, "again").await.is_err());
    }
}
