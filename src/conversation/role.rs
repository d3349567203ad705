//! Conversation participants.

use serde_json::Value;

use super::group_chat::TranscriptMessage;
use super::usage::UsageReport;
use crate::ai::ChatMessage;
use crate::constants::conversation::{CODER_NAME, MANAGER_NAME, NEXTSTEP_FIELD};

/// The two participants of a documentation conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Reviews the coder's output and steers revisions
    Manager,
    /// Produces the structured documentation
    Coder,
}

impl Role {
    /// Name as it appears in the transcript and on the wire
    pub fn name(self) -> &'static str {
        match self {
            Role::Manager => MANAGER_NAME,
            Role::Coder => CODER_NAME,
        }
    }

    /// The only eligible next speaker
    pub fn other(self) -> Role {
        match self {
            Role::Manager => Role::Coder,
            Role::Coder => Role::Manager,
        }
    }

    /// Whether `content`, authored by this role, ends the conversation.
    ///
    /// The manager ends it by mentioning `marker` anywhere; the coder only
    /// through a JSON object whose `NEXTSTEP` equals `marker`.
    pub fn is_termination(self, content: &str, marker: &str) -> bool {
        match self {
            Role::Manager => content.contains(marker),
            Role::Coder => next_step(content).is_some_and(|step| step == marker),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `NEXTSTEP` of a JSON-object message, if it has one
pub fn next_step(content: &str) -> Option<String> {
    match serde_json::from_str::<Value>(content).ok()? {
        Value::Object(map) => map
            .get(NEXTSTEP_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// A role bound to its system prompt, reply budget and usage
#[derive(Debug, Clone)]
pub struct Agent {
    pub role: Role,
    pub system_prompt: String,
    pub max_auto_reply: usize,
    replies: usize,
    usage: UsageReport,
}

impl Agent {
    pub fn new(role: Role, system_prompt: String, max_auto_reply: usize) -> Self {
        Self {
            role,
            system_prompt,
            max_auto_reply,
            replies: 0,
            usage: UsageReport::default(),
        }
    }

    /// Replies generated so far
    pub fn replies(&self) -> usize {
        self.replies
    }

    pub fn can_reply(&self) -> bool {
        self.replies < self.max_auto_reply
    }

    pub fn usage(&self) -> &UsageReport {
        &self.usage
    }

    pub(crate) fn usage_mut(&mut self) -> &mut UsageReport {
        &mut self.usage
    }

    pub(crate) fn count_reply(&mut self) {
        self.replies += 1;
    }

    /// Model input for this agent's next turn: system prompt, then the
    /// transcript seen from this agent's side
    pub fn messages_for(&self, transcript: &[TranscriptMessage]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend(transcript.iter().map(|msg| {
            if msg.role == self.role {
                ChatMessage::assistant(msg.content.as_str())
            } else {
                ChatMessage::user(msg.content.as_str(), msg.role.name())
            }
        }));
        messages
    }
}
