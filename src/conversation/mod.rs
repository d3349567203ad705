//! Two-role documentation conversation
//!
//! A manager and a coder take turns over one source file until the coder
//! produces an accepted result, the manager signs off, or a limit is hit.

pub mod group_chat;
pub mod orchestrator;
pub mod role;
pub mod usage;

#[cfg(test)]
pub(crate) mod testing;

pub use group_chat::{GroupChat, StopReason, TranscriptMessage};
pub use orchestrator::{ConversationOutcome, Orchestrator, reference_token};
pub use role::{Agent, Role, next_step};
pub use usage::{ModelUsage, UsageReport, file_totals};
