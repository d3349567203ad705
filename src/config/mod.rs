//! Configuration Management
//!
//! Two documents drive a run:
//! - **Settings** (`repodoc.toml` + environment): paths, limits, provider
//! - **Prompts** (YAML): the templates and examples fed to the conversation

mod loader;
mod prompts;
mod types;

pub use loader::ConfigLoader;
pub use prompts::PromptSet;
pub use types::*;

#[cfg(test)]
pub(crate) use prompts::tests::sample as sample_prompts;
