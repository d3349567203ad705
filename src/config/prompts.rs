//! Prompt Document
//!
//! The YAML document that drives the conversation. Everything under the
//! `prompts` key is read once per process and never modified.
//!
//! ```yaml
//! prompts:
//!   target: "documentation"
//!   example_schema: "..."
//!   output_example: "..."
//!   example_mermaid: "..."
//!   core_manager_agent: "You review {target} for {code} ..."
//!   core_coder_agent: "Document {filename} ({reference}) ..."
//!   autogen_manager_agent: "Start the review."
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::types::Result;

#[derive(Debug, Deserialize)]
struct PromptDocument {
    prompts: PromptSet,
}

/// Named templates and example text for one scan target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSet {
    /// What the documentation is for; rendered upper-case as the scan type
    pub target: String,
    pub example_schema: String,
    pub output_example: String,
    pub example_mermaid: String,
    /// Manager system prompt template
    pub core_manager_agent: String,
    /// Coder system prompt template
    pub core_coder_agent: String,
    /// Seed message the manager opens the conversation with
    pub autogen_manager_agent: String,
}

impl PromptSet {
    /// Load the `prompts` namespace from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading prompts from: {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let document: PromptDocument = serde_yaml::from_str(raw)?;
        Ok(document.prompts)
    }

    /// Scan-type label (`target`, upper-cased)
    pub fn scan_type(&self) -> String {
        self.target.to_uppercase()
    }
}
