//! repodoc - AI-Driven Per-File Documentation Reports
//!
//! Walks a source tree and, for every file, runs a two-role language-model
//! conversation (a manager reviewing a coder) that produces structured
//! documentation: a summary, data-flow and entity-relationship diagrams, a
//! data dictionary and a code-context table. Results are persisted as JSON
//! and can later be rendered to Markdown.
//!
//! ## Pipeline
//!
//! ```text
//! FileSelector → ContentLoader → TokenGuard → Orchestrator → extractor → ArtifactWriter
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use repodoc::{ConfigLoader, FileSelector, PromptSet, Scanner};
//! use repodoc::ai::{PricingTable, create_provider};
//!
//! let settings = ConfigLoader::load(Path::new("repodoc.toml"))?;
//! let prompts = PromptSet::load(&settings.paths.prompts_file)?;
//! let provider = create_provider(&settings.llm, PricingTable::new(settings.pricing.clone()))?;
//! let scanner = Scanner::new(&settings, prompts, provider)?;
//! let selector = FileSelector::new("./my-repo", &settings.scan)?;
//! let totals = scanner.run(&selector, &mut ()).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction, prompt rendering, token guard
//! - [`conversation`]: roles, group chat loop and usage accounting
//! - [`scanner`]: file selection, loading, extraction and the scan loop
//! - [`storage`]: report, feedback and error artifacts
//! - [`render`]: Markdown rendering of persisted reports
//! - [`config`]: settings and the prompt document

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod render;
pub mod scanner;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{ConfigLoader, PromptSet, Settings};

// Error Types
pub use types::error::{DocError, ErrorCategory, Result};

// Reports
pub use types::{ScanMetadata, ScanReport, StructuredResult};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use conversation::{ConversationOutcome, Orchestrator, Role};
pub use scanner::{FileOutcome, FileSelector, RunAccumulator, ScanObserver, Scanner};
pub use storage::ArtifactWriter;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{LlmProvider, LlmResponse, SharedProvider, TokenGuard};
