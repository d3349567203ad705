//! Global Constants
//!
//! Centralized defaults for configuration and tuning.
//! Every value here can be overridden through [`crate::config::Settings`].

/// Output layout (process-relative, created on demand)
pub mod paths {
    /// JSON reports and per-file error artifacts
    pub const REPORTS_DIR: &str = "./output/";

    /// Manager feedback objects kept for prompt tuning
    pub const FEEDBACK_DIR: &str = "./feedback/";

    /// Scan log files
    pub const LOGS_DIR: &str = "./logs/";

    /// Rendered Markdown reports
    pub const MARKDOWN_DIR: &str = "./reports/";

    /// Prompt document
    pub const PROMPTS_FILE: &str = "./yaml/promptsmermaid.yml";

    /// Settings file (optional)
    pub const SETTINGS_FILE: &str = "repodoc.toml";

    /// Dotenv file with API credentials (optional)
    pub const ENV_FILE: &str = ".env";
}

/// File selection and loading
pub mod scan {
    /// Directories whose path contains this marker are skipped entirely
    pub const CHECKPOINT_MARKER: &str = "ipynb_checkpoints";

    /// Files whose name contains this fragment are skipped
    pub const SKIP_FRAGMENT: &str = ".egg";

    /// Maximum tokens a file may contain before it is rejected
    pub const CONTEXT_SIZE: usize = 120_000;

    /// Single-byte encoding tried when detection-based decoding fails
    pub const FALLBACK_ENCODING: &str = "latin1";
}

/// Two-role conversation
pub mod conversation {
    /// Manager role name as it appears in the transcript
    pub const MANAGER_NAME: &str = "core_manager_agent";

    /// Coder role name as it appears in the transcript
    pub const CODER_NAME: &str = "core_coder_agent";

    /// Maximum messages in one conversation, seed included
    pub const MAX_ROUND: usize = 20;

    /// Maximum generated replies per role
    pub const MAX_AUTO_REPLY: usize = 6;

    /// Literal that ends the conversation
    pub const TERMINATION_MARKER: &str = "TERMINATE";

    /// `NEXTSTEP` value marking a manager message as revision feedback
    pub const REVISE_MARKER: &str = "REVISE";

    /// JSON field carrying the control signal
    pub const NEXTSTEP_FIELD: &str = "NEXTSTEP";
}

/// HTTP/Network constants
pub mod network {
    /// Per-request ceiling for the LLM API (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60_000;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}

/// Timestamp formats
pub mod time {
    /// Compact stamp used in artifact file names and reference tokens
    pub const FILE_STAMP: &str = "%Y%m%dT%H%M%S";

    /// `scan_date` field of a report
    pub const SCAN_DATE: &str = "%Y-%m-%dT%H:%M:%S";

    /// Log line prefix
    pub const LOG_LINE: &str = "%Y-%m-%d %H:%M:%S,%3f";
}
