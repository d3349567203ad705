pub mod error;
pub mod report;

pub use error::{DocError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use report::{REQUIRED_KEYS, ScanMetadata, ScanReport, StructuredResult};
