//! Repository scanning
//!
//! Selects files, loads them, runs the documentation conversation and
//! persists what comes out.

pub mod accumulator;
pub mod extractor;
pub mod loader;
pub mod pipeline;
pub mod selector;

pub use accumulator::RunAccumulator;
pub use extractor::{collect_feedback, find_result};
pub use loader::{ContentLoader, ScanTarget, decode_with, detect_encoding, md5_hex};
pub use pipeline::{FileOutcome, ScanObserver, Scanner};
pub use selector::FileSelector;
