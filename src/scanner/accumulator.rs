//! Run Accumulator
//!
//! Running totals for one scan. Owned by the scan loop and updated once per
//! file whatever the file's outcome.

use std::time::Duration;

/// Totals across every file of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunAccumulator {
    /// Files taken from the selector, failed ones included
    pub files_scanned: usize,
    pub lines_of_code: usize,
    pub tokens: u64,
    /// USD
    pub cost: f64,
    /// Read failures, token overflows and failed conversations
    pub errors: usize,
    /// Conversation time
    pub duration: Duration,
    pub reports_written: usize,
    pub feedback_written: usize,
    /// Conversations that ended without a usable result
    pub unextracted: usize,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_file(&mut self) -> usize {
        self.files_scanned += 1;
        self.files_scanned
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn add_lines(&mut self, lines: usize) {
        self.lines_of_code += lines;
    }

    pub fn add_usage(&mut self, tokens: u64, cost: f64) {
        self.tokens += tokens;
        self.cost += cost;
    }

    pub fn add_duration(&mut self, elapsed: Duration) {
        self.duration += elapsed;
    }
}
