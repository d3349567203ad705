//! Scan Pipeline
//!
//! Processes selected files one at a time:
//!
//! ```text
//! load → token guard → conversation → extract → write report / feedback
//! ```
//!
//! Read failures, token overflows and failed conversations are recorded as
//! text artifacts and counted; the loop moves on to the next file. Only
//! failures to write artifacts end the run.

use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use super::accumulator::RunAccumulator;
use super::extractor::{collect_feedback, find_result};
use super::loader::ContentLoader;
use super::selector::FileSelector;
use crate::ai::{SharedProvider, TokenGuard};
use crate::config::{PromptSet, Settings};
use crate::constants::time;
use crate::conversation::Orchestrator;
use crate::storage::ArtifactWriter;
use crate::types::{DocError, Result, ScanMetadata, ScanReport};

/// What happened to one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// A report was written
    Documented { report: PathBuf, feedback: usize },
    /// The conversation finished without a usable result
    NoResult { feedback: usize },
    ReadError { artifact: PathBuf },
    TokenLimit { count: usize, limit: usize, artifact: PathBuf },
    ConversationFailed { artifact: PathBuf },
}

impl FileOutcome {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            FileOutcome::ReadError { .. }
                | FileOutcome::TokenLimit { .. }
                | FileOutcome::ConversationFailed { .. }
        )
    }
}

/// Progress hooks for the scan loop
pub trait ScanObserver {
    fn file_started(&mut self, _index: usize, _path: &Path) {}

    fn file_finished(&mut self, _path: &Path, _outcome: &FileOutcome, _totals: &RunAccumulator) {}
}

impl ScanObserver for () {}

fn stamp() -> String {
    Local::now().format(time::FILE_STAMP).to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Scanner {
    loader: ContentLoader,
    guard: TokenGuard,
    orchestrator: Orchestrator,
    writer: ArtifactWriter,
    revise_marker: String,
    scan_type: String,
}

impl Scanner {
    pub fn new(settings: &Settings, prompts: PromptSet, provider: SharedProvider) -> Result<Self> {
        let writer = ArtifactWriter::new(&settings.paths);
        writer.ensure_dirs()?;

        Ok(Self {
            loader: ContentLoader::new(&settings.scan.fallback_encoding)?,
            guard: TokenGuard::new(settings.scan.context_size)?,
            scan_type: prompts.scan_type(),
            orchestrator: Orchestrator::new(prompts, settings.conversation.clone(), provider),
            writer,
            revise_marker: settings.conversation.revise_marker.clone(),
        })
    }

    pub fn scan_type(&self) -> &str {
        &self.scan_type
    }

    /// Scan every file `selector` yields, in order
    pub async fn run<O: ScanObserver>(
        &self,
        selector: &FileSelector,
        observer: &mut O,
    ) -> Result<RunAccumulator> {
        let mut totals = RunAccumulator::new();

        for path in selector.files() {
            let index = totals.files_scanned + 1;
            observer.file_started(index, &path);
            let outcome = self.scan_file(&path, &mut totals).await?;
            observer.file_finished(&path, &outcome, &totals);
        }

        info!(
            "Scan complete: {} files, {} reports, {} errors",
            totals.files_scanned, totals.reports_written, totals.errors
        );
        Ok(totals)
    }

    /// Scan one file and fold its results into `totals`
    pub async fn scan_file(&self, path: &Path, totals: &mut RunAccumulator) -> Result<FileOutcome> {
        totals.start_file();
        let filename = file_name(path);

        let target = match self.loader.load(path) {
            Ok(target) => target,
            Err(DocError::Read { path, message }) => {
                let stamp = stamp();
                let artifact = self
                    .writer
                    .write_read_error(&stamp, &filename, &path, &message)?;
                error!(
                    "ERROR: [Timestamp: {}] - [Target file corrupted: {} - Error details: {}]",
                    stamp,
                    path.display(),
                    message
                );
                totals.record_error();
                return Ok(FileOutcome::ReadError { artifact });
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.guard.check(&target.text, &filename) {
            let DocError::TokenLimit { count, limit } = e else {
                return Err(e);
            };
            let stamp = stamp();
            let artifact = self
                .writer
                .write_token_error(&stamp, &filename, count, limit)?;
            error!(
                "ERROR: [Timestamp: {}] - [File Size limit exceeded: {} tokens (limit is {} tokens)]",
                stamp, count, limit
            );
            totals.record_error();
            return Ok(FileOutcome::TokenLimit {
                count,
                limit,
                artifact,
            });
        }

        totals.add_lines(target.line_count);

        let started = Instant::now();
        let conversation = self.orchestrator.converse(&target, &stamp()).await;
        let elapsed = started.elapsed();
        totals.add_duration(elapsed);

        let outcome = match conversation {
            Ok(outcome) => outcome,
            Err(e) if e.is_per_file() => {
                error!("Agent conversation failed for {}: {}", target.path.display(), e);
                let artifact = self.writer.write_conversation_error(
                    &stamp(),
                    &filename,
                    &target.path,
                    &e.to_string(),
                )?;
                totals.record_error();
                return Ok(FileOutcome::ConversationFailed { artifact });
            }
            Err(e) => return Err(e),
        };

        totals.add_usage(outcome.total_tokens, outcome.total_cost);

        let feedback = collect_feedback(&outcome.transcript, &self.revise_marker);
        for item in &feedback {
            let written = self.writer.write_feedback(item, &stamp())?;
            info!("Feedback saved to {}", written.display());
            totals.feedback_written += 1;
        }

        let Some(result) = find_result(&outcome.transcript, &filename) else {
            warn!(
                "No structured result for {} after {} messages",
                target.path.display(),
                outcome.transcript.len()
            );
            totals.unextracted += 1;
            return Ok(FileOutcome::NoResult {
                feedback: feedback.len(),
            });
        };

        let metadata = ScanMetadata {
            filename: target.filename.clone(),
            file_path: target.directory.clone(),
            scan_date: Local::now().format(time::SCAN_DATE).to_string(),
            scan_duration: elapsed.as_secs_f64(),
            md5_hash: target.md5.clone(),
            total_tokens: outcome.total_tokens,
            total_cost: outcome.total_cost,
            lines_of_code: target.line_count,
            scan_type: self.scan_type.clone(),
        };
        let report = self
            .writer
            .write_report(&ScanReport::new(result, metadata), &stamp())?;
        info!("Report saved to {}", report.display());
        totals.reports_written += 1;

        Ok(FileOutcome::Documented {
            report,
            feedback: feedback.len(),
        })
    }
}
