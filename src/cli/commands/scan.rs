//! Scan Command
//!
//! Documents every selected file of a repository and prints running totals.

use std::path::Path;

use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::ai::{PricingTable, create_provider};
use crate::cli::banner;
use crate::config::{PromptSet, Settings};
use crate::scanner::{FileOutcome, FileSelector, RunAccumulator, ScanObserver, Scanner};
use crate::types::{DocError, Result};

/// Prints a status line before and a banner after each file
struct ConsoleObserver<'a> {
    scan_type: &'a str,
}

impl ScanObserver for ConsoleObserver<'_> {
    fn file_started(&mut self, index: usize, path: &Path) {
        banner::print_status(index, path, self.scan_type);
    }

    fn file_finished(&mut self, _path: &Path, _outcome: &FileOutcome, totals: &RunAccumulator) {
        banner::print_small(totals);
    }
}

/// Log and build the error for a scan root that is not a directory
pub fn invalid_root(repo: &Path) -> DocError {
    error!("Invalid directory specified: {}", repo.display());
    DocError::InvalidRoot(repo.to_path_buf())
}

pub fn run(settings: &Settings, repo: &Path) -> Result<RunAccumulator> {
    if !repo.is_dir() {
        return Err(invalid_root(repo));
    }

    let prompts = PromptSet::load(&settings.paths.prompts_file).map_err(|e| {
        error!(
            "Error loading YAML file {}: {}",
            settings.paths.prompts_file.display(),
            e
        );
        e
    })?;

    let provider = create_provider(&settings.llm, PricingTable::new(settings.pricing.clone()))?;
    info!(
        "Using {} model {} for {}",
        provider.name(),
        provider.model(),
        repo.display()
    );

    let scanner = Scanner::new(settings, prompts, provider)?;
    let selector = FileSelector::new(repo, &settings.scan)?;
    let scan_type = scanner.scan_type().to_string();

    banner::print_start(&scan_type);

    let rt = Runtime::new()?;
    let mut observer = ConsoleObserver {
        scan_type: &scan_type,
    };
    let totals = rt.block_on(scanner.run(&selector, &mut observer))?;

    banner::print_full(&totals, &scan_type);
    info!("{}", banner::tally_line(&totals, &scan_type));

    Ok(totals)
}
