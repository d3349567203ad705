//! Render Command
//!
//! Converts the JSON reports of earlier scans into Markdown.

use console::style;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::render::{RenderSummary, render_directory};
use crate::types::Result;

pub fn run(
    settings: &Settings,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<RenderSummary> {
    let input = input.unwrap_or_else(|| settings.paths.reports_dir.clone());
    let output = output.unwrap_or_else(|| settings.paths.markdown_dir.clone());

    let summary = render_directory(&input, &output)?;
    print_summary(&summary, &output);
    Ok(summary)
}

fn print_summary(summary: &RenderSummary, output: &Path) {
    println!(
        "{} Rendered {} reports into {}",
        style("✓").green(),
        summary.rendered.len(),
        output.display()
    );
    for skipped in &summary.skipped {
        println!("{} Skipped {}", style("⚠").yellow(), skipped.display());
    }
}
