//! Markdown Renderer
//!
//! Offline pass that turns persisted JSON reports into Markdown pages. The
//! layout is fixed; table cells are written as-is without escaping and the
//! diagrams are not validated.

use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::types::{Result, ScanReport};

/// Cell text for an absent codecontext detail
pub const PLACEHOLDER: &str = "N/A";

/// Outcome of rendering a directory
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub rendered: Vec<PathBuf>,
    /// Inputs that could not be read or parsed
    pub skipped: Vec<PathBuf>,
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field_text(report: &ScanReport, key: &str) -> String {
    report.field(key).map(text).unwrap_or_default()
}

/// Wrap a diagram in a mermaid fence unless it already carries one
fn diagram_block(diagram: &str) -> String {
    let trimmed = diagram.trim();
    if trimmed.starts_with("```") {
        trimmed.to_string()
    } else {
        format!("```mermaid\n{}\n```", trimmed)
    }
}

fn data_dictionary_rows(out: &mut String, dictionary: Option<&Value>) {
    let Some(Value::Object(components)) = dictionary else {
        return;
    };
    for (component, fields) in components {
        match fields {
            Value::Object(fields) => {
                for (field, description) in fields {
                    let _ = writeln!(out, "| {} | {} | {} |", component, field, text(description));
                }
            }
            other => {
                let _ = writeln!(out, "| {} | {} | {} |", component, PLACEHOLDER, text(other));
            }
        }
    }
}

fn code_context_rows(out: &mut String, context: Option<&Value>) {
    let Some(Value::Object(functions)) = context else {
        return;
    };
    for (function, details) in functions {
        let detail = |key: &str| {
            details
                .get(key)
                .map(text)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            function,
            detail("Description"),
            detail("Error Handling"),
            detail("Output")
        );
    }
}

/// Render one report as Markdown
pub fn render_markdown(report: &ScanReport) -> String {
    let meta = &report.metadata;
    let mut out = String::new();

    out.push_str("# Summary\n\n");
    out.push_str(&field_text(report, "SUMMARY"));
    out.push_str("\n\n");

    out.push_str("## Data Flow Diagram\n\n");
    out.push_str(&diagram_block(&field_text(report, "DFD")));
    out.push_str("\n\n");

    out.push_str("## Entity Relationship Diagram\n\n");
    out.push_str(&diagram_block(&field_text(report, "ERD")));
    out.push_str("\n\n");

    out.push_str("## Data Dictionary\n\n");
    out.push_str("| Component | Field | Description |\n");
    out.push_str("|-----------|-------|-------------|\n");
    data_dictionary_rows(&mut out, report.field("DataDictionary"));
    out.push('\n');

    out.push_str("## Code Context\n\n");
    out.push_str("| Function | Description | Error Handling | Output |\n");
    out.push_str("|----------|-------------|----------------|--------|\n");
    code_context_rows(&mut out, report.field("codecontext"));
    out.push('\n');

    out.push_str("## Scan Information\n\n");
    out.push_str("| Filename | File Path | Scan Date | Scan Duration (s) | MD5 Hash | Total Tokens | Total Cost (USD) | Lines of Code | Scan Type |\n");
    out.push_str("|----------|-----------|-----------|------------------|----------|--------------|-----------------|---------------|-----------|\n");
    let _ = writeln!(
        out,
        "| {} | {} | {} | {:.2} | {} | {} | ${:.5} | {} | {} |",
        meta.filename,
        meta.file_path,
        meta.scan_date,
        meta.scan_duration,
        meta.md5_hash,
        meta.total_tokens,
        meta.total_cost,
        meta.lines_of_code,
        meta.scan_type
    );

    out
}

/// JSON files directly inside `dir`, sorted by name
fn json_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    inputs.sort();
    Ok(inputs)
}

fn load_report(path: &Path) -> Result<ScanReport> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Render every `*.json` report in `input` into `<stem>.md` under `output`
pub fn render_directory(input: &Path, output: &Path) -> Result<RenderSummary> {
    fs::create_dir_all(output)?;
    let mut summary = RenderSummary::default();

    for path in json_inputs(input)? {
        let report = match load_report(&path) {
            Ok(report) => report,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                summary.skipped.push(path);
                continue;
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let destination = output.join(format!("{}.md", stem));
        fs::write(&destination, render_markdown(&report))?;
        debug!("Rendered {} -> {}", path.display(), destination.display());
        summary.rendered.push(destination);
    }

    info!(
        "Rendered {} reports ({} skipped) into {}",
        summary.rendered.len(),
        summary.skipped.len(),
        output.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn report_json() -> Value {
        json!({
            "SUMMARY": "Handles user signup.",
            "DFD": "graph TD; User-->API",
            "ERD": "```mermaid\nerDiagram\n USER ||--o{ ORDER : places\n```",
            "DataDictionary": {
                "User": {"id": "Primary key", "email": "Login address"},
                "Order": {"id": "Primary key", "total": "Amount in cents"}
            },
            "codecontext": {
                "signup": {"Description": "Creates a user", "Output": "User row"}
            },
            "filename": "signup.py",
            "file_path": "./repo/api",
            "scan_date": "2024-10-26T10:00:00",
            "scan_duration": 12.3456,
            "md5_hash": "d41d8cd98f00b204e9800998ecf8427e",
            "total_tokens": 1234,
            "total_cost": 0.0123456,
            "lines_of_code": 88,
            "scan_type": "DOCUMENTATION"
        })
    }

    fn report() -> ScanReport {
        serde_json::from_value(report_json()).unwrap()
    }

    fn table_rows<'a>(markdown: &'a str, heading: &str) -> Vec<&'a str> {
        markdown
            .split(heading)
            .nth(1)
            .unwrap()
            .lines()
            .skip(3) // blank, header, separator
            .take_while(|line| line.starts_with('|'))
            .collect()
    }

    #[test]
    fn test_data_dictionary_one_row_per_field() {
        let markdown = render_markdown(&report());
        let rows = table_rows(&markdown, "## Data Dictionary\n");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "| User | id | Primary key |");
        assert_eq!(rows[3], "| Order | total | Amount in cents |");
    }

    #[test]
    fn test_missing_code_context_detail_uses_placeholder() {
        let markdown = render_markdown(&report());
        let rows = table_rows(&markdown, "## Code Context\n");
        assert_eq!(rows, vec!["| signup | Creates a user | N/A | User row |"]);
    }

    #[test]
    fn test_layout_and_metadata_row() {
        let markdown = render_markdown(&report());

        let headings: Vec<&str> = markdown.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(
            headings,
            vec![
                "# Summary",
                "## Data Flow Diagram",
                "## Entity Relationship Diagram",
                "## Data Dictionary",
                "## Code Context",
                "## Scan Information",
            ]
        );
        assert!(markdown.contains("```mermaid\ngraph TD; User-->API\n```"));
        // already fenced diagrams are not fenced twice
        assert_eq!(markdown.matches("```mermaid").count(), 2);
        assert!(markdown.contains(
            "| signup.py | ./repo/api | 2024-10-26T10:00:00 | 12.35 | d41d8cd98f00b204e9800998ecf8427e | 1234 | $0.01235 | 88 | DOCUMENTATION |"
        ));
    }

    #[test]
    fn test_render_directory_skips_bad_reports() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("output");
        let output = dir.path().join("reports");
        fs::create_dir_all(&input).unwrap();

        fs::write(
            input.join("scan_report_signup.py_20241026T100000.json"),
            serde_json::to_string_pretty(&report_json()).unwrap(),
        )
        .unwrap();
        fs::write(input.join("broken.json"), "{ not json").unwrap();
        fs::write(input.join("READ_ERROR_x.txt"), "ERROR").unwrap();

        let summary = render_directory(&input, &output).unwrap();
        assert_eq!(summary.rendered.len(), 1);
        assert_eq!(summary.skipped.len(), 1);
        assert!(output
            .join("scan_report_signup.py_20241026T100000.md")
            .is_file());
    }
}
