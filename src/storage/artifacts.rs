//! Scan Artifacts
//!
//! Everything a scan leaves on disk: JSON reports, manager feedback and the
//! plain-text error records for files that could not be documented.
//!
//! Files are created with `create_new`; if a name is already taken a `_<n>`
//! suffix is appended so no artifact ever replaces another.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::PathsConfig;
use crate::types::{Result, ScanReport};

pub struct ArtifactWriter {
    reports_dir: PathBuf,
    feedback_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            reports_dir: paths.reports_dir.clone(),
            feedback_dir: paths.feedback_dir.clone(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn feedback_dir(&self) -> &Path {
        &self.feedback_dir
    }

    /// Create the output directories
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.reports_dir)?;
        fs::create_dir_all(&self.feedback_dir)?;
        Ok(())
    }

    /// `scan_report_<filename>_<stamp>.json`
    pub fn write_report(&self, report: &ScanReport, stamp: &str) -> Result<PathBuf> {
        let stem = format!("scan_report_{}_{}", report.metadata.filename, stamp);
        write_json(&self.reports_dir, &stem, report)
    }

    /// `feedback_report_<stamp>.json`
    pub fn write_feedback<T: Serialize>(&self, feedback: &T, stamp: &str) -> Result<PathBuf> {
        let stem = format!("feedback_report_{}", stamp);
        write_json(&self.feedback_dir, &stem, feedback)
    }

    /// `READ_ERROR_<stamp>_<filename>.txt`
    pub fn write_read_error(
        &self,
        stamp: &str,
        filename: &str,
        path: &Path,
        detail: &str,
    ) -> Result<PathBuf> {
        let message = format!(
            "ERROR: [Timestamp: {}] - [Target file corrupted: {} - Error details: {}]",
            stamp,
            path.display(),
            detail
        );
        write_text(
            &self.reports_dir,
            &format!("READ_ERROR_{}_{}", stamp, filename),
            &message,
        )
    }

    /// `TOKEN_SIZE_ERROR_<filename>_<stamp>.txt`
    pub fn write_token_error(
        &self,
        stamp: &str,
        filename: &str,
        count: usize,
        limit: usize,
    ) -> Result<PathBuf> {
        let message = format!(
            "ERROR: [Timestamp: {}] - [File Size limit exceeded: {} tokens (limit is {} tokens)]",
            stamp, count, limit
        );
        write_text(
            &self.reports_dir,
            &format!("TOKEN_SIZE_ERROR_{}_{}", filename, stamp),
            &message,
        )
    }

    /// `CONVERSATION_ERROR_<stamp>_<filename>.txt`
    pub fn write_conversation_error(
        &self,
        stamp: &str,
        filename: &str,
        path: &Path,
        detail: &str,
    ) -> Result<PathBuf> {
        let message = format!(
            "ERROR: [Timestamp: {}] - [Conversation failed: {} - Error details: {}]",
            stamp,
            path.display(),
            detail
        );
        write_text(
            &self.reports_dir,
            &format!("CONVERSATION_ERROR_{}_{}", stamp, filename),
            &message,
        )
    }
}

/// Open `<dir>/<stem>.<ext>`, or `<stem>_<n>.<ext>` if taken
fn create_unique(dir: &Path, stem: &str, ext: &str) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;

    let mut attempt = 0usize;
    loop {
        let name = if attempt == 0 {
            format!("{}.{}", stem, ext)
        } else {
            format!("{}_{}.{}", stem, attempt, ext)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, stem: &str, value: &T) -> Result<PathBuf> {
    let (file, path) = create_unique(dir, stem, "json")?;
    let mut writer = BufWriter::new(file);

    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    writer.flush()?;

    debug!("Wrote {}", path.display());
    Ok(path)
}

fn write_text(dir: &Path, stem: &str, content: &str) -> Result<PathBuf> {
    let (mut file, path) = create_unique(dir, stem, "txt")?;
    file.write_all(content.as_bytes())?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScanMetadata, StructuredResult};
    use serde_json::json;
    use tempfile::TempDir;

    fn writer(dir: &TempDir) -> ArtifactWriter {
        ArtifactWriter::new(&PathsConfig {
            reports_dir: dir.path().join("output"),
            feedback_dir: dir.path().join("feedback"),
            ..PathsConfig::default()
        })
    }

    fn report() -> ScanReport {
        let result = StructuredResult::from_value(json!({
            "SUMMARY": "s", "DataDictionary": {}, "DFD": "d", "ERD": "e", "codecontext": {}
        }))
        .unwrap();
        ScanReport::new(
            result,
            ScanMetadata {
                filename: "app.py".to_string(),
                file_path: "./repo".to_string(),
                scan_date: "2024-10-26T10:00:00".to_string(),
                scan_duration: 1.5,
                md5_hash: "abc".to_string(),
                total_tokens: 10,
                total_cost: 0.001,
                lines_of_code: 3,
                scan_type: "DOCUMENTATION".to_string(),
            },
        )
    }

    #[test]
    fn test_report_is_four_space_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = writer(&dir)
            .write_report(&report(), "20241026T100000")
            .unwrap();

        assert_eq!(
            path.file_name().unwrap(),
            "scan_report_app.py_20241026T100000.json"
        );
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n    \"SUMMARY\": \"s\""));

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["lines_of_code"], 3);
    }

    #[test]
    fn test_collisions_get_suffix() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);
        let first = writer.write_feedback(&json!({"NEXTSTEP": "REVISE"}), "T1").unwrap();
        let second = writer.write_feedback(&json!({"NEXTSTEP": "REVISE"}), "T1").unwrap();

        assert_eq!(first.file_name().unwrap(), "feedback_report_T1.json");
        assert_eq!(second.file_name().unwrap(), "feedback_report_T1_1.json");
        assert!(first.starts_with(dir.path().join("feedback")));
    }

    #[test]
    fn test_error_artifacts() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        let path = writer
            .write_token_error("T1", "big.py", 130_000, 120_000)
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "TOKEN_SIZE_ERROR_big.py_T1.txt");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "ERROR: [Timestamp: T1] - [File Size limit exceeded: 130000 tokens (limit is 120000 tokens)]"
        );

        let path = writer
            .write_read_error("T1", "bad.bin", Path::new("./repo/bad.bin"), "invalid data")
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "READ_ERROR_T1_bad.bin.txt");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "ERROR: [Timestamp: T1] - [Target file corrupted: ./repo/bad.bin - Error details: invalid data]"
        );

        let path = writer
            .write_conversation_error("T1", "app.py", Path::new("./repo/app.py"), "timeout")
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "CONVERSATION_ERROR_T1_app.py.txt");
    }
}
