//! Structured documentation result and the persisted per-file report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys a coder message must carry to be accepted as a result
pub const REQUIRED_KEYS: [&str; 5] = ["SUMMARY", "DataDictionary", "DFD", "ERD", "codecontext"];

/// Metadata keys merged into a report; they replace same-named keys from the model
const METADATA_KEYS: [&str; 9] = [
    "filename",
    "file_path",
    "scan_date",
    "scan_duration",
    "md5_hash",
    "total_tokens",
    "total_cost",
    "lines_of_code",
    "scan_type",
];

/// Validated documentation object produced by the coder role.
///
/// Key order is preserved exactly as the model emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredResult(Map<String, Value>);

impl StructuredResult {
    /// Accept `value` only if it is an object containing every required key
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) if Self::has_required_keys(&map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn has_required_keys(map: &Map<String, Value>) -> bool {
        REQUIRED_KEYS.iter().all(|key| map.contains_key(*key))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Scan metadata attached to every persisted result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub filename: String,
    pub file_path: String,
    pub scan_date: String,
    /// Seconds
    pub scan_duration: f64,
    pub md5_hash: String,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub lines_of_code: usize,
    pub scan_type: String,
}

/// One persisted report: the structured result flattened with scan metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(flatten)]
    pub result: Map<String, Value>,
    #[serde(flatten)]
    pub metadata: ScanMetadata,
}

impl ScanReport {
    pub fn new(result: StructuredResult, metadata: ScanMetadata) -> Self {
        let mut result = result.into_inner();
        for key in METADATA_KEYS {
            result.shift_remove(key);
        }
        Self { result, metadata }
    }

    /// Field of the structured part, if present
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.result.get(key)
    }
}
