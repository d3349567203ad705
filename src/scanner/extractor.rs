//! Result Extractor
//!
//! Pulls the two useful outputs out of a finished transcript: revision
//! feedback from the manager (oldest first) and the newest complete
//! documentation object from the coder.

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::constants::conversation::NEXTSTEP_FIELD;
use crate::conversation::{Role, TranscriptMessage};
use crate::types::StructuredResult;

fn parse_object(content: &str) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Manager messages whose `NEXTSTEP` is `revise_marker`, in transcript order
pub fn collect_feedback(transcript: &[TranscriptMessage], revise_marker: &str) -> Vec<Value> {
    transcript
        .iter()
        .filter(|msg| msg.role == Role::Manager)
        .filter_map(|msg| match parse_object(&msg.content) {
            Ok(map) => Some(map),
            Err(e) => {
                debug!("Manager message is not JSON ({}), skipped", e);
                None
            }
        })
        .filter(|map| {
            map.get(NEXTSTEP_FIELD).and_then(Value::as_str) == Some(revise_marker)
        })
        .map(Value::Object)
        .collect()
}

/// Newest coder message carrying every required key
pub fn find_result(transcript: &[TranscriptMessage], filename: &str) -> Option<StructuredResult> {
    for msg in transcript.iter().rev().filter(|msg| msg.role == Role::Coder) {
        match parse_object(&msg.content) {
            Ok(map) => {
                if let Some(result) = StructuredResult::from_value(Value::Object(map)) {
                    return Some(result);
                }
            }
            Err(e) => error!("READ-JSON-ERROR-GROUPCHAT-MSG: {} ({})", filename, e),
        }
    }
    None
}
