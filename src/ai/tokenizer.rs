//! Token Counting and the Per-File Budget Guard
//!
//! The model API has a hard input ceiling, so every file is counted before a
//! conversation is started and rejected early when it cannot fit.
//!
//! ## Strategy
//! - One fixed BPE vocabulary (`cl100k_base`) for the whole run, so counts
//!   are comparable across files and runs
//! - `count <= limit` passes, `count > limit` is rejected

use std::fmt;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::types::{DocError, Result};

/// Token counter over the `cl100k_base` vocabulary
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("vocabulary", &"cl100k_base")
            .finish()
    }
}

impl TokenCounter {
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| DocError::Config(format!("cl100k_base vocabulary: {}", e)))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    /// Number of tokens in `text`; special-token text is encoded literally
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Rejects decoded content that exceeds the configured context size
#[derive(Debug, Clone)]
pub struct TokenGuard {
    counter: TokenCounter,
    limit: usize,
}

impl TokenGuard {
    pub fn new(limit: usize) -> Result<Self> {
        Ok(Self::with_counter(TokenCounter::cl100k()?, limit))
    }

    pub fn with_counter(counter: TokenCounter, limit: usize) -> Self {
        Self { counter, limit }
    }

    pub fn count(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Returns the token count, or `DocError::TokenLimit` when over budget
    pub fn check(&self, text: &str, filename: &str) -> Result<usize> {
        let count = self.count(text);
        if count > self.limit {
            return Err(DocError::TokenLimit {
                count,
                limit: self.limit,
            });
        }
        debug!("{}: {} tokens (limit {})", filename, count, self.limit);
        Ok(count)
    }
}
