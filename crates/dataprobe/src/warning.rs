//! Structured warnings accumulated by crawls and aggregations.
//!
//! Extraction and aggregation never fail outright. Every degraded step is
//! recorded as a [`ProbeWarning`] in the returned output and mirrored to the
//! `tracing` subscriber at warn level, so callers get visibility without a
//! change in control flow.

use serde::{Deserialize, Serialize};

/// A non-fatal problem encountered while crawling or aggregating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeWarning {
    /// Component that degraded (e.g. `"array_strategy"`).
    pub source: String,
    /// Human-readable description of what was skipped or substituted.
    pub message: String,
}

impl ProbeWarning {
    /// Create a new warning.
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Record a warning: emit it through `tracing` and push it onto `sink`.
    pub fn record(sink: &mut Vec<ProbeWarning>, source: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(source, "{message}");
        sink.push(ProbeWarning::new(source, message));
    }
}

impl std::fmt::Display for ProbeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.source, self.message)
    }
}
