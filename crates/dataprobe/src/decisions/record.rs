//! Per-sample decision records.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::warning::ProbeWarning;

/// Merged view of one evaluated sample: what the model predicted, how
/// confident it was, and what the truth was, as far as each is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Predicted label or value.
    pub predicted: Value,
    /// Per-class probability vector, when the model exposed one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<Vec<f64>>,
    /// Ground-truth value, when it could be aligned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truth: Option<Value>,
}

impl DecisionRecord {
    /// A record holding only the prediction.
    pub fn new(predicted: impl Into<Value>) -> Self {
        Self {
            predicted: predicted.into(),
            probability: None,
            truth: None,
        }
    }
}

/// Decision records keyed by sample identifier, in insertion order.
pub type DecisionMap = IndexMap<String, DecisionRecord>;

/// Serializable, timestamped form of one split's decisions, handed to the
/// persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionArtifact {
    /// Index of the split within the run.
    pub split: u64,
    /// The merged decision records.
    pub decisions: DecisionMap,
    /// Warnings accumulated while merging.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ProbeWarning>,
    /// When the artifact was assembled.
    pub recorded_at: DateTime<Utc>,
}
