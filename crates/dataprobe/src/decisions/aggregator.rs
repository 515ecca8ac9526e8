//! Merge of per-run prediction signals into keyed decision records.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::warning::ProbeWarning;

use super::record::{DecisionArtifact, DecisionMap, DecisionRecord};

const SOURCE: &str = "decision_aggregator";

/// Split membership captured by an instrumented splitter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitInfo {
    /// Identifiers of the evaluated (test) samples, positionally aligned
    /// with the prediction sequence.
    pub test: Vec<Value>,
}

impl SplitInfo {
    /// Create split info from test-sample identifiers.
    pub fn new(test: Vec<Value>) -> Self {
        Self { test }
    }
}

/// The ephemeral signals one aggregation works from. Everything beyond the
/// predictions is optional; whatever is present is merged.
#[derive(Debug, Clone, Default)]
pub struct DecisionInputs {
    /// Raw predictions, one per evaluated sample.
    pub predictions: Vec<Value>,
    /// Per-sample probability vectors, positionally aligned.
    pub probabilities: Option<Vec<Vec<f64>>>,
    /// Split membership for the evaluated samples.
    pub split: Option<SplitInfo>,
    /// Captured ground-truth values, indexed by sample position.
    pub targets: Option<Vec<Value>>,
}

impl DecisionInputs {
    /// Inputs holding only predictions.
    pub fn new(predictions: Vec<Value>) -> Self {
        Self {
            predictions,
            ..Self::default()
        }
    }

    /// Attach probability vectors.
    pub fn with_probabilities(mut self, probabilities: Vec<Vec<f64>>) -> Self {
        self.probabilities = Some(probabilities);
        self
    }

    /// Attach split membership.
    pub fn with_split(mut self, split: SplitInfo) -> Self {
        self.split = Some(split);
        self
    }

    /// Attach ground-truth values.
    pub fn with_targets(mut self, targets: Vec<Value>) -> Self {
        self.targets = Some(targets);
        self
    }
}

/// Result of one aggregation: the merged records plus any warnings.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Decision records keyed by sample identifier.
    pub decisions: DecisionMap,
    /// Non-fatal problems encountered while merging.
    pub warnings: Vec<ProbeWarning>,
}

impl Aggregation {
    /// Package as a timestamped artifact for the persistence collaborator.
    pub fn into_artifact(self, split: u64) -> DecisionArtifact {
        DecisionArtifact {
            split,
            decisions: self.decisions,
            warnings: self.warnings,
            recorded_at: Utc::now(),
        }
    }
}

/// Merge predictions, probabilities, and targets into keyed records.
///
/// Keys come from the split's test-sample identifiers, positionally aligned
/// with the predictions; without split info they fall back to stringified
/// positional indices. Truth values are attached by parsing each key back
/// into a position in the target sequence; keys that are not positional
/// (i.e. external sample identifiers) are warned about and left without a
/// truth value.
pub fn aggregate(inputs: &DecisionInputs) -> Aggregation {
    let mut warnings = Vec::new();
    let mut decisions = DecisionMap::new();

    match &inputs.split {
        Some(split) => {
            for (position, sample) in split.test.iter().enumerate() {
                match inputs.predictions.get(position) {
                    Some(predicted) => {
                        decisions
                            .insert(sample_key(sample), DecisionRecord::new(predicted.clone()));
                    }
                    None => {
                        ProbeWarning::record(
                            &mut warnings,
                            SOURCE,
                            format!(
                                "split lists {} test samples but only {} predictions are available",
                                split.test.len(),
                                inputs.predictions.len()
                            ),
                        );
                        break;
                    }
                }
            }
            if let Some(probabilities) = &inputs.probabilities {
                for (position, sample) in split.test.iter().enumerate() {
                    let key = sample_key(sample);
                    if let Some(record) = decisions.get_mut(&key) {
                        match probabilities.get(position) {
                            Some(vector) => record.probability = Some(vector.clone()),
                            None => ProbeWarning::record(
                                &mut warnings,
                                SOURCE,
                                format!("no probability vector for sample '{key}'"),
                            ),
                        }
                    }
                }
            }
        }
        None => {
            ProbeWarning::record(
                &mut warnings,
                SOURCE,
                "no split information available for the current run; decisions are keyed by \
                 position and may be missing truth values",
            );
            for (position, predicted) in inputs.predictions.iter().enumerate() {
                decisions.insert(position.to_string(), DecisionRecord::new(predicted.clone()));
            }
            if let Some(probabilities) = &inputs.probabilities {
                for (position, record) in decisions.values_mut().enumerate() {
                    match probabilities.get(position) {
                        Some(vector) => record.probability = Some(vector.clone()),
                        None => ProbeWarning::record(
                            &mut warnings,
                            SOURCE,
                            format!("no probability vector for sample at position {position}"),
                        ),
                    }
                }
            }
        }
    }

    if let Some(targets) = &inputs.targets {
        for (key, record) in decisions.iter_mut() {
            match key.parse::<usize>() {
                Ok(position) => match targets.get(position) {
                    Some(truth) => record.truth = Some(truth.clone()),
                    None => ProbeWarning::record(
                        &mut warnings,
                        SOURCE,
                        format!(
                            "could not attach truth for sample '{key}': position exceeds the \
                             {} captured targets",
                            targets.len()
                        ),
                    ),
                },
                Err(_) => ProbeWarning::record(
                    &mut warnings,
                    SOURCE,
                    format!("could not attach truth for sample '{key}': key is not positional"),
                ),
            }
        }
    }

    Aggregation {
        decisions,
        warnings,
    }
}

/// Key form of a sample identifier.
fn sample_key(sample: &Value) -> String {
    match sample {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
