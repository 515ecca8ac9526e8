//! Run-scoped cache collaborator interface and the tracking flow built on it.
//!
//! The cache itself belongs to the host tracking framework; this module only
//! defines the get/insert/pop contract the aggregation flow needs, the
//! reserved keys it uses, and an in-memory implementation for tests and
//! embedding. The cache is assumed single-writer within a run; no locking
//! happens here.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::warning::ProbeWarning;

use super::aggregator::{Aggregation, DecisionInputs, SplitInfo, aggregate};

/// Cache key holding the raw prediction sequence (consumed on use).
pub const PREDICTIONS_KEY: &str = "predictions";
/// Cache key holding probability vectors (consumed on use).
pub const PROBABILITIES_KEY: &str = "probabilities";
/// Cache key holding captured target values.
pub const TARGETS_KEY: &str = "targets";
/// Cache key holding the index of the current split.
pub const CURRENT_SPLIT_KEY: &str = "current_split";
/// Field of a split entry holding its membership info.
pub const SPLIT_INFO_KEY: &str = "split_info";
/// Field of a split entry holding its merged decisions.
pub const DECISIONS_KEY: &str = "decisions";

const SOURCE: &str = "decision_tracker";

/// The run-scoped key-value store supplied by the host tracking framework.
pub trait RunCache {
    /// Read a value without removing it.
    fn get(&self, key: &str) -> Option<Value>;
    /// Store a value, replacing any previous one.
    fn insert(&mut self, key: &str, value: Value);
    /// Remove and return a value.
    fn pop(&mut self, key: &str) -> Option<Value>;
}

/// In-memory reference implementation of [`RunCache`].
#[derive(Debug, Clone, Default)]
pub struct MemoryRunCache {
    entries: IndexMap<String, Value>,
}

impl MemoryRunCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RunCache for MemoryRunCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn pop(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }
}

/// Stash raw predictions for the next aggregation.
pub fn stash_predictions<C: RunCache + ?Sized>(cache: &mut C, predictions: Vec<Value>) {
    cache.insert(PREDICTIONS_KEY, Value::Array(predictions));
}

/// Stash probability vectors for the next aggregation.
pub fn stash_probabilities<C: RunCache + ?Sized>(cache: &mut C, probabilities: Vec<Vec<f64>>) {
    let value = serde_json::to_value(probabilities).unwrap_or(Value::Null);
    cache.insert(PROBABILITIES_KEY, value);
}

/// Stash captured target values for the run.
pub fn stash_targets<C: RunCache + ?Sized>(cache: &mut C, targets: Vec<Value>) {
    cache.insert(TARGETS_KEY, Value::Array(targets));
}

/// Declare the current split and store its membership info under the split's
/// own cache entry.
pub fn stash_split_info<C: RunCache + ?Sized>(cache: &mut C, split: u64, info: &SplitInfo) {
    cache.insert(CURRENT_SPLIT_KEY, Value::from(split));
    let mut entry = split_entry(cache, split);
    entry.insert(
        SPLIT_INFO_KEY.to_string(),
        serde_json::to_value(info).unwrap_or(Value::Null),
    );
    cache.insert(&split.to_string(), Value::Object(entry));
}

/// Drive one aggregation out of the run cache and store the merged decisions
/// back under the current split's entry.
///
/// Predictions and probabilities are popped (consumed); split info and
/// targets are read in place. When the cache holds no predictions,
/// `fallback_predictions` (the instrumented call's own result) is used.
///
/// A later invocation for the same split replaces that split's decision map
/// wholesale; keys from an earlier invocation that the new split does not
/// list are dropped. Within one map, merges update fields per key.
pub fn track_decisions<C: RunCache + ?Sized>(
    cache: &mut C,
    fallback_predictions: Option<Vec<Value>>,
) -> Aggregation {
    let predictions = cache
        .pop(PREDICTIONS_KEY)
        .and_then(as_value_vec)
        .or(fallback_predictions);
    let Some(predictions) = predictions else {
        let mut warnings = Vec::new();
        ProbeWarning::record(
            &mut warnings,
            SOURCE,
            "no predictions available in the run cache; nothing to aggregate",
        );
        return Aggregation {
            decisions: Default::default(),
            warnings,
        };
    };

    let probabilities = cache
        .pop(PROBABILITIES_KEY)
        .and_then(|value| serde_json::from_value::<Vec<Vec<f64>>>(value).ok());

    let split_index = cache
        .get(CURRENT_SPLIT_KEY)
        .and_then(|value| value.as_u64())
        .unwrap_or(0);
    let split = cache
        .get(&split_index.to_string())
        .and_then(|entry| entry.get(SPLIT_INFO_KEY).cloned())
        .and_then(|value| serde_json::from_value::<SplitInfo>(value).ok());

    let targets = cache.get(TARGETS_KEY).and_then(as_value_vec);

    let mut inputs = DecisionInputs::new(predictions);
    inputs.probabilities = probabilities;
    inputs.split = split;
    inputs.targets = targets;

    let aggregation = aggregate(&inputs);

    let mut entry = split_entry(cache, split_index);
    entry.insert(
        DECISIONS_KEY.to_string(),
        serde_json::to_value(&aggregation.decisions).unwrap_or(Value::Null),
    );
    cache.insert(&split_index.to_string(), Value::Object(entry));

    aggregation
}

fn split_entry<C: RunCache + ?Sized>(cache: &C, split: u64) -> Map<String, Value> {
    match cache.get(&split.to_string()) {
        Some(Value::Object(entry)) => entry,
        _ => Map::new(),
    }
}

fn as_value_vec(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_without_split_uses_positions() {
        let mut cache = MemoryRunCache::new();
        stash_predictions(&mut cache, vec![json!(0), json!(1), json!(1)]);
        stash_probabilities(
            &mut cache,
            vec![vec![0.9, 0.1], vec![0.2, 0.8], vec![0.3, 0.7]],
        );
        stash_targets(&mut cache, vec![json!(0), json!(1), json!(0)]);

        let result = track_decisions(&mut cache, None);

        let record = &result.decisions["2"];
        assert_eq!(record.predicted, json!(1));
        assert_eq!(record.probability, Some(vec![0.3, 0.7]));
        assert_eq!(record.truth, Some(json!(0)));

        // Predictions and probabilities are consumed; the split entry holds
        // the stored decisions.
        assert!(cache.get(PREDICTIONS_KEY).is_none());
        assert!(cache.get(PROBABILITIES_KEY).is_none());
        let entry = cache.get("0").unwrap();
        assert!(entry.get(DECISIONS_KEY).is_some());
    }

    #[test]
    fn test_track_with_split_identifiers() {
        let mut cache = MemoryRunCache::new();
        stash_split_info(
            &mut cache,
            1,
            &SplitInfo::new(vec![json!("s-07"), json!("s-12")]),
        );
        stash_predictions(&mut cache, vec![json!("spam"), json!("ham")]);

        let result = track_decisions(&mut cache, None);

        assert_eq!(result.decisions["s-07"].predicted, json!("spam"));
        let entry = cache.get("1").unwrap();
        assert!(entry.get(SPLIT_INFO_KEY).is_some());
        assert!(entry.get(DECISIONS_KEY).is_some());
    }

    #[test]
    fn test_fallback_predictions_used_when_cache_empty() {
        let mut cache = MemoryRunCache::new();
        let result = track_decisions(&mut cache, Some(vec![json!(1)]));

        assert_eq!(result.decisions["0"].predicted, json!(1));
    }

    #[test]
    fn test_no_predictions_anywhere_warns() {
        let mut cache = MemoryRunCache::new();
        let result = track_decisions(&mut cache, None);

        assert!(result.decisions.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("no predictions"));
    }

    #[test]
    fn test_later_split_replaces_decisions_per_key() {
        let mut cache = MemoryRunCache::new();
        stash_split_info(&mut cache, 0, &SplitInfo::new(vec![json!("a"), json!("b")]));
        stash_predictions(&mut cache, vec![json!(0), json!(0)]);
        track_decisions(&mut cache, None);

        // A second pass over the same split with different membership
        // replaces the stored map; unmatched keys from the first pass drop.
        stash_split_info(&mut cache, 0, &SplitInfo::new(vec![json!("b"), json!("c")]));
        stash_predictions(&mut cache, vec![json!(1), json!(1)]);
        track_decisions(&mut cache, None);

        let entry = cache.get("0").unwrap();
        let decisions = entry.get(DECISIONS_KEY).unwrap();
        assert!(decisions.get("a").is_none());
        assert_eq!(decisions["b"]["predicted"], json!(1));
        assert_eq!(decisions["c"]["predicted"], json!(1));
    }
}
