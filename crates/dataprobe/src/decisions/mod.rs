//! Per-instance decision tracking.
//!
//! During a tracked run the instrumentation layer stashes raw prediction
//! signals (predictions, probability vectors, split membership, captured
//! targets) into the run-scoped cache. The aggregator merges them into one
//! [`DecisionMap`] keyed by sample identity, best-effort: misaligned or
//! unparseable pieces degrade to warnings, never failures.

mod aggregator;
mod record;
mod run;

pub use aggregator::{Aggregation, DecisionInputs, SplitInfo, aggregate};
pub use record::{DecisionArtifact, DecisionMap, DecisionRecord};
pub use run::{
    CURRENT_SPLIT_KEY, DECISIONS_KEY, MemoryRunCache, PREDICTIONS_KEY, PROBABILITIES_KEY,
    RunCache, SPLIT_INFO_KEY, TARGETS_KEY, stash_predictions, stash_probabilities,
    stash_split_info, stash_targets, track_decisions,
};
