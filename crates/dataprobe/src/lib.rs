//! Dataprobe: runtime dataset discovery and decision tracking for ML
//! experiment instrumentation.
//!
//! Dataprobe attaches to a host tracking framework and answers two questions
//! about an instrumented run: *what data went in*, and *what the model
//! decided per instance*. The crawler classifies arbitrary data objects
//! against an ordered format catalog and extracts a uniform
//! `(payload, metadata, targets)` triple; the decision aggregator merges
//! predictions, probabilities, and captured truths into per-sample records.
//!
//! # Core Principles
//!
//! - **Never fatal**: unrecognized formats fall back to a default strategy;
//!   every degraded step becomes a structured warning, not an error
//! - **Deterministic dispatch**: catalog order and registry order are part
//!   of the observable contract
//! - **Explicit wiring**: the registry is a plain value constructed at
//!   startup; nothing registers itself behind the caller's back
//!
//! # Example
//!
//! ```
//! use dataprobe::{DataObject, Probe};
//! use ndarray::array;
//!
//! let probe = Probe::new();
//! let profile = probe.inspect(DataObject::Array(array![[1.0, 2.0], [3.0, 4.0]]));
//!
//! assert_eq!(profile.metadata["shape"], serde_json::json!([2, 2]));
//! ```

pub mod crawler;
pub mod decisions;
pub mod error;
pub mod extract;
pub mod object;
pub mod registry;
pub mod warning;

mod probe;

pub use crate::crawler::{CallContext, CallOrigin, CallSite, Crawler};
pub use crate::decisions::{
    Aggregation, DecisionArtifact, DecisionInputs, DecisionMap, DecisionRecord, MemoryRunCache,
    RunCache, SplitInfo, aggregate, track_decisions,
};
pub use crate::error::{ExtractError, ExtractResult};
pub use crate::extract::{
    CrawlOptions, CrawlOutput, ExtractionInput, ExtractionStrategy, FeatureDescriptor,
    TargetSelector,
};
pub use crate::object::{
    DataObject, GraphData, LabeledBundle, OpaqueObject, SplitPair, TensorDataset, TrainTestSplit,
};
pub use crate::probe::{DatasetProfile, DatasetRecord, Probe, ProbeConfig};
pub use crate::registry::{Capabilities, FormatKey, FormatPredicate, FormatRegistry, ShapeKind};
pub use crate::warning::ProbeWarning;
