//! Runtime data-object model.
//!
//! Instrumented experiment code hands the crawler values of unknown,
//! heterogeneous shape. [`DataObject`] is the tagged-variant rendition of
//! that openness: one variant per representation the built-in strategies
//! understand, plus [`OpaqueObject`] for host objects nothing else models.
//! Every variant reports a fully-qualified type name, a best-effort shape,
//! and best-effort targets, which is all the default strategy relies on.

mod carriers;
mod graph;
mod opaque;

use indexmap::IndexMap;
use ndarray::{Array2, ArrayD};
use polars::prelude::{DataFrame, Series};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub use carriers::{LabeledBundle, SplitPair, TensorDataset, TrainTestSplit};
pub use graph::GraphData;
pub use opaque::OpaqueObject;

/// A dataset-bearing value captured from instrumented code.
#[derive(Debug, Clone)]
pub enum DataObject {
    /// Numeric matrix (rows x columns).
    Array(Array2<f64>),
    /// N-dimensional numeric block.
    Tensor(ArrayD<f64>),
    /// Named-column tabular frame.
    Frame(DataFrame),
    /// Labeled series.
    Series(Series),
    /// Fixed two-part labeled bundle (data block + label vector).
    Bundle(LabeledBundle),
    /// Bare `(x, y)` pair as returned by some dataset loaders.
    SplitPair(SplitPair),
    /// Pre-split `((x_train, y_train), (x_test, y_test))` form.
    TrainTest(TrainTestSplit),
    /// Vision-style dataset carrier with tensor data and class labels.
    TensorSet(TensorDataset),
    /// Node/edge structure.
    Graph(GraphData),
    /// Open key/value record.
    Record(IndexMap<String, Value>),
    /// Unknown host object described by whatever the shim could read.
    Opaque(OpaqueObject),
}

impl DataObject {
    /// Fully-qualified name of the underlying representation.
    ///
    /// This is the string the catalog's substring predicates match against,
    /// so names stay stable across releases.
    pub fn type_name(&self) -> &str {
        match self {
            DataObject::Array(_) => "ndarray::Array2<f64>",
            DataObject::Tensor(_) => "ndarray::ArrayD<f64>",
            DataObject::Frame(_) => "polars::frame::DataFrame",
            DataObject::Series(_) => "polars::series::Series",
            DataObject::Bundle(_) => "dataprobe::object::LabeledBundle",
            DataObject::SplitPair(_) => "dataprobe::object::SplitPair",
            DataObject::TrainTest(_) => "dataprobe::object::TrainTestSplit",
            DataObject::TensorSet(_) => "dataprobe::object::TensorDataset",
            DataObject::Graph(_) => "dataprobe::object::GraphData",
            DataObject::Record(_) => "indexmap::IndexMap<String, Value>",
            DataObject::Opaque(obj) => obj.type_name.as_str(),
        }
    }

    /// Dimensional shape, when the representation has one.
    ///
    /// Split carriers report none: they hold several blocks and only gain a
    /// single shape once a strategy assembles them.
    pub fn shape(&self) -> Option<Vec<usize>> {
        match self {
            DataObject::Array(arr) => Some(vec![arr.nrows(), arr.ncols()]),
            DataObject::Tensor(arr) => Some(arr.shape().to_vec()),
            DataObject::Frame(df) => {
                let (height, width) = df.shape();
                Some(vec![height, width])
            }
            DataObject::Series(series) => Some(vec![series.len()]),
            DataObject::Bundle(bundle) => {
                Some(vec![bundle.data.nrows(), bundle.data.ncols()])
            }
            DataObject::TensorSet(set) => Some(set.data.shape().to_vec()),
            DataObject::Graph(graph) => Some(vec![graph.edge_count(), graph.node_count()]),
            DataObject::SplitPair(_)
            | DataObject::TrainTest(_)
            | DataObject::Record(_) => None,
            DataObject::Opaque(obj) => obj.shape.clone(),
        }
    }

    /// Target values, when the representation carries them directly.
    pub fn targets(&self) -> Option<Vec<Value>> {
        match self {
            DataObject::Bundle(bundle) => Some(numeric_values(bundle.target.iter())),
            DataObject::TensorSet(set) => Some(numeric_values(set.targets.iter())),
            DataObject::Opaque(obj) => obj.targets.clone(),
            _ => None,
        }
    }

    /// A name carried by the object itself, if any.
    pub fn name_hint(&self) -> Option<&str> {
        match self {
            DataObject::Opaque(obj) => obj.name.as_deref(),
            _ => None,
        }
    }

    /// Stable SHA-256 fingerprint over the object's structural summary.
    ///
    /// Numeric blocks are hashed by content; frames by column names, dtypes,
    /// and height. Used as the identity key for repository deduplication.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.type_name().as_bytes());
        if let Some(shape) = self.shape() {
            for dim in shape {
                hasher.update(dim.to_le_bytes());
            }
        }
        match self {
            DataObject::Array(arr) => hash_elements(&mut hasher, arr.iter()),
            DataObject::Tensor(arr) => hash_elements(&mut hasher, arr.iter()),
            DataObject::Frame(df) => {
                for column in df.get_columns() {
                    hasher.update(column.name().as_bytes());
                    hasher.update(column.dtype().to_string().as_bytes());
                }
                hasher.update(df.height().to_le_bytes());
            }
            DataObject::Series(series) => {
                hasher.update(series.name().as_bytes());
                hasher.update(series.dtype().to_string().as_bytes());
                hasher.update(series.len().to_le_bytes());
            }
            DataObject::Bundle(bundle) => {
                hash_elements(&mut hasher, bundle.data.iter());
                hash_elements(&mut hasher, bundle.target.iter());
                for name in &bundle.feature_names {
                    hasher.update(name.as_bytes());
                }
            }
            DataObject::SplitPair(pair) => {
                hash_elements(&mut hasher, pair.x.iter());
                hash_elements(&mut hasher, pair.y.iter());
            }
            DataObject::TrainTest(split) => {
                hash_elements(&mut hasher, split.x_train.iter());
                hash_elements(&mut hasher, split.y_train.iter());
                hash_elements(&mut hasher, split.x_test.iter());
                hash_elements(&mut hasher, split.y_test.iter());
            }
            DataObject::TensorSet(set) => {
                hash_elements(&mut hasher, set.data.iter());
                hash_elements(&mut hasher, set.targets.iter());
                hasher.update(set.source.as_bytes());
            }
            DataObject::Graph(graph) => {
                for node in &graph.nodes {
                    hasher.update(node.as_bytes());
                }
                for (a, b) in &graph.edges {
                    hasher.update(a.to_le_bytes());
                    hasher.update(b.to_le_bytes());
                }
            }
            DataObject::Record(record) => {
                for (key, value) in record {
                    hasher.update(key.as_bytes());
                    hasher.update(value.to_string().as_bytes());
                }
            }
            DataObject::Opaque(obj) => {
                if let Some(name) = &obj.name {
                    hasher.update(name.as_bytes());
                }
                if let Some(description) = &obj.description {
                    hasher.update(description.as_bytes());
                }
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Convert an `f64` into a JSON value, mapping non-finite floats to null.
pub(crate) fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Collect an iterator of numeric values into JSON values.
pub(crate) fn numeric_values<'a>(values: impl Iterator<Item = &'a f64>) -> Vec<Value> {
    values.map(|v| json_number(*v)).collect()
}

fn hash_elements<'a>(hasher: &mut Sha256, values: impl Iterator<Item = &'a f64>) {
    for value in values {
        hasher.update(value.to_le_bytes());
    }
}
