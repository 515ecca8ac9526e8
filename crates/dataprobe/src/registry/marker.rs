//! Format identifiers and the predicates that classify data objects.

use serde::{Deserialize, Serialize};

use crate::object::DataObject;

/// Concrete data representations the built-in catalog can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Array,
    Tensor,
    Frame,
    Series,
    Bundle,
    SplitPair,
    TrainTest,
    TensorSet,
    Graph,
    Record,
}

impl ShapeKind {
    /// Whether `object` is an instance of this representation.
    pub fn matches(&self, object: &DataObject) -> bool {
        matches!(
            (self, object),
            (ShapeKind::Array, DataObject::Array(_))
                | (ShapeKind::Tensor, DataObject::Tensor(_))
                | (ShapeKind::Frame, DataObject::Frame(_))
                | (ShapeKind::Series, DataObject::Series(_))
                | (ShapeKind::Bundle, DataObject::Bundle(_))
                | (ShapeKind::SplitPair, DataObject::SplitPair(_))
                | (ShapeKind::TrainTest, DataObject::TrainTest(_))
                | (ShapeKind::TensorSet, DataObject::TensorSet(_))
                | (ShapeKind::Graph, DataObject::Graph(_))
                | (ShapeKind::Record, DataObject::Record(_))
        )
    }

    /// Fully-qualified name of the representation this kind matches.
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeKind::Array => "ndarray::Array2<f64>",
            ShapeKind::Tensor => "ndarray::ArrayD<f64>",
            ShapeKind::Frame => "polars::frame::DataFrame",
            ShapeKind::Series => "polars::series::Series",
            ShapeKind::Bundle => "dataprobe::object::LabeledBundle",
            ShapeKind::SplitPair => "dataprobe::object::SplitPair",
            ShapeKind::TrainTest => "dataprobe::object::TrainTestSplit",
            ShapeKind::TensorSet => "dataprobe::object::TensorDataset",
            ShapeKind::Graph => "dataprobe::object::GraphData",
            ShapeKind::Record => "indexmap::IndexMap<String, Value>",
        }
    }
}

/// Identifier under which an extraction strategy is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKey {
    /// A concrete in-process representation.
    Shape(ShapeKind),
    /// A loader-module marker (e.g. `"smartcore::dataset"`).
    Module(String),
    /// A type-name fragment, used when no concrete variant is available.
    Alias(String),
}

impl FormatKey {
    /// The string form of a module or alias key; shape keys have none.
    ///
    /// These are the keys the legacy context-override scan walks.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormatKey::Shape(_) => None,
            FormatKey::Module(s) | FormatKey::Alias(s) => Some(s),
        }
    }

    /// Label reported as `metadata["format"]` for objects resolved here.
    pub fn label(&self) -> &str {
        match self {
            FormatKey::Shape(kind) => kind.type_name(),
            FormatKey::Module(s) | FormatKey::Alias(s) => s,
        }
    }
}

impl std::fmt::Display for FormatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One classification rule: either an instance check against a concrete
/// representation, or a substring check against the reported type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPredicate {
    IsShape(ShapeKind),
    TypeNameContains(String),
}

impl FormatPredicate {
    /// Whether `object` satisfies this predicate.
    pub fn matches(&self, object: &DataObject) -> bool {
        match self {
            FormatPredicate::IsShape(kind) => kind.matches(object),
            FormatPredicate::TypeNameContains(fragment) => {
                object.type_name().contains(fragment.as_str())
            }
        }
    }
}
