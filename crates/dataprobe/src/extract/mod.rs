//! Extraction strategies and their shared contract.
//!
//! A strategy is a stateless function turning one data object plus free-form
//! options into a [`CrawlOutput`]: the payload (possibly reassembled), an
//! open metadata mapping, optional target values, and any warnings the
//! strategy accumulated while degrading around missing or malformed pieces.
//! Strategies never fail; a strategy handed the wrong representation records
//! a warning and falls back to the default strategy.

mod array;
mod bundle;
mod default;
mod frame;
mod graph;
mod loaders;
mod series;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExtractError, ExtractResult};
use crate::object::DataObject;
use crate::registry::FormatKey;
use crate::warning::ProbeWarning;

pub use array::array_strategy;
pub use bundle::bundle_strategy;
pub use default::default_strategy;
pub use frame::frame_strategy;
pub use graph::graph_strategy;
pub use loaders::{split_loader_strategy, tensor_strategy, train_test_strategy};
pub use series::series_strategy;

/// Options key naming the target-column selector.
pub const TARGET_COLUMNS_KEY: &str = "target_columns";
/// Options key flagging that a loader returned a bare `(x, y)` pair.
pub const RETURN_XY_KEY: &str = "return_xy";

/// Everything a strategy receives for one extraction.
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    /// The data object, owned for the duration of the call.
    pub object: DataObject,
    /// The format the dispatcher resolved, if any.
    pub format: Option<FormatKey>,
    /// Merged call options.
    pub options: CrawlOptions,
}

/// A registered extraction strategy.
pub type ExtractionStrategy = fn(ExtractionInput) -> CrawlOutput;

/// The uniform result of one extraction.
#[derive(Debug, Clone)]
pub struct CrawlOutput {
    /// The extracted payload; the input object unless the strategy
    /// reassembled it (e.g. concatenated data and label blocks).
    pub payload: DataObject,
    /// Open metadata mapping. Always carries `format`; carries `shape` when
    /// derivable, reflecting the payload actually returned.
    pub metadata: IndexMap<String, Value>,
    /// Target values, when the strategy could derive them.
    pub targets: Option<Vec<Value>>,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<ProbeWarning>,
}

/// Description of one column/dimension of an extracted dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Column name or stringified position.
    pub name: String,
    /// Element type of the column.
    pub dtype: String,
    /// Whether the column holds target values.
    pub is_target: bool,
}

impl FeatureDescriptor {
    /// A non-target feature.
    pub fn new(name: impl Into<String>, dtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
            is_target: false,
        }
    }

    /// A target feature.
    pub fn target(name: impl Into<String>, dtype: impl Into<String>) -> Self {
        Self {
            is_target: true,
            ..Self::new(name, dtype)
        }
    }
}

/// Free-form call options, ordered, with typed accessors for the keys the
/// built-in strategies understand. Unrecognized keys pass through into the
/// output metadata unchanged (merged last, so they win on collision).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlOptions(IndexMap<String, Value>);

impl CrawlOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`CrawlOptions::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up an option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merge `overrides` over these options; override entries win on
    /// key collision.
    pub fn merged_with(&self, overrides: &CrawlOptions) -> CrawlOptions {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// The target-column selector, when one is set and well-formed.
    pub fn target_selector(&self) -> Option<TargetSelector> {
        self.get(TARGET_COLUMNS_KEY).and_then(TargetSelector::from_value)
    }

    /// Whether the loader pair flag is set.
    pub fn return_xy(&self) -> bool {
        matches!(self.get(RETURN_XY_KEY), Some(Value::Bool(true)))
    }
}

/// A target-column selector: one column or a set of columns, by position
/// or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    Index(usize),
    Indices(Vec<usize>),
    Column(String),
    Columns(Vec<String>),
}

impl TargetSelector {
    /// Interpret an options value as a selector.
    pub fn from_value(value: &Value) -> Option<TargetSelector> {
        match value {
            Value::Number(n) => n.as_u64().map(|i| TargetSelector::Index(i as usize)),
            Value::String(s) => Some(TargetSelector::Column(s.clone())),
            Value::Array(items) if !items.is_empty() => {
                if items.iter().all(Value::is_u64) {
                    Some(TargetSelector::Indices(
                        items
                            .iter()
                            .filter_map(|v| v.as_u64().map(|i| i as usize))
                            .collect(),
                    ))
                } else if items.iter().all(Value::is_string) {
                    Some(TargetSelector::Columns(
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect(),
                    ))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Resolve to positional indices against a column count.
    pub fn index_set(&self, columns: usize) -> ExtractResult<Vec<usize>> {
        let indices = match self {
            TargetSelector::Index(i) => vec![*i],
            TargetSelector::Indices(is) => is.clone(),
            TargetSelector::Column(name) => {
                return Err(ExtractError::InvalidSelector(format!(
                    "named column '{name}' cannot select into an unnamed array"
                )));
            }
            TargetSelector::Columns(_) => {
                return Err(ExtractError::InvalidSelector(
                    "named columns cannot select into an unnamed array".to_string(),
                ));
            }
        };
        for &index in &indices {
            if index >= columns {
                return Err(ExtractError::SelectorOutOfBounds { index, columns });
            }
        }
        Ok(indices)
    }

    /// Resolve to column names against a named-column list.
    pub fn column_names(&self, names: &[String]) -> ExtractResult<Vec<String>> {
        let selected = match self {
            TargetSelector::Column(name) => vec![name.clone()],
            TargetSelector::Columns(list) => list.clone(),
            TargetSelector::Index(i) => vec![name_at(names, *i)?],
            TargetSelector::Indices(is) => {
                let mut selected = Vec::with_capacity(is.len());
                for &i in is {
                    selected.push(name_at(names, i)?);
                }
                selected
            }
        };
        for name in &selected {
            if !names.contains(name) {
                return Err(ExtractError::ColumnNotFound(name.clone()));
            }
        }
        Ok(selected)
    }
}

fn name_at(names: &[String], index: usize) -> ExtractResult<String> {
    names
        .get(index)
        .cloned()
        .ok_or(ExtractError::SelectorOutOfBounds {
            index,
            columns: names.len(),
        })
}

/// Label reported as `metadata["format"]`.
pub(crate) fn format_label(format: Option<&FormatKey>, object: &DataObject) -> String {
    format
        .map(|key| key.label().to_string())
        .unwrap_or_else(|| object.type_name().to_string())
}

/// Merge user options into metadata last; user entries win on collision.
pub(crate) fn merge_options(metadata: &mut IndexMap<String, Value>, options: &CrawlOptions) {
    for (key, value) in options.iter() {
        metadata.insert(key.clone(), value.clone());
    }
}

/// JSON form of a dimensional shape.
pub(crate) fn shape_value(dims: &[usize]) -> Value {
    Value::Array(dims.iter().map(|d| Value::from(*d)).collect())
}

/// JSON form of a feature list.
pub(crate) fn features_value(features: &[FeatureDescriptor]) -> Value {
    serde_json::to_value(features).unwrap_or(Value::Null)
}

/// Record a representation mismatch and fall back to the default strategy.
pub(crate) fn degrade(
    source: &str,
    expected: &'static str,
    input: ExtractionInput,
) -> CrawlOutput {
    let err = ExtractError::Mismatch {
        expected,
        found: input.object.type_name().to_string(),
    };
    let mut warnings = Vec::new();
    ProbeWarning::record(&mut warnings, source, err.to_string());
    let mut output = default_strategy(input);
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    output
}
