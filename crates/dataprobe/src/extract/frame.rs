//! Extraction for named-column tabular frames.

use indexmap::IndexMap;
use polars::prelude::{AnyValue, DataFrame};
use serde_json::Value;

use crate::error::ExtractResult;
use crate::object::{DataObject, json_number};
use crate::warning::ProbeWarning;

use super::{
    CrawlOutput, ExtractionInput, FeatureDescriptor, degrade, features_value, format_label,
    merge_options, shape_value,
};

/// Extract one feature descriptor per named column of a frame.
///
/// Target resolution: an explicit selector wins; otherwise every column
/// whose name contains `"target"` is used; otherwise a warning is recorded
/// and no targets are returned.
pub fn frame_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let df = match object {
        DataObject::Frame(df) => df,
        other => {
            return degrade(
                "frame_strategy",
                "a column frame",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a column frame dataset object; crawling available metadata");

    let mut warnings = Vec::new();
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let mut features: Vec<FeatureDescriptor> = df
        .get_columns()
        .iter()
        .map(|col| FeatureDescriptor::new(col.name().to_string(), col.dtype().to_string()))
        .collect();

    let selected: Vec<String> = match options.target_selector() {
        Some(selector) => match selector.column_names(&names) {
            Ok(selected) => selected,
            Err(err) => {
                ProbeWarning::record(&mut warnings, "frame_strategy", err.to_string());
                Vec::new()
            }
        },
        None => {
            let implicit: Vec<String> = names
                .iter()
                .filter(|name| name.contains("target"))
                .cloned()
                .collect();
            if implicit.is_empty() {
                ProbeWarning::record(
                    &mut warnings,
                    "frame_strategy",
                    "no target column could be derived; target values may be inaccurate",
                );
            }
            implicit
        }
    };

    let targets = if selected.is_empty() {
        None
    } else {
        for feature in &mut features {
            if selected.contains(&feature.name) {
                feature.is_target = true;
            }
        }
        match column_values(&df, &selected) {
            Ok(values) => Some(values),
            Err(err) => {
                ProbeWarning::record(&mut warnings, "frame_strategy", err.to_string());
                None
            }
        }
    };

    let (height, width) = df.shape();
    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert("shape".to_string(), shape_value(&[height, width]));
    metadata.insert("features".to_string(), features_value(&features));
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: DataObject::Frame(df),
        metadata,
        targets,
        warnings,
    }
}

/// Values of the selected columns: scalars for a single column, per-row
/// vectors when several columns are selected.
fn column_values(df: &DataFrame, names: &[String]) -> ExtractResult<Vec<Value>> {
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let series = df.column(name.as_str())?.as_materialized_series();
        columns.push(series.iter().map(any_to_json).collect::<Vec<Value>>());
    }
    if let [single] = columns.as_slice() {
        return Ok(single.clone());
    }
    let rows = columns.first().map(Vec::len).unwrap_or(0);
    Ok((0..rows)
        .map(|row| Value::Array(columns.iter().map(|col| col[row].clone()).collect()))
        .collect())
}

/// Lossy conversion from a frame cell into JSON.
fn any_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::UInt8(v) => Value::from(v),
        AnyValue::UInt16(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Int8(v) => Value::from(v),
        AnyValue::Int16(v) => Value::from(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::Float32(v) => json_number(f64::from(v)),
        AnyValue::Float64(v) => json_number(v),
        other => Value::String(other.to_string()),
    }
}
