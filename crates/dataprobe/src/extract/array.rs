//! Extraction for numeric matrices.

use indexmap::IndexMap;
use ndarray::Array2;
use serde_json::Value;

use crate::object::{DataObject, json_number};
use crate::warning::ProbeWarning;

use super::{
    CrawlOutput, ExtractionInput, FeatureDescriptor, degrade, features_value, format_label,
    merge_options, shape_value,
};

/// Extract one feature descriptor per column of a numeric matrix.
///
/// A positional target selector flags the chosen columns and returns their
/// values; a selector that cannot be applied is logged and dropped rather
/// than failing the extraction.
pub fn array_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let arr = match object {
        DataObject::Array(arr) => arr,
        other => {
            return degrade(
                "array_strategy",
                "a numeric array",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a numeric array dataset object; crawling available metadata");

    let mut warnings = Vec::new();
    let (rows, cols) = (arr.nrows(), arr.ncols());
    let mut features: Vec<FeatureDescriptor> = (0..cols)
        .map(|i| FeatureDescriptor::new(i.to_string(), "f64"))
        .collect();

    let targets = match options.target_selector() {
        Some(selector) => match selector.index_set(cols) {
            Ok(indices) => {
                for &index in &indices {
                    features[index].is_target = true;
                }
                Some(column_targets(&arr, &indices))
            }
            Err(err) => {
                ProbeWarning::record(&mut warnings, "array_strategy", err.to_string());
                None
            }
        },
        None => None,
    };

    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert("shape".to_string(), shape_value(&[rows, cols]));
    metadata.insert("features".to_string(), features_value(&features));
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: DataObject::Array(arr),
        metadata,
        targets,
        warnings,
    }
}

/// Values of the selected columns: scalars for a single column, per-row
/// vectors when several columns are selected.
fn column_targets(arr: &Array2<f64>, indices: &[usize]) -> Vec<Value> {
    if let [index] = indices {
        arr.column(*index).iter().map(|v| json_number(*v)).collect()
    } else {
        (0..arr.nrows())
            .map(|row| {
                Value::Array(
                    indices
                        .iter()
                        .map(|&col| json_number(arr[[row, col]]))
                        .collect(),
                )
            })
            .collect()
    }
}
