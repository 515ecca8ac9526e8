//! Extraction for fixed two-part labeled bundles.

use indexmap::IndexMap;
use ndarray::Axis;
use serde_json::Value;

use crate::object::{DataObject, numeric_values};
use crate::warning::ProbeWarning;

use super::{
    CrawlOutput, ExtractionInput, FeatureDescriptor, default_strategy, degrade, features_value,
    format_label, merge_options, shape_value,
};

/// Extract a labeled bundle by concatenating the data block with the label
/// column. Features are the declared names plus a synthetic `"class"`
/// descriptor flagged as the target; the reported shape is the shape of the
/// assembled payload.
pub fn bundle_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let bundle = match object {
        DataObject::Bundle(bundle) => bundle,
        other => {
            return degrade(
                "bundle_strategy",
                "a labeled bundle",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a labeled bundle dataset object; crawling available metadata");

    let target_column = bundle.target.view().insert_axis(Axis(1));
    let joined = match ndarray::concatenate(Axis(1), &[bundle.data.view(), target_column]) {
        Ok(joined) => joined,
        Err(err) => {
            // Blocks that do not line up still yield the untouched bundle.
            let mut warnings = Vec::new();
            ProbeWarning::record(
                &mut warnings,
                "bundle_strategy",
                format!("could not assemble data and label blocks: {err}"),
            );
            let mut output = default_strategy(ExtractionInput {
                object: DataObject::Bundle(bundle),
                format,
                options,
            });
            warnings.append(&mut output.warnings);
            output.warnings = warnings;
            return output;
        }
    };

    let mut features: Vec<FeatureDescriptor> = bundle
        .feature_names
        .iter()
        .map(|name| FeatureDescriptor::new(name, "f64"))
        .collect();
    features.push(FeatureDescriptor::target("class", "f64"));

    let targets = numeric_values(bundle.target.iter());

    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert("features".to_string(), features_value(&features));
    if !bundle.target_names.is_empty() {
        metadata.insert(
            "classes".to_string(),
            Value::Array(
                bundle
                    .target_names
                    .iter()
                    .map(|name| Value::String(name.clone()))
                    .collect(),
            ),
        );
    }
    if let Some(description) = &bundle.description {
        metadata.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    metadata.insert(
        "shape".to_string(),
        shape_value(&[joined.nrows(), joined.ncols()]),
    );
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: DataObject::Array(joined),
        metadata,
        targets: Some(targets),
        warnings: Vec::new(),
    }
}
