//! Extraction for framework dataset-loader forms: bare `(x, y)` pairs,
//! pre-split train/test blocks, and vision-style tensor datasets.

use indexmap::IndexMap;
use ndarray::{Array1, Array2, Axis};
use serde_json::Value;

use crate::error::ExtractResult;
use crate::object::{DataObject, TrainTestSplit, numeric_values};
use crate::warning::ProbeWarning;

use super::{
    CrawlOutput, ExtractionInput, FeatureDescriptor, bundle_strategy, default_strategy, degrade,
    features_value, format_label, merge_options, shape_value,
};

/// Extract the output of a loader that returns either a labeled bundle or,
/// when the `return_xy` option is set, a bare `(x, y)` pair.
///
/// The pair path concatenates features and labels into one block with a
/// synthetic `"class"` descriptor; the bundle path delegates to
/// [`bundle_strategy`].
pub fn split_loader_strategy(input: ExtractionInput) -> CrawlOutput {
    if !input.options.return_xy() {
        return bundle_strategy(input);
    }

    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let pair = match object {
        DataObject::SplitPair(pair) => pair,
        other => {
            return degrade(
                "split_loader_strategy",
                "a feature/label pair",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a loader feature/label pair; crawling available metadata");

    let columns = pair.x.ncols();
    let y_column = pair.y.view().insert_axis(Axis(1));
    let joined = match ndarray::concatenate(Axis(1), &[pair.x.view(), y_column]) {
        Ok(joined) => joined,
        Err(err) => {
            let mut warnings = Vec::new();
            ProbeWarning::record(
                &mut warnings,
                "split_loader_strategy",
                format!("could not assemble feature and label blocks: {err}"),
            );
            let mut output = default_strategy(ExtractionInput {
                object: DataObject::SplitPair(pair),
                format,
                options,
            });
            warnings.append(&mut output.warnings);
            output.warnings = warnings;
            return output;
        }
    };

    let mut features: Vec<FeatureDescriptor> = (0..columns)
        .map(|i| FeatureDescriptor::new(i.to_string(), "f64"))
        .collect();
    features.push(FeatureDescriptor::target("class", "f64"));

    let targets = numeric_values(pair.y.iter());

    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert("features".to_string(), features_value(&features));
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

/// Extract pre-split train/test blocks by concatenating the splits row-wise
/// and appending the combined label column.
pub fn train_test_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let split = match object {
        DataObject::TrainTest(split) => split,
        other => {
            return degrade(
                "train_test_strategy",
                "train/test blocks",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a pre-split loader dataset; crawling available metadata");

    match assemble_splits(&split) {
        Ok((joined, labels)) => {
            let mut metadata = IndexMap::new();
            metadata.insert("format".to_string(), Value::String(label));
            metadata.insert(
                "shape".to_string(),
                shape_value(&[joined.nrows(), joined.ncols()]),
            );
            merge_options(&mut metadata, &options);

            CrawlOutput {
                payload: DataObject::Array(joined),
                metadata,
                targets: Some(numeric_values(labels.iter())),
                warnings: Vec::new(),
            }
        }
        Err(err) => {
            let mut warnings = Vec::new();
            ProbeWarning::record(
                &mut warnings,
                "train_test_strategy",
                format!("could not assemble split blocks: {err}"),
            );
            let mut output = default_strategy(ExtractionInput {
                object: DataObject::TrainTest(split),
                format,
                options,
            });
            warnings.append(&mut output.warnings);
            output.warnings = warnings;
            output
        }
    }
}

fn assemble_splits(split: &TrainTestSplit) -> ExtractResult<(Array2<f64>, Array1<f64>)> {
    let labels = ndarray::concatenate(Axis(0), &[split.y_train.view(), split.y_test.view()])?;
    let data = ndarray::concatenate(Axis(0), &[split.x_train.view(), split.x_test.view()])?;
    let label_column = labels.view().insert_axis(Axis(1));
    let joined = ndarray::concatenate(Axis(1), &[data.view(), label_column])?;
    Ok((joined, labels))
}

/// Extract a vision-style tensor dataset: the payload is the inner data
/// tensor; classes, split flag, and source go into metadata.
pub fn tensor_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let set = match object {
        DataObject::TensorSet(set) => set,
        other => {
            return degrade(
                "tensor_strategy",
                "a tensor dataset",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a tensor dataset object; crawling available metadata");

    let targets = numeric_values(set.targets.iter());

    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert("shape".to_string(), shape_value(set.data.shape()));
    if !set.classes.is_empty() {
        metadata.insert(
            "classes".to_string(),
            Value::Array(
                set.classes
                    .iter()
                    .map(|name| Value::String(name.clone()))
                    .collect(),
            ),
        );
    }
    metadata.insert(
        "description".to_string(),
        Value::String(set.summary()),
    );
    metadata.insert("training_data".to_string(), Value::Bool(set.train));
    if !set.source.is_empty() {
        metadata.insert("source".to_string(), Value::String(set.source.clone()));
    }
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: DataObject::Tensor(set.data),
        metadata,
        targets: Some(targets),
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CrawlOptions;
    use crate::object::{SplitPair, TensorDataset};
    use ndarray::{ArrayD, array};
    use serde_json::json;

    #[test]
    fn test_pair_path_concatenates() {
        let pair = SplitPair::new(array![[1.0, 2.0], [3.0, 4.0]], array![0.0, 1.0]);
        let options = CrawlOptions::new().with("return_xy", true);
        let output = split_loader_strategy(ExtractionInput {
            object: DataObject::SplitPair(pair),
            format: None,
            options,
        });

        assert_eq!(output.metadata["shape"], json!([2, 3]));
        let features = output.metadata["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[2]["name"], json!("class"));
        assert_eq!(output.targets, Some(vec![json!(0.0), json!(1.0)]));
    }

    #[test]
    fn test_without_flag_delegates_to_bundle() {
        use crate::object::LabeledBundle;

        let bundle = LabeledBundle::new(array![[1.0], [2.0]], array![0.0, 1.0]);
        let output = split_loader_strategy(ExtractionInput {
            object: DataObject::Bundle(bundle),
            format: None,
            options: CrawlOptions::new(),
        });

        // Bundle path: payload gains the label column.
        assert_eq!(output.metadata["shape"], json!([2, 2]));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_train_test_concatenation() {
        let split = TrainTestSplit::new(
            array![[1.0], [2.0]],
            array![0.0, 1.0],
            array![[3.0]],
            array![1.0],
        );
        let output = train_test_strategy(ExtractionInput {
            object: DataObject::TrainTest(split),
            format: None,
            options: CrawlOptions::new(),
        });

        assert_eq!(output.metadata["shape"], json!([3, 2]));
        assert_eq!(
            output.targets,
            Some(vec![json!(0.0), json!(1.0), json!(1.0)])
        );
    }

    #[test]
    fn test_mismatched_split_blocks_degrade() {
        let split = TrainTestSplit::new(
            array![[1.0, 2.0]],
            array![0.0],
            array![[3.0]],
            array![1.0],
        );
        let output = train_test_strategy(ExtractionInput {
            object: DataObject::TrainTest(split),
            format: None,
            options: CrawlOptions::new(),
        });

        assert_eq!(output.warnings.len(), 1);
        assert!(matches!(output.payload, DataObject::TrainTest(_)));
    }

    #[test]
    fn test_tensor_dataset_metadata() {
        let set = TensorDataset::new(ArrayD::zeros(vec![2, 3, 3]), array![0.0, 1.0])
            .with_train(false)
            .with_classes(vec!["cat".into(), "dog".into()])
            .with_source("images/test");
        let output = tensor_strategy(ExtractionInput {
            object: DataObject::TensorSet(set),
            format: None,
            options: CrawlOptions::new(),
        });

        assert_eq!(output.metadata["shape"], json!([2, 3, 3]));
        assert_eq!(output.metadata["classes"], json!(["cat", "dog"]));
        assert_eq!(output.metadata["training_data"], json!(false));
        assert_eq!(output.metadata["source"], json!("images/test"));
        assert_eq!(output.targets, Some(vec![json!(0.0), json!(1.0)]));
        assert!(matches!(output.payload, DataObject::Tensor(_)));
    }
}
