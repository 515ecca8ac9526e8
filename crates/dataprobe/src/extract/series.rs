//! Extraction for labeled series.

use indexmap::IndexMap;
use serde_json::Value;

use crate::object::DataObject;

use super::{CrawlOutput, ExtractionInput, degrade, format_label, merge_options, shape_value};

/// Extract shape metadata from a labeled series. No features, no targets.
pub fn series_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let series = match object {
        DataObject::Series(series) => series,
        other => {
            return degrade(
                "series_strategy",
                "a labeled series",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a labeled series dataset object; crawling available metadata");

    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert("shape".to_string(), shape_value(&[series.len()]));
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: DataObject::Series(series),
        metadata,
        targets: None,
        warnings: Vec::new(),
    }
}
