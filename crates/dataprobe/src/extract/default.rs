//! Fallback strategy for unrecognized data shapes.

use indexmap::IndexMap;
use serde_json::Value;

use super::{CrawlOutput, ExtractionInput, format_label, merge_options, shape_value};

/// Best-effort extraction for objects no dedicated strategy claims.
///
/// Reports whatever the object exposes: a shape when it has one, targets
/// when it carries them. Always succeeds, even when both are absent.
pub fn default_strategy(input: ExtractionInput) -> CrawlOutput {
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    tracing::debug!(
        type_name = object.type_name(),
        "no dedicated strategy; crawling generic metadata"
    );

    let mut metadata = IndexMap::new();
    metadata.insert(
        "format".to_string(),
        Value::String(format_label(format.as_ref(), &object)),
    );
    if let Some(shape) = object.shape() {
        metadata.insert("shape".to_string(), shape_value(&shape));
    }
    let targets = object.targets();
    if let Some(values) = &targets {
        metadata.insert("targets".to_string(), Value::Array(values.clone()));
    }
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: object,
        metadata,
        targets,
        warnings: Vec::new(),
    }
}
