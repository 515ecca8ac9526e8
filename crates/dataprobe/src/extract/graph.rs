//! Extraction for graph-shaped datasets.

use indexmap::IndexMap;
use serde_json::Value;

use crate::object::DataObject;

use super::{CrawlOutput, ExtractionInput, degrade, format_label, merge_options, shape_value};

/// Extract structural counts from a graph. The reported shape is
/// `[edge_count, node_count]`; the payload passes through unchanged.
pub fn graph_strategy(input: ExtractionInput) -> CrawlOutput {
    let label = format_label(input.format.as_ref(), &input.object);
    let ExtractionInput {
        object,
        format,
        options,
    } = input;

    let graph = match object {
        DataObject::Graph(graph) => graph,
        other => {
            return degrade(
                "graph_strategy",
                "a graph",
                ExtractionInput {
                    object: other,
                    format,
                    options,
                },
            );
        }
    };

    tracing::info!("detected a graph dataset object; crawling available metadata");

    let mut metadata = IndexMap::new();
    metadata.insert("format".to_string(), Value::String(label));
    metadata.insert(
        "shape".to_string(),
        shape_value(&[graph.edge_count(), graph.node_count()]),
    );
    merge_options(&mut metadata, &options);

    CrawlOutput {
        payload: DataObject::Graph(graph),
        metadata,
        targets: None,
        warnings: Vec::new(),
    }
}
