//! Integration tests for dataprobe.

use dataprobe::{
    CallContext, CallOrigin, CallSite, CrawlOptions, Crawler, DataObject, FormatKey,
    FormatRegistry, GraphData, LabeledBundle, OpaqueObject, Probe, ShapeKind, SplitPair,
    TensorDataset, TrainTestSplit,
};
use ndarray::{ArrayD, array};
use serde_json::json;

fn iris_bundle() -> LabeledBundle {
    LabeledBundle::new(
        array![[5.1, 3.5], [4.9, 3.0], [6.2, 2.9], [5.8, 2.7]],
        array![0.0, 0.0, 1.0, 1.0],
    )
    .with_feature_names(vec!["sepal_length".into(), "sepal_width".into()])
    .with_target_names(vec!["setosa".into(), "versicolor".into()])
}

// =============================================================================
// Dispatch Across Format Families
// =============================================================================

#[test]
fn test_array_dispatch_end_to_end() {
    let probe = Probe::new();
    let profile = probe.inspect_at(
        DataObject::Array(array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]),
        CallSite::new(),
        CrawlOptions::new().with("target_columns", 1),
    );

    assert_eq!(profile.format, Some(FormatKey::Shape(ShapeKind::Array)));
    assert_eq!(profile.metadata["shape"], json!([3, 2]));

    let features = profile.metadata["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[1]["is_target"], json!(true));
    assert_eq!(features[0]["is_target"], json!(false));
    assert_eq!(
        profile.targets,
        Some(vec![json!(10.0), json!(20.0), json!(30.0)])
    );
}

#[test]
fn test_frame_dispatch_end_to_end() {
    let frame = polars::prelude::df!(
        "a" => [1.0, 2.0],
        "b" => [3.0, 4.0],
        "target" => [0i64, 1],
    )
    .unwrap();

    let probe = Probe::new();
    let profile = probe.inspect(DataObject::Frame(frame));

    assert_eq!(profile.format, Some(FormatKey::Shape(ShapeKind::Frame)));
    assert_eq!(profile.targets, Some(vec![json!(0), json!(1)]));

    let features = profile.metadata["features"].as_array().unwrap();
    let target_feature = features
        .iter()
        .find(|f| f["name"] == json!("target"))
        .unwrap();
    assert_eq!(target_feature["is_target"], json!(true));
}

#[test]
fn test_bundle_dispatch_end_to_end() {
    let probe = Probe::new();
    let profile = probe.inspect(DataObject::Bundle(iris_bundle()));

    assert_eq!(profile.format, Some(FormatKey::Shape(ShapeKind::Bundle)));
    // Payload gains the label column; shape reflects the payload.
    assert_eq!(profile.metadata["shape"], json!([4, 3]));
    assert_eq!(profile.metadata["classes"], json!(["setosa", "versicolor"]));
    assert!(matches!(profile.payload, DataObject::Array(_)));
}

#[test]
fn test_graph_dispatch_end_to_end() {
    let graph = GraphData::new(
        vec!["a".into(), "b".into(), "c".into()],
        vec![(0, 1), (1, 2), (2, 0), (0, 2)],
    );

    let probe = Probe::new();
    let profile = probe.inspect(DataObject::Graph(graph));

    assert_eq!(profile.format, Some(FormatKey::Shape(ShapeKind::Graph)));
    assert_eq!(profile.metadata["shape"], json!([4, 3]));
    assert!(profile.targets.is_none());
}

#[test]
fn test_unknown_object_never_fails() {
    let probe = Probe::new();
    let profile = probe.inspect(DataObject::Opaque(OpaqueObject::new(
        "some.framework.Thing",
    )));

    assert_eq!(profile.format, None);
    assert_eq!(profile.metadata["format"], json!("some.framework.Thing"));
    assert!(profile.targets.is_none());
    assert!(profile.warnings.is_empty());
}

#[test]
fn test_opaque_object_classified_by_name_fragment() {
    let probe = Probe::new();
    let profile = probe.inspect(DataObject::Opaque(
        OpaqueObject::new("pandas.core.frame.DataFrame").with_shape(vec![100, 5]),
    ));

    // Classified by the name fragment, extracted by the default strategy.
    assert_eq!(profile.format, Some(FormatKey::Alias("DataFrame".into())));
    assert_eq!(profile.metadata["shape"], json!([100, 5]));
}

// =============================================================================
// Loader Forms and Overrides
// =============================================================================

#[test]
fn test_loader_pair_via_module_origin() {
    let registry = FormatRegistry::new();
    let pair = SplitPair::new(array![[1.0, 2.0], [3.0, 4.0]], array![0.0, 1.0]);

    let site = CallSite::new()
        .with_origin(CallOrigin::new("smartcore::dataset::iris", "load_dataset"))
        .with_captured(CrawlOptions::new().with("return_xy", true));
    let crawler = Crawler::at_site(&registry, DataObject::SplitPair(pair), site);

    let output = crawler.crawl(CrawlOptions::new());
    assert_eq!(output.metadata["shape"], json!([2, 3]));
    let features = output.metadata["features"].as_array().unwrap();
    assert_eq!(features.last().unwrap()["name"], json!("class"));
    assert_eq!(output.targets, Some(vec![json!(0.0), json!(1.0)]));
}

#[test]
fn test_pre_split_loader_via_module_origin() {
    let registry = FormatRegistry::new();
    let split = TrainTestSplit::new(
        array![[1.0], [2.0], [3.0]],
        array![0.0, 1.0, 0.0],
        array![[4.0], [5.0]],
        array![1.0, 1.0],
    );

    let crawler = Crawler::new(&registry, DataObject::TrainTest(split))
        .with_origin(CallOrigin::new("burn::data::mnist", "load"));

    let output = crawler.crawl(CrawlOptions::new());
    // Five rows, one feature column plus the label column.
    assert_eq!(output.metadata["shape"], json!([5, 2]));
    assert_eq!(output.targets.as_ref().map(Vec::len), Some(5));
}

#[test]
fn test_tensor_set_via_type_and_via_context() {
    let probe = Probe::new();
    let set = TensorDataset::new(ArrayD::zeros(vec![3, 2, 2]), array![0.0, 1.0, 0.0])
        .with_classes(vec!["cat".into(), "dog".into()])
        .with_source("images/train");

    // Dispatch by concrete type.
    let profile = probe.inspect(DataObject::TensorSet(set.clone()));
    assert_eq!(profile.format, Some(FormatKey::Shape(ShapeKind::TensorSet)));
    assert_eq!(profile.metadata["classes"], json!(["cat", "dog"]));

    // A declaring context mentioning the loader module overrides the key.
    let site = CallSite::new().with_context(CallContext::new("<tch::vision::mnist loader>"));
    let profile = probe.inspect_at(DataObject::TensorSet(set), site, CrawlOptions::new());
    assert_eq!(
        profile.format,
        Some(FormatKey::Module("tch::vision".into()))
    );
    assert_eq!(profile.metadata["training_data"], json!(true));
}

#[test]
fn test_structured_format_hint_override() {
    let probe = Probe::new();
    let bundle = iris_bundle();

    let site = CallSite::new().with_context(
        CallContext::new("wrapped loader")
            .with_format_hint(FormatKey::Module("smartcore::dataset".into())),
    );
    let profile = probe.inspect_at(DataObject::Bundle(bundle), site, CrawlOptions::new());

    assert_eq!(
        profile.format,
        Some(FormatKey::Module("smartcore::dataset".into()))
    );
    // The pair-loader strategy without return_xy takes the bundle path.
    assert_eq!(profile.metadata["shape"], json!([4, 3]));
}

// =============================================================================
// Registration Contract
// =============================================================================

#[test]
fn test_reregistration_replaces_strategy() {
    fn constant_strategy(input: dataprobe::ExtractionInput) -> dataprobe::CrawlOutput {
        let mut output = dataprobe::extract::default_strategy(input);
        output
            .metadata
            .insert("replaced".to_string(), json!(true));
        output
    }

    let mut registry = FormatRegistry::new();
    registry.register(FormatKey::Shape(ShapeKind::Array), constant_strategy);

    let output =
        Crawler::new(&registry, DataObject::Array(array![[1.0]])).crawl(CrawlOptions::new());
    assert_eq!(output.metadata["replaced"], json!(true));
}

// =============================================================================
// Shape Round-Trip
// =============================================================================

#[test]
fn test_metadata_shape_matches_payload() {
    let probe = Probe::new();

    let cases = vec![
        DataObject::Array(array![[1.0, 2.0], [3.0, 4.0]]),
        DataObject::Bundle(iris_bundle()),
        DataObject::Frame(polars::prelude::df!("a" => [1.0, 2.0, 3.0]).unwrap()),
    ];

    for object in cases {
        let profile = probe.inspect(object);
        let reported = profile.metadata["shape"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap() as usize)
            .collect::<Vec<usize>>();
        assert_eq!(profile.payload.shape(), Some(reported));
    }
}
