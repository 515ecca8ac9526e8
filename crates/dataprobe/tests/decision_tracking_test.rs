//! Integration tests for the decision tracking flow: probe a dataset,
//! stash its targets, then aggregate predictions out of the run cache.

use dataprobe::decisions::{
    DECISIONS_KEY, MemoryRunCache, RunCache, stash_predictions, stash_probabilities,
    stash_split_info, stash_targets, track_decisions,
};
use dataprobe::{DataObject, LabeledBundle, Probe, SplitInfo};
use ndarray::array;
use serde_json::json;

#[test]
fn test_probe_then_track_full_flow() {
    let probe = Probe::new();
    let mut cache = MemoryRunCache::new();

    // Dataset inspection captures the targets for later cross-referencing.
    let bundle = LabeledBundle::new(
        array![[5.1, 3.5], [4.9, 3.0], [6.2, 2.9]],
        array![0.0, 0.0, 1.0],
    );
    let profile = probe.inspect(DataObject::Bundle(bundle));
    stash_targets(&mut cache, profile.targets.unwrap());

    // The instrumented predict call stashes its outputs.
    stash_predictions(&mut cache, vec![json!(0.0), json!(1.0), json!(1.0)]);
    stash_probabilities(
        &mut cache,
        vec![vec![0.9, 0.1], vec![0.2, 0.8], vec![0.3, 0.7]],
    );

    let result = track_decisions(&mut cache, None);

    let record = &result.decisions["2"];
    assert_eq!(record.predicted, json!(1.0));
    assert_eq!(record.probability, Some(vec![0.3, 0.7]));
    assert_eq!(record.truth, Some(json!(1.0)));

    // The merged map is stored under the split entry for persistence.
    let entry = cache.get("0").unwrap();
    assert_eq!(
        entry[DECISIONS_KEY]["2"]["probability"],
        json!([0.3, 0.7])
    );
}

#[test]
fn test_split_identifiers_from_instrumented_splitter() {
    let mut cache = MemoryRunCache::new();

    stash_split_info(
        &mut cache,
        3,
        &SplitInfo::new(vec![json!("s-02"), json!("s-09"), json!("s-11")]),
    );
    stash_predictions(&mut cache, vec![json!("CD"), json!("UC"), json!("CD")]);

    let result = track_decisions(&mut cache, None);

    assert_eq!(result.decisions.len(), 3);
    assert_eq!(result.decisions["s-09"].predicted, json!("UC"));
    assert!(cache.get("3").unwrap().get(DECISIONS_KEY).is_some());
}

#[test]
fn test_artifact_packaging() {
    let mut cache = MemoryRunCache::new();
    stash_predictions(&mut cache, vec![json!(1)]);

    let artifact = track_decisions(&mut cache, None).into_artifact(0);

    assert_eq!(artifact.split, 0);
    assert_eq!(artifact.decisions["0"].predicted, json!(1));

    let encoded = serde_json::to_string(&artifact).unwrap();
    assert!(encoded.contains("recorded_at"));
}

#[test]
fn test_predictions_fall_back_to_call_result() {
    let mut cache = MemoryRunCache::new();
    stash_targets(&mut cache, vec![json!(0), json!(1)]);

    // Nothing stashed under "predictions": the instrumented call's own
    // return value is used instead.
    let result = track_decisions(&mut cache, Some(vec![json!(0), json!(1)]));

    assert_eq!(result.decisions.len(), 2);
    assert_eq!(result.decisions["1"].truth, Some(json!(1)));
}
