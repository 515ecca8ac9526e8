//! Format registry: the ordered catalog of classification rules and the
//! strategy table they resolve into.
//!
//! The registry is an explicit object constructed once at startup and passed
//! by reference to every crawl; there is no global mutable state. Catalog
//! enumeration order and strategy-table iteration order are both part of the
//! observable dispatch contract, so both containers preserve insertion order.

mod marker;

use indexmap::IndexMap;

use crate::extract::{
    ExtractionStrategy, array_strategy, bundle_strategy, frame_strategy, graph_strategy,
    series_strategy, split_loader_strategy, tensor_strategy, train_test_strategy,
};
use crate::object::DataObject;

pub use marker::{FormatKey, FormatPredicate, ShapeKind};

/// Loader-module marker for loaders returning bare `(x, y)` pairs or bundles.
pub const MODULE_PAIR_LOADERS: &str = "smartcore::dataset";
/// Loader-module marker for loaders returning pre-split train/test blocks.
pub const MODULE_SPLIT_LOADERS: &str = "burn::data";
/// Loader-module marker for vision-style tensor dataset loaders.
pub const MODULE_TENSOR_LOADERS: &str = "tch::vision";

/// One ordered catalog row: a predicate and the key it classifies into.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub predicate: FormatPredicate,
    pub key: FormatKey,
}

/// Which built-in format families the registry is constructed with.
///
/// The original environment-conditional self-registration becomes explicit
/// here: a disabled family registers no strategy, and its catalog entry
/// degrades to a type-name fragment so matching objects still classify by
/// name but resolve to the default strategy.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub arrays: bool,
    pub frames: bool,
    pub series: bool,
    pub bundles: bool,
    pub graphs: bool,
    pub tensor_sets: bool,
    pub split_loaders: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            arrays: true,
            frames: true,
            series: true,
            bundles: true,
            graphs: true,
            tensor_sets: true,
            split_loaders: true,
        }
    }
}

/// Registry mapping format keys to extraction strategies, together with the
/// ordered type catalog and the loader-module catalog.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    strategies: IndexMap<FormatKey, ExtractionStrategy>,
    catalog: Vec<CatalogEntry>,
    modules: Vec<String>,
}

impl FormatRegistry {
    /// An empty registry with no catalog, strategies, or module markers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with every built-in family enabled.
    pub fn new() -> Self {
        Self::with_capabilities(&Capabilities::default())
    }

    /// Build the built-in registry for the given capability set.
    pub fn with_capabilities(caps: &Capabilities) -> Self {
        let mut registry = Self::empty();

        // Catalog order mirrors the declared enumeration order of the known
        // representations; first match wins.
        registry.family(
            caps.bundles,
            ShapeKind::Bundle,
            "LabeledBundle",
            bundle_strategy,
        );
        registry.family(caps.arrays, ShapeKind::Array, "Array2", array_strategy);
        registry.family(caps.frames, ShapeKind::Frame, "DataFrame", frame_strategy);
        registry.family(caps.series, ShapeKind::Series, "Series", series_strategy);
        registry.family(caps.graphs, ShapeKind::Graph, "GraphData", graph_strategy);

        // Plain containers classify but carry no dedicated strategy; loader
        // module overrides route them to one.
        registry.declare(
            FormatPredicate::IsShape(ShapeKind::Record),
            FormatKey::Shape(ShapeKind::Record),
        );
        registry.declare(
            FormatPredicate::IsShape(ShapeKind::SplitPair),
            FormatKey::Shape(ShapeKind::SplitPair),
        );
        registry.declare(
            FormatPredicate::IsShape(ShapeKind::TrainTest),
            FormatKey::Shape(ShapeKind::TrainTest),
        );

        registry.family(
            caps.tensor_sets,
            ShapeKind::TensorSet,
            "TensorDataset",
            tensor_strategy,
        );
        registry.declare(
            FormatPredicate::IsShape(ShapeKind::Tensor),
            FormatKey::Shape(ShapeKind::Tensor),
        );

        // Name fragments catch opaque objects from hosts whose concrete
        // representations never reach this process.
        for fragment in ["Bunch", "DataFrame", "ndarray"] {
            registry.declare(
                FormatPredicate::TypeNameContains(fragment.to_string()),
                FormatKey::Alias(fragment.to_string()),
            );
        }

        if caps.split_loaders {
            registry.register(
                FormatKey::Module(MODULE_PAIR_LOADERS.to_string()),
                split_loader_strategy,
            );
            registry.register(
                FormatKey::Module(MODULE_SPLIT_LOADERS.to_string()),
                train_test_strategy,
            );
            registry.declare_module(MODULE_PAIR_LOADERS);
            registry.declare_module(MODULE_SPLIT_LOADERS);
        }
        if caps.tensor_sets {
            registry.register(
                FormatKey::Module(MODULE_TENSOR_LOADERS.to_string()),
                tensor_strategy,
            );
            registry.declare_module(MODULE_TENSOR_LOADERS);
        }

        registry
    }

    fn family(
        &mut self,
        enabled: bool,
        kind: ShapeKind,
        fragment: &str,
        strategy: ExtractionStrategy,
    ) {
        if enabled {
            self.declare(FormatPredicate::IsShape(kind), FormatKey::Shape(kind));
            self.register(FormatKey::Shape(kind), strategy);
        } else {
            self.declare(
                FormatPredicate::TypeNameContains(fragment.to_string()),
                FormatKey::Alias(fragment.to_string()),
            );
        }
    }

    /// Register a strategy for a key. Idempotent; a later registration for
    /// the same key overwrites the earlier one without error.
    pub fn register(&mut self, key: FormatKey, strategy: ExtractionStrategy) {
        self.strategies.insert(key, strategy);
    }

    /// Append a classification rule to the catalog.
    pub fn declare(&mut self, predicate: FormatPredicate, key: FormatKey) {
        self.catalog.push(CatalogEntry { predicate, key });
    }

    /// Append a loader-module marker.
    pub fn declare_module(&mut self, marker: impl Into<String>) {
        self.modules.push(marker.into());
    }

    /// Look up the strategy registered for a key.
    pub fn strategy_for(&self, key: &FormatKey) -> Option<ExtractionStrategy> {
        self.strategies.get(key).copied()
    }

    /// Whether a strategy is registered under `key`.
    pub fn contains(&self, key: &FormatKey) -> bool {
        self.strategies.contains_key(key)
    }

    /// Classify an object against the catalog in declared order.
    pub fn identify(&self, object: &DataObject) -> Option<FormatKey> {
        self.catalog
            .iter()
            .find(|entry| entry.predicate.matches(object))
            .map(|entry| entry.key.clone())
    }

    /// Registered keys that have a string form (module and alias keys), in
    /// registration order. The legacy context-override scan walks these.
    pub fn string_keys(&self) -> impl Iterator<Item = (&str, &FormatKey)> {
        self.strategies
            .keys()
            .filter_map(|key| key.as_str().map(|s| (s, key)))
    }

    /// Declared loader-module markers, in declaration order.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// The ordered type catalog.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{CrawlOutput, ExtractionInput, default_strategy};
    use crate::object::OpaqueObject;
    use ndarray::array;

    #[test]
    fn test_identify_prefers_catalog_order() {
        let registry = FormatRegistry::new();

        let arr = DataObject::Array(array![[1.0, 2.0]]);
        assert_eq!(
            registry.identify(&arr),
            Some(FormatKey::Shape(ShapeKind::Array))
        );

        // An opaque frame only matches the name-fragment fallback.
        let opaque = DataObject::Opaque(OpaqueObject::new("pandas.core.frame.DataFrame"));
        assert_eq!(
            registry.identify(&opaque),
            Some(FormatKey::Alias("DataFrame".into()))
        );
    }

    #[test]
    fn test_identify_unknown_is_none() {
        let registry = FormatRegistry::new();
        let opaque = DataObject::Opaque(OpaqueObject::new("some.framework.Thing"));
        assert_eq!(registry.identify(&opaque), None);
    }

    #[test]
    fn test_register_last_writer_wins() {
        fn replacement(input: ExtractionInput) -> CrawlOutput {
            default_strategy(input)
        }

        let mut registry = FormatRegistry::new();
        let key = FormatKey::Shape(ShapeKind::Array);
        let before = registry.strategy_for(&key).unwrap();

        registry.register(key.clone(), replacement);
        let after = registry.strategy_for(&key).unwrap();

        assert!(!std::ptr::fn_addr_eq(before, after));
        assert!(std::ptr::fn_addr_eq(
            after,
            replacement as ExtractionStrategy
        ));
    }

    #[test]
    fn test_disabled_capability_degrades_to_alias() {
        let caps = Capabilities {
            frames: false,
            ..Capabilities::default()
        };
        let registry = FormatRegistry::with_capabilities(&caps);

        let df = polars::prelude::df!("a" => [1.0, 2.0]).unwrap();
        let frame = DataObject::Frame(df);

        // Classified by name fragment, but no strategy is registered.
        let key = registry.identify(&frame).unwrap();
        assert_eq!(key, FormatKey::Alias("DataFrame".into()));
        assert!(registry.strategy_for(&key).is_none());
    }

    #[test]
    fn test_string_keys_are_module_markers() {
        let registry = FormatRegistry::new();
        let keys: Vec<&str> = registry.string_keys().map(|(s, _)| s).collect();

        assert!(keys.contains(&MODULE_PAIR_LOADERS));
        assert!(keys.contains(&MODULE_TENSOR_LOADERS));
        // Shape keys have no string form.
        assert!(!keys.is_empty());
    }
}
