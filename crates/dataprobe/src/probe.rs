//! Main Probe struct and public API.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crawler::{CallSite, Crawler};
use crate::extract::CrawlOptions;
use crate::object::DataObject;
use crate::registry::{Capabilities, FormatKey, FormatRegistry};
use crate::warning::ProbeWarning;

/// Configuration for a probe.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Which built-in format families to enable.
    pub capabilities: Capabilities,
    /// Dataset name used when neither the object nor the call site carries
    /// one.
    pub fallback_name: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            fallback_name: "dataset".to_string(),
        }
    }
}

/// The dataset discovery engine: a format registry plus the inspection flow
/// instrumentation hooks call into.
pub struct Probe {
    config: ProbeConfig,
    registry: FormatRegistry,
}

impl Probe {
    /// Create a probe with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a probe with a custom configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        let registry = FormatRegistry::with_capabilities(&config.capabilities);
        Self { config, registry }
    }

    /// The probe's format registry.
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for registering additional formats.
    pub fn registry_mut(&mut self) -> &mut FormatRegistry {
        &mut self.registry
    }

    /// Inspect a data object with no call-site information.
    pub fn inspect(&self, object: DataObject) -> DatasetProfile {
        self.inspect_at(object, CallSite::new(), CrawlOptions::new())
    }

    /// Inspect a data object captured at an instrumented call site.
    pub fn inspect_at(
        &self,
        object: DataObject,
        site: CallSite,
        options: CrawlOptions,
    ) -> DatasetProfile {
        let fingerprint = object.fingerprint();
        let name = object
            .name_hint()
            .map(str::to_string)
            .or_else(|| site.origin.as_ref().map(|origin| origin.name.clone()))
            .unwrap_or_else(|| self.config.fallback_name.clone());

        let crawler = Crawler::at_site(&self.registry, object, site);
        let format = crawler.format();
        let output = crawler.crawl(options);

        DatasetProfile {
            name,
            format,
            payload: output.payload,
            metadata: output.metadata,
            targets: output.targets,
            warnings: output.warnings,
            fingerprint,
            profiled_at: Utc::now(),
        }
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one inspection produced.
#[derive(Debug, Clone)]
pub struct DatasetProfile {
    /// Resolved dataset name.
    pub name: String,
    /// The format the crawl resolved to, if any.
    pub format: Option<FormatKey>,
    /// Extracted payload.
    pub payload: DataObject,
    /// Extracted metadata.
    pub metadata: IndexMap<String, Value>,
    /// Extracted target values, for decision tracking.
    pub targets: Option<Vec<Value>>,
    /// Warnings accumulated during extraction.
    pub warnings: Vec<ProbeWarning>,
    /// Structural identity of the inspected object.
    pub fingerprint: String,
    /// When the inspection ran.
    pub profiled_at: DateTime<Utc>,
}

impl DatasetProfile {
    /// Layer user-supplied dataset metadata over the extracted metadata;
    /// user entries win on key collision.
    pub fn merge_metadata(&mut self, extra: &IndexMap<String, Value>) {
        for (key, value) in extra {
            self.metadata.insert(key.clone(), value.clone());
        }
    }

    /// The serializable form handed to the repository collaborator, stored
    /// alongside the payload binary.
    pub fn record(&self) -> DatasetRecord {
        DatasetRecord {
            name: self.name.clone(),
            format: self.format.as_ref().map(|key| key.label().to_string()),
            fingerprint: self.fingerprint.clone(),
            metadata: self.metadata.clone(),
            warnings: self.warnings.clone(),
            recorded_at: self.profiled_at,
        }
    }
}

/// Serializable summary of one inspected dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Resolved dataset name.
    pub name: String,
    /// Resolved format label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Structural identity of the inspected object.
    pub fingerprint: String,
    /// Extracted metadata, stored as an opaque mapping.
    pub metadata: IndexMap<String, Value>,
    /// Warnings accumulated during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ProbeWarning>,
    /// When the inspection ran.
    pub recorded_at: DateTime<Utc>,
}
