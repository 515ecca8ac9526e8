//! Escape hatch for host objects no concrete variant models.

use serde_json::Value;

/// Description of an unknown host object, filled with whatever the
/// instrumentation shim could read off it.
///
/// Only the type name is required; shape, targets, name, and description
/// are best-effort and stay absent when the host object exposes nothing
/// comparable.
#[derive(Debug, Clone, Default)]
pub struct OpaqueObject {
    /// Reported fully-qualified type name, used for substring matching.
    pub type_name: String,
    /// Name the object carries, if any.
    pub name: Option<String>,
    /// Shape-like attribute, if readable.
    pub shape: Option<Vec<usize>>,
    /// Targets-like attribute, if readable.
    pub targets: Option<Vec<Value>>,
    /// Free-form description, if readable.
    pub description: Option<String>,
}

impl OpaqueObject {
    /// Create an opaque object with the reported type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Set the carried name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the shape-like attribute.
    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the targets-like attribute.
    pub fn with_targets(mut self, targets: Vec<Value>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
