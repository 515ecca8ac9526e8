//! Structured dataset carriers produced by instrumented loaders.

use ndarray::{Array1, Array2, ArrayD};

/// A fixed two-part labeled bundle: a data block plus a label vector,
/// with optional feature/class naming (the classic loader "bunch" form).
#[derive(Debug, Clone)]
pub struct LabeledBundle {
    /// Feature block, one row per instance.
    pub data: Array2<f64>,
    /// Label vector aligned with the data rows.
    pub target: Array1<f64>,
    /// Declared feature names, one per data column.
    pub feature_names: Vec<String>,
    /// Class names indexed by label value.
    pub target_names: Vec<String>,
    /// Free-form description of the dataset.
    pub description: Option<String>,
}

impl LabeledBundle {
    /// Create a bundle from a data block and label vector.
    pub fn new(data: Array2<f64>, target: Array1<f64>) -> Self {
        Self {
            data,
            target,
            feature_names: Vec::new(),
            target_names: Vec::new(),
            description: None,
        }
    }

    /// Set the feature names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    /// Set the class names.
    pub fn with_target_names(mut self, names: Vec<String>) -> Self {
        self.target_names = names;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A bare `(x, y)` pair, the form loaders return when asked for
/// features and labels separately.
#[derive(Debug, Clone)]
pub struct SplitPair {
    /// Feature block.
    pub x: Array2<f64>,
    /// Label vector.
    pub y: Array1<f64>,
}

impl SplitPair {
    /// Create a pair from a feature block and label vector.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Self {
        Self { x, y }
    }
}

/// Pre-split train/test blocks, the nested form
/// `((x_train, y_train), (x_test, y_test))`.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

impl TrainTestSplit {
    /// Create a split from its four blocks.
    pub fn new(
        x_train: Array2<f64>,
        y_train: Array1<f64>,
        x_test: Array2<f64>,
        y_test: Array1<f64>,
    ) -> Self {
        Self {
            x_train,
            y_train,
            x_test,
            y_test,
        }
    }
}

/// A vision-style dataset carrier: an n-dimensional data tensor with
/// aligned targets, class names, and a train/test marker.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    /// Data tensor, first axis indexes instances.
    pub data: ArrayD<f64>,
    /// Target vector aligned with the first axis.
    pub targets: Array1<f64>,
    /// Whether this is the training portion.
    pub train: bool,
    /// Class names indexed by target value.
    pub classes: Vec<String>,
    /// Where the data was loaded from.
    pub source: String,
}

impl TensorDataset {
    /// Create a dataset from a data tensor and target vector.
    pub fn new(data: ArrayD<f64>, targets: Array1<f64>) -> Self {
        Self {
            data,
            targets,
            train: true,
            classes: Vec::new(),
            source: String::new(),
        }
    }

    /// Mark as the training or test portion.
    pub fn with_train(mut self, train: bool) -> Self {
        self.train = train;
        self
    }

    /// Set the class names.
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// Set the source location.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// One-line summary used as the dataset description.
    pub fn summary(&self) -> String {
        let portion = if self.train { "train" } else { "test" };
        format!(
            "{} split: {} instances, {} classes",
            portion,
            self.targets.len(),
            self.classes.len()
        )
    }
}
