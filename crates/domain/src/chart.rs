//! Chart override directives and the transformer configuration that carries them.

use serde::{Deserialize, Serialize};

use crate::globals::GlobalTable;
use crate::value::{Value, ValueMap};

/// One configured override targeting a single `HelmRelease`.
///
/// # Example
///
/// ```
/// use chartpatch_domain::{ChartOverride, Value};
///
/// let chart = ChartOverride::new("db")
///     .with_reference("repo/$(env)-chart")
///     .with_override("conf.replicas", 3);
///
/// assert_eq!(chart.reference(), Some("repo/$(env)-chart"));
/// assert_eq!(chart.overrides["conf.replicas"], Value::Integer(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOverride {
    /// Name of the target `HelmRelease`.
    #[serde(rename = "chartName", default)]
    pub name: String,

    /// New value for `spec.chart.ref`; may contain `$(name)` references.
    #[serde(rename = "chartRef", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Dotted path to value, merged under `spec.values`.
    #[serde(rename = "override", default)]
    pub overrides: ValueMap,
}

impl ChartOverride {
    /// Creates an override with no reference rewrite and no values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: None,
            overrides: ValueMap::new(),
        }
    }

    /// Sets the reference rewrite.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Adds one dotted-path override.
    #[must_use]
    pub fn with_override(
        mut self,
        path: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.overrides.insert(path.into(), value.into());
        self
    }

    /// Returns the reference rewrite, treating an empty string as absent.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }
}

/// Transformer configuration: the global table and the ordered override list.
///
/// `charts` is optional at the serialization level so that an absent list can
/// be told apart from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Variables available to `$(name)` references.
    #[serde(default, skip_serializing_if = "GlobalTable::is_empty")]
    pub global: GlobalTable,

    /// Overrides applied in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<ChartOverride>>,
}

impl OverrideConfig {
    /// Creates a configuration with the given globals and charts.
    #[must_use]
    pub const fn new(global: GlobalTable, charts: Vec<ChartOverride>) -> Self {
        Self {
            global,
            charts: Some(charts),
        }
    }
}
