//! Kubernetes-style resources and their identity
//!
//! A resource is a structured document identified by its group, version,
//! kind and name. Only the fields needed for identity and for the chart
//! reference are interpreted; everything else is carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::merge::merge_map;
use crate::value::{Value, ValueMap};

/// Location of the chart source pointer inside a `HelmRelease`.
pub const CHART_REF_PATH: [&str; 3] = ["spec", "chart", "ref"];

/// Location under which chart values live inside a `HelmRelease`.
pub const VALUES_PATH: [&str; 2] = ["spec", "values"];

/// Group, version and kind of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gvk {
    /// API group; empty for the core group.
    pub group: String,
    /// API version.
    pub version: String,
    /// Resource kind.
    pub kind: String,
}

impl Gvk {
    /// Creates a new group/version/kind triple.
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// The Flux v1 `HelmRelease` kind targeted by chart overrides.
    #[must_use]
    pub fn helm_release() -> Self {
        Self::new("helm.fluxcd.io", "v1", "HelmRelease")
    }

    /// Builds a triple from an `apiVersion` string (`group/version` or `version`).
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    /// Returns the `apiVersion` string for this triple.
    #[must_use]
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for Gvk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Identity of a resource within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Group, version and kind.
    pub gvk: Gvk,
    /// `metadata.name`.
    pub name: String,
    /// `metadata.namespace`, if any.
    pub namespace: Option<String>,
}

impl ResourceId {
    /// Creates an identity without a namespace.
    pub fn new(gvk: Gvk, name: impl Into<String>) -> Self {
        Self {
            gvk,
            name: name.into(),
            namespace: None,
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Returns true if `other` is selected by this identity used as a query.
    ///
    /// A query without a namespace matches resources in any namespace.
    #[must_use]
    pub fn selects(&self, other: &Self) -> bool {
        self.gvk == other.gvk
            && self.name == other.name
            && self
                .namespace
                .as_ref()
                .is_none_or(|ns| other.namespace.as_ref() == Some(ns))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ", self.gvk.api_version(), self.gvk.kind)?;
        match &self.namespace {
            Some(ns) => write!(f, "{ns}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A structured document held by a resource collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    fields: ValueMap,
}

impl Resource {
    /// Wraps a top-level mapping as a resource.
    #[must_use]
    pub const fn from_map(fields: ValueMap) -> Self {
        Self { fields }
    }

    /// Wraps a document, which must be a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidResource`] if `value` is not a mapping.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Map(fields) => Ok(Self { fields }),
            other => Err(DomainError::InvalidResource(format!(
                "expected a mapping document, found {other}"
            ))),
        }
    }

    /// Computes the identity from `apiVersion`, `kind` and `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidResource`] if `kind` or `metadata.name`
    /// is missing.
    pub fn id(&self) -> DomainResult<ResourceId> {
        let kind = self
            .string_at(&["kind"])
            .ok_or_else(|| DomainError::InvalidResource("missing kind".to_string()))?;
        let name = self
            .string_at(&["metadata", "name"])
            .ok_or_else(|| DomainError::InvalidResource("missing metadata.name".to_string()))?;
        let api_version = self.string_at(&["apiVersion"]).unwrap_or_default();

        let id = ResourceId::new(Gvk::from_api_version(api_version, kind), name);
        Ok(match self.string_at(&["metadata", "namespace"]) {
            Some(ns) => id.with_namespace(ns),
            None => id,
        })
    }

    fn string_at(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Returns the value at `path`, if every segment exists.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (head, rest) = path.split_first()?;
        self.fields.get(head.as_ref())?.pointer(rest)
    }

    /// Writes `value` at `path`, requiring every parent to already be a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] naming the first parent that is
    /// absent or not a mapping.
    pub fn set_existing<S: AsRef<str>>(&mut self, path: &[S], value: Value) -> DomainResult<()> {
        set_existing(&mut self.fields, path, value)
    }

    /// Returns the top-level fields.
    #[must_use]
    pub const fn fields(&self) -> &ValueMap {
        &self.fields
    }

    /// Returns the top-level fields mutably.
    pub const fn fields_mut(&mut self) -> &mut ValueMap {
        &mut self.fields
    }

    /// Applies `patch` with JSON merge patch semantics.
    pub fn merge(&mut self, patch: &Self) {
        merge_map(&mut self.fields, &patch.fields);
    }

    /// Converts the resource into a mapping value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Map(self.fields)
    }
}

/// Writes `value` at `path` inside `fields` without creating parents.
///
/// # Errors
///
/// Returns [`DomainError::MissingField`] naming the first parent that is absent
/// or not a mapping, and [`DomainError::InvalidPath`] for an empty path.
pub fn set_existing<S: AsRef<str>>(
    fields: &mut ValueMap,
    path: &[S],
    value: Value,
) -> DomainResult<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(DomainError::InvalidPath(String::new()));
    };

    let mut current = fields;
    for (depth, segment) in parents.iter().enumerate() {
        current = current
            .get_mut(segment.as_ref())
            .and_then(Value::as_map_mut)
            .ok_or_else(|| DomainError::MissingField {
                field: path[..=depth]
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
                    .join("."),
            })?;
    }
    current.insert(last.as_ref().to_string(), value);
    Ok(())
}
