//! In-memory resource collection adapter
//!
//! Holds a manifest stream as an ordered list of documents. Lookups ignore
//! documents that have no identity, and output preserves input order.

use std::io::Read;

use chartpatch_application::ports::{CollectionError, ResourceCollection};
use chartpatch_domain::{Resource, ResourceId};
use tracing::debug;

use crate::serialization::{SerializationError, from_yaml_stream, to_json_stable, to_yaml_stream};

/// Ordered, in-memory set of resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryResourceCollection {
    resources: Vec<Resource>,
}

impl InMemoryResourceCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding `resources` in order.
    #[must_use]
    pub const fn from_resources(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Parses a multi-document YAML manifest stream.
    ///
    /// # Errors
    ///
    /// Returns an error if a document is not valid YAML or not a mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self, SerializationError> {
        Ok(Self::from_resources(from_yaml_stream(yaml)?))
    }

    /// Reads and parses a multi-document YAML manifest stream.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the stream does not parse.
    pub fn read_yaml<R: Read>(mut reader: R) -> Result<Self, SerializationError> {
        let mut yaml = String::new();
        reader.read_to_string(&mut yaml)?;
        Self::from_yaml(&yaml)
    }

    /// Appends every resource of `other`, keeping order.
    pub fn extend(&mut self, other: Self) {
        self.resources.extend(other.resources);
    }

    /// Appends one resource.
    pub fn push(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Returns the resources in order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Consumes the collection, returning its resources.
    #[must_use]
    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }

    /// Returns the first resource selected by `id`.
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|resource| Self::is_selected(resource, id))
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if the collection holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Renders the collection as a `---` separated YAML stream.
    ///
    /// # Errors
    ///
    /// Returns an error if a document fails to serialize.
    pub fn to_yaml(&self) -> Result<String, SerializationError> {
        to_yaml_stream(&self.resources)
    }

    /// Renders the collection as a pretty JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if a document fails to serialize.
    pub fn to_json(&self) -> Result<String, SerializationError> {
        to_json_stable(&self.resources)
    }

    fn is_selected(resource: &Resource, id: &ResourceId) -> bool {
        resource.id().is_ok_and(|found| id.selects(&found))
    }
}

impl ResourceCollection for InMemoryResourceCollection {
    type Handle = Resource;

    fn find_by_id(&mut self, id: &ResourceId) -> Result<Option<&mut Resource>, CollectionError> {
        let matches: Vec<usize> = self
            .resources
            .iter()
            .enumerate()
            .filter(|(_, resource)| Self::is_selected(resource, id))
            .map(|(index, _)| index)
            .collect();

        debug!(%id, matches = matches.len(), "looked up resource");
        match matches.as_slice() {
            [] => Ok(None),
            [index] => Ok(self.resources.get_mut(*index)),
            _ => Err(CollectionError::Ambiguous {
                id: id.to_string(),
                count: matches.len(),
            }),
        }
    }
}

impl From<Vec<Resource>> for InMemoryResourceCollection {
    fn from(resources: Vec<Resource>) -> Self {
        Self::from_resources(resources)
    }
}
