// Component index - metadata of every type the application makes known
use crate::error::Result;
use crate::util::naming;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Trait or other contract with no instantiable body
    Interface,
    Concrete,
}

/// Capability markers attached to a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stereotype {
    Store,
    Component,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub type_name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub stereotypes: Vec<Stereotype>,
    #[serde(default)]
    pub profiles: Vec<String>,
}

impl ComponentMetadata {
    pub fn interface(type_name: impl Into<String>) -> Self {
        Self::new(type_name, TypeKind::Interface)
    }

    pub fn concrete(type_name: impl Into<String>) -> Self {
        Self::new(type_name, TypeKind::Concrete)
    }

    fn new(type_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            stereotypes: Vec::new(),
            profiles: Vec::new(),
        }
    }

    pub fn with_stereotype(mut self, stereotype: Stereotype) -> Self {
        if !self.stereotypes.contains(&stereotype) {
            self.stereotypes.push(stereotype);
        }
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    pub fn has_stereotype(&self, stereotype: &Stereotype) -> bool {
        self.stereotypes.contains(stereotype)
    }

    pub fn simple_name(&self) -> &str {
        naming::simple_name(&self.type_name)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    components: Vec<ComponentMetadata>,
}

/// Ordered, de-duplicated type metadata. Later entries for a known type name replace
/// the earlier ones in place.
#[derive(Debug, Clone, Default)]
pub struct ComponentIndex {
    entries: IndexMap<String, ComponentMetadata>,
}

impl ComponentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, metadata: ComponentMetadata) {
        self.entries.insert(metadata.type_name.clone(), metadata);
    }

    pub fn get(&self, type_name: &str) -> Option<&ComponentMetadata> {
        self.entries.get(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentMetadata> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON manifest of the form `{"components": [...]}`
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;
        let mut index = Self::new();
        for metadata in manifest.components {
            index.add(metadata);
        }
        debug!("Loaded component manifest with {} entries", index.len());
        Ok(index)
    }

    pub fn from_manifest_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_manifest_str(&content)
    }
}
