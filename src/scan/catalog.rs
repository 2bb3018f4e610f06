// Type catalog - the application's explicit registry of types and store declarations
use super::index::{ComponentIndex, ComponentMetadata};
use crate::error::{Result, StarterError};
use crate::store::{StoreDeclaration, StoreInterface};
use indexmap::IndexMap;
use tracing::debug;

/// Index of known types plus the store declarations linked into this binary
#[derive(Debug, Default)]
pub struct TypeCatalog {
    index: ComponentIndex,
    stores: IndexMap<String, StoreDeclaration>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a store trait generated by `pipe_store!`
    pub fn declare_store<S: StoreInterface + ?Sized>(&mut self) -> &mut Self {
        self.declare(S::declaration())
    }

    /// Declare a hand-built store declaration
    pub fn declare(&mut self, declaration: StoreDeclaration) -> &mut Self {
        debug!("Declaring store type: {}", declaration.type_name());
        self.index.add(declaration.metadata());
        self.stores
            .insert(declaration.type_name().to_string(), declaration);
        self
    }

    /// Make a plain type known to scanning
    pub fn declare_type(&mut self, metadata: ComponentMetadata) -> &mut Self {
        self.index.add(metadata);
        self
    }

    /// Merge externally generated metadata, such as a component manifest
    pub fn with_manifest(&mut self, manifest: ComponentIndex) -> &mut Self {
        for metadata in manifest.iter() {
            if self.index.get(&metadata.type_name).is_none() {
                self.index.add(metadata.clone());
            }
        }
        self
    }

    /// Resolve a discovered type name back to its declaration
    pub fn resolve(&self, type_name: &str) -> Result<&StoreDeclaration> {
        self.stores
            .get(type_name)
            .ok_or_else(|| StarterError::unresolvable(type_name))
    }

    pub fn index(&self) -> &ComponentIndex {
        &self.index
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }
}
