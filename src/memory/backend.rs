// In-memory backend: one shared store per backend, seeded in code
use super::error::MemoryError;
use super::migration::InMemoryMigration;
use super::runner::{InMemoryPipelineRunner, PipelineDefinition};
use super::store::InMemoryPipelineStore;
use crate::config::PipeConfig;
use crate::config::constants::MEMORY_URI_SCHEME;
use crate::error::BoxError;
use crate::pipeline::{Document, MigrationEngine, PipelineBackend, PipelineRunner, PipelineStore};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Backend for `memory:` uris (or no uri at all)
#[derive(Default)]
pub struct MemoryBackend {
    definitions: Vec<PipelineDefinition>,
    seed: IndexMap<String, Vec<Document>>,
    store: Mutex<Option<Arc<InMemoryPipelineStore>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline definition loaded by the migration engine
    pub fn with_pipeline(mut self, definition: PipelineDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Documents inserted when the store is created
    pub fn with_documents(mut self, collection: impl Into<String>, documents: Vec<Document>) -> Self {
        self.seed.entry(collection.into()).or_default().extend(documents);
        self
    }

    /// The store built by `pipeline_store`, if it was built
    pub fn store(&self) -> Option<Arc<InMemoryPipelineStore>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn memory_store(&self, config: &PipeConfig) -> Result<Arc<InMemoryPipelineStore>, MemoryError> {
        if let Some(uri) = &config.uri {
            if !uri.starts_with(MEMORY_URI_SCHEME) {
                return Err(MemoryError::UnsupportedUri(uri.clone()));
            }
        }

        let mut slot = self.store.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }

        let database = config.database_name.clone().unwrap_or_else(|| config.id.clone());
        debug!("Creating in-memory database '{}'", database);
        let store = Arc::new(InMemoryPipelineStore::new(database).with_history(config.store_history_enabled));
        for (collection, documents) in &self.seed {
            store.insert_many(collection, documents.iter().cloned())?;
        }
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }
}

impl PipelineBackend for MemoryBackend {
    fn pipeline_store(&self, config: &PipeConfig) -> Result<Arc<dyn PipelineStore>, BoxError> {
        let store: Arc<dyn PipelineStore> = self.memory_store(config)?;
        Ok(store)
    }

    fn pipeline_runner(
        &self,
        config: &PipeConfig,
        _store: Arc<dyn PipelineStore>,
    ) -> Result<Arc<dyn PipelineRunner>, BoxError> {
        Ok(Arc::new(InMemoryPipelineRunner::new(self.memory_store(config)?)))
    }

    fn migration_engine(
        &self,
        config: &PipeConfig,
        _store: Arc<dyn PipelineStore>,
    ) -> Result<Arc<dyn MigrationEngine>, BoxError> {
        let migration = InMemoryMigration::new(self.memory_store(config)?)
            .with_definitions(self.definitions.iter().cloned())
            .with_pipelines_path(config.migration_config.pipelines_path.clone());
        Ok(Arc::new(migration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_is_shared_and_seeded() {
        let backend = MemoryBackend::new().with_documents("pizzas", vec![json!({"_id": 1})]);
        let config = PipeConfig::default();

        backend.pipeline_store(&config).unwrap();
        backend.pipeline_store(&config).unwrap();
        let store = backend.store().unwrap();
        assert_eq!(store.len("pizzas"), 1);
        assert_eq!(store.database(), "pipestore");
    }

    #[test]
    fn test_rejects_foreign_uri() {
        let backend = MemoryBackend::new();
        let config = PipeConfig::builder().uri("mongodb://localhost:27017").build().unwrap();
        let err = backend.pipeline_store(&config).err().unwrap();
        assert!(err.to_string().contains("mongodb://localhost:27017"));
        assert!(backend.store().is_none());
    }
}
