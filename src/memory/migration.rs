// In-memory migration: upserts pipeline definitions from code and from a directory of JSON files
use super::error::{MemoryError, MemoryResult};
use super::runner::PipelineDefinition;
use super::store::InMemoryPipelineStore;
use crate::config::constants::{PIPELINE_FILE_EXTENSION, PIPELINES_COLLECTION};
use crate::error::BoxError;
use crate::pipeline::MigrationEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub struct InMemoryMigration {
    store: Arc<InMemoryPipelineStore>,
    definitions: Vec<PipelineDefinition>,
    pipelines_path: Option<PathBuf>,
}

impl InMemoryMigration {
    pub fn new(store: Arc<InMemoryPipelineStore>) -> Self {
        Self {
            store,
            definitions: Vec::new(),
            pipelines_path: None,
        }
    }

    pub fn with_definitions(mut self, definitions: impl IntoIterator<Item = PipelineDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    pub fn with_pipelines_path(mut self, path: Option<PathBuf>) -> Self {
        self.pipelines_path = path;
        self
    }

    /// Load every definition and upsert it; unchanged definitions are left alone
    pub fn migrate(&self) -> MemoryResult<usize> {
        let mut definitions = self.definitions.clone();
        if let Some(dir) = &self.pipelines_path {
            definitions.extend(load_definitions(dir)?);
        }

        let mut changed = 0;
        for definition in definitions {
            let document = definition.to_document()?;
            let id = document["_id"].clone();
            if self.store.get(PIPELINES_COLLECTION, &id).as_ref() == Some(&document) {
                debug!("Pipeline '{}' unchanged", definition.id);
                continue;
            }
            self.store.upsert(PIPELINES_COLLECTION, document)?;
            changed += 1;
        }
        Ok(changed)
    }
}

impl MigrationEngine for InMemoryMigration {
    fn start(&self, context_id: &str) -> Result<(), BoxError> {
        let changed = self.migrate()?;
        info!("Migration '{}' applied {} pipeline change(s)", context_id, changed);
        Ok(())
    }
}

/// Read `*.json` pipeline definitions from a directory, in file name order
pub fn load_definitions(dir: &Path) -> MemoryResult<Vec<PipelineDefinition>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == PIPELINE_FILE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut definitions = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        let definition = serde_json::from_str(&content)
            .map_err(|source| MemoryError::InvalidDefinition { path: path.clone(), source })?;
        debug!("Loaded pipeline definition from {:?}", path);
        definitions.push(definition);
    }
    Ok(definitions)
}
