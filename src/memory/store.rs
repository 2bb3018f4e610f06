// In-memory pipeline store: documents per collection, keyed by their `_id`
use super::error::{MemoryError, MemoryResult};
use crate::config::constants::{ID_FIELD, PIPELINES_COLLECTION};
use crate::error::BoxError;
use crate::pipeline::{CollectionRef, Document, DocumentCursor, PipelineStore, cursor};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type Collections = IndexMap<String, IndexMap<String, Document>>;

/// One saved version of a pipeline definition
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRevision {
    pub pipeline_id: String,
    pub version: usize,
    pub definition: Document,
}

#[derive(Debug, Default)]
pub struct InMemoryPipelineStore {
    database: String,
    history_enabled: bool,
    collections: RwLock<Collections>,
    history: RwLock<Vec<PipelineRevision>>,
}

/// Key for an `_id` value: its JSON text, so `1` and `"1"` stay distinct
fn key_of(id: &Document) -> String {
    id.to_string()
}

/// Readable name of a pipeline `_id`
fn label_of(id: &Document) -> String {
    match id {
        Document::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl InMemoryPipelineStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Default::default()
        }
    }

    /// Record every saved pipeline definition
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history_enabled = enabled;
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.collections.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace a document by its `_id`
    pub fn upsert(&self, collection: &str, document: Document) -> MemoryResult<Document> {
        let id = document
            .get(ID_FIELD)
            .ok_or_else(|| MemoryError::MissingId(collection.to_string()))?;
        let key = key_of(id);

        if self.history_enabled && collection == PIPELINES_COLLECTION {
            let mut history = self.history.write().unwrap_or_else(|e| e.into_inner());
            let pipeline_id = label_of(id);
            let version = history.iter().filter(|r| r.pipeline_id == pipeline_id).count() + 1;
            history.push(PipelineRevision {
                pipeline_id,
                version,
                definition: document.clone(),
            });
        }

        debug!("Upserting {} into {}.{}", key, self.database, collection);
        self.write()
            .entry(collection.to_string())
            .or_default()
            .insert(key, document.clone());
        Ok(document)
    }

    pub fn insert_many(&self, collection: &str, documents: impl IntoIterator<Item = Document>) -> MemoryResult<()> {
        for document in documents {
            self.upsert(collection, document)?;
        }
        Ok(())
    }

    pub fn get(&self, collection: &str, id: &Document) -> Option<Document> {
        self.read().get(collection)?.get(&key_of(id)).cloned()
    }

    pub fn remove(&self, collection: &str, id: &Document) -> bool {
        self.write()
            .get_mut(collection)
            .is_some_and(|documents| documents.shift_remove(&key_of(id)).is_some())
    }

    /// Snapshot of a collection in insertion order
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.read()
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.read().get(collection).map_or(0, IndexMap::len)
    }

    pub fn history(&self) -> Vec<PipelineRevision> {
        self.history.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PipelineStore for InMemoryPipelineStore {
    async fn count(&self) -> Result<u64, BoxError> {
        Ok(self.len(PIPELINES_COLLECTION) as u64)
    }

    async fn find_by_id(&self, collection: &CollectionRef, id: &Document) -> Result<Option<Document>, BoxError> {
        Ok(self.get(&collection.name, id))
    }

    async fn find_all(&self, collection: &CollectionRef) -> Result<DocumentCursor, BoxError> {
        Ok(cursor(self.documents(&collection.name)))
    }

    async fn save(&self, collection: &CollectionRef, document: Document) -> Result<Document, BoxError> {
        Ok(self.upsert(&collection.name, document)?)
    }

    async fn delete_by_id(&self, collection: &CollectionRef, id: &Document) -> Result<bool, BoxError> {
        Ok(self.remove(&collection.name, id))
    }

    async fn count_documents(&self, collection: &CollectionRef) -> Result<u64, BoxError> {
        Ok(self.len(&collection.name) as u64)
    }
}
