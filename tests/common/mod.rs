// Recording collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use pipestore::pipeline::{CollectionRef, Document, DocumentCursor, cursor};
use pipestore::{BoxError, CoreSingletons, MigrationEngine, PipeConfig, PipelineBackend, PipelineRunner, PipelineStore};
use std::sync::{Arc, Mutex};

/// Records every run and answers with fixed documents
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(String, Vec<Document>)>>,
    results: Vec<Document>,
}

impl RecordingRunner {
    pub fn returning(results: Vec<Document>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            results,
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<Document>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineRunner for RecordingRunner {
    async fn run(&self, pipeline_id: &str, args: Vec<Document>) -> Result<DocumentCursor, BoxError> {
        self.calls.lock().unwrap().push((pipeline_id.to_string(), args));
        Ok(cursor(self.results.clone()))
    }
}

/// Records every CRUD call; holds no data
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, collection: Option<&CollectionRef>) {
        let call = match collection {
            Some(collection) => format!("{} {}", operation, collection.name),
            None => operation.to_string(),
        };
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PipelineStore for RecordingStore {
    async fn count(&self) -> Result<u64, BoxError> {
        self.record("count", None);
        Ok(0)
    }

    async fn find_by_id(&self, collection: &CollectionRef, _id: &Document) -> Result<Option<Document>, BoxError> {
        self.record("find_by_id", Some(collection));
        Ok(None)
    }

    async fn find_all(&self, collection: &CollectionRef) -> Result<DocumentCursor, BoxError> {
        self.record("find_all", Some(collection));
        Ok(cursor(Vec::new()))
    }

    async fn save(&self, collection: &CollectionRef, document: Document) -> Result<Document, BoxError> {
        self.record("save", Some(collection));
        Ok(document)
    }

    async fn delete_by_id(&self, collection: &CollectionRef, _id: &Document) -> Result<bool, BoxError> {
        self.record("delete_by_id", Some(collection));
        Ok(false)
    }

    async fn count_documents(&self, collection: &CollectionRef) -> Result<u64, BoxError> {
        self.record("count_documents", Some(collection));
        Ok(0)
    }
}

#[derive(Default)]
pub struct RecordingMigration {
    started: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingMigration {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

impl MigrationEngine for RecordingMigration {
    fn start(&self, context_id: &str) -> Result<(), BoxError> {
        if self.fail {
            return Err("pipeline source unreachable".into());
        }
        self.started.lock().unwrap().push(context_id.to_string());
        Ok(())
    }
}

/// Hands out the same recording collaborators for every configuration
#[derive(Default)]
pub struct RecordingBackend {
    pub store: Arc<RecordingStore>,
    pub runner: Arc<RecordingRunner>,
    pub migration: Arc<RecordingMigration>,
}

impl RecordingBackend {
    pub fn new(runner: RecordingRunner, migration: RecordingMigration) -> Self {
        Self {
            store: Arc::new(RecordingStore::default()),
            runner: Arc::new(runner),
            migration: Arc::new(migration),
        }
    }

    pub fn singletons(&self) -> CoreSingletons {
        CoreSingletons::new(
            Arc::clone(&self.store) as Arc<dyn PipelineStore>,
            Arc::clone(&self.runner) as Arc<dyn PipelineRunner>,
        )
    }
}

impl PipelineBackend for RecordingBackend {
    fn pipeline_store(&self, _config: &PipeConfig) -> Result<Arc<dyn PipelineStore>, BoxError> {
        Ok(Arc::clone(&self.store) as Arc<dyn PipelineStore>)
    }

    fn pipeline_runner(
        &self,
        _config: &PipeConfig,
        _store: Arc<dyn PipelineStore>,
    ) -> Result<Arc<dyn PipelineRunner>, BoxError> {
        Ok(Arc::clone(&self.runner) as Arc<dyn PipelineRunner>)
    }

    fn migration_engine(
        &self,
        _config: &PipeConfig,
        _store: Arc<dyn PipelineStore>,
    ) -> Result<Arc<dyn MigrationEngine>, BoxError> {
        Ok(Arc::clone(&self.migration) as Arc<dyn MigrationEngine>)
    }
}
