// Collaborator contracts - pipeline store, runner, migration engine and the backend that builds them
use crate::config::PipeConfig;
use crate::error::BoxError;
use crate::store::ModelType;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A stored or produced document
pub type Document = Value;

/// Raw result sequence of a pipeline run or collection read
pub type DocumentCursor = Box<dyn Iterator<Item = Result<Document, BoxError>> + Send>;

/// Wrap already materialized documents as a cursor
pub fn cursor(documents: Vec<Document>) -> DocumentCursor {
    Box::new(documents.into_iter().map(Ok))
}

/// Physical collection bound to a data model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub name: String,
    pub model: ModelType,
}

impl CollectionRef {
    pub fn new(name: impl Into<String>, model: ModelType) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.model)
    }
}

/// Data-access handle for pipeline definitions and collection-scoped CRUD
#[async_trait]
pub trait PipelineStore: Send + Sync {
    /// Number of stored pipeline definitions
    async fn count(&self) -> Result<u64, BoxError>;

    async fn find_by_id(
        &self,
        collection: &CollectionRef,
        id: &Document,
    ) -> Result<Option<Document>, BoxError>;

    async fn find_all(&self, collection: &CollectionRef) -> Result<DocumentCursor, BoxError>;

    /// Insert or replace a document, returning it as stored
    async fn save(&self, collection: &CollectionRef, document: Document)
    -> Result<Document, BoxError>;

    async fn delete_by_id(&self, collection: &CollectionRef, id: &Document)
    -> Result<bool, BoxError>;

    async fn count_documents(&self, collection: &CollectionRef) -> Result<u64, BoxError>;

    async fn exists_by_id(&self, collection: &CollectionRef, id: &Document) -> Result<bool, BoxError> {
        Ok(self.find_by_id(collection, id).await?.is_some())
    }
}

/// Pipeline execution engine
#[async_trait]
pub trait PipelineRunner: Send + Sync {
    /// Execute a stored pipeline with positional arguments
    async fn run(&self, pipeline_id: &str, args: Vec<Document>) -> Result<DocumentCursor, BoxError>;
}

/// Loads pipeline definitions into the backing store. Starting is fire-and-forget
/// from the caller's side; the engine may finish its work asynchronously.
pub trait MigrationEngine: Send + Sync {
    fn start(&self, context_id: &str) -> Result<(), BoxError>;
}

/// Builds the collaborators for one configuration
pub trait PipelineBackend: Send + Sync {
    fn pipeline_store(&self, config: &PipeConfig) -> Result<Arc<dyn PipelineStore>, BoxError>;

    fn pipeline_runner(
        &self,
        config: &PipeConfig,
        store: Arc<dyn PipelineStore>,
    ) -> Result<Arc<dyn PipelineRunner>, BoxError>;

    fn migration_engine(
        &self,
        config: &PipeConfig,
        store: Arc<dyn PipelineStore>,
    ) -> Result<Arc<dyn MigrationEngine>, BoxError>;
}

/// Process-wide pipeline store and runner shared by every synthesized store
#[derive(Clone)]
pub struct CoreSingletons {
    pub store: Arc<dyn PipelineStore>,
    pub runner: Arc<dyn PipelineRunner>,
}

impl CoreSingletons {
    pub fn new(store: Arc<dyn PipelineStore>, runner: Arc<dyn PipelineRunner>) -> Self {
        Self { store, runner }
    }
}
