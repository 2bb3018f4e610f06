// Pipeline module - contracts of the external collaborators

pub mod core;

pub use self::core::{
    CollectionRef, CoreSingletons, Document, DocumentCursor, MigrationEngine, PipelineBackend,
    PipelineRunner, PipelineStore, cursor,
};
