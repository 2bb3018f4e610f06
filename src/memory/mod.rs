// Memory module - in-process pipeline store, runner and migration
pub mod backend;
pub mod error;
pub mod migration;
pub mod runner;
pub mod store;

pub use backend::MemoryBackend;
pub use error::{MemoryError, MemoryResult};
pub use migration::{InMemoryMigration, load_definitions};
pub use runner::{InMemoryPipelineRunner, PipelineDefinition};
pub use store::{InMemoryPipelineStore, PipelineRevision};
