//! Startup-time discovery and registration of pipeline-backed stores.
//!
//! Stores are traits declared with [`pipe_store!`]. At startup the [`PipeStoreStarter`]
//! registers the pipeline store and runner, scans the [`TypeCatalog`] for store
//! declarations, synthesizes one instance per store and registers it under its
//! de-capitalized short name, then starts the migration of pipeline definitions.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod memory;
pub mod pipeline;
pub mod sample;
pub mod scan;
pub mod starter;
pub mod store;
pub mod util;

pub use config::{MigrationConfig, PipeConfig};
pub use error::{BoxError, Result, StarterError, StoreError, StoreResult};
pub use host::{Component, ComponentContainer, ComponentRegistry, Environment, StandardEnvironment};
pub use pipeline::{CoreSingletons, MigrationEngine, PipelineBackend, PipelineRunner, PipelineStore};
pub use scan::{ScanScope, TypeCatalog};
pub use starter::{Phase, PipeStoreStarter, StartupReport};
pub use store::{PipelineStream, StoreInterface};

#[doc(hidden)]
pub mod __private {
    pub use async_trait::async_trait;
}
