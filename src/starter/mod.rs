// Starter module - explicit startup phases around the registration coordinator
pub mod coordinator;
pub mod migration;
pub mod phase;

pub use coordinator::{RegisteredStore, RegistrationCoordinator};
pub use migration::MigrationTrigger;
pub use phase::Phase;

use crate::config::PipeConfig;
use crate::error::{Result, StarterError};
use crate::host::{ComponentRegistry, Environment, StandardEnvironment};
use crate::pipeline::{CoreSingletons, PipelineBackend};
use crate::scan::{ScanScope, TypeCatalog};
use indexmap::IndexSet;
use std::sync::Arc;
use tracing::info;

/// Outcome of a full startup
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub singletons: Vec<String>,
    pub stores: Vec<RegisteredStore>,
    pub scan_scope: ScanScope,
    pub migration_started: bool,
}

/// Drives startup through `singletons -> discovery -> migration`. Each phase runs
/// once and only after the previous one completed.
pub struct PipeStoreStarter {
    coordinator: RegistrationCoordinator,
    migration: MigrationTrigger,
    completed: IndexSet<Phase>,
}

impl PipeStoreStarter {
    pub fn new(config: PipeConfig, backend: Arc<dyn PipelineBackend>, catalog: TypeCatalog) -> Self {
        let migration = MigrationTrigger::new(config.id.clone());
        let environment: Arc<dyn Environment> = Arc::new(StandardEnvironment::new());
        Self {
            coordinator: RegistrationCoordinator::new(config, backend, catalog, environment),
            migration,
            completed: IndexSet::new(),
        }
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.coordinator = self.coordinator.with_environment(environment);
        self
    }

    pub fn scan_scope(&self) -> &ScanScope {
        self.coordinator.scope()
    }

    pub fn singletons(&self) -> Option<&CoreSingletons> {
        self.coordinator.singletons()
    }

    pub fn completed(&self, phase: Phase) -> bool {
        self.completed.contains(&phase)
    }

    fn enter(&self, phase: Phase) -> Result<()> {
        if self.completed(phase) {
            return Err(StarterError::PhaseRepeated(phase));
        }
        match phase.requires() {
            Some(requires) if !self.completed(requires) => Err(StarterError::PhaseOrder { phase, requires }),
            _ => Ok(()),
        }
    }

    pub fn register_singletons(&mut self, registry: &mut dyn ComponentRegistry) -> Result<CoreSingletons> {
        self.enter(Phase::Singletons)?;
        let singletons = self.coordinator.register_singletons(registry)?;
        self.completed.insert(Phase::Singletons);
        Ok(singletons)
    }

    pub fn register_stores(&mut self, registry: &mut dyn ComponentRegistry) -> Result<Vec<RegisteredStore>> {
        self.enter(Phase::Discovery)?;
        let stores = self.coordinator.register_stores(registry)?;
        self.completed.insert(Phase::Discovery);
        Ok(stores)
    }

    /// Build the migration engine and start it; completion is not awaited
    pub fn start_migration(&mut self) -> Result<()> {
        self.enter(Phase::Migration)?;
        let store = self
            .coordinator
            .singletons()
            .map(|singletons| Arc::clone(&singletons.store))
            .ok_or(StarterError::PhaseOrder {
                phase: Phase::Migration,
                requires: Phase::Singletons,
            })?;
        let engine = self
            .coordinator
            .backend()
            .migration_engine(self.coordinator.config(), store)
            .map_err(StarterError::collaborator)?;
        self.migration.start_migration(engine.as_ref())?;
        self.completed.insert(Phase::Migration);
        Ok(())
    }

    /// Run every phase in order
    pub fn run(&mut self, registry: &mut dyn ComponentRegistry) -> Result<StartupReport> {
        info!("Starting pipestore '{}'", self.migration.context_id());
        self.register_singletons(registry)?;
        let stores = self.register_stores(registry)?;
        self.start_migration()?;

        Ok(StartupReport {
            singletons: vec![
                crate::config::constants::PIPELINE_STORE_NAME.to_string(),
                crate::config::constants::PIPELINE_RUNNER_NAME.to_string(),
            ],
            stores,
            scan_scope: self.scan_scope().clone(),
            migration_started: self.completed(Phase::Migration),
        })
    }
}
