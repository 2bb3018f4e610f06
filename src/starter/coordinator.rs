// Registration coordinator - core singletons first, then one synthesized instance per store
use super::phase::Phase;
use crate::config::{PipeConfig, constants};
use crate::error::{Result, StarterError};
use crate::host::{Component, ComponentRegistry, Environment};
use crate::pipeline::{CoreSingletons, PipelineBackend, PipelineRunner, PipelineStore};
use crate::scan::{ScanScope, StoreScanner, TypeCatalog};
use crate::store::{StoreDescriptor, StoreSynthesizer};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A store instance placed in the host registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredStore {
    pub name: String,
    pub type_name: String,
}

pub struct RegistrationCoordinator {
    config: PipeConfig,
    backend: Arc<dyn PipelineBackend>,
    catalog: TypeCatalog,
    environment: Arc<dyn Environment>,
    scope: ScanScope,
    singletons: Option<CoreSingletons>,
}

impl RegistrationCoordinator {
    /// The scan scope is resolved once, here
    pub fn new(
        config: PipeConfig,
        backend: Arc<dyn PipelineBackend>,
        catalog: TypeCatalog,
        environment: Arc<dyn Environment>,
    ) -> Self {
        let scope = ScanScope::resolve(config.scan_package.as_deref());
        Self {
            config,
            backend,
            catalog,
            environment,
            scope,
            singletons: None,
        }
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn PipelineBackend> {
        &self.backend
    }

    pub fn scope(&self) -> &ScanScope {
        &self.scope
    }

    pub fn singletons(&self) -> Option<&CoreSingletons> {
        self.singletons.as_ref()
    }

    /// Build the pipeline store and runner and register them under their well-known names
    pub fn register_singletons(&mut self, registry: &mut dyn ComponentRegistry) -> Result<CoreSingletons> {
        for name in [constants::PIPELINE_STORE_NAME, constants::PIPELINE_RUNNER_NAME] {
            if registry.contains(name) {
                return Err(StarterError::DuplicateComponent(name.to_string()));
            }
        }

        let store = self
            .backend
            .pipeline_store(&self.config)
            .map_err(StarterError::collaborator)?;
        let runner = self
            .backend
            .pipeline_runner(&self.config, Arc::clone(&store))
            .map_err(StarterError::collaborator)?;

        registry.register_singleton(
            constants::PIPELINE_STORE_NAME,
            Component::new::<dyn PipelineStore>(Arc::clone(&store)),
        )?;
        registry.register_singleton(
            constants::PIPELINE_RUNNER_NAME,
            Component::new::<dyn PipelineRunner>(Arc::clone(&runner)),
        )?;
        info!(
            "Registered '{}' and '{}'",
            constants::PIPELINE_STORE_NAME,
            constants::PIPELINE_RUNNER_NAME
        );

        let singletons = CoreSingletons::new(store, runner);
        self.singletons = Some(singletons.clone());
        Ok(singletons)
    }

    /// Scan, describe and synthesize every store, then register them all. Nothing is
    /// registered unless every candidate succeeds.
    pub fn register_stores(&self, registry: &mut dyn ComponentRegistry) -> Result<Vec<RegisteredStore>> {
        let singletons = self.singletons.clone().ok_or(StarterError::PhaseOrder {
            phase: Phase::Discovery,
            requires: Phase::Singletons,
        })?;
        let synthesizer = StoreSynthesizer::new(singletons);
        let scanner = StoreScanner::new(Arc::clone(&self.environment));

        let mut prepared: IndexMap<String, (String, Component)> = IndexMap::new();
        for type_name in scanner.scan(self.catalog.index(), &self.scope) {
            let declaration = self.catalog.resolve(&type_name)?;
            let descriptor = StoreDescriptor::describe(declaration)?;
            let component = synthesizer.synthesize(&descriptor)?;
            let name = descriptor.component_name();

            if let Some((first, _)) = prepared.get(&name) {
                return Err(StarterError::ConflictingStoreName {
                    name,
                    first: first.clone(),
                    second: type_name,
                });
            }
            if registry.contains(&name) {
                return Err(StarterError::DuplicateComponent(name));
            }
            debug!("Prepared store '{}' as '{}'", type_name, name);
            prepared.insert(name, (type_name, component));
        }

        let mut registered = Vec::with_capacity(prepared.len());
        for (name, (type_name, component)) in prepared {
            registry.register_singleton(&name, component)?;
            registered.push(RegisteredStore { name, type_name });
        }
        info!("Registered {} store(s)", registered.len());
        Ok(registered)
    }
}
