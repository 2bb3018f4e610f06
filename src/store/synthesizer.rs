// Store synthesizer - turns a descriptor into a working, registrable instance
use super::descriptor::{MethodBinding, StoreDescriptor};
use super::handle::{Dispatch, StoreHandle};
use crate::error::Result;
use crate::host::Component;
use crate::pipeline::CoreSingletons;
use indexmap::IndexMap;
use tracing::debug;

/// Builds store instances backed by the core singletons
pub struct StoreSynthesizer {
    singletons: CoreSingletons,
}

impl StoreSynthesizer {
    pub fn new(singletons: CoreSingletons) -> Self {
        Self { singletons }
    }

    /// Resolve the dispatch table once and instantiate the store. Any unbindable method
    /// fails here rather than on first call. Each call yields an independent instance.
    pub fn synthesize(&self, descriptor: &StoreDescriptor) -> Result<Component> {
        let store = descriptor.interface_type();
        let mut dispatch = IndexMap::new();

        for method in descriptor.methods() {
            let target = match &method.binding {
                MethodBinding::Pipeline { pipeline_id } => Dispatch::Pipeline(pipeline_id.clone()),
                MethodBinding::Crud {
                    operation,
                    collection,
                } => Dispatch::Crud(*operation, collection.clone()),
                MethodBinding::Unresolved(reason) => {
                    return Err(reason.clone().into_error(store, &method.name));
                }
            };
            dispatch.insert(method.name.clone(), target);
        }

        debug!(
            "Synthesized store '{}' with {} method(s)",
            store,
            dispatch.len()
        );
        let handle = StoreHandle::new(store, dispatch, self.singletons.clone());
        Ok((descriptor.instantiate())(handle))
    }
}
