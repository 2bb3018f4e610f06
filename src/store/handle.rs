// Store handle - the dispatch table shared by the methods of one synthesized store
use super::descriptor::CrudOperation;
use super::returns::{Outcome, StoreReturn};
use crate::error::{BoxError, StoreError, StoreResult};
use crate::pipeline::{CollectionRef, CoreSingletons, Document, cursor};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Resolved target of one store method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Pipeline(String),
    Crud(CrudOperation, CollectionRef),
}

/// Dispatch table plus the core singletons it calls into
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<str>,
    dispatch: Arc<IndexMap<String, Dispatch>>,
    singletons: CoreSingletons,
}

impl StoreHandle {
    pub(crate) fn new(
        store: &str,
        dispatch: IndexMap<String, Dispatch>,
        singletons: CoreSingletons,
    ) -> Self {
        Self {
            store: Arc::from(store),
            dispatch: Arc::new(dispatch),
            singletons,
        }
    }

    pub fn store_name(&self) -> &str {
        &self.store
    }

    pub fn dispatch_for(&self, method: &str) -> Option<&Dispatch> {
        self.dispatch.get(method)
    }

    /// Invoke a store method: run its pipeline or CRUD operation and adapt the result
    pub async fn invoke<R: StoreReturn>(&self, method: &str, args: Vec<Document>) -> StoreResult<R> {
        let dispatch = self
            .dispatch
            .get(method)
            .ok_or_else(|| StoreError::UnboundMethod(format!("{}::{}", self.store, method)))?;

        let outcome = match dispatch {
            Dispatch::Pipeline(pipeline_id) => {
                debug!(
                    "Store '{}' method '{}' runs pipeline '{}' with {} argument(s)",
                    self.store,
                    method,
                    pipeline_id,
                    args.len()
                );
                let documents = self
                    .singletons
                    .runner
                    .run(pipeline_id, args)
                    .await
                    .map_err(|e| StoreError::collaborator(method, e))?;
                Outcome::Documents(documents)
            }
            Dispatch::Crud(operation, collection) => {
                if args.len() != operation.arity() {
                    return Err(StoreError::Arity {
                        method: method.to_string(),
                        expected: operation.arity(),
                        actual: args.len(),
                    });
                }
                debug!(
                    "Store '{}' method '{}' runs {} on {}",
                    self.store, method, operation, collection
                );
                self.crud(*operation, collection, args)
                    .await
                    .map_err(|e| StoreError::collaborator(method, e))?
            }
        };

        R::from_outcome(method, outcome)
    }

    async fn crud(
        &self,
        operation: CrudOperation,
        collection: &CollectionRef,
        mut args: Vec<Document>,
    ) -> Result<Outcome, BoxError> {
        let store = &self.singletons.store;

        let outcome = match operation {
            CrudOperation::FindById => {
                let found = store.find_by_id(collection, &args[0]).await?;
                Outcome::Documents(cursor(found.into_iter().collect()))
            }
            CrudOperation::FindAll => Outcome::Documents(store.find_all(collection).await?),
            CrudOperation::Save => {
                let document = args.remove(0);
                let saved = store.save(collection, document).await?;
                Outcome::Documents(cursor(vec![saved]))
            }
            CrudOperation::DeleteById => Outcome::Flag(store.delete_by_id(collection, &args[0]).await?),
            CrudOperation::ExistsById => Outcome::Flag(store.exists_by_id(collection, &args[0]).await?),
            CrudOperation::Count => Outcome::Count(store.count_documents(collection).await?),
        };
        Ok(outcome)
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("store", &self.store)
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}

/// Serialize one method argument into a positional pipeline/CRUD parameter
pub fn encode_arg<T: Serialize + ?Sized>(method: &str, arg: &str, value: &T) -> StoreResult<Document> {
    serde_json::to_value(value).map_err(|source| StoreError::Encode {
        method: method.to_string(),
        arg: arg.to_string(),
        source,
    })
}

/// Implementation behind every `pipe_store!` trait: `S` is the `dyn Trait` it implements
pub struct SynthesizedStore<S: ?Sized> {
    handle: StoreHandle,
    _contract: PhantomData<fn(&S)>,
}

impl<S: ?Sized> SynthesizedStore<S> {
    pub fn new(handle: StoreHandle) -> Self {
        Self {
            handle,
            _contract: PhantomData,
        }
    }

    pub fn handle(&self) -> &StoreHandle {
        &self.handle
    }
}

impl<S: ?Sized> fmt::Debug for SynthesizedStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizedStore")
            .field("store", &self.handle.store_name())
            .finish()
    }
}
