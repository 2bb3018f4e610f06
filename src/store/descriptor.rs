// Store descriptor - binding every declared method to a pipeline or a CRUD operation
use super::declaration::{Instantiate, Item, MethodDecl, ModelType, StoreDeclaration};
use super::returns::ReturnShape;
use crate::error::{Result, StarterError};
use crate::pipeline::CollectionRef;
use crate::scan::TypeKind;
use crate::util::naming;
use indexmap::IndexMap;
use std::fmt;

/// Collection-level operations recognized by method name and signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    FindById,
    FindAll,
    Save,
    DeleteById,
    ExistsById,
    Count,
}

/// Where a CRUD method names its model type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelSource {
    Return,
    Argument,
    SoleItem,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 6] = [
        Self::FindById,
        Self::FindAll,
        Self::Save,
        Self::DeleteById,
        Self::ExistsById,
        Self::Count,
    ];

    pub fn method_name(&self) -> &'static str {
        match self {
            Self::FindById => "find_by_id",
            Self::FindAll => "find_all",
            Self::Save => "save",
            Self::DeleteById => "delete_by_id",
            Self::ExistsById => "exists_by_id",
            Self::Count => "count",
        }
    }

    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.method_name() == name)
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::FindAll | Self::Count => 0,
            _ => 1,
        }
    }

    pub fn accepts(&self, shape: ReturnShape) -> bool {
        use ReturnShape::*;
        match self {
            Self::FindById => shape == Optional,
            Self::FindAll => matches!(shape, List | Stream),
            Self::Save => matches!(shape, Optional | Unit),
            Self::DeleteById => matches!(shape, Unit | Flag),
            Self::ExistsById => shape == Flag,
            Self::Count => shape == Count,
        }
    }

    fn model_source(&self) -> ModelSource {
        match self {
            Self::FindById | Self::FindAll => ModelSource::Return,
            Self::Save => ModelSource::Argument,
            Self::DeleteById | Self::ExistsById | Self::Count => ModelSource::SoleItem,
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Why a method could not be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnboundReason {
    /// Neither a pipeline marker nor a recognized CRUD name
    NotRecognized,
    SignatureMismatch {
        operation: CrudOperation,
        arity: usize,
        shape: ReturnShape,
    },
    MissingItem { model: ModelType },
    NoItems,
    AmbiguousModel { items: usize },
}

impl UnboundReason {
    /// Configuration error reported when synthesis meets this binding
    pub fn into_error(self, store: &str, method: &str) -> StarterError {
        let reason = match self {
            Self::MissingItem { model } => {
                return StarterError::MissingItem {
                    store: store.to_string(),
                    method: method.to_string(),
                    model: model.name().to_string(),
                };
            }
            Self::NotRecognized => {
                "no pipeline_run marker and not a recognized CRUD method".to_string()
            }
            Self::SignatureMismatch {
                operation,
                arity,
                shape,
            } => format!(
                "'{}' expects {} argument(s) and a compatible return type, found {} argument(s) returning {:?}",
                operation,
                operation.arity(),
                arity,
                shape
            ),
            Self::NoItems => "store declares no items to run CRUD operations against".to_string(),
            Self::AmbiguousModel { items } => format!(
                "signature names no model and the store declares {} items",
                items
            ),
        };
        StarterError::UnbindableMethod {
            store: store.to_string(),
            method: method.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBinding {
    Pipeline {
        pipeline_id: String,
    },
    Crud {
        operation: CrudOperation,
        collection: CollectionRef,
    },
    Unresolved(UnboundReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub arity: usize,
    pub shape: ReturnShape,
    pub binding: MethodBinding,
}

/// Extracted metadata for one store interface, prior to synthesis
#[derive(Clone)]
pub struct StoreDescriptor {
    interface_type: String,
    items: Vec<Item>,
    methods: IndexMap<String, MethodDescriptor>,
    instantiate: Instantiate,
}

impl StoreDescriptor {
    /// Extract the descriptor of a store declaration. Unbindable methods are kept as
    /// `Unresolved` and reported by synthesis.
    pub fn describe(declaration: &StoreDeclaration) -> Result<Self> {
        let type_name = declaration.type_name();
        if !declaration.has_store_marker() {
            return Err(StarterError::MissingStoreMarker {
                type_name: type_name.to_string(),
            });
        }
        if declaration.kind() != TypeKind::Interface {
            return Err(StarterError::NotAnInterface {
                store: type_name.to_string(),
            });
        }
        let instantiate = declaration
            .instantiator()
            .ok_or_else(|| StarterError::unresolvable(type_name))?;

        let items = declaration.items().to_vec();
        let mut methods = IndexMap::new();
        for method in declaration.methods() {
            let descriptor = MethodDescriptor {
                name: method.name.clone(),
                arity: method.arity(),
                shape: method.shape,
                binding: bind(method, &items),
            };
            if methods.insert(method.name.clone(), descriptor).is_some() {
                return Err(StarterError::UnbindableMethod {
                    store: type_name.to_string(),
                    method: method.name.clone(),
                    reason: "method is declared more than once".to_string(),
                });
            }
        }

        Ok(Self {
            interface_type: type_name.to_string(),
            items,
            methods,
            instantiate,
        })
    }

    pub fn interface_type(&self) -> &str {
        &self.interface_type
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.values()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    pub fn instantiate(&self) -> Instantiate {
        self.instantiate
    }

    /// Name the synthesized instance is registered under
    pub fn component_name(&self) -> String {
        naming::component_name(&self.interface_type)
    }
}

impl fmt::Debug for StoreDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreDescriptor")
            .field("interface_type", &self.interface_type)
            .field("items", &self.items)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

fn bind(method: &MethodDecl, items: &[Item]) -> MethodBinding {
    if let Some(pipeline_id) = &method.pipeline_run {
        return MethodBinding::Pipeline {
            pipeline_id: pipeline_id.clone(),
        };
    }

    let Some(operation) = CrudOperation::from_method_name(&method.name) else {
        return MethodBinding::Unresolved(UnboundReason::NotRecognized);
    };
    if method.arity() != operation.arity() || !operation.accepts(method.shape) {
        return MethodBinding::Unresolved(UnboundReason::SignatureMismatch {
            operation,
            arity: method.arity(),
            shape: method.shape,
        });
    }

    let candidates: Vec<ModelType> = match operation.model_source() {
        ModelSource::Return => method.return_model.into_iter().collect(),
        ModelSource::Argument => method.args.iter().map(|arg| arg.model).collect(),
        ModelSource::SoleItem => Vec::new(),
    };

    match resolve_item(&candidates, items) {
        Ok(item) => MethodBinding::Crud {
            operation,
            collection: CollectionRef::new(&item.collection, item.model),
        },
        Err(reason) => MethodBinding::Unresolved(reason),
    }
}

fn resolve_item<'a>(candidates: &[ModelType], items: &'a [Item]) -> std::result::Result<&'a Item, UnboundReason> {
    if let Some(first) = candidates.first() {
        return candidates
            .iter()
            .find_map(|model| items.iter().find(|item| item.model == *model))
            .ok_or(UnboundReason::MissingItem { model: *first });
    }
    match items {
        [item] => Ok(item),
        [] => Err(UnboundReason::NoItems),
        _ => Err(UnboundReason::AmbiguousModel { items: items.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Component;
    use crate::store::PipelineStream;
    use std::sync::Arc;

    #[derive(serde::Deserialize)]
    struct Pizza;
    struct Order;

    fn instance(_: crate::store::StoreHandle) -> Component {
        Component::new(Arc::new(()))
    }

    fn restaurant() -> StoreDeclaration {
        StoreDeclaration::interface("org::test::MyRestaurant")
            .item::<Pizza>("pizzas")
            .method(
                MethodDecl::new("get_pizzas_by_size")
                    .pipeline_run("matchingPizzas")
                    .arg::<String>("pizza_size")
                    .returns::<PipelineStream<serde_json::Value>>(),
            )
            .instantiate(instance)
    }

    #[test]
    fn test_pipeline_binding_wins() {
        let descriptor = StoreDescriptor::describe(&restaurant()).unwrap();
        assert_eq!(
            descriptor.method("get_pizzas_by_size").unwrap().binding,
            MethodBinding::Pipeline {
                pipeline_id: "matchingPizzas".to_string()
            }
        );
        assert_eq!(descriptor.component_name(), "myRestaurant");
    }

    #[test]
    fn test_crud_binding_uses_matching_item() {
        let declaration = restaurant()
            .item::<Order>("orders")
            .method(MethodDecl::new("save").arg::<Order>("order").returns::<()>());
        let descriptor = StoreDescriptor::describe(&declaration).unwrap();

        match &descriptor.method("save").unwrap().binding {
            MethodBinding::Crud {
                operation,
                collection,
            } => {
                assert_eq!(*operation, CrudOperation::Save);
                assert_eq!(collection.name, "orders");
                assert_eq!(collection.model, ModelType::of::<Order>());
            }
            other => panic!("unexpected binding {:?}", other),
        }
    }

    #[test]
    fn test_count_uses_sole_item() {
        let declaration = restaurant().method(MethodDecl::new("count").returns::<u64>());
        let descriptor = StoreDescriptor::describe(&declaration).unwrap();
        assert!(matches!(
            descriptor.method("count").unwrap().binding,
            MethodBinding::Crud {
                operation: CrudOperation::Count,
                ..
            }
        ));
    }

    #[test]
    fn test_unresolved_bindings() {
        let declaration = StoreDeclaration::interface("org::test::Reports")
            .item::<Pizza>("pizzas")
            .item::<Order>("orders")
            .method(MethodDecl::new("totals").returns::<Vec<serde_json::Value>>())
            .method(MethodDecl::new("find_by_id").returns::<Option<Pizza>>())
            .method(MethodDecl::new("count").returns::<u64>())
            .method(MethodDecl::new("find_all").returns::<Vec<String>>())
            .instantiate(instance);
        let descriptor = StoreDescriptor::describe(&declaration).unwrap();

        let binding = |name: &str| descriptor.method(name).unwrap().binding.clone();
        assert_eq!(
            binding("totals"),
            MethodBinding::Unresolved(UnboundReason::NotRecognized)
        );
        assert!(matches!(
            binding("find_by_id"),
            MethodBinding::Unresolved(UnboundReason::SignatureMismatch { .. })
        ));
        assert_eq!(
            binding("count"),
            MethodBinding::Unresolved(UnboundReason::AmbiguousModel { items: 2 })
        );
        assert_eq!(
            binding("find_all"),
            MethodBinding::Unresolved(UnboundReason::MissingItem {
                model: ModelType::of::<String>()
            })
        );
    }

    #[test]
    fn test_repeated_method_name_is_rejected() {
        let declaration = restaurant().method(
            MethodDecl::new("get_pizzas_by_size")
                .pipeline_run("otherPizzas")
                .arg::<String>("pizza_size")
                .returns::<PipelineStream<serde_json::Value>>(),
        );
        let err = StoreDescriptor::describe(&declaration).unwrap_err();
        assert!(matches!(
            &err,
            StarterError::UnbindableMethod { store, method, .. }
                if store == "org::test::MyRestaurant" && method == "get_pizzas_by_size"
        ));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_rejects_non_stores() {
        let concrete = StoreDeclaration::concrete("org::test::PizzaService").instantiate(instance);
        assert!(matches!(
            StoreDescriptor::describe(&concrete),
            Err(StarterError::NotAnInterface { .. })
        ));

        let unmarked = restaurant().unmarked();
        assert!(matches!(
            StoreDescriptor::describe(&unmarked),
            Err(StarterError::MissingStoreMarker { .. })
        ));

        let unlinked = StoreDeclaration::interface("org::test::Ghost");
        assert!(matches!(
            StoreDescriptor::describe(&unlinked),
            Err(StarterError::UnresolvableType { .. })
        ));
    }
}
