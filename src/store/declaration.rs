// Store declarations - the static description a store trait publishes about itself
use super::handle::StoreHandle;
use super::returns::{ReturnShape, StoreReturn};
use crate::host::Component;
use crate::scan::{ComponentMetadata, Stereotype, TypeKind};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a data model type
#[derive(Clone, Copy)]
pub struct ModelType {
    id: TypeId,
    name: &'static str,
}

impl ModelType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn simple_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.name)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A data model the store may CRUD against, and the collection backing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub model: ModelType,
    pub collection: String,
}

impl Item {
    pub fn new<M: 'static>(collection: impl Into<String>) -> Self {
        Self {
            model: ModelType::of::<M>(),
            collection: collection.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDecl {
    pub name: String,
    pub model: ModelType,
}

/// Signature of one store method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub pipeline_run: Option<String>,
    pub args: Vec<ArgDecl>,
    pub shape: ReturnShape,
    pub return_model: Option<ModelType>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pipeline_run: None,
            args: Vec::new(),
            shape: ReturnShape::Unit,
            return_model: None,
        }
    }

    /// Bind the method to a stored pipeline
    pub fn pipeline_run(mut self, pipeline_id: impl Into<String>) -> Self {
        self.pipeline_run = Some(pipeline_id.into());
        self
    }

    pub fn arg<T: ?Sized + 'static>(mut self, name: impl Into<String>) -> Self {
        self.args.push(ArgDecl {
            name: name.into(),
            model: ModelType::of::<T>(),
        });
        self
    }

    pub fn returns<R: StoreReturn>(mut self) -> Self {
        self.shape = R::SHAPE;
        self.return_model = R::model();
        self
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// Builds the registered instance from a synthesized handle
pub type Instantiate = fn(StoreHandle) -> Component;

/// Everything known about one declared store type
#[derive(Clone)]
pub struct StoreDeclaration {
    type_name: String,
    kind: TypeKind,
    store_marker: bool,
    items: Vec<Item>,
    profiles: Vec<String>,
    methods: Vec<MethodDecl>,
    instantiate: Option<Instantiate>,
}

impl StoreDeclaration {
    /// Declaration of a store trait carrying the store marker
    pub fn interface(type_name: impl Into<String>) -> Self {
        Self::with_kind(type_name, TypeKind::Interface)
    }

    /// Declaration of a concrete type; such declarations are never valid stores
    pub fn concrete(type_name: impl Into<String>) -> Self {
        Self::with_kind(type_name, TypeKind::Concrete)
    }

    fn with_kind(type_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            store_marker: true,
            items: Vec::new(),
            profiles: Vec::new(),
            methods: Vec::new(),
            instantiate: None,
        }
    }

    /// Drop the store marker
    pub fn unmarked(mut self) -> Self {
        self.store_marker = false;
        self
    }

    pub fn item<M: 'static>(mut self, collection: impl Into<String>) -> Self {
        self.items.push(Item::new::<M>(collection));
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn instantiate(mut self, instantiate: Instantiate) -> Self {
        self.instantiate = Some(instantiate);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn has_store_marker(&self) -> bool {
        self.store_marker
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    pub fn instantiator(&self) -> Option<Instantiate> {
        self.instantiate
    }

    /// Scan metadata published for this declaration
    pub fn metadata(&self) -> ComponentMetadata {
        let mut metadata = match self.kind {
            TypeKind::Interface => ComponentMetadata::interface(&self.type_name),
            TypeKind::Concrete => ComponentMetadata::concrete(&self.type_name),
        };
        if self.store_marker {
            metadata = metadata.with_stereotype(Stereotype::Store);
        }
        for profile in &self.profiles {
            metadata = metadata.with_profile(profile);
        }
        metadata
    }
}

impl fmt::Debug for StoreDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreDeclaration")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("store_marker", &self.store_marker)
            .field("items", &self.items)
            .field("profiles", &self.profiles)
            .field("methods", &self.methods)
            .field("instantiate", &self.instantiate.is_some())
            .finish()
    }
}

/// Implemented by `dyn Trait` for every trait declared with `pipe_store!`
pub trait StoreInterface: Send + Sync + 'static {
    fn declaration() -> StoreDeclaration;
}
