// Host component registry - named singletons shared with the rest of the application
use crate::error::{Result, StarterError};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Type-erased `Arc<T>`; `T` may be a trait object such as `dyn MyStore`
pub struct Component {
    type_name: &'static str,
    instance: Box<dyn Any + Send + Sync>,
}

impl Component {
    pub fn new<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            instance: Box::new(instance),
        }
    }

    /// Recover the instance if it was registered as `Arc<T>`
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.instance.downcast_ref::<Arc<T>>().cloned()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Registration surface the host exposes
pub trait ComponentRegistry {
    /// Register a singleton under a name; registering a taken name is an error
    fn register_singleton(&mut self, name: &str, component: Component) -> Result<()>;

    fn contains(&self, name: &str) -> bool;
}

/// Default in-process registry
#[derive(Debug, Default)]
pub struct ComponentContainer {
    components: IndexMap<String, Component>,
}

impl ComponentContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.components.get(name)?.downcast::<T>()
    }

    /// First component registered as `Arc<T>`
    pub fn get_by_type<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.components
            .values()
            .find_map(|component| component.downcast::<T>())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentRegistry for ComponentContainer {
    fn register_singleton(&mut self, name: &str, component: Component) -> Result<()> {
        if self.components.contains_key(name) {
            return Err(StarterError::DuplicateComponent(name.to_string()));
        }
        debug!("Registering component '{}' ({})", name, component.type_name());
        self.components.insert(name.to_string(), component);
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_register_and_lookup_trait_object() {
        let mut container = ComponentContainer::new();
        let greeter: Arc<dyn Greeter> = Arc::new(English);
        container
            .register_singleton("greeter", Component::new(greeter))
            .unwrap();

        assert_eq!(container.get::<dyn Greeter>("greeter").unwrap().greet(), "hello");
        assert!(container.get_by_type::<dyn Greeter>().is_some());
        assert!(container.get::<English>("greeter").is_none());
        assert!(container.get::<dyn Greeter>("missing").is_none());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut container = ComponentContainer::new();
        container
            .register_singleton("value", Component::new(Arc::new(1u32)))
            .unwrap();
        let result = container.register_singleton("value", Component::new(Arc::new(2u32)));

        assert!(matches!(result, Err(StarterError::DuplicateComponent(name)) if name == "value"));
        assert_eq!(*container.get::<u32>("value").unwrap(), 1);
        assert_eq!(container.names().collect::<Vec<_>>(), vec!["value"]);
    }
}
