// Host module - the application-side environment and component registry
pub mod environment;
pub mod registry;

pub use environment::{DEFAULT_PROFILE, Environment, StandardEnvironment};
pub use registry::{Component, ComponentContainer, ComponentRegistry};
