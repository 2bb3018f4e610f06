/// Centralized error handling for pipestore
pub mod starter;
pub mod store;

pub use starter::{BoxError, Result, StarterError};
pub use store::{StoreError, StoreResult};
