/// Startup error types: discovery, synthesis, registration and phase ordering
use crate::starter::Phase;
use thiserror::Error;

/// Error raised by a collaborator (database handle, pipeline engine, migration engine)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum StarterError {
    // Configuration errors
    #[error("Could not load store for: {type_name}")]
    UnresolvableType { type_name: String },

    #[error("Store '{store}' is not an interface")]
    NotAnInterface { store: String },

    #[error("Type '{type_name}' is not declared as a store")]
    MissingStoreMarker { type_name: String },

    #[error("Store '{store}' method '{method}' cannot be bound: {reason}")]
    UnbindableMethod {
        store: String,
        method: String,
        reason: String,
    },

    #[error("Store '{store}' method '{method}' uses model '{model}' which has no collection item")]
    MissingItem {
        store: String,
        method: String,
        model: String,
    },

    #[error("Stores '{first}' and '{second}' both register as '{name}'")]
    ConflictingStoreName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Registration errors
    #[error("A component named '{0}' is already registered")]
    DuplicateComponent(String),

    // Phase ordering
    #[error("Startup phase '{phase}' requires '{requires}' to complete first")]
    PhaseOrder { phase: Phase, requires: Phase },

    #[error("Startup phase '{0}' has already completed")]
    PhaseRepeated(Phase),

    // Collaborator errors
    #[error("Collaborator error: {0}")]
    Collaborator(#[source] BoxError),

    #[error("Migration '{context_id}' failed: {source}")]
    Migration {
        context_id: String,
        #[source]
        source: BoxError,
    },

    // Manifest and config sources
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using StarterError
pub type Result<T> = std::result::Result<T, StarterError>;

impl StarterError {
    /// Create an unresolvable type error
    pub fn unresolvable(type_name: impl Into<String>) -> Self {
        Self::UnresolvableType {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Wrap a collaborator failure
    pub fn collaborator(err: impl Into<BoxError>) -> Self {
        Self::Collaborator(err.into())
    }

    /// True for errors caused by the application's store declarations or settings
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableType { .. }
                | Self::NotAnInterface { .. }
                | Self::MissingStoreMarker { .. }
                | Self::UnbindableMethod { .. }
                | Self::MissingItem { .. }
                | Self::ConflictingStoreName { .. }
                | Self::InvalidConfig(_)
        )
    }
}
