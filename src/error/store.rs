/// Errors raised while invoking a synthesized store method
use super::starter::BoxError;
use crate::store::ReturnShape;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Method '{method}' failed in a collaborator: {source}")]
    Collaborator {
        method: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to encode argument '{arg}' of '{method}': {source}")]
    Encode {
        method: String,
        arg: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode result of '{method}': {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Result of '{method}' cannot be adapted to {expected:?}")]
    ShapeMismatch { method: String, expected: ReturnShape },

    #[error("Method '{method}' expects {expected} argument(s), got {actual}")]
    Arity {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("Method '{0}' has no dispatch entry")]
    UnboundMethod(String),
}

/// Result type returned by every store method
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn collaborator(method: impl Into<String>, source: BoxError) -> Self {
        Self::Collaborator {
            method: method.into(),
            source,
        }
    }

    pub fn decode(method: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            method: method.into(),
            source,
        }
    }

    pub fn shape_mismatch(method: impl Into<String>, expected: ReturnShape) -> Self {
        Self::ShapeMismatch {
            method: method.into(),
            expected,
        }
    }
}
