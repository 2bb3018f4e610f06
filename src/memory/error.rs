use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Pipeline not found: {0}")]
    PipelineNotFound(String),

    #[error("Pipeline '{pipeline}' uses unsupported stage '{stage}'")]
    UnsupportedStage { pipeline: String, stage: String },

    #[error("Document has no _id in collection '{0}'")]
    MissingId(String),

    #[error("Pipeline '{pipeline}' references argument ${index} but got {provided} argument(s)")]
    MissingArgument {
        pipeline: String,
        index: usize,
        provided: usize,
    },

    #[error("Unsupported database uri: {0}")]
    UnsupportedUri(String),

    #[error("Invalid pipeline definition in {path:?}: {source}")]
    InvalidDefinition {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MemoryResult<T> = Result<T, MemoryError>;
