//! Constants for pipestore

/// Registry name of the pipeline store singleton
pub const PIPELINE_STORE_NAME: &str = "pipelineStore";

/// Registry name of the pipeline runner singleton
pub const PIPELINE_RUNNER_NAME: &str = "pipelineRunner";

/// Default logical context id used for migration
pub const DEFAULT_CONTEXT_ID: &str = "pipestore";

/// Collection holding the pipeline definitions
pub const PIPELINES_COLLECTION: &str = "pipelines";

/// Document identity field
pub const ID_FIELD: &str = "_id";

/// Scheme accepted by the in-memory backend
pub const MEMORY_URI_SCHEME: &str = "memory:";

/// Extension of pipeline definition files read by the in-memory migration
pub const PIPELINE_FILE_EXTENSION: &str = "json";
