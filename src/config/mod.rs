pub mod constants;
pub mod settings;

pub use settings::{MigrationConfig, PipeConfig, PipeConfigBuilder};
