/// Settings consumed at startup
use super::constants::DEFAULT_CONTEXT_ID;
use crate::error::{Result, StarterError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Migration settings, forwarded untouched to the migration collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationConfig {
    /// Directory holding pipeline definition files
    pub pipelines_path: Option<PathBuf>,
}

impl MigrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pipelines_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pipelines_path = Some(path.into());
        self
    }
}

/// Startup settings. Only `id` and `scan_package` are read by this crate; the rest is
/// handed to the pipeline backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeConfig {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default)]
    pub scan_package: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub migration_config: MigrationConfig,
    #[serde(default)]
    pub store_history_enabled: bool,
}

fn default_id() -> String {
    DEFAULT_CONTEXT_ID.to_string()
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            id: default_id(),
            scan_package: None,
            uri: None,
            database_name: None,
            migration_config: MigrationConfig::default(),
            store_history_enabled: false,
        }
    }
}

impl PipeConfig {
    pub fn builder() -> PipeConfigBuilder {
        PipeConfigBuilder::default()
    }

    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(StarterError::invalid_config("id must not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PipeConfigBuilder {
    config: PipeConfig,
}

impl PipeConfigBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = id.into();
        self
    }

    pub fn scan_package(mut self, scan_package: impl Into<String>) -> Self {
        self.config.scan_package = Some(scan_package.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.config.uri = Some(uri.into());
        self
    }

    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.config.database_name = Some(name.into());
        self
    }

    pub fn migration_config(mut self, migration_config: MigrationConfig) -> Self {
        self.config.migration_config = migration_config;
        self
    }

    pub fn store_history_enabled(mut self, enabled: bool) -> Self {
        self.config.store_history_enabled = enabled;
        self
    }

    pub fn build(self) -> Result<PipeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
