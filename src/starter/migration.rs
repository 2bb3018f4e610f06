// Migration trigger - starts loading pipeline definitions for one context
use crate::error::{Result, StarterError};
use crate::pipeline::MigrationEngine;
use tracing::info;

pub struct MigrationTrigger {
    context_id: String,
}

impl MigrationTrigger {
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Start the engine once. Completion is not awaited; a start failure is fatal.
    pub fn start_migration(&self, engine: &dyn MigrationEngine) -> Result<()> {
        info!("Starting pipeline migration for '{}'", self.context_id);
        engine
            .start(&self.context_id)
            .map_err(|source| StarterError::Migration {
                context_id: self.context_id.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        started: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MigrationEngine for Recorder {
        fn start(&self, context_id: &str) -> std::result::Result<(), BoxError> {
            if self.fail {
                return Err("definitions source unavailable".into());
            }
            self.started.lock().unwrap().push(context_id.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_starts_with_context_id() {
        let engine = Recorder::default();
        MigrationTrigger::new("orders").start_migration(&engine).unwrap();
        assert_eq!(*engine.started.lock().unwrap(), vec!["orders"]);
    }

    #[test]
    fn test_failure_is_reported_with_context() {
        let engine = Recorder {
            fail: true,
            ..Default::default()
        };
        let err = MigrationTrigger::new("orders").start_migration(&engine).unwrap_err();
        assert!(matches!(&err, StarterError::Migration { context_id, .. } if context_id == "orders"));
        assert!(err.to_string().contains("definitions source unavailable"));
    }
}
