// In-memory pipeline runner: a small subset of aggregation stages over stored documents
use super::error::{MemoryError, MemoryResult};
use super::store::InMemoryPipelineStore;
use crate::config::constants::PIPELINES_COLLECTION;
use crate::error::BoxError;
use crate::pipeline::{Document, DocumentCursor, PipelineRunner, cursor};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Whole-string positional placeholder such as `"${0}"`
const PLACEHOLDER_PATTERN: &str = r"^\$\{(\d+)\}$";

/// A stored pipeline definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub collection: String,
    #[serde(default)]
    pub pipeline: Vec<Value>,
}

impl PipelineDefinition {
    pub fn new(id: impl Into<String>, collection: impl Into<String>, pipeline: Vec<Value>) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            pipeline,
        }
    }

    pub fn to_document(&self) -> MemoryResult<Document> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Runs definitions read from the `pipelines` collection. Supported stages:
/// `$match` (equality, dotted paths), `$sort` and `$limit`.
pub struct InMemoryPipelineRunner {
    store: Arc<InMemoryPipelineStore>,
}

impl InMemoryPipelineRunner {
    pub fn new(store: Arc<InMemoryPipelineStore>) -> Self {
        Self { store }
    }

    fn definition(&self, pipeline_id: &str) -> MemoryResult<PipelineDefinition> {
        let document = self
            .store
            .get(PIPELINES_COLLECTION, &Value::String(pipeline_id.to_string()))
            .ok_or_else(|| MemoryError::PipelineNotFound(pipeline_id.to_string()))?;
        Ok(serde_json::from_value(document)?)
    }

    /// Execute synchronously, returning the resulting documents
    pub fn execute(&self, pipeline_id: &str, args: &[Document]) -> MemoryResult<Vec<Document>> {
        let definition = self.definition(pipeline_id)?;
        let mut documents = self.store.documents(&definition.collection);
        let placeholder = Regex::new(PLACEHOLDER_PATTERN)?;

        for stage in &definition.pipeline {
            let stage = bind_arguments(stage, &placeholder, pipeline_id, args)?;
            let Some((name, spec)) = stage.as_object().and_then(|o| o.iter().next()) else {
                return Err(unsupported(pipeline_id, &stage.to_string()));
            };
            match name.as_str() {
                "$match" => {
                    let filter = spec.as_object().ok_or_else(|| unsupported(pipeline_id, name))?;
                    documents.retain(|document| matches_filter(document, filter));
                }
                "$sort" => {
                    let keys = spec.as_object().ok_or_else(|| unsupported(pipeline_id, name))?;
                    documents.sort_by(|a, b| compare_by(a, b, keys));
                }
                "$limit" => {
                    let limit = spec.as_u64().ok_or_else(|| unsupported(pipeline_id, name))?;
                    documents.truncate(limit as usize);
                }
                other => return Err(unsupported(pipeline_id, other)),
            }
        }

        debug!("Pipeline '{}' produced {} document(s)", pipeline_id, documents.len());
        Ok(documents)
    }
}

#[async_trait]
impl PipelineRunner for InMemoryPipelineRunner {
    async fn run(&self, pipeline_id: &str, args: Vec<Document>) -> Result<DocumentCursor, BoxError> {
        Ok(cursor(self.execute(pipeline_id, &args)?))
    }
}

fn unsupported(pipeline: &str, stage: &str) -> MemoryError {
    MemoryError::UnsupportedStage {
        pipeline: pipeline.to_string(),
        stage: stage.to_string(),
    }
}

/// Replace `"${N}"` strings with the N-th argument
fn bind_arguments(value: &Value, placeholder: &Regex, pipeline: &str, args: &[Document]) -> MemoryResult<Value> {
    match value {
        Value::String(s) => match placeholder.captures(s) {
            Some(captures) => {
                let index: usize = captures[1].parse().unwrap_or(usize::MAX);
                args.get(index).cloned().ok_or(MemoryError::MissingArgument {
                    pipeline: pipeline.to_string(),
                    index,
                    provided: args.len(),
                })
            }
            None => Ok(value.clone()),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| bind_arguments(item, placeholder, pipeline, args))
            .collect::<MemoryResult<Vec<_>>>()
            .map(Value::Array),
        Value::Object(fields) => {
            let mut bound = Map::new();
            for (key, field) in fields {
                bound.insert(key.clone(), bind_arguments(field, placeholder, pipeline, args)?);
            }
            Ok(Value::Object(bound))
        }
        _ => Ok(value.clone()),
    }
}

fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(document, |value, key| value.get(key))
}

fn matches_filter(document: &Document, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .all(|(path, expected)| lookup(document, path) == Some(expected))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn compare_by(a: &Document, b: &Document, keys: &Map<String, Value>) -> Ordering {
    for (path, direction) in keys {
        let ordering = compare_values(lookup(a, path), lookup(b, path));
        let ordering = if direction.as_i64() == Some(-1) {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn runner() -> InMemoryPipelineRunner {
        let store = Arc::new(InMemoryPipelineStore::new("test"));
        store
            .insert_many(
                "pizzas",
                vec![
                    json!({"_id": 1, "name": "Margherita", "size": "L", "price": 8.5}),
                    json!({"_id": 2, "name": "Diavola", "size": "M", "price": 9.0}),
                    json!({"_id": 3, "name": "Capricciosa", "size": "L", "price": 11.0}),
                ],
            )
            .unwrap();
        let definition = PipelineDefinition::new(
            "matchingPizzas",
            "pizzas",
            vec![json!({"$match": {"size": "${0}"}}), json!({"$sort": {"price": -1}})],
        );
        store
            .upsert(PIPELINES_COLLECTION, definition.to_document().unwrap())
            .unwrap();
        InMemoryPipelineRunner::new(store)
    }

    #[test]
    fn test_match_with_placeholder_and_sort() {
        let result = runner().execute("matchingPizzas", &[json!("L")]).unwrap();
        let names: Vec<_> = result.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Capricciosa", "Margherita"]);
    }

    #[test]
    fn test_unknown_pipeline() {
        let result = runner().execute("nope", &[]);
        assert!(matches!(result, Err(MemoryError::PipelineNotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_missing_argument() {
        let result = runner().execute("matchingPizzas", &[]);
        assert!(matches!(result, Err(MemoryError::MissingArgument { index: 0, provided: 0, .. })));
    }

    #[test]
    fn test_dotted_lookup() {
        let document = json!({"pizza": {"size": "L"}});
        assert_eq!(lookup(&document, "pizza.size"), Some(&json!("L")));
        assert_eq!(lookup(&document, "pizza.name"), None);
    }
}
