// Integration tests for store synthesis and method dispatch
mod common;

use common::{RecordingBackend, RecordingMigration, RecordingRunner};
use pipestore::store::{StoreDescriptor, StoreInterface, StoreSynthesizer};
use pipestore::{StarterError, StoreError};
use serde_json::json;
use std::sync::Arc;

mod stores {
    use pipestore::store::PipelineStream;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Pizza {
        #[serde(rename = "_id")]
        pub id: u32,
        pub name: String,
        pub size: String,
    }

    pipestore::pipe_store! {
        #[store]
        #[item(Pizza, "pizzas")]
        pub trait MyRestaurant {
            #[pipeline_run("matchingPizzas")]
            fn get_pizzas_by_size(&self, pizza_size: String) -> PipelineStream<Pizza>;

            fn find_all(&self) -> Vec<Pizza>;

            fn save(&self, pizza: Pizza) -> ();

            fn delete_by_id(&self, id: u32) -> bool;
        }
    }

    pipestore::pipe_store! {
        /// Pipeline methods only, no items
        #[store]
        pub trait Reports {
            #[pipeline_run("cheapest")]
            fn cheapest(&self, size: String, limit: u32) -> Option<Pizza>;

            #[pipeline_run("countBySize")]
            fn count_by_size(&self, size: String) -> u64;
        }
    }

    pipestore::pipe_store! {
        #[store]
        pub trait Unmapped {
            fn find_by_id(&self, id: u32) -> Option<Pizza>;
        }
    }

    pipestore::pipe_store! {
        #[store]
        pub trait Typo {
            fn find_by_name(&self, name: String) -> Option<Pizza>;
        }
    }
}

use stores::{MyRestaurant, Pizza, Reports, Typo, Unmapped};

fn pizza_documents() -> Vec<serde_json::Value> {
    vec![
        json!({"_id": 1, "name": "Margherita", "size": "L"}),
        json!({"_id": 3, "name": "Capricciosa", "size": "L"}),
    ]
}

fn synthesizer(backend: &RecordingBackend) -> StoreSynthesizer {
    StoreSynthesizer::new(backend.singletons())
}

fn synthesize<S: StoreInterface + ?Sized>(backend: &RecordingBackend) -> pipestore::Result<Arc<S>> {
    let descriptor = StoreDescriptor::describe(&S::declaration())?;
    let component = synthesizer(backend).synthesize(&descriptor)?;
    Ok(component.downcast::<S>().expect("synthesized instance implements the store trait"))
}

#[tokio::test]
async fn test_pipeline_method_dispatches_to_runner() {
    let backend = RecordingBackend::new(
        RecordingRunner::returning(pizza_documents()),
        RecordingMigration::default(),
    );
    let restaurant = synthesize::<dyn MyRestaurant>(&backend).unwrap();

    let mut pizzas = restaurant.get_pizzas_by_size("L".to_string()).await.unwrap();

    assert_eq!(backend.runner.calls(), vec![("matchingPizzas".to_string(), vec![json!("L")])]);
    assert_eq!(pizzas.next().unwrap().unwrap().name, "Margherita");
    assert_eq!(pizzas.next().unwrap().unwrap().name, "Capricciosa");
    assert!(pizzas.next().is_none());
}

#[tokio::test]
async fn test_stream_decodes_lazily() {
    let backend = RecordingBackend::new(
        RecordingRunner::returning(vec![
            json!({"_id": 1, "name": "Margherita", "size": "L"}),
            json!({"unexpected": true}),
        ]),
        RecordingMigration::default(),
    );
    let restaurant = synthesize::<dyn MyRestaurant>(&backend).unwrap();

    let mut pizzas = restaurant.get_pizzas_by_size("L".to_string()).await.unwrap();
    assert!(pizzas.next().unwrap().is_ok());
    assert!(matches!(pizzas.next(), Some(Err(StoreError::Decode { .. }))));
}

#[tokio::test]
async fn test_pipeline_only_store_never_touches_crud() {
    let backend = RecordingBackend::new(
        RecordingRunner::returning(pizza_documents()),
        RecordingMigration::default(),
    );
    let reports = synthesize::<dyn Reports>(&backend).unwrap();

    let cheapest = reports.cheapest("L".to_string(), 1).await.unwrap();
    assert_eq!(cheapest.unwrap().id, 1);
    assert_eq!(reports.count_by_size("L".to_string()).await.unwrap(), 2);

    let calls = backend.runner.calls();
    assert_eq!(calls[0], ("cheapest".to_string(), vec![json!("L"), json!(1)]));
    assert_eq!(calls[1].0, "countBySize");
    assert!(backend.store.calls().is_empty());
}

#[tokio::test]
async fn test_crud_methods_use_item_collection() {
    let backend = RecordingBackend::new(RecordingRunner::default(), RecordingMigration::default());
    let restaurant = synthesize::<dyn MyRestaurant>(&backend).unwrap();

    let pizza = Pizza {
        id: 7,
        name: "Bianca".to_string(),
        size: "M".to_string(),
    };
    restaurant.save(pizza).await.unwrap();
    assert!(restaurant.find_all().await.unwrap().is_empty());
    assert!(!restaurant.delete_by_id(7).await.unwrap());

    assert_eq!(
        backend.store.calls(),
        vec!["save pizzas", "find_all pizzas", "delete_by_id pizzas"]
    );
    assert!(backend.runner.calls().is_empty());
}

#[test]
fn test_crud_without_item_fails_synthesis() {
    let backend = RecordingBackend::default();
    let result = synthesize::<dyn Unmapped>(&backend);

    match result {
        Err(StarterError::MissingItem { store, method, model }) => {
            assert!(store.ends_with("stores::Unmapped"));
            assert_eq!(method, "find_by_id");
            assert!(model.ends_with("Pizza"));
        }
        other => panic!("expected MissingItem, got {:?}", other.err()),
    }
}

#[test]
fn test_unrecognized_method_fails_synthesis() {
    let backend = RecordingBackend::default();
    let err = synthesize::<dyn Typo>(&backend).err().unwrap();

    assert!(matches!(&err, StarterError::UnbindableMethod { method, .. } if method == "find_by_name"));
    assert!(err.is_configuration_error());
}

#[tokio::test]
async fn test_synthesis_is_idempotent() {
    let backend = RecordingBackend::new(
        RecordingRunner::returning(pizza_documents()),
        RecordingMigration::default(),
    );
    let descriptor = StoreDescriptor::describe(&<dyn MyRestaurant>::declaration()).unwrap();
    let synthesizer = synthesizer(&backend);
    let first = synthesizer
        .synthesize(&descriptor)
        .unwrap()
        .downcast::<dyn MyRestaurant>()
        .unwrap();
    let second = synthesizer
        .synthesize(&descriptor)
        .unwrap()
        .downcast::<dyn MyRestaurant>()
        .unwrap();

    let from_first: Vec<Pizza> = first
        .get_pizzas_by_size("L".to_string())
        .await
        .unwrap()
        .collect_all()
        .unwrap();
    let from_second: Vec<Pizza> = second
        .get_pizzas_by_size("L".to_string())
        .await
        .unwrap()
        .collect_all()
        .unwrap();

    assert_eq!(from_first, from_second);
    let calls = backend.runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}
