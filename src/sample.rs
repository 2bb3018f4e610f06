// Sample restaurant stores used by the CLI demo and the tests
use crate::memory::PipelineDefinition;
use crate::pipeline::Document;
use crate::scan::{ComponentMetadata, Stereotype, TypeCatalog};
use crate::store::PipelineStream;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pizza {
    #[serde(rename = "_id")]
    pub id: u32,
    pub name: String,
    pub size: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: u32,
    pub pizza_size: String,
    pub quantity: u32,
}

crate::pipe_store! {
    /// Pizza menu, queried through stored pipelines and basic CRUD
    #[store]
    #[item(Pizza, "pizzas")]
    pub trait MyRestaurant {
        #[pipeline_run("matchingPizzas")]
        fn get_pizzas_by_size(&self, pizza_size: String) -> PipelineStream<Pizza>;

        fn find_by_id(&self, id: u32) -> Option<Pizza>;

        fn find_all(&self) -> Vec<Pizza>;

        fn save(&self, pizza: Pizza) -> Option<Pizza>;

        fn count(&self) -> u64;
    }
}

crate::pipe_store! {
    /// Order reports; pipeline methods only
    #[store]
    pub trait OrderReports {
        /// Orders for one pizza size, largest first
        #[pipeline_run("ordersBySize")]
        fn get_orders_by_size(&self, size: String) -> Vec<Order>;
    }
}

/// Make the sample types known to scanning
pub fn register_types(catalog: &mut TypeCatalog) {
    catalog
        .declare_store::<dyn MyRestaurant>()
        .declare_store::<dyn OrderReports>()
        .declare_type(ComponentMetadata::concrete(std::any::type_name::<Pizza>()).with_stereotype(Stereotype::Model))
        .declare_type(ComponentMetadata::concrete(std::any::type_name::<Order>()).with_stereotype(Stereotype::Model));
}

pub fn pipelines() -> Vec<PipelineDefinition> {
    vec![
        PipelineDefinition::new(
            "matchingPizzas",
            "pizzas",
            vec![json!({"$match": {"size": "${0}"}}), json!({"$sort": {"price": 1}})],
        ),
        PipelineDefinition::new(
            "ordersBySize",
            "orders",
            vec![json!({"$match": {"pizzaSize": "${0}"}}), json!({"$sort": {"quantity": -1}})],
        ),
    ]
}

pub fn pizzas() -> Vec<Document> {
    vec![
        json!({"_id": 1, "name": "Margherita", "size": "L", "price": 8.5}),
        json!({"_id": 2, "name": "Diavola", "size": "M", "price": 9.0}),
        json!({"_id": 3, "name": "Capricciosa", "size": "L", "price": 11.0}),
        json!({"_id": 4, "name": "Marinara", "size": "S", "price": 6.5}),
    ]
}

pub fn orders() -> Vec<Document> {
    vec![
        json!({"_id": 1, "pizzaSize": "L", "quantity": 3}),
        json!({"_id": 2, "pizzaSize": "M", "quantity": 1}),
        json!({"_id": 3, "pizzaSize": "L", "quantity": 5}),
    ]
}
