use crate::config::PipeConfig;
use crate::error::BoxError;
use crate::host::{ComponentContainer, Environment, StandardEnvironment};
use crate::memory::MemoryBackend;
use crate::sample::{self, MyRestaurant, OrderReports};
use crate::scan::{ScanScope, StoreScanner, TypeCatalog};
use crate::starter::PipeStoreStarter;
use crate::store::{MethodBinding, StoreDescriptor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// List discovered stores and their method bindings
    Scan {
        /// Scan package (e.g. "pipestore::sample"); scans everything when absent
        #[clap(short = 's', long)]
        scan_package: Option<String>,
        /// Active profiles
        #[clap(short = 'p', long = "profile")]
        profiles: Vec<String>,
    },

    /// Run the full startup against in-memory collaborators
    Boot {
        /// JSON settings file
        #[clap(short = 'c', long)]
        config: Option<PathBuf>,
        /// Scan package, overriding the settings file
        #[clap(short = 's', long)]
        scan_package: Option<String>,
        /// Active profiles
        #[clap(short = 'p', long = "profile")]
        profiles: Vec<String>,
    },
}

/// pipestore command
#[derive(Parser)]
#[command(about=None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
    /// Write a debug log to this file
    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,
}

fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    sample::register_types(&mut catalog);
    catalog
}

fn environment(profiles: Vec<String>) -> Arc<dyn Environment> {
    Arc::new(StandardEnvironment::with_profiles(profiles))
}

pub fn scan_command(scan_package: Option<String>, profiles: Vec<String>) -> Result<(), BoxError> {
    let catalog = catalog();
    let scope = ScanScope::resolve(scan_package.as_deref());
    let scanner = StoreScanner::new(environment(profiles));

    for type_name in scanner.scan(catalog.index(), &scope) {
        let descriptor = StoreDescriptor::describe(catalog.resolve(&type_name)?)?;
        info!("{} -> '{}'", type_name, descriptor.component_name());
        for item in descriptor.items() {
            info!("  item {} in '{}'", item.model.simple_name(), item.collection);
        }
        for method in descriptor.methods() {
            match &method.binding {
                MethodBinding::Pipeline { pipeline_id } => {
                    info!("  {} runs pipeline '{}'", method.name, pipeline_id)
                }
                MethodBinding::Crud {
                    operation,
                    collection,
                } => info!("  {} is {} on '{}'", method.name, operation, collection.name),
                MethodBinding::Unresolved(reason) => warn!("  {} cannot be bound: {:?}", method.name, reason),
            }
        }
    }
    Ok(())
}

pub async fn boot_command(
    config: Option<PathBuf>,
    scan_package: Option<String>,
    profiles: Vec<String>,
) -> Result<(), BoxError> {
    let mut config = match config {
        Some(path) => PipeConfig::from_file(&path)?,
        None => PipeConfig::default(),
    };
    if scan_package.is_some() {
        config.scan_package = scan_package;
    }

    let backend = sample::pipelines()
        .into_iter()
        .fold(MemoryBackend::new(), MemoryBackend::with_pipeline)
        .with_documents("pizzas", sample::pizzas())
        .with_documents("orders", sample::orders());

    let mut container = ComponentContainer::new();
    let report = PipeStoreStarter::new(config, Arc::new(backend), catalog())
        .with_environment(environment(profiles))
        .run(&mut container)?;

    info!(
        "Startup complete: {} store(s) in {}, migration started: {}",
        report.stores.len(),
        report.scan_scope,
        report.migration_started
    );
    for name in container.names() {
        info!("  component '{}'", name);
    }

    if let Some(restaurant) = container.get::<dyn MyRestaurant>("myRestaurant") {
        for pizza in restaurant.get_pizzas_by_size("L".to_string()).await? {
            let pizza = pizza?;
            info!("Large pizza: {} ({:.2})", pizza.name, pizza.price);
        }
        info!("Menu size: {}", restaurant.count().await?);
    }
    if let Some(reports) = container.get::<dyn OrderReports>("orderReports") {
        let orders = reports.get_orders_by_size("L".to_string()).await?;
        info!("Large pizza orders: {:?}", orders.iter().map(|o| o.quantity).collect::<Vec<_>>());
    }
    Ok(())
}
