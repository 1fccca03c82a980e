//! Catalog Service Library
//!
//! This crate owns the category tree and product tables and exposes them
//! via gRPC. It can be run as a standalone service or embedded in the
//! combined binary.

pub mod config;
pub mod grpc;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use crate::config::CatalogServiceConfig;
use crate::grpc::CatalogGrpcService;
use crate::infra::Database;
use crate::repository::{CategoryStore, ProductStore};
use crate::service::{CategoryManager, ProductManager};

/// Run the catalog service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = CatalogServiceConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CatalogServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Wire stores, services and the gRPC wrapper onto one database.
pub fn build_grpc_service(db: Database) -> CatalogGrpcService {
    let db_conn = db.get_connection();

    let category_repo = Arc::new(CategoryStore::new(db_conn.clone()));
    let product_repo = Arc::new(ProductStore::new(db_conn));

    let category_service = Arc::new(CategoryManager::new(category_repo.clone()));
    let product_service = Arc::new(ProductManager::new(product_repo, category_repo));

    CatalogGrpcService::new(category_service, product_service, db)
}

/// Run the gRPC server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: CatalogServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.database).await?;
    let grpc_service = build_grpc_service(db);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Catalog service listening on {}", addr);

    // Run server
    Server::builder()
        .add_service(proto::CatalogServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}
