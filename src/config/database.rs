//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches the
//! Rust structs without hand-written SQL.

use crate::entities::{
    ManualPointsAward, Product, ProductInventory, ProductSale, Team, User,
};
use crate::errors::{Error, Result};
use crate::entities::product_inventory;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::{Index, IndexCreateStatement, TableCreateStatement},
};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/phi_points.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Returns the directory a `sqlite://` file URL points into, if any.
fn sqlite_parent_dir(database_url: &str) -> Option<&std::path::Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    std::path::Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// For a file-backed `SQLite` URL the containing directory is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir).map_err(|e| Error::Config {
            message: format!("Failed to create database directory {}: {e}", dir.display()),
        })?;
    }
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

fn create_statement<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}

/// One inventory row per product and size.
fn inventory_size_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_product_inventory_product_size")
        .table(ProductInventory)
        .col(product_inventory::Column::ProductId)
        .col(product_inventory::Column::Size)
        .unique()
        .if_not_exists()
        .to_owned()
}

/// Creates all tables that do not exist yet, parents before children, then
/// the unique indexes the ledger relies on.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        create_statement(&schema, Team),
        create_statement(&schema, User),
        create_statement(&schema, Product),
        create_statement(&schema, ProductInventory),
        create_statement(&schema, ManualPointsAward),
        create_statement(&schema, ProductSale),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }
    db.execute(builder.build(&inventory_size_index())).await?;

    info!("Database tables ensured");
    Ok(())
}
