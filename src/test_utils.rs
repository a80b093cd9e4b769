//! Shared test utilities for the points ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{inventory, product, team, user},
    entities::{self, Role},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database under the system temp directory.
///
/// Unlike the in-memory database, every pooled connection sees the same data,
/// so concurrent transactions really contend. Pass the returned path to
/// [`remove_test_db_file`] when done.
pub async fn setup_file_test_db(name: &str) -> Result<(DatabaseConnection, PathBuf)> {
    let path = std::env::temp_dir().join(format!(
        "phi_points_{}_{name}.sqlite",
        std::process::id()
    ));
    remove_test_db_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = sea_orm::Database::connect(&url).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((db, path))
}

/// Deletes a database created by [`setup_file_test_db`] and its journal files.
pub fn remove_test_db_file(path: &Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

/// Creates a team with zero points.
pub async fn create_test_team(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::team::Model> {
    team::create_team(db, name.to_string()).await
}

/// Creates a student on the given team.
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
    team_id: i64,
) -> Result<entities::user::Model> {
    create_custom_user(db, name, Role::Student, Some(team_id), None).await
}

/// Creates a staff member linked to a Discord id, without a team.
pub async fn create_test_staff(
    db: &DatabaseConnection,
    name: &str,
    discord_id: &str,
) -> Result<entities::user::Model> {
    create_custom_user(db, name, Role::Staff, None, Some(discord_id)).await
}

/// Creates a user with custom parameters.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    name: &str,
    role: Role,
    team_id: Option<i64>,
    discord_id: Option<&str>,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        user::NewUser {
            name: name.to_string(),
            email: None,
            role,
            team_id,
            discord_id: discord_id.map(str::to_string),
        },
    )
    .await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * price: 15.00
/// * points: 10
/// * no inventory
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        product::NewProduct {
            name: name.to_string(),
            description: None,
            price: Decimal::new(1500, 2),
            points: 10,
        },
    )
    .await
}

/// Adds stock for each `(size, quantity)` pair.
pub async fn stock_test_product(
    db: &DatabaseConnection,
    product_id: i64,
    sizes: &[(&str, i32)],
) -> Result<()> {
    for (size, quantity) in sizes {
        inventory::restock_inventory(db, product_id, size, *quantity).await?;
    }
    Ok(())
}

/// Records created by [`setup_ledger`].
pub struct LedgerFixture {
    /// "Red Team", starting at zero points
    pub team: entities::team::Model,
    /// "Alice", a student on `team`
    pub student: entities::user::Model,
    /// "Sam Staff", Discord id `"100"`
    pub staff: entities::user::Model,
    /// "Phi Shirt" at 15.00 / 10 points, stocked with M = 20 and S = 10
    pub product: entities::product::Model,
}

/// Sets up a complete ledger environment: a team, a student, a staff member
/// and a stocked product.
pub async fn setup_ledger() -> Result<(DatabaseConnection, LedgerFixture)> {
    let db = setup_test_db().await?;
    let fixture = populate_ledger(&db).await?;
    Ok((db, fixture))
}

/// Creates the [`LedgerFixture`] records in an existing database.
pub async fn populate_ledger(db: &DatabaseConnection) -> Result<LedgerFixture> {
    let team = create_test_team(db, "Red Team").await?;
    let student = create_test_student(db, "Alice", team.id).await?;
    let staff = create_test_staff(db, "Sam Staff", "100").await?;
    let product = create_test_product(db, "Phi Shirt").await?;
    stock_test_product(db, product.id, &[("M", 20), ("S", 10)]).await?;

    Ok(LedgerFixture {
        team,
        student,
        staff,
        product,
    })
}
