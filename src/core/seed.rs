//! Catalog seeding - Creates the teams, users and products listed in catalog.toml.
//!
//! Seeding is idempotent: anything that already exists by name (or by Discord
//! id for users) is left untouched, and initial stock is only added for
//! products created in the same run.

use crate::{
    config::catalog::{CatalogConfig, ProductConfig, UserConfig},
    core::{inventory, product, team, user},
    entities::{Product, product as product_entity},
    errors::{Error, Result},
};
use sea_orm::{TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Counts of what a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Teams created
    pub teams_created: usize,
    /// Users created
    pub users_created: usize,
    /// Products created
    pub products_created: usize,
}

/// Applies a catalog to the database, skipping entries that already exist.
///
/// # Errors
/// Returns an error if a user names a team that is neither in the database nor
/// in the catalog, if any entry fails validation, or if the database fails.
#[instrument(skip_all)]
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for team_config in &catalog.teams {
        if team::get_team_by_name(db, team_config.name.trim())
            .await?
            .is_some()
        {
            debug!(team = %team_config.name, "Team already exists");
            continue;
        }
        team::create_team(db, team_config.name.clone()).await?;
        summary.teams_created += 1;
    }

    for user_config in &catalog.users {
        if seed_user(db, user_config).await? {
            summary.users_created += 1;
        }
    }

    for product_config in &catalog.products {
        if seed_product(db, product_config).await? {
            summary.products_created += 1;
        }
    }

    info!(
        teams = summary.teams_created,
        users = summary.users_created,
        products = summary.products_created,
        "Catalog seeded"
    );
    Ok(summary)
}

async fn seed_user(db: &DatabaseConnection, config: &UserConfig) -> Result<bool> {
    if let Some(discord_id) = &config.discord_id {
        if user::get_user_by_discord_id(db, discord_id).await?.is_some() {
            debug!(user = %config.name, "User already linked to Discord id");
            return Ok(false);
        }
    }
    if user::get_user_by_name(db, config.name.trim()).await?.is_some() {
        debug!(user = %config.name, "User already exists");
        return Ok(false);
    }

    let team_id = match &config.team {
        Some(team_name) => Some(
            team::get_team_by_name(db, team_name.trim())
                .await?
                .ok_or_else(|| Error::TeamNotFound {
                    id: team_name.clone(),
                })?
                .id,
        ),
        None => None,
    };

    user::create_user(
        db,
        user::NewUser {
            name: config.name.clone(),
            email: config.email.clone(),
            role: config.role,
            team_id,
            discord_id: config.discord_id.clone(),
        },
    )
    .await?;
    Ok(true)
}

async fn seed_product(db: &DatabaseConnection, config: &ProductConfig) -> Result<bool> {
    let existing = Product::find()
        .filter(product_entity::Column::Name.eq(config.name.trim()))
        .one(db)
        .await?;
    if existing.is_some() {
        debug!(product = %config.name, "Product already exists");
        return Ok(false);
    }

    // Product and initial stock commit together
    let txn = db.begin().await?;
    let created = product::create_product(
        &txn,
        product::NewProduct {
            name: config.name.clone(),
            description: config.description.clone(),
            price: config.price,
            points: config.points,
        },
    )
    .await?;

    for (size, quantity) in &config.inventory {
        if *quantity > 0 {
            inventory::add_stock(&txn, created.id, size, *quantity).await?;
        }
    }
    txn.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::catalog::parse_catalog;
    use crate::entities::Role;
    use crate::test_utils::*;

    const CATALOG: &str = r#"
        [[teams]]
        name = "Red Team"

        [[teams]]
        name = "Blue Team"

        [[users]]
        name = "Sam Staff"
        role = "STAFF"
        discord_id = "1234"

        [[users]]
        name = "Alice"
        role = "STUDENT"
        team = "Red Team"

        [[products]]
        name = "Phi Shirt"
        price = "15.00"
        points = 10
        inventory = { S = 10, M = 20, XL = 0 }
    "#;

    #[tokio::test]
    async fn test_seed_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog = parse_catalog(CATALOG)?;

        let summary = seed_catalog(&db, &catalog).await?;
        assert_eq!(
            summary,
            SeedSummary {
                teams_created: 2,
                users_created: 2,
                products_created: 1,
            }
        );

        let alice = user::get_user_by_name(&db, "Alice").await?.unwrap();
        let red = team::get_team_by_name(&db, "Red Team").await?.unwrap();
        assert_eq!(alice.role, Role::Student);
        assert_eq!(alice.team_id, Some(red.id));

        let sam = user::get_user_by_discord_id(&db, "1234").await?.unwrap();
        assert_eq!(sam.role, Role::Staff);

        let shirt = product::get_product_by_name(&db, "Phi Shirt").await?.unwrap();
        let inventory = product::get_inventory_for_product(&db, shirt.id).await?;
        let sizes: Vec<(&str, i32)> = inventory
            .iter()
            .map(|row| (row.size.as_str(), row.quantity))
            .collect();
        assert_eq!(sizes, vec![("M", 20), ("S", 10)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog = parse_catalog(CATALOG)?;

        seed_catalog(&db, &catalog).await?;
        let second = seed_catalog(&db, &catalog).await?;
        assert_eq!(second, SeedSummary::default());

        // Stock is not added twice
        let shirt = product::get_product_by_name(&db, "Phi Shirt").await?.unwrap();
        let medium = inventory::find_inventory_row(&db, shirt.id, "M").await?.unwrap();
        assert_eq!(medium.quantity, 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_initial_stock_rolls_back_product() -> Result<()> {
        let db = setup_test_db().await?;
        let broken = parse_catalog(
            r#"
            [[products]]
            name = "Phi Cap"
            price = "12.00"
            points = 5
            inventory = { " " = 4, M = 6 }
            "#,
        )?;

        let result = seed_catalog(&db, &broken).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(product::get_product_by_name(&db, "Phi Cap").await?.is_none());

        // A corrected catalog seeds the product on the next run
        let fixed = parse_catalog(
            r#"
            [[products]]
            name = "Phi Cap"
            price = "12.00"
            points = 5
            inventory = { M = 6 }
            "#,
        )?;
        let summary = seed_catalog(&db, &fixed).await?;
        assert_eq!(summary.products_created, 1);
        let cap = product::get_product_by_name(&db, "Phi Cap").await?.unwrap();
        let medium = inventory::find_inventory_row(&db, cap.id, "M").await?.unwrap();
        assert_eq!(medium.quantity, 6);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_user_with_unknown_team() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog = parse_catalog(
            r#"
            [[users]]
            name = "Orphan"
            role = "STUDENT"
            team = "Missing Team"
            "#,
        )?;

        let result = seed_catalog(&db, &catalog).await;
        assert!(matches!(result.unwrap_err(), Error::TeamNotFound { .. }));

        Ok(())
    }
}
