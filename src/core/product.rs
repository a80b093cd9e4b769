//! Product business logic - Catalog entries sold to students.
//!
//! Products carry a unit price and a points reward per unit. Stock lives in
//! per-size inventory rows managed by [`crate::core::inventory`]. Products are
//! never deleted; deactivating one hides it from sale while keeping its sales
//! history intact.

use crate::{
    entities::{Product, ProductInventory, product, product_inventory},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Highest unit price accepted, 1,000,000.00.
///
/// `SQLite` stores decimal columns as REAL, so amounts are only exact while they
/// fit comfortably inside an `f64` mantissa.
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// Input for [`create_product`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Unique product name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Unit price in dollars
    pub price: Decimal,
    /// Points credited per unit sold
    pub points: i32,
}

/// Retrieves all active products from the database, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by its name, returning None if not found or inactive.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name))
        .filter(product::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, active or not.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new, active product after validating its fields.
///
/// Stock is added separately with [`crate::core::inventory::restock_inventory`].
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price or the points reward is negative
/// - The price exceeds [`MAX_PRICE`]
/// - The database insert operation fails (e.g., duplicate name)
pub async fn create_product<C>(db: &C, new_product: NewProduct) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    if new_product.name.trim().is_empty() {
        return Err(Error::validation("Product name cannot be empty"));
    }

    if new_product.price < Decimal::ZERO {
        return Err(Error::validation(format!(
            "Product price cannot be negative (got {})",
            new_product.price
        )));
    }

    if new_product.price > MAX_PRICE {
        return Err(Error::validation(format!(
            "Product price cannot exceed {MAX_PRICE} (got {})",
            new_product.price
        )));
    }

    if new_product.points < 0 {
        return Err(Error::validation(format!(
            "Product points cannot be negative (got {})",
            new_product.points
        )));
    }

    let now = chrono::Utc::now().naive_utc();

    let product = product::ActiveModel {
        name: Set(new_product.name.trim().to_string()),
        description: Set(new_product.description),
        price: Set(new_product.price),
        points: Set(new_product.points),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Marks a product inactive so it can no longer be sold.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already inactive
/// - The database update operation fails
pub async fn deactivate_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?
        .into();

    if !*product.is_active.as_ref() {
        return Err(Error::ProductNotFound {
            name: product_id.to_string(),
        });
    }

    product.is_active = Set(false);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Retrieves the inventory rows of a product, ordered by size label.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_inventory_for_product<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<product_inventory::Model>>
where
    C: ConnectionTrait,
{
    ProductInventory::find()
        .filter(product_inventory::Column::ProductId.eq(product_id))
        .order_by_asc(product_inventory::Column::Size)
        .all(db)
        .await
        .map_err(Into::into)
}
