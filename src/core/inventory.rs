//! Inventory business logic - Per-size stock counters.
//!
//! Stock only moves through relative updates: [`restock_inventory`] adds to a
//! row, and sales remove from it with [`decrement_inventory_atomic`], whose
//! update is conditioned on enough stock remaining when it executes.

use crate::{
    entities::{ProductInventory, product_inventory},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Finds the inventory row for a product and size.
pub async fn find_inventory_row<C>(
    db: &C,
    product_id: i64,
    size: &str,
) -> Result<Option<product_inventory::Model>>
where
    C: ConnectionTrait,
{
    ProductInventory::find()
        .filter(product_inventory::Column::ProductId.eq(product_id))
        .filter(product_inventory::Column::Size.eq(size))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds stock for a product size, creating the row if the size is new.
///
/// # Errors
/// Returns an error if:
/// - The size label is empty or the quantity is not positive
/// - The product does not exist
/// - The database operation fails
#[instrument(skip(db))]
pub async fn restock_inventory(
    db: &DatabaseConnection,
    product_id: i64,
    size: &str,
    quantity: i32,
) -> Result<product_inventory::Model> {
    let txn = db.begin().await?;
    let row = add_stock(&txn, product_id, size, quantity).await?;
    txn.commit().await?;

    info!(
        product_id,
        size = %row.size,
        added = quantity,
        on_hand = row.quantity,
        "Inventory restocked"
    );
    Ok(row)
}

/// Restocks inside the caller's transaction.
///
/// `(product_id, size)` is unique in the schema, so a concurrent first restock
/// of the same size fails its insert instead of creating a second row.
pub(crate) async fn add_stock<C>(
    db: &C,
    product_id: i64,
    size: &str,
    quantity: i32,
) -> Result<product_inventory::Model>
where
    C: ConnectionTrait,
{
    let size = size.trim();
    if size.is_empty() {
        return Err(Error::validation("Size cannot be empty"));
    }
    if quantity <= 0 {
        return Err(Error::validation(format!(
            "Restock quantity must be positive (got {quantity})"
        )));
    }

    crate::core::product::get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    let row = if let Some(existing) = find_inventory_row(db, product_id, size).await? {
        ProductInventory::update_many()
            .col_expr(
                product_inventory::Column::Quantity,
                Expr::col(product_inventory::Column::Quantity).add(quantity),
            )
            .filter(product_inventory::Column::Id.eq(existing.id))
            .exec(db)
            .await?;

        ProductInventory::find_by_id(existing.id)
            .one(db)
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                name: product_id.to_string(),
            })?
    } else {
        product_inventory::ActiveModel {
            product_id: Set(product_id),
            size: Set(size.to_string()),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    Ok(row)
}

/// Removes `quantity` units from an inventory row if at least that many remain.
///
/// Issues `UPDATE product_inventory SET quantity = quantity - ? WHERE id = ?
/// AND quantity >= ?`. When no row matches, another sale got there first and
/// the caller's transaction must be abandoned.
///
/// # Returns
/// The updated inventory row
pub(crate) async fn decrement_inventory_atomic<C>(
    db: &C,
    inventory_id: i64,
    quantity: i32,
) -> Result<product_inventory::Model>
where
    C: ConnectionTrait,
{
    let result = ProductInventory::update_many()
        .col_expr(
            product_inventory::Column::Quantity,
            Expr::col(product_inventory::Column::Quantity).sub(quantity),
        )
        .filter(product_inventory::Column::Id.eq(inventory_id))
        .filter(product_inventory::Column::Quantity.gte(quantity))
        .exec(db)
        .await?;

    let row = ProductInventory::find_by_id(inventory_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::InsufficientStock {
            size: String::new(),
            requested: quantity,
            available: 0,
        })?;

    if result.rows_affected == 0 {
        return Err(Error::InsufficientStock {
            size: row.size,
            requested: quantity,
            available: row.quantity,
        });
    }

    Ok(row)
}
