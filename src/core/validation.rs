//! Ledger validation helpers.
//!
//! Both helpers are read-only. They run before a ledger transaction opens so
//! that bad requests are rejected without touching the counters; the stock
//! check is repeated by the conditional decrement inside the transaction.

use crate::{
    entities::{Role, product, product_inventory, team, user},
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;

/// A student confirmed to be a member of the requested team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStudent {
    /// The student
    pub student: user::Model,
    /// The student's team
    pub team: team::Model,
}

/// A product and the inventory row a sale will draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSale {
    /// The active product
    pub product: product::Model,
    /// Inventory row for the requested size as of the check
    pub inventory: product_inventory::Model,
}

/// Checks that `user_id` is a student on team `team_id`.
///
/// # Errors
/// - [`Error::UserNotFound`] if the user does not exist
/// - [`Error::NotAStudent`] if the user's role is not student
/// - [`Error::TeamMismatch`] if the user has no team or a different one
/// - [`Error::TeamNotFound`] if the team row is missing
pub async fn validate_student<C>(db: &C, user_id: i64, team_id: i64) -> Result<ValidatedStudent>
where
    C: ConnectionTrait,
{
    let student = crate::core::user::get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })?;

    if student.role != Role::Student {
        return Err(Error::NotAStudent { user_id });
    }

    if student.team_id != Some(team_id) {
        return Err(Error::TeamMismatch { user_id, team_id });
    }

    let team = crate::core::team::get_team_by_id(db, team_id)
        .await?
        .ok_or_else(|| Error::TeamNotFound {
            id: team_id.to_string(),
        })?;

    Ok(ValidatedStudent { student, team })
}

/// Checks that an active product has at least `quantity` units in `size`.
///
/// # Errors
/// - [`Error::ProductNotFound`] if the product does not exist or is inactive
/// - [`Error::InsufficientStock`] if the size is not stocked or has too few units
pub async fn validate_product_sale<C>(
    db: &C,
    product_id: i64,
    size: &str,
    quantity: i32,
) -> Result<ValidatedSale>
where
    C: ConnectionTrait,
{
    let product = crate::core::product::get_product_by_id(db, product_id)
        .await?
        .filter(|product| product.is_active)
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    let inventory = crate::core::inventory::find_inventory_row(db, product_id, size).await?;

    match inventory {
        Some(inventory) if inventory.quantity >= quantity => Ok(ValidatedSale { product, inventory }),
        Some(inventory) => Err(Error::InsufficientStock {
            size: size.to_string(),
            requested: quantity,
            available: inventory.quantity,
        }),
        None => Err(Error::InsufficientStock {
            size: size.to_string(),
            requested: quantity,
            available: 0,
        }),
    }
}
