//! Product inventory entity - Stock on hand per product and size.
//!
//! At most one row exists per `(product_id, size)`; the unique index is created
//! by [`crate::config::database::create_tables`]. `quantity` never goes
//! negative: sales decrement it with a conditional relative update.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory row database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_inventory")]
pub struct Model {
    /// Unique identifier for the inventory row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product this stock belongs to
    pub product_id: i64,
    /// Size label (e.g., "S", "M", "XL")
    pub size: String,
    /// Units on hand
    pub quantity: i32,
}

/// Defines relationships between inventory rows and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
