//! Product entity - Merchandise sold to students for points.
//!
//! Each unit sold credits the buyer's team with `points`. Stock is tracked per
//! size in the `product_inventory` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Phi Shirt")
    #[sea_orm(unique)]
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Price per unit in dollars
    pub price: Decimal,
    /// Points credited to the buyer's team per unit sold
    pub points: i32,
    /// Inactive products cannot be sold
    pub is_active: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has one inventory row per size
    #[sea_orm(has_many = "super::product_inventory::Entity")]
    Inventory,
    /// One product has many sales
    #[sea_orm(has_many = "super::product_sale::Entity")]
    Sales,
}

impl Related<super::product_inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl Related<super::product_sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
