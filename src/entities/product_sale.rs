//! Product sale entity - A recorded sale of a product to a student.
//!
//! Rows are append-only and written in the same transaction as the inventory
//! decrement and the team points increment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How the buyer paid
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash in hand
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Card terminal
    #[sea_orm(string_value = "CARD")]
    Card,
    /// Paper check
    #[sea_orm(string_value = "CHECK")]
    Check,
    /// Paid online ahead of pickup
    #[sea_orm(string_value = "ONLINE")]
    Online,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Check => "check",
            Self::Online => "online",
        };
        f.write_str(label)
    }
}

/// Product sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product sold
    pub product_id: i64,
    /// Student who bought it
    pub user_id: i64,
    /// Team credited with the points
    pub team_id: i64,
    /// Size taken from inventory
    pub size: String,
    /// Units sold, always positive
    pub quantity: i32,
    /// How the buyer paid
    pub payment_method: PaymentMethod,
    /// Amount charged in dollars
    pub amount_paid: Decimal,
    /// `product.points * quantity` at the time of sale
    pub points_awarded: i64,
    /// Staff member or admin who recorded the sale
    pub sold_by_id: i64,
    /// When the sale was recorded
    pub sold_at: DateTimeUtc,
}

/// Defines relationships between sales and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The product sold
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// The buying student
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Student,
    /// The user who recorded the sale
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SoldById",
        to = "super::user::Column::Id"
    )]
    SoldBy,
    /// The team credited
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
