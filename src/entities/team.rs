//! Team entity - A group of students competing on points.
//!
//! `total_points` is a running counter maintained exclusively by the ledger
//! through relative updates; nothing else writes it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// Unique identifier for the team
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across teams
    #[sea_orm(unique)]
    pub name: String,
    /// Sum of every award and sale credited to this team
    pub total_points: i64,
    /// When the team was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Team and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One team has many members
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
    /// One team has many manual awards
    #[sea_orm(has_many = "super::manual_points_award::Entity")]
    ManualPointsAwards,
    /// One team has many product sales
    #[sea_orm(has_many = "super::product_sale::Entity")]
    ProductSales,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::manual_points_award::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualPointsAwards.def()
    }
}

impl Related<super::product_sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductSales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
