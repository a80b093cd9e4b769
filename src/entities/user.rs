//! User entity - Students, coaches, staff and admins.
//!
//! Only students can be the target of a ledger operation. Coaches, staff and
//! admins act as callers; their permissions are derived from [`Role`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user within the platform
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Team member who earns points
    #[sea_orm(string_value = "STUDENT")]
    Student,
    /// Team coach; may award points
    #[sea_orm(string_value = "COACH")]
    Coach,
    /// Staff member; may award points and sell products
    #[sea_orm(string_value = "STAFF")]
    Staff,
    /// Administrator; may do everything staff can
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

impl Role {
    /// Whether this role may issue manual points awards.
    #[must_use]
    pub const fn can_award_points(self) -> bool {
        matches!(self, Self::Coach | Self::Staff | Self::Admin)
    }

    /// Whether this role may record product sales and restock inventory.
    #[must_use]
    pub const fn can_sell_products(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Student => "student",
            Self::Coach => "coach",
            Self::Staff => "staff",
            Self::Admin => "admin",
        };
        f.write_str(label)
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Contact email, if known
    pub email: Option<String>,
    /// Platform role
    pub role: Role,
    /// Team membership; students have exactly one, staff usually none
    pub team_id: Option<i64>,
    /// Discord user ID used to resolve bot callers
    #[sea_orm(unique)]
    pub discord_id: Option<String>,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user belongs to at most one team
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
