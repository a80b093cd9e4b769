//! Manual points award entity - A coach or staff grant of points to a student.
//!
//! Rows are append-only. Creating one increments the team's `total_points` in
//! the same transaction; deleting one decrements it by the same amount.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Manual points award database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "manual_points_awards")]
pub struct Model {
    /// Unique identifier for the award
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student who earned the points
    pub user_id: i64,
    /// Team credited with the points
    pub team_id: i64,
    /// Points granted, always positive
    pub points: i64,
    /// Activity the points were awarded for
    pub description: String,
    /// Coach, staff member or admin who issued the award
    pub awarded_by_id: i64,
    /// When the award was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between awards and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The student receiving the award
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Student,
    /// The user who issued the award
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AwardedById",
        to = "super::user::Column::Id"
    )]
    AwardedBy,
    /// The team credited
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
