//! Team business logic - Directory lookups and the team points counter.
//!
//! `total_points` is only ever changed through [`adjust_team_points_atomic`],
//! which the ledger operations call inside their own transactions.

use crate::{
    entities::{ManualPointsAward, ProductSale, Team, manual_points_award, product_sale, team},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr};

/// Recorded total of a team next to the totals recomputed from its ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPointsAudit {
    /// Team being audited
    pub team_id: i64,
    /// Value of `teams.total_points`
    pub recorded: i64,
    /// Sum of the team's manual awards
    pub from_awards: i64,
    /// Sum of `points_awarded` over the team's sales
    pub from_sales: i64,
}

impl TeamPointsAudit {
    /// Points the ledger entries account for.
    #[must_use]
    pub const fn expected(&self) -> i64 {
        self.from_awards + self.from_sales
    }

    /// Whether the recorded counter matches the ledger entries.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.recorded == self.expected()
    }
}

/// Creates a team with a zero points total.
///
/// # Errors
/// Returns an error if the name is empty or the insert fails (including a
/// duplicate name).
pub async fn create_team<C>(db: &C, name: String) -> Result<team::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::validation("Team name cannot be empty"));
    }

    let team = team::ActiveModel {
        name: Set(name.trim().to_string()),
        total_points: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    team.insert(db).await.map_err(Into::into)
}

/// Finds a team by its unique ID.
pub async fn get_team_by_id<C>(db: &C, team_id: i64) -> Result<Option<team::Model>>
where
    C: ConnectionTrait,
{
    Team::find_by_id(team_id).one(db).await.map_err(Into::into)
}

/// Finds a team by its exact name.
pub async fn get_team_by_name<C>(db: &C, name: &str) -> Result<Option<team::Model>>
where
    C: ConnectionTrait,
{
    Team::find()
        .filter(team::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all teams ordered alphabetically.
pub async fn get_all_teams(db: &DatabaseConnection) -> Result<Vec<team::Model>> {
    Team::find()
        .order_by_asc(team::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all teams ordered by points, highest first, then by name.
pub async fn get_team_standings(db: &DatabaseConnection) -> Result<Vec<team::Model>> {
    Team::find()
        .order_by_desc(team::Column::TotalPoints)
        .order_by_asc(team::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds `points_delta` to a team's total with a single relative update.
///
/// This issues `UPDATE teams SET total_points = total_points + ? WHERE id = ?`
/// rather than writing back a value read earlier, so concurrent ledger
/// operations on the same team serialize in the database instead of losing
/// updates.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `team_id` - ID of the team to update
/// * `points_delta` - Points to add (negative to reverse an earlier credit)
///
/// # Returns
/// The updated team model
pub(crate) async fn adjust_team_points_atomic<C>(
    db: &C,
    team_id: i64,
    points_delta: i64,
) -> Result<team::Model>
where
    C: ConnectionTrait,
{
    let result = Team::update_many()
        .col_expr(
            team::Column::TotalPoints,
            Expr::col(team::Column::TotalPoints).add(points_delta),
        )
        .filter(team::Column::Id.eq(team_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::TeamNotFound {
            id: team_id.to_string(),
        });
    }

    Team::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::TeamNotFound {
            id: team_id.to_string(),
        })
}

/// Compares a team's recorded total with the sums of its awards and sales.
///
/// # Errors
/// Returns [`Error::TeamNotFound`] if the team does not exist.
pub async fn audit_team_points(db: &DatabaseConnection, team_id: i64) -> Result<TeamPointsAudit> {
    let team = get_team_by_id(db, team_id)
        .await?
        .ok_or_else(|| Error::TeamNotFound {
            id: team_id.to_string(),
        })?;

    let from_awards: Option<i64> = ManualPointsAward::find()
        .select_only()
        .column_as(Expr::col(manual_points_award::Column::Points).sum(), "total")
        .filter(manual_points_award::Column::TeamId.eq(team_id))
        .into_tuple()
        .one(db)
        .await?
        .flatten();

    let from_sales: Option<i64> = ProductSale::find()
        .select_only()
        .column_as(Expr::col(product_sale::Column::PointsAwarded).sum(), "total")
        .filter(product_sale::Column::TeamId.eq(team_id))
        .into_tuple()
        .one(db)
        .await?
        .flatten();

    Ok(TeamPointsAudit {
        team_id,
        recorded: team.total_points,
        from_awards: from_awards.unwrap_or(0),
        from_sales: from_sales.unwrap_or(0),
    })
}
