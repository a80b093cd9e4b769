//! Points award business logic - Manual grants of points to students.
//!
//! An award and the matching team points increment are written in one
//! database transaction, so the team total always equals the sum of its
//! awards and sales. Deleting an award reverses its points in the same way.

use crate::{
    core::{
        display::{display_name, load_team_names, load_user_names},
        team, user, validation,
    },
    entities::{ManualPointsAward, manual_points_award},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Validated input for [`award_points_to_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardPointsRequest {
    /// Student receiving the points
    pub user_id: i64,
    /// Team the student must belong to
    pub team_id: i64,
    /// Points to grant, must be positive
    pub points: i64,
    /// Activity the points are for
    pub activity_description: String,
    /// Caller issuing the award, resolved from the authenticated identity
    pub awarded_by_id: i64,
}

impl AwardPointsRequest {
    /// Rejects requests with a blank description or non-positive points.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.activity_description.trim().is_empty() {
            return Err(Error::validation("Activity description is required"));
        }
        if self.points <= 0 {
            return Err(Error::validation(format!(
                "Points must be a positive integer (got {})",
                self.points
            )));
        }
        Ok(())
    }
}

/// An award joined with the display names callers show next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardRecord {
    /// The stored award
    pub award: manual_points_award::Model,
    /// Name of the student who earned the points
    pub student_name: String,
    /// Name of the credited team
    pub team_name: String,
    /// Name of the user who issued the award
    pub awarded_by_name: String,
}

/// Result of [`award_points_to_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardOutcome {
    /// The award with display names
    pub record: AwardRecord,
    /// Team total after the award was applied
    pub team_total_points: i64,
}

/// Awards points to a student and credits the student's team.
///
/// Validation runs before the transaction opens. Inside the transaction the
/// award row is inserted and the team total is incremented by a relative
/// update; either both are committed or neither is.
///
/// # Errors
/// - [`Error::Validation`] for a blank description or non-positive points
/// - [`Error::UserNotFound`] if the student or the awarder does not exist
/// - [`Error::NotAStudent`] / [`Error::TeamMismatch`] if the target is not a
///   student of the team
/// - [`Error::Database`] if the transaction fails
#[instrument(skip(db), fields(user_id = request.user_id, team_id = request.team_id))]
pub async fn award_points_to_student(
    db: &DatabaseConnection,
    request: AwardPointsRequest,
) -> Result<AwardOutcome> {
    request.validate()?;

    let awarder = user::get_user_by_id(db, request.awarded_by_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: request.awarded_by_id.to_string(),
        })?;
    let validation::ValidatedStudent { student, team } =
        validation::validate_student(db, request.user_id, request.team_id).await?;

    let txn = db.begin().await?;

    let award = manual_points_award::ActiveModel {
        user_id: Set(student.id),
        team_id: Set(team.id),
        points: Set(request.points),
        description: Set(request.activity_description.trim().to_string()),
        awarded_by_id: Set(awarder.id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let updated_team = team::adjust_team_points_atomic(&txn, team.id, request.points).await?;

    txn.commit().await?;

    info!(
        award_id = award.id,
        points = award.points,
        awarded_by = awarder.id,
        team_total = updated_team.total_points,
        "Points awarded"
    );

    Ok(AwardOutcome {
        record: AwardRecord {
            award,
            student_name: student.name,
            team_name: updated_team.name,
            awarded_by_name: awarder.name,
        },
        team_total_points: updated_team.total_points,
    })
}

/// Deletes an award and subtracts its points from the team in one transaction.
///
/// # Errors
/// - [`Error::AwardNotFound`] if no award has this id
/// - [`Error::Database`] if the transaction fails
#[instrument(skip(db))]
pub async fn delete_points_award(
    db: &DatabaseConnection,
    award_id: i64,
) -> Result<manual_points_award::Model> {
    let txn = db.begin().await?;

    let award = ManualPointsAward::find_by_id(award_id)
        .one(&txn)
        .await?
        .ok_or(Error::AwardNotFound { id: award_id })?;

    ManualPointsAward::delete_by_id(award.id).exec(&txn).await?;

    let updated_team = team::adjust_team_points_atomic(&txn, award.team_id, -award.points).await?;

    txn.commit().await?;

    info!(
        award_id,
        points = award.points,
        team_total = updated_team.total_points,
        "Points award deleted"
    );
    Ok(award)
}

/// Retrieves a single award by id.
pub async fn get_award_by_id(
    db: &DatabaseConnection,
    award_id: i64,
) -> Result<Option<manual_points_award::Model>> {
    ManualPointsAward::find_by_id(award_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every award issued by `awarder_id`, newest first, with display names.
pub async fn get_points_history(
    db: &DatabaseConnection,
    awarder_id: i64,
) -> Result<Vec<AwardRecord>> {
    let awards = ManualPointsAward::find()
        .filter(manual_points_award::Column::AwardedById.eq(awarder_id))
        .order_by_desc(manual_points_award::Column::CreatedAt)
        .order_by_desc(manual_points_award::Column::Id)
        .all(db)
        .await?;

    let user_ids: HashSet<i64> = awards
        .iter()
        .flat_map(|award| [award.user_id, award.awarded_by_id])
        .collect();
    let team_ids: HashSet<i64> = awards.iter().map(|award| award.team_id).collect();

    let user_names = load_user_names(db, user_ids).await?;
    let team_names = load_team_names(db, team_ids).await?;

    Ok(awards
        .into_iter()
        .map(|award| AwardRecord {
            student_name: display_name(&user_names, award.user_id),
            team_name: display_name(&team_names, award.team_id),
            awarded_by_name: display_name(&user_names, award.awarded_by_id),
            award,
        })
        .collect())
}
