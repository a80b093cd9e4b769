//! Points Discord commands - `award_points`, `delete_award` and `points_history`.
//!
//! The awarding user is always the command author; it is never taken from the
//! command arguments.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, report_failure},
        core::{points, team, user},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Awards points to a student and credits the student's team.
    #[poise::command(slash_command)]
    pub async fn award_points(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student receiving the points"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        student: String,
        #[description = "Team the student belongs to"]
        #[autocomplete = "autocomplete::autocomplete_team_name"]
        team: String,
        #[description = "Points to award (positive whole number)"] points: i64,
        #[description = "Activity the points are for"] activity: String,
    ) -> Result<()> {
        match award(ctx, &student, &team, points, activity).await {
            Ok(outcome) => {
                ctx.say(format!(
                    "✅ Awarded **{}** points to {} ({}) for \"{}\". {} now has **{}** points. (Award ID: {})",
                    outcome.record.award.points,
                    outcome.record.student_name,
                    outcome.record.team_name,
                    outcome.record.award.description,
                    outcome.record.team_name,
                    outcome.team_total_points,
                    outcome.record.award.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    async fn award(
        ctx: poise::Context<'_, BotData, Error>,
        student_name: &str,
        team_name: &str,
        points_value: i64,
        activity: String,
    ) -> Result<points::AwardOutcome> {
        let db = &ctx.data().database;
        let caller = user::authorize_caller(
            db,
            &ctx.author().id.to_string(),
            user::Permission::AwardPoints,
        )
        .await?;

        let student = user::get_user_by_name(db, student_name.trim())
            .await?
            .ok_or_else(|| Error::UserNotFound {
                id: student_name.to_string(),
            })?;
        let team = team::get_team_by_name(db, team_name.trim())
            .await?
            .ok_or_else(|| Error::TeamNotFound {
                id: team_name.to_string(),
            })?;

        points::award_points_to_student(
            db,
            points::AwardPointsRequest {
                user_id: student.id,
                team_id: team.id,
                points: points_value,
                activity_description: activity,
                awarded_by_id: caller.id,
            },
        )
        .await
    }

    /// Deletes a points award and removes its points from the team.
    #[poise::command(slash_command)]
    pub async fn delete_award(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of the award to delete"] award_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let caller = match user::authorize_caller(
            db,
            &ctx.author().id.to_string(),
            user::Permission::AwardPoints,
        )
        .await
        {
            Ok(caller) => caller,
            Err(e) => return report_failure(ctx, e).await,
        };

        match points::delete_points_award(db, award_id).await {
            Ok(award) => {
                tracing::info!(award_id, deleted_by = caller.id, "Award deleted via bot");
                ctx.say(format!(
                    "🗑️ Deleted award {} ({} points for \"{}\"). The points were removed from the team.",
                    award.id, award.points, award.description
                ))
                .await?;
                Ok(())
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Lists the most recent points awards you have issued.
    #[poise::command(slash_command)]
    pub async fn points_history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        const SHOWN: usize = 10;
        let db = &ctx.data().database;

        let caller = match user::authorize_caller(
            db,
            &ctx.author().id.to_string(),
            user::Permission::AwardPoints,
        )
        .await
        {
            Ok(caller) => caller,
            Err(e) => return report_failure(ctx, e).await,
        };

        let history = points::get_points_history(db, caller.id).await?;
        if history.is_empty() {
            ctx.say("You haven't awarded any points yet. Use `/award_points` to get started!")
                .await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = history
            .iter()
            .take(SHOWN)
            .map(|record| {
                (
                    format!(
                        "#{} • {} pts → {} ({})",
                        record.award.id,
                        record.award.points,
                        record.student_name,
                        record.team_name
                    ),
                    format!(
                        "{} - {}",
                        record.award.description,
                        record.award.created_at.format("%Y-%m-%d %H:%M")
                    ),
                    false,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("**Points awarded by {}**", caller.name))
            .description(format!(
                "Showing {} of {} awards",
                fields.len(),
                history.len()
            ))
            .color(0x0058_65F2)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
