//! User business logic - Directory lookups and caller authorization.
//!
//! The ledger never trusts caller-supplied identities: the bot resolves the
//! Discord author through [`authorize_caller`] and passes the resulting user id
//! as `awarded_by_id` / `sold_by_id`.

use crate::{
    entities::{Role, User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::warn;

/// Input for [`create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Platform role
    pub role: Role,
    /// Team membership (required for students)
    pub team_id: Option<i64>,
    /// Discord user ID for bot callers
    pub discord_id: Option<String>,
}

/// Operations a caller can be authorized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Issue or delete manual points awards
    AwardPoints,
    /// Record product sales and restock inventory
    SellProducts,
}

impl Permission {
    /// Whether `role` grants this permission.
    #[must_use]
    pub const fn allows(self, role: Role) -> bool {
        match self {
            Self::AwardPoints => role.can_award_points(),
            Self::SellProducts => role.can_sell_products(),
        }
    }
}

/// Creates a user after validating the name and team membership.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - A student is created without a team
/// - The named team does not exist
/// - The insert fails (e.g., duplicate Discord id)
pub async fn create_user<C>(db: &C, new_user: NewUser) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if new_user.name.trim().is_empty() {
        return Err(Error::validation("User name cannot be empty"));
    }

    if new_user.role == Role::Student && new_user.team_id.is_none() {
        return Err(Error::validation("Students must belong to a team"));
    }

    if let Some(team_id) = new_user.team_id {
        crate::core::team::get_team_by_id(db, team_id)
            .await?
            .ok_or_else(|| Error::TeamNotFound {
                id: team_id.to_string(),
            })?;
    }

    let user = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        email: Set(new_user.email),
        role: Set(new_user.role),
        team_id: Set(new_user.team_id),
        discord_id: Set(new_user.discord_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    user.insert(db).await.map_err(Into::into)
}

/// Finds a user by unique ID.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by exact name.
///
/// # Errors
/// Returns [`Error::Validation`] if more than one user has that name.
pub async fn get_user_by_name<C>(db: &C, name: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    let mut matches = User::find()
        .filter(user::Column::Name.eq(name))
        .limit(2)
        .all(db)
        .await?;

    if matches.len() > 1 {
        return Err(Error::validation(format!(
            "More than one user is named '{name}'"
        )));
    }
    Ok(matches.pop())
}

/// Finds the user linked to a Discord account.
pub async fn get_user_by_discord_id<C>(db: &C, discord_id: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the students of a team, ordered by name.
pub async fn get_team_roster(db: &DatabaseConnection, team_id: i64) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::TeamId.eq(team_id))
        .filter(user::Column::Role.eq(Role::Student))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every student, ordered by name.
pub async fn get_all_students(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(Role::Student))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves a Discord caller to a user holding `permission`.
///
/// # Errors
/// Returns [`Error::PermissionDenied`] if the Discord account is not linked to
/// any user or the user's role does not grant `permission`.
pub async fn authorize_caller(
    db: &DatabaseConnection,
    discord_id: &str,
    permission: Permission,
) -> Result<user::Model> {
    let Some(caller) = get_user_by_discord_id(db, discord_id).await? else {
        warn!(discord_id, "Unlinked Discord account attempted a ledger command");
        return Err(Error::PermissionDenied {
            message: "your Discord account is not linked to a staff or coach profile".to_string(),
        });
    };

    if !permission.allows(caller.role) {
        warn!(
            user_id = caller.id,
            role = %caller.role,
            ?permission,
            "Caller lacks permission"
        );
        return Err(Error::PermissionDenied {
            message: format!("a {} cannot perform this action", caller.role),
        });
    }

    Ok(caller)
}
