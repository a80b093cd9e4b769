//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for command parameters like
//! product, team and student names, so callers pick from values the ledger
//! actually knows instead of typing them out.

use crate::{
    bot::BotData,
    core::{product, team, user},
    errors::Error,
};

/// Discord caps autocomplete responses at 25 choices.
const MAX_CHOICES: usize = 25;

fn filter_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort();
    matching.truncate(MAX_CHOICES);
    matching
}

/// Provides autocomplete suggestions for active product names.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
///
/// # Returns
/// Product names that contain the partial input, case-insensitively
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(products) = product::get_all_active_products(db).await else {
        return Vec::new();
    };

    filter_names(products.into_iter().map(|prod| prod.name), partial)
}

/// Provides autocomplete suggestions for team names.
pub async fn autocomplete_team_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(teams) = team::get_all_teams(db).await else {
        return Vec::new();
    };

    filter_names(teams.into_iter().map(|t| t.name), partial)
}

/// Provides autocomplete suggestions for student names.
///
/// Only users with the student role are offered, since awards and sales
/// reject anyone else.
pub async fn autocomplete_student_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(students) = user::get_all_students(db).await else {
        return Vec::new();
    };

    filter_names(students.into_iter().map(|s| s.name), partial)
}

/// Provides autocomplete suggestions for the sizes of the product already
/// entered in the same command.
///
/// Sizes with no stock are left out. Returns nothing until the `product`
/// option has been filled in.
pub async fn autocomplete_size(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let poise::Context::Application(app_ctx) = ctx else {
        return Vec::new();
    };
    let Some(product_name) = app_ctx
        .interaction
        .data
        .options
        .iter()
        .find(|option| option.name == "product")
        .and_then(|option| option.value.as_str())
        .map(str::to_string)
    else {
        return Vec::new();
    };

    let db = &ctx.data().database;
    let Ok(Some(found)) = product::get_product_by_name(db, product_name.trim()).await else {
        return Vec::new();
    };
    let Ok(rows) = product::get_inventory_for_product(db, found.id).await else {
        return Vec::new();
    };

    filter_names(
        rows.into_iter()
            .filter(|row| row.quantity > 0)
            .map(|row| row.size),
        partial,
    )
}
