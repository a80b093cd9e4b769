//! Read-only Discord commands - `products` and `standings`.
//!
//! These are open to every member of the server.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{product, team},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Lists active products with their price, points and stock per size.
    #[poise::command(slash_command)]
    pub async fn products(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let products = product::get_all_active_products(db).await?;

        if products.is_empty() {
            ctx.say("No products are for sale right now.").await?;
            return Ok(());
        }

        let mut fields = Vec::with_capacity(products.len());
        for prod in products {
            let rows = product::get_inventory_for_product(db, prod.id).await?;
            let stock = if rows.is_empty() {
                "no stock".to_string()
            } else {
                rows.iter()
                    .map(|row| format!("{}: {}", row.size, row.quantity))
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            let mut value = format!("${:.2} • {} pts each\nStock: {}", prod.price, prod.points, stock);
            if let Some(description) = prod.description.as_deref() {
                value = format!("{description}\n{value}");
            }
            fields.push((prod.name, value, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title("**Products**")
            .color(0x0058_65F2) // Discord purple
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows every team ranked by total points.
    #[poise::command(slash_command)]
    pub async fn standings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let teams = team::get_team_standings(db).await?;

        if teams.is_empty() {
            ctx.say("No teams have been registered yet.").await?;
            return Ok(());
        }

        let lines: Vec<String> = teams
            .iter()
            .enumerate()
            .map(|(rank, t)| format!("**{}.** {} - {} pts", rank + 1, t.name, t.total_points))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("**Team Standings**")
            .description(lines.join("\n"))
            .color(0xF1C40F);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
