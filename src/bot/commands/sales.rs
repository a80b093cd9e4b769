//! Sales Discord commands - `sell_product`, `sales_history` and `restock`.
//!
//! All three require a caller whose role may sell products.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, report_failure},
        core::{inventory, product, sales, team, user},
        entities::PaymentMethod,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Payment methods offered as slash command choices.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PaymentChoice {
        #[name = "Cash"]
        Cash,
        #[name = "Card"]
        Card,
        #[name = "Check"]
        Check,
        #[name = "Online"]
        Online,
    }

    impl From<PaymentChoice> for PaymentMethod {
        fn from(choice: PaymentChoice) -> Self {
            match choice {
                PaymentChoice::Cash => Self::Cash,
                PaymentChoice::Card => Self::Card,
                PaymentChoice::Check => Self::Check,
                PaymentChoice::Online => Self::Online,
            }
        }
    }

    /// Parses a money amount such as `"12.50"` or `"$12.50"`.
    pub(crate) fn parse_amount(raw: &str) -> Result<Decimal> {
        let cleaned = raw.trim().trim_start_matches('$').trim();
        Decimal::from_str(cleaned)
            .map_err(|_| Error::validation(format!("'{raw}' is not a valid amount")))
    }

    /// Sells a product to a student and credits the student's team.
    #[poise::command(slash_command)]
    #[allow(clippy::too_many_arguments)]
    pub async fn sell_product(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product being sold"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Student buying the product"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        student: String,
        #[description = "Team the student belongs to"]
        #[autocomplete = "autocomplete::autocomplete_team_name"]
        team: String,
        #[description = "Size to sell"]
        #[autocomplete = "autocomplete::autocomplete_size"]
        size: String,
        #[description = "Number of units"] quantity: i32,
        #[description = "How the student paid"] payment: PaymentChoice,
        #[description = "Amount charged (defaults to price x quantity)"] amount_paid: Option<
            String,
        >,
    ) -> Result<()> {
        let order = SaleArgs {
            product,
            student,
            team,
            size,
            quantity,
            payment: payment.into(),
            amount_paid,
        };

        match sell(ctx, order).await {
            Ok(outcome) => {
                let record = &outcome.record;
                ctx.say(format!(
                    "🛒 Sold {} x **{}** (size {}) to {} for ${:.2} via {}.\n\
                     {} earned **{}** points and now has **{}**. {} left in size {}. (Sale ID: {})",
                    record.sale.quantity,
                    record.product_name,
                    record.sale.size,
                    record.student_name,
                    record.sale.amount_paid,
                    record.sale.payment_method,
                    record.team_name,
                    record.sale.points_awarded,
                    outcome.team_total_points,
                    outcome.remaining_stock,
                    record.sale.size,
                    record.sale.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    struct SaleArgs {
        product: String,
        student: String,
        team: String,
        size: String,
        quantity: i32,
        payment: PaymentMethod,
        amount_paid: Option<String>,
    }

    async fn sell(
        ctx: poise::Context<'_, BotData, Error>,
        args: SaleArgs,
    ) -> Result<sales::SaleOutcome> {
        let db = &ctx.data().database;
        let caller = user::authorize_caller(
            db,
            &ctx.author().id.to_string(),
            user::Permission::SellProducts,
        )
        .await?;

        let amount_paid = args.amount_paid.as_deref().map(parse_amount).transpose()?;

        let product = product::get_product_by_name(db, args.product.trim())
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                name: args.product.clone(),
            })?;
        let student = user::get_user_by_name(db, args.student.trim())
            .await?
            .ok_or_else(|| Error::UserNotFound {
                id: args.student.clone(),
            })?;
        let team = team::get_team_by_name(db, args.team.trim())
            .await?
            .ok_or_else(|| Error::TeamNotFound {
                id: args.team.clone(),
            })?;

        sales::sell_product_to_student(
            db,
            sales::SellProductRequest {
                product_id: product.id,
                user_id: student.id,
                team_id: team.id,
                size: args.size.trim().to_string(),
                quantity: args.quantity,
                payment_method: args.payment,
                amount_paid,
                sold_by_id: caller.id,
            },
        )
        .await
    }

    /// Lists the most recent sales you have recorded.
    #[poise::command(slash_command)]
    pub async fn sales_history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        const SHOWN: usize = 10;
        let db = &ctx.data().database;

        let caller = match user::authorize_caller(
            db,
            &ctx.author().id.to_string(),
            user::Permission::SellProducts,
        )
        .await
        {
            Ok(caller) => caller,
            Err(e) => return report_failure(ctx, e).await,
        };

        let history = sales::get_sales_history(db, caller.id).await?;
        if history.is_empty() {
            ctx.say("You haven't recorded any sales yet. Use `/sell_product` to get started!")
                .await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = history
            .iter()
            .take(SHOWN)
            .map(|record| {
                (
                    format!(
                        "#{} • {} x {} ({})",
                        record.sale.id,
                        record.sale.quantity,
                        record.product_name,
                        record.sale.size
                    ),
                    format!(
                        "{} ({}) paid ${:.2} by {} for {} pts on {}",
                        record.student_name,
                        record.team_name,
                        record.sale.amount_paid,
                        record.sale.payment_method,
                        record.sale.points_awarded,
                        record.sale.sold_at.format("%Y-%m-%d %H:%M")
                    ),
                    false,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("**Sales recorded by {}**", caller.name))
            .description(format!("Showing {} of {} sales", fields.len(), history.len()))
            .color(0x2ECC71)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Adds stock for one size of a product.
    #[poise::command(slash_command)]
    pub async fn restock(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to restock"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Size label, e.g. M"] size: String,
        #[description = "Units to add"] quantity: i32,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let result = async {
            let caller = user::authorize_caller(
                db,
                &ctx.author().id.to_string(),
                user::Permission::SellProducts,
            )
            .await?;
            let found = product::get_product_by_name(db, product.trim())
                .await?
                .ok_or_else(|| Error::ProductNotFound {
                    name: product.clone(),
                })?;
            let row = inventory::restock_inventory(db, found.id, &size, quantity).await?;
            tracing::info!(
                product_id = found.id,
                size = %row.size,
                quantity,
                restocked_by = caller.id,
                "Inventory restocked via bot"
            );
            Ok::<_, Error>((found, row))
        }
        .await;

        match result {
            Ok((found, row)) => {
                ctx.say(format!(
                    "📦 Added {} to **{}** size {}. Now in stock: **{}**.",
                    quantity, found.name, row.size, row.quantity
                ))
                .await?;
                Ok(())
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
