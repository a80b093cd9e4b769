//! Bot layer - Discord-specific interface and command handlers
//!
//! This module exposes the ledger to coaches and staff as Discord slash
//! commands. Commands resolve the caller from their Discord account, coerce
//! the arguments into ledger requests, and render ledger errors as replies.

/// Discord command implementations (points, sales, catalog, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and any other global state
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Replies with the error if the caller can fix it, otherwise hands it to the
/// framework error handler.
///
/// # Errors
/// Returns `error` unchanged when it is not a client error, or a framework
/// error if the reply cannot be sent.
pub async fn report_failure(ctx: Context<'_>, error: Error) -> Result<()> {
    if error.kind().is_client_error() {
        warn!(
            command = %ctx.command().name,
            status = error.kind().http_status(),
            "Command rejected: {error}"
        );
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                status = error.kind().http_status(),
                "Error in command `{}`: {:?}",
                ctx.command().name,
                error
            );
            if let Err(e) = ctx
                .say("❌ Something went wrong while processing that command. Please try again later.")
                .await
            {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns an error if the client cannot be built or the gateway connection fails.
#[instrument(skip(token, database))]
pub async fn run_bot(token: String, database: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::award_points(),
                commands::delete_award(),
                commands::points_history(),
                commands::sell_product(),
                commands::sales_history(),
                commands::restock(),
                commands::products(),
                commands::standings(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
