//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Phi Points Help**\n\
        Here is a summary of all available commands.\n\n\
        **Points (coaches, staff, admins)**\n\
        • `/award_points <student> <team> <points> <activity>` - Awards points to a student's team.\n\
        • `/delete_award <award_id>` - Deletes an award and removes its points from the team.\n\
        • `/points_history` - Lists the awards you have issued.\n\n\
        **Sales (staff, admins)**\n\
        • `/sell_product <product> <student> <team> <size> <quantity> <payment> [amount_paid]` - Records a sale.\n\
        • `/sales_history` - Lists the sales you have recorded.\n\
        • `/restock <product> <size> <quantity>` - Adds stock for a size.\n\n\
        **Everyone**\n\
        • `/products` - Lists products with prices, points and stock.\n\
        • `/standings` - Shows team points standings.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
