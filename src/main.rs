use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{error, info};

use food_ticket_bot::bot::{self, TicketBot};
use food_ticket_bot::config::BotConfig;
use food_ticket_bot::dialogue::TicketDialogueState;
use food_ticket_bot::localization::init_localization;
use food_ticket_bot::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting food ticket bot");

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        api_base_url = %config.api_base_url,
        qr_source = ?config.qr_source,
        language = %config.default_language,
        "Configuration loaded"
    );

    init_localization()?;

    let bot = Bot::new(config.telegram_bot_token.clone());

    // Verify the credential before polling
    let me = match bot.get_me().await {
        Ok(me) => me,
        Err(e) => {
            error!(error = %e, "Failed to verify bot token");
            return Err(e.into());
        }
    };
    info!(
        username = %me.user.username.as_deref().unwrap_or_default(),
        "Bot verified"
    );

    let ticket_bot = Arc::new(TicketBot::new(&config)?);

    let handler = dptree::entry().branch(
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<TicketDialogueState>, TicketDialogueState>()
            .endpoint(bot::message_handler),
    );

    info!("Starting polling");

    // A single distribution key: updates are handled strictly one at a time
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<TicketDialogueState>::new(), ticket_bot])
        .distribution_function(|_| Some(()))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");

    Ok(())
}
