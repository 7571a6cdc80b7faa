//! Telegram adapter: command definitions, the dispatch tree, and the
//! `ChatTransport` implementation the core router replies through.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::BotCommands;
use tracing::warn;
use weatherbot_core::{Button, ChatTransport, Router};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "greeting and usage")]
    Start,
    #[command(description = "pick a weather report for a city")]
    Weather(String),
    #[command(description = "hourly weather for a city")]
    Hourly(String),
}

/// The event-pattern → handler mapping, built once at startup and handed to
/// the dispatcher.
pub fn handler_tree() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    router: Arc<Router>,
) -> anyhow::Result<()> {
    let transport = TelegramTransport { bot };
    let chat_id = msg.chat.id.0;

    match cmd {
        Command::Start => router.handle_start(&transport, chat_id).await,
        Command::Weather(city) => router.handle_weather(&transport, chat_id, &city).await,
        Command::Hourly(city) => router.handle_hourly(&transport, chat_id, &city).await,
    }
}

async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    router: Arc<Router>,
) -> anyhow::Result<()> {
    let transport = TelegramTransport { bot };

    let (Some(data), Some(message)) = (query.data.as_deref(), query.message.as_ref()) else {
        // Nothing to dispatch, but the press still has to be confirmed.
        warn!("callback query without data or originating message");
        return transport.acknowledge(&query.id).await;
    };

    let chat_id = message.chat().id.0;
    router
        .handle_callback(&transport, chat_id, &query.id, data)
        .await
}

struct TelegramTransport {
    bot: Bot,
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Button],
    ) -> anyhow::Result<()> {
        let request = self.bot.send_message(ChatId(chat_id), text);

        if buttons.is_empty() {
            request.await?;
        } else {
            let rows: Vec<Vec<InlineKeyboardButton>> = buttons
                .iter()
                .map(|b| vec![InlineKeyboardButton::callback(b.label.clone(), b.payload.clone())])
                .collect();
            request.reply_markup(InlineKeyboardMarkup::new(rows)).await?;
        }

        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> anyhow::Result<()> {
        self.bot.answer_callback_query(callback_id.to_string()).await?;
        Ok(())
    }
}
