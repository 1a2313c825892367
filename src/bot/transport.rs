//! Outbound side of the bot: how replies reach the chat.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, KeyboardMarkup, MessageId, ReplyParameters, UserId};

/// The parts of an incoming Telegram message the handlers look at
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub message_id: MessageId,
    pub text: Option<String>,
    pub language_code: Option<String>,
}

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id,
            user_id: msg.from.as_ref().map(|user| user.id),
            message_id: msg.id,
            text: msg.text().map(str::to_string),
            language_code: msg.from.as_ref().and_then(|user| user.language_code.clone()),
        }
    }
}

/// Sends replies threaded to an incoming message
#[async_trait]
pub trait ChatReplier: Send + Sync {
    async fn reply_text(&self, to: &IncomingMessage, text: &str) -> Result<()>;

    async fn reply_with_keyboard(
        &self,
        to: &IncomingMessage,
        text: &str,
        keyboard: KeyboardMarkup,
    ) -> Result<()>;

    async fn reply_photo(&self, to: &IncomingMessage, png: Vec<u8>, caption: &str) -> Result<()>;
}

/// [`ChatReplier`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramReplier {
    bot: Bot,
}

impl TelegramReplier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatReplier for TelegramReplier {
    async fn reply_text(&self, to: &IncomingMessage, text: &str) -> Result<()> {
        self.bot
            .send_message(to.chat_id, text)
            .reply_parameters(ReplyParameters::new(to.message_id))
            .await?;
        Ok(())
    }

    async fn reply_with_keyboard(
        &self,
        to: &IncomingMessage,
        text: &str,
        keyboard: KeyboardMarkup,
    ) -> Result<()> {
        self.bot
            .send_message(to.chat_id, text)
            .reply_parameters(ReplyParameters::new(to.message_id))
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn reply_photo(&self, to: &IncomingMessage, png: Vec<u8>, caption: &str) -> Result<()> {
        let photo = InputFile::memory(png).file_name("qr.png");
        self.bot
            .send_photo(to.chat_id, photo)
            .caption(caption)
            .reply_parameters(ReplyParameters::new(to.message_id))
            .await?;
        Ok(())
    }
}
