//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{detect_language, get_localization_manager, is_supported_language, t_lang};

use crate::api::{Ticket, TicketApiClient};
use crate::config::BotConfig;
use crate::dialogue::{is_expired, TicketDialogue, TicketDialogueState};
use crate::errors::{QrError, TicketApiError};
use crate::qr::QrImageSource;

use super::transport::{ChatReplier, IncomingMessage, TelegramReplier};
use super::ui_builder::{create_ticket_keyboard, format_ticket_caption, format_user_info};

/// Whether `text` is the `/start` command, with or without a bot mention
/// or deep-link payload
pub fn is_start_command(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(command) => command == "/start" || command.starts_with("/start@"),
        None => false,
    }
}

/// Whether `text` is the ticket button label in any supported language
pub fn is_ticket_button(text: &str) -> bool {
    get_localization_manager().is_some_and(|manager| manager.matches_label("ticket-button", text))
}

/// Routes incoming messages and runs the ticket lookup flow
pub struct TicketBot {
    api: TicketApiClient,
    qr: QrImageSource,
    pending_id_timeout: Duration,
    default_language: &'static str,
}

impl TicketBot {
    pub fn new(config: &BotConfig) -> Result<Self> {
        Ok(Self {
            api: TicketApiClient::new(&config.api_base_url, config.api_timeout)?,
            qr: QrImageSource::new(config.qr_source, config.api_timeout)?,
            pending_id_timeout: config.pending_id_timeout,
            default_language: detect_language(Some(&config.default_language)),
        })
    }

    /// Reply language: the sender's own if we have it, otherwise the default
    fn language_for(&self, msg: &IncomingMessage) -> &'static str {
        match msg.language_code.as_deref() {
            Some(code) if is_supported_language(code) => detect_language(Some(code)),
            _ => self.default_language,
        }
    }

    /// Handle one incoming message. Every failure is logged and, where the
    /// flow calls for it, reported to the user; nothing is propagated.
    pub async fn handle_message(
        &self,
        replier: &dyn ChatReplier,
        msg: &IncomingMessage,
        dialogue: &TicketDialogue,
    ) {
        let language_code = Some(self.language_for(msg));

        let Some(text) = msg.text.as_deref() else {
            debug!(
                chat_id = %msg.chat_id,
                user_id = msg.user_id.map(|id| id.0),
                "Received non-text message from user"
            );
            self.handle_fallback(replier, msg, language_code).await;
            return;
        };

        if self.take_pending(msg, dialogue).await {
            self.process_id_number(replier, msg, text, language_code).await;
        } else if is_start_command(text) {
            self.handle_start(replier, msg, language_code).await;
        } else if is_ticket_button(text) {
            self.handle_ticket_request(replier, msg, dialogue, language_code)
                .await;
        } else {
            self.handle_fallback(replier, msg, language_code).await;
        }
    }

    /// Leave the `AwaitingId` state, reporting whether the chat was waiting
    /// for an ID and the wait is still within the timeout
    async fn take_pending(&self, msg: &IncomingMessage, dialogue: &TicketDialogue) -> bool {
        let state = match dialogue.get().await {
            Ok(state) => state,
            Err(e) => {
                error!(chat_id = %msg.chat_id, error = %e, "Failed to read dialogue state");
                return false;
            }
        };

        match state {
            Some(TicketDialogueState::AwaitingId { requested_at }) => {
                if let Err(e) = dialogue.exit().await {
                    warn!(chat_id = %msg.chat_id, error = %e, "Failed to reset dialogue state");
                }
                if is_expired(requested_at, Utc::now(), self.pending_id_timeout) {
                    debug!(chat_id = %msg.chat_id, "Pending ID request expired");
                    return false;
                }
                true
            }
            Some(TicketDialogueState::Idle) | None => false,
        }
    }

    async fn handle_start(
        &self,
        replier: &dyn ChatReplier,
        msg: &IncomingMessage,
        language_code: Option<&str>,
    ) {
        info!(
            chat_id = %msg.chat_id,
            user_id = msg.user_id.map(|id| id.0),
            "Start command received"
        );

        let keyboard = create_ticket_keyboard(language_code);
        match replier
            .reply_with_keyboard(msg, &t_lang("welcome", language_code), keyboard)
            .await
        {
            Ok(()) => info!(chat_id = %msg.chat_id, "Welcome message sent"),
            Err(e) => error!(chat_id = %msg.chat_id, error = %e, "Failed to send welcome message"),
        }
    }

    async fn handle_ticket_request(
        &self,
        replier: &dyn ChatReplier,
        msg: &IncomingMessage,
        dialogue: &TicketDialogue,
        language_code: Option<&str>,
    ) {
        info!(
            chat_id = %msg.chat_id,
            user_id = msg.user_id.map(|id| id.0),
            "Ticket button pressed"
        );

        if let Err(e) = replier
            .reply_text(msg, &t_lang("ask-id-number", language_code))
            .await
        {
            error!(chat_id = %msg.chat_id, error = %e, "Failed to send ID prompt");
            return;
        }

        let state = TicketDialogueState::AwaitingId {
            requested_at: Utc::now(),
        };
        match dialogue.update(state).await {
            Ok(()) => debug!(chat_id = %msg.chat_id, "Waiting for national ID"),
            Err(e) => error!(chat_id = %msg.chat_id, error = %e, "Failed to store dialogue state"),
        }
    }

    async fn process_id_number(
        &self,
        replier: &dyn ChatReplier,
        msg: &IncomingMessage,
        id_number: &str,
        language_code: Option<&str>,
    ) {
        info!(
            chat_id = %msg.chat_id,
            user_id = msg.user_id.map(|id| id.0),
            "Processing national ID"
        );
        debug!(chat_id = %msg.chat_id, id_number = %id_number, "Forwarding national ID");

        let user = match self.api.fetch_user_tickets(id_number).await {
            Ok(user) => {
                info!(chat_id = %msg.chat_id, name = %user.full_name(), "Tickets found");
                user
            }
            Err(TicketApiError::Status { status, body }) => {
                error!(chat_id = %msg.chat_id, status, body = %body, "Ticket API returned an error");
                self.reply_or_log(replier, msg, &t_lang("error-fetch-failed", language_code))
                    .await;
                return;
            }
            Err(e) => {
                error!(chat_id = %msg.chat_id, error = %e, "Ticket lookup failed");
                self.reply_or_log(replier, msg, &t_lang("error-generic", language_code))
                    .await;
                return;
            }
        };

        if let Err(e) = replier
            .reply_text(msg, &format_user_info(&user, language_code))
            .await
        {
            error!(chat_id = %msg.chat_id, error = %e, "Failed to send user information");
            self.reply_or_log(replier, msg, &t_lang("error-generic", language_code))
                .await;
            return;
        }

        if user.tickets.is_empty() {
            info!(chat_id = %msg.chat_id, "User has no tickets");
            self.reply_or_log(replier, msg, &t_lang("no-tickets", language_code))
                .await;
            return;
        }

        // One ticket failing never stops the others
        for ticket in &user.tickets {
            self.send_ticket(replier, msg, ticket, language_code).await;
        }
    }

    async fn send_ticket(
        &self,
        replier: &dyn ChatReplier,
        msg: &IncomingMessage,
        ticket: &Ticket,
        language_code: Option<&str>,
    ) {
        let caption = format_ticket_caption(ticket, language_code);
        debug!(
            chat_id = %msg.chat_id,
            ticket = %ticket.ticket_type.title,
            qr_source = ?self.qr.source(),
            "Preparing QR code"
        );

        let result: Result<()> = async {
            let png = self.qr.png_for(&ticket.qr_code_url).await?;
            replier.reply_photo(msg, png, &caption).await
        }
        .await;

        match result {
            Ok(()) => info!(
                chat_id = %msg.chat_id,
                ticket = %ticket.ticket_type.title,
                "QR code sent"
            ),
            Err(e) => {
                error!(
                    chat_id = %msg.chat_id,
                    ticket = %ticket.ticket_type.title,
                    error = %e,
                    "Failed to send QR code"
                );
                let key = match e.downcast_ref::<QrError>() {
                    Some(QrError::Status(_)) => "error-qr-download",
                    _ => "error-qr-send",
                };
                self.reply_or_log(replier, msg, &t_lang(key, language_code))
                    .await;
            }
        }
    }

    async fn handle_fallback(
        &self,
        replier: &dyn ChatReplier,
        msg: &IncomingMessage,
        language_code: Option<&str>,
    ) {
        debug!(
            chat_id = %msg.chat_id,
            user_id = msg.user_id.map(|id| id.0),
            "Replying with ticket button hint"
        );
        self.reply_or_log(replier, msg, &t_lang("use-ticket-button", language_code))
            .await;
    }

    async fn reply_or_log(&self, replier: &dyn ChatReplier, msg: &IncomingMessage, text: &str) {
        if let Err(e) = replier.reply_text(msg, text).await {
            warn!(chat_id = %msg.chat_id, error = %e, "Failed to send reply");
        }
    }
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: TicketDialogue,
    ticket_bot: Arc<TicketBot>,
) -> Result<()> {
    let replier = TelegramReplier::new(bot);
    ticket_bot
        .handle_message(&replier, &IncomingMessage::from(&msg), &dialogue)
        .await;
    Ok(())
}
