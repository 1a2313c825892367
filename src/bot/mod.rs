//! Bot module for the food ticket bot
//!
//! This module is split into several submodules:
//! - `message_handler`: Routes incoming messages and runs the ticket lookup flow
//! - `transport`: The outbound reply seam and its Telegram implementation
//! - `ui_builder`: Creates keyboards and formats messages

pub mod message_handler;
pub mod transport;
pub mod ui_builder;

// Re-export main handler types for use in main.rs
pub use message_handler::{message_handler, TicketBot};
pub use transport::{ChatReplier, IncomingMessage, TelegramReplier};
