//! # Food Ticket Telegram Bot
//!
//! A Telegram bot that asks users for their national ID, looks their food
//! tickets up in the ticketing API and replies with one QR code photo per
//! ticket.

pub mod api;
pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod logging;
pub mod qr;

