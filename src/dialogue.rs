//! Ticket dialogue module for tracking the "awaiting national ID" state.
//!
//! After a user presses the ticket button the chat's dialogue moves to
//! `AwaitingId`. The next text message from that chat exits the dialogue and
//! is treated as the ID, unless the wait has outlived the configured timeout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Represents the conversation state for the ticket lookup
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TicketDialogueState {
    #[default]
    Idle,
    AwaitingId {
        requested_at: DateTime<Utc>,
    },
}

/// Type alias for our ticket dialogue
pub type TicketDialogue = Dialogue<TicketDialogueState, InMemStorage<TicketDialogueState>>;

/// Whether a wait that started at `requested_at` has timed out at `now`
pub fn is_expired(requested_at: DateTime<Utc>, now: DateTime<Utc>, timeout: Duration) -> bool {
    // A clock that went backwards never expires a wait
    match (now - requested_at).to_std() {
        Ok(elapsed) => elapsed >= timeout,
        Err(_) => false,
    }
}
