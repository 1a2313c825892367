//! # Ticket API Module
//!
//! Client for the ticketing backend. A user is looked up by national ID and
//! the backend answers with the user's name and their food tickets.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::TicketApiError;

/// A user's tickets as returned by `POST /user-tickets/`
#[derive(Debug, Clone, Deserialize)]
pub struct UserTickets {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub tickets: Vec<Ticket>,
}

impl UserTickets {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub status: TicketStatus,
    pub ticket_type: TicketType,
    pub qr_code_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketType {
    pub title: String,
}

/// Ticket status. Only the literal `"valid"` counts as valid; every other
/// value the backend sends is treated as used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TicketStatus {
    Valid,
    Used,
}

impl From<String> for TicketStatus {
    fn from(status: String) -> Self {
        if status == "valid" {
            TicketStatus::Valid
        } else {
            TicketStatus::Used
        }
    }
}

#[derive(Debug, Serialize)]
struct UserTicketsRequest<'a> {
    id_number: &'a str,
}

/// HTTP client for the ticketing API
#[derive(Debug, Clone)]
pub struct TicketApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl TicketApiClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TicketApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn user_tickets_url(&self) -> String {
        format!("{}/user-tickets/", self.base_url)
    }

    /// Look up the tickets registered for a national ID.
    ///
    /// The ID is forwarded exactly as typed. Only HTTP 200 counts as success;
    /// any other status is returned as [`TicketApiError::Status`] together
    /// with the response body.
    pub async fn fetch_user_tickets(&self, id_number: &str) -> Result<UserTickets, TicketApiError> {
        let url = self.user_tickets_url();
        debug!(url = %url, "Requesting user tickets");

        let response = self
            .client
            .post(&url)
            .json(&UserTicketsRequest { id_number })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(TicketApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let user: UserTickets = serde_json::from_str(&body)?;
        info!(
            username = %user.username,
            tickets = user.tickets.len(),
            "Received tickets for user"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_status_parsing() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"status": "valid", "ticket_type": {"title": "Lunch"}, "qr_code_url": "http://qr/1"}"#,
        )
        .unwrap();
        assert_eq!(ticket.status, TicketStatus::Valid);

        for other in ["used", "expired", "VALID", ""] {
            let json = format!(
                r#"{{"status": "{other}", "ticket_type": {{"title": "Lunch"}}, "qr_code_url": "u"}}"#
            );
            let ticket: Ticket = serde_json::from_str(&json).unwrap();
            assert_eq!(ticket.status, TicketStatus::Used, "status {other:?}");
        }
    }

    #[test]
    fn test_missing_field_is_a_parse_error() {
        let result: Result<UserTickets, _> =
            serde_json::from_str(r#"{"first_name": "Ali", "last_name": "Rezaei", "tickets": []}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn test_full_name() {
        let user: UserTickets = serde_json::from_str(
            r#"{"first_name": "Ali", "last_name": "Rezaei", "username": "ali", "tickets": []}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Ali Rezaei");
        assert!(user.tickets.is_empty());
    }

    #[test]
    fn test_user_tickets_url_trims_trailing_slash() {
        let client = TicketApiClient::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(client.user_tickets_url(), "http://localhost:8000/api/user-tickets/");
    }
}
