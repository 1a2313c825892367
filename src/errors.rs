//! # Error Types Module
//!
//! Error types used by the ticket bot: configuration loading, the ticketing
//! API client and QR image acquisition. Handlers wrap these in `anyhow`.

/// Errors raised while reading the startup configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent or blank
    #[error("{0} must be set")]
    Missing(&'static str),
    /// An optional variable holds a value that cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Errors returned by the ticketing API client
#[derive(Debug, thiserror::Error)]
pub enum TicketApiError {
    /// The request never produced a response (DNS, connect, body read)
    #[error("ticket API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with anything other than 200
    #[error("ticket API returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The 200 body is not JSON or lacks a required field
    #[error("ticket API response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while obtaining a ticket's QR image
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR image download failed: {0}")]
    Download(#[from] reqwest::Error),
    /// The image host answered with anything other than 200
    #[error("QR image host returned {0}")]
    Status(u16),
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("QR image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
