//! # QR Image Module
//!
//! Every ticket carries a `qr_code_url`. Depending on [`QrSource`] the bot
//! either downloads the image behind that URL, or renders a fresh QR code
//! whose payload is the URL string itself. Either way the result is PNG
//! bytes ready to be sent as a photo.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use reqwest::StatusCode;
use std::io::Cursor;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::errors::QrError;

/// Pixels per QR module
pub const MODULE_SIZE: u32 = 10;

/// How ticket QR images are obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QrSource {
    /// Download the image served at the ticket's URL
    #[default]
    Fetch,
    /// Encode the ticket's URL string into a new QR code
    Generate,
}

impl FromStr for QrSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fetch" => Ok(QrSource::Fetch),
            "generate" => Ok(QrSource::Generate),
            other => Err(format!("unknown QR source: {other}")),
        }
    }
}

/// Produces PNG bytes for a ticket's QR code
#[derive(Debug, Clone)]
pub struct QrImageSource {
    source: QrSource,
    client: reqwest::Client,
}

impl QrImageSource {
    pub fn new(source: QrSource, timeout: Option<Duration>) -> Result<Self, QrError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            source,
            client: builder.build()?,
        })
    }

    pub fn source(&self) -> QrSource {
        self.source
    }

    /// PNG bytes for the QR code behind `qr_code_url`
    pub async fn png_for(&self, qr_code_url: &str) -> Result<Vec<u8>, QrError> {
        match self.source {
            QrSource::Fetch => self.fetch(qr_code_url).await,
            QrSource::Generate => render_png(qr_code_url),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, QrError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(QrError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, size = bytes.len(), "QR image downloaded");
        Ok(bytes.to_vec())
    }
}

/// Render `data` as a QR code PNG: low error correction, the smallest
/// version that fits, 10px modules and a 4-module quiet zone.
pub fn render_png(data: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)?;
    let bitmap = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_SIZE, MODULE_SIZE)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(bitmap).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_qr_source_parsing() {
        assert_eq!("fetch".parse::<QrSource>().unwrap(), QrSource::Fetch);
        assert_eq!(" Generate ".parse::<QrSource>().unwrap(), QrSource::Generate);
        assert!("download".parse::<QrSource>().is_err());
        assert_eq!(QrSource::default(), QrSource::Fetch);
    }

    #[test]
    fn test_render_png_produces_png() {
        let png = render_png("https://tickets.example.com/qr/42").unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_png_dimensions() {
        // Short payloads fit version 1: 21 modules plus 4 on each side
        let png = render_png("ticket-1").unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        let side = (21 + 2 * 4) * MODULE_SIZE;
        assert_eq!(decoded.width(), side);
        assert_eq!(decoded.height(), side);
    }

    #[tokio::test]
    async fn test_generate_source_needs_no_network() {
        let source = QrImageSource::new(QrSource::Generate, None).unwrap();
        let png = source.png_for("http://127.0.0.1:1/unreachable.png").await.unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }
}
