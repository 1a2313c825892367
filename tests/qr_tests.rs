//! # QR Image Source Tests

use mockito::Server;

use food_ticket_bot::errors::QrError;
use food_ticket_bot::qr::{render_png, QrImageSource, QrSource};

#[tokio::test]
async fn test_fetch_returns_raw_bytes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/media/qr/7.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(b"not really a png")
        .create_async()
        .await;

    let source = QrImageSource::new(QrSource::Fetch, None).unwrap();
    let bytes = source
        .png_for(&format!("{}/media/qr/7.png", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, b"not really a png");
}

#[tokio::test]
async fn test_fetch_non_200_is_status_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/media/qr/gone.png")
        .with_status(410)
        .create_async()
        .await;

    let source = QrImageSource::new(QrSource::Fetch, None).unwrap();
    let err = source
        .png_for(&format!("{}/media/qr/gone.png", server.url()))
        .await
        .unwrap_err();
    assert!(matches!(err, QrError::Status(410)));
}

#[tokio::test]
async fn test_fetch_unreachable_is_download_error() {
    let source = QrImageSource::new(QrSource::Fetch, None).unwrap();
    let err = source.png_for("http://127.0.0.1:1/qr.png").await.unwrap_err();
    assert!(matches!(err, QrError::Download(_)));
}

#[tokio::test]
async fn test_generate_matches_direct_render() {
    let url = "https://tickets.example.com/media/qr/7.png";
    let source = QrImageSource::new(QrSource::Generate, None).unwrap();
    assert_eq!(source.source(), QrSource::Generate);

    let png = source.png_for(url).await.unwrap();
    assert_eq!(png, render_png(url).unwrap());
}

#[test]
fn test_payload_too_large_is_encode_error() {
    let huge = "x".repeat(8000);
    assert!(matches!(render_png(&huge), Err(QrError::Encode(_))));
}
