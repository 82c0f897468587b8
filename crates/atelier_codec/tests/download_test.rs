//! Downloader behavior against a local HTTP server.

use atelier_codec::Downloader;
use atelier_error::{AtelierErrorKind, CodecErrorKind};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Serve one canned HTTP response on an ephemeral port, returning the URL
/// to fetch it from.
async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).await;
        let response = [
            format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .into_bytes(),
            body,
        ]
        .concat();
        let _ = stream.write_all(&response).await;
        let _ = stream.shutdown().await;
    });
    format!("http://{addr}/result")
}

fn codec_kind(error: &atelier_error::AtelierError) -> &CodecErrorKind {
    match error.kind() {
        AtelierErrorKind::Codec(e) => &e.kind,
        other => panic!("expected a codec error, got {other}"),
    }
}

#[tokio::test]
async fn valid_media_returns_bytes_and_sniffed_mime() {
    let url = serve_once("200 OK", PNG_HEADER.to_vec()).await;
    let (bytes, mime) = Downloader::new()
        .download(&url, Duration::from_secs(5))
        .await
        .expect("download succeeds");
    assert_eq!(bytes, PNG_HEADER);
    assert_eq!(mime, "image/png");
}

#[tokio::test]
async fn non_success_status_surfaces_the_code() {
    let url = serve_once("404 Not Found", b"gone".to_vec()).await;
    let error = Downloader::new()
        .download(&url, Duration::from_secs(5))
        .await
        .expect_err("404 must fail");
    assert_eq!(codec_kind(&error), &CodecErrorKind::DownloadError { status: 404 });
}

#[tokio::test]
async fn html_body_is_rejected_as_invalid_content() {
    let body = b"<!DOCTYPE html><html><body>expired link</body></html>".to_vec();
    let url = serve_once("200 OK", body).await;
    let error = Downloader::new()
        .download(&url, Duration::from_secs(5))
        .await
        .expect_err("HTML body must fail");
    assert!(matches!(codec_kind(&error), CodecErrorKind::InvalidContent(_)));
}

#[tokio::test]
async fn unrecognized_signature_is_rejected() {
    let url = serve_once("200 OK", b"plain text, not media".to_vec()).await;
    let error = Downloader::new()
        .download(&url, Duration::from_secs(5))
        .await
        .expect_err("unknown signature must fail");
    assert!(matches!(codec_kind(&error), CodecErrorKind::InvalidContent(_)));
}
