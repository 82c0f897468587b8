//! Validated media downloads.

use crate::{looks_like_html, sniff_format};
use atelier_error::{AtelierResult, CodecError, CodecErrorKind};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// HTTP downloader for provider result media.
///
/// Wraps a shared [`reqwest::Client`] and rejects anything that is not
/// recognizable media: non-2xx statuses become
/// [`DownloadError`](CodecErrorKind::DownloadError), HTML bodies and unknown
/// signatures become [`InvalidContent`](CodecErrorKind::InvalidContent).
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Create a downloader with a fresh client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Fetch `url` and return the body with its sniffed mime type.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str, timeout: Duration) -> AtelierResult<(Vec<u8>, String)> {
        debug!("Downloading result media");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Download request failed");
                CodecError::new(CodecErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Download returned non-success status");
            return Err(CodecError::new(CodecErrorKind::DownloadError {
                status: status.as_u16(),
            }))?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CodecError::new(CodecErrorKind::Transport(e.to_string())))?
            .to_vec();

        if looks_like_html(&bytes) {
            error!("Download body is an HTML page, not media");
            return Err(CodecError::new(CodecErrorKind::InvalidContent(
                "body is an HTML page".to_string(),
            )))?;
        }

        let mime = sniff_format(&bytes).ok_or_else(|| {
            error!("Download body has no recognized media signature");
            CodecError::new(CodecErrorKind::InvalidContent(
                "no recognized media signature".to_string(),
            ))
        })?;

        debug!(mime, len = bytes.len(), "Download complete");
        Ok((bytes, mime.to_string()))
    }
}
