//! HuggingFace Inference API driver for image upscaling.

use async_trait::async_trait;
use atelier_codec::{looks_like_html, sniff_format};
use atelier_core::{
    MediaReference, ProviderOutcome, ProviderSuccess, ScaleFactor, TransformKind, TransformParams,
    TransformRequest,
};
use atelier_error::{AtelierResult, ProviderError, ProviderErrorKind};
use atelier_interface::{InvocationMode, TransformDriver};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const API_BASE: &str = "https://api-inference.huggingface.co/models";
const TIMEOUT: Duration = Duration::from_secs(10);

/// HuggingFace serverless inference driver. Upscaling only.
///
/// The inference endpoint takes the raw image body and answers with raw
/// image bytes, so inputs must be inline; a URL reference cannot be
/// forwarded and is reported as unsupported, letting the gateway fall
/// through to a provider that accepts URLs.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    client: Client,
    api_token: String,
}

fn model_for(scale: ScaleFactor) -> &'static str {
    match scale {
        ScaleFactor::X2 => "nightmareai/real-esrgan",
        ScaleFactor::X4 => "stabilityai/stable-diffusion-x4-upscaler",
    }
}

impl HuggingFaceProvider {
    /// Create a driver bound to an API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.into(),
        }
    }
}

#[async_trait]
impl TransformDriver for HuggingFaceProvider {
    #[instrument(skip(self, request))]
    async fn invoke(&self, request: &TransformRequest) -> AtelierResult<ProviderOutcome> {
        let scale = match request.params_or_default() {
            TransformParams::Upscale { scale } => scale,
            other => {
                return Err(ProviderError::new(ProviderErrorKind::Unsupported(format!(
                    "HuggingFace serves upscaling only, not {}",
                    other.kind()
                ))))?;
            }
        };

        let (bytes, mime) = match &request.primary {
            MediaReference::InlineBytes { bytes, mime } => (bytes.clone(), mime.clone()),
            MediaReference::Url(_) => {
                return Err(ProviderError::new(ProviderErrorKind::Unsupported(
                    "HuggingFace inference takes an inline image body, not a URL".to_string(),
                )))?;
            }
        };

        let url = format!("{API_BASE}/{}", model_for(scale));
        debug!(url = %url, bytes = bytes.len(), "Sending inference request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", mime)
            .body(bytes)
            .timeout(TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(TIMEOUT.as_secs())
                } else {
                    ProviderError::new(ProviderErrorKind::Transport(format!(
                        "Request failed: {e}"
                    )))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Remote {
                status: Some(status),
                message,
            }))?;
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Transport(format!(
                    "Failed to read response body: {e}"
                )))
            })?
            .to_vec();

        if body.is_empty() || looks_like_html(&body) {
            return Err(ProviderError::new(ProviderErrorKind::EmptyOutput))?;
        }
        let out_mime = sniff_format(&body).ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Parse(
                "Response body is not a recognized image format".to_string(),
            ))
        })?;

        Ok(ProviderOutcome::Resolved(ProviderSuccess {
            media: MediaReference::InlineBytes {
                bytes: body,
                mime: out_mime.to_string(),
            },
            provider: self.name().to_string(),
            attribution: Some(model_for(scale).to_string()),
        }))
    }

    fn name(&self) -> &str {
        "HuggingFace"
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    fn mode(&self) -> InvocationMode {
        InvocationMode::SyncCall
    }

    fn supports(&self, kind: TransformKind) -> bool {
        kind == TransformKind::Upscale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_selects_the_model() {
        assert_eq!(model_for(ScaleFactor::X2), "nightmareai/real-esrgan");
        assert_eq!(
            model_for(ScaleFactor::X4),
            "stabilityai/stable-diffusion-x4-upscaler"
        );
    }

    #[tokio::test]
    async fn url_input_is_unsupported_not_retried() {
        let provider = HuggingFaceProvider::new("tok");
        let request = TransformRequest::builder()
            .kind(TransformKind::Upscale)
            .primary(MediaReference::Url(
                "https://cdn.example.com/in.png".to_string(),
            ))
            .build()
            .unwrap();

        let error = provider.invoke(&request).await.unwrap_err();
        match error.kind() {
            atelier_error::AtelierErrorKind::Provider(e) => {
                assert!(matches!(e.kind, ProviderErrorKind::Unsupported(_)));
                assert!(!e.kind.is_retryable());
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_kind_is_unsupported() {
        let provider = HuggingFaceProvider::new("tok");
        assert!(!provider.supports(TransformKind::Restore));

        let request = TransformRequest::builder()
            .kind(TransformKind::Restore)
            .primary(MediaReference::InlineBytes {
                bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
                mime: "image/jpeg".to_string(),
            })
            .build()
            .unwrap();
        assert!(provider.invoke(&request).await.is_err());
    }
}
