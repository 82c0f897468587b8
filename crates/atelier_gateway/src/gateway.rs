//! The gateway loop: validate, walk the provider chain, deliver the result.

use crate::{Credentials, GatewayConfig, ProviderRegistry};
use atelier_codec::{Downloader, Validator};
use atelier_core::{
    GatewayResult, MediaKind, MediaReference, ProviderOutcome, ResultPreference, TransformKind,
    TransformParams, TransformRequest, TransformResponse,
};
use atelier_error::{
    AtelierError, AtelierErrorKind, AtelierResult, AttemptFailure, BuilderError, GatewayError,
    GatewayErrorKind, ProviderErrorKind, ValidationError,
};
use tokio::time::Instant;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tracing::{info, instrument, warn};

/// A raw, unvalidated transformation request as a caller submits it.
///
/// Media values are strings in any accepted shape: an https URL, a data
/// URI, or bare base64. Validation normalizes them into
/// [`MediaReference`] values before any provider sees them.
///
/// # Examples
///
/// ```
/// use atelier_core::TransformKind;
/// use atelier_gateway::TransformInput;
///
/// let input = TransformInput::builder()
///     .kind(TransformKind::Upscale)
///     .primary("https://cdn.example.com/photo.png")
///     .build()
///     .unwrap();
/// assert!(input.secondary.is_none());
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into), pattern = "owned")]
pub struct TransformInput {
    /// The transformation to perform
    pub kind: TransformKind,
    /// Primary media value (target image/video, or the single input)
    pub primary: String,
    /// Secondary media value (face-swap source image)
    #[builder(default, setter(strip_option))]
    pub secondary: Option<String>,
    /// Kind-specific parameters; defaults applied when absent
    #[builder(default, setter(strip_option))]
    pub params: Option<TransformParams>,
    /// Webhook for async completion
    #[builder(default, setter(strip_option))]
    pub webhook_url: Option<String>,
    /// How URL results should be delivered
    #[builder(default)]
    pub preference: ResultPreference,
}

impl TransformInput {
    /// Start building an input.
    pub fn builder() -> TransformInputBuilder {
        TransformInputBuilder::default()
    }
}

/// One attempt's classification: what failed, and whether the same
/// provider deserves another try.
fn classify(error: &AtelierError) -> (ProviderErrorKind, bool) {
    match error.kind() {
        AtelierErrorKind::Provider(e) => (e.kind.clone(), e.kind.is_retryable()),
        // Anything else leaking out of an invocation is not a transient
        // remote condition; move on to the next provider
        other => (ProviderErrorKind::Transport(other.to_string()), false),
    }
}

/// The media-transformation gateway.
///
/// Holds the provider registry, the input validator, and the retry policy.
/// One instance serves concurrent requests; all state is read-only after
/// construction.
#[derive(Debug)]
pub struct Gateway {
    registry: ProviderRegistry,
    validator: Validator,
    downloader: Downloader,
    config: GatewayConfig,
}

impl Gateway {
    /// Create a gateway over a registry with the given policy.
    pub fn new(registry: ProviderRegistry, config: GatewayConfig) -> Self {
        Self {
            registry,
            validator: Validator::default(),
            downloader: Downloader::new(),
            config,
        }
    }

    /// Build a gateway from environment credentials and policy overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](atelier_error::ConfigError) when a policy
    /// variable is present but malformed.
    pub fn from_env() -> AtelierResult<Self> {
        let credentials = Credentials::from_env();
        let config = GatewayConfig::from_env()?;
        Ok(Self::new(
            ProviderRegistry::from_credentials(&credentials),
            config,
        ))
    }

    /// Replace the validator, e.g. to widen the download allow-list.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Kinds this gateway can currently serve.
    pub fn configured_kinds(&self) -> Vec<TransformKind> {
        self.registry.configured_kinds()
    }

    /// Validate a raw input into a provider-ready request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] before any provider is invoked when a
    /// media value is malformed, a required secondary source is missing,
    /// or the webhook URL is not https.
    #[instrument(skip(self, input), fields(kind = %input.kind))]
    pub fn validate(&self, input: &TransformInput) -> AtelierResult<TransformRequest> {
        let params = input
            .params
            .clone()
            .unwrap_or_else(|| TransformParams::default_for(input.kind));

        let primary_kind = match (input.kind, &params) {
            (TransformKind::VideoSwap, _) => MediaKind::Video,
            (TransformKind::FaceSwap, TransformParams::FaceSwap { target }) => *target,
            _ => MediaKind::Image,
        };
        let primary = self
            .validator
            .validate("primary", &input.primary, primary_kind)?;

        // Swap kinds require a source face; it is always an image
        let needs_secondary =
            matches!(input.kind, TransformKind::FaceSwap | TransformKind::VideoSwap);
        let secondary = match (&input.secondary, needs_secondary) {
            (Some(raw), _) => Some(self.validator.validate("secondary", raw, MediaKind::Image)?),
            (None, true) => {
                return Err(ValidationError::new(
                    "secondary",
                    format!("{} requires a source image", input.kind),
                ))?;
            }
            (None, false) => None,
        };

        if let Some(webhook) = &input.webhook_url
            && !webhook.starts_with("https://")
        {
            return Err(ValidationError::new(
                "webhook_url",
                "webhook endpoints must be https",
            ))?;
        }

        let mut builder = TransformRequest::builder()
            .kind(input.kind)
            .primary(primary)
            .params(params)
            .preference(input.preference);
        if let Some(secondary) = secondary {
            builder = builder.secondary(secondary);
        }
        if let Some(webhook) = input.webhook_url.clone() {
            builder = builder.webhook_url(webhook);
        }
        builder
            .build()
            .map_err(|e| BuilderError::new(e.to_string()).into())
    }

    /// Validate and run one transformation end to end.
    pub async fn transform(&self, input: TransformInput) -> AtelierResult<GatewayResult> {
        let request = self.validate(&input)?;
        self.execute(&request).await
    }

    /// Run a transformation for its caller, rendered as a serializable
    /// response instead of an error.
    pub async fn respond(&self, input: TransformInput) -> TransformResponse {
        match self.transform(input).await {
            Ok(GatewayResult::Resolved {
                media,
                provider,
                attribution,
            }) => TransformResponse::resolved(provider, render_media(&media), attribution),
            Ok(GatewayResult::Accepted { job_id, provider }) => {
                TransformResponse::pending(job_id, provider)
            }
            Err(error) => {
                // Only attempts that actually ran are reported; a request
                // rejected before the chain started tried nobody
                let tried = match error.kind() {
                    AtelierErrorKind::Gateway(e) => match &e.kind {
                        GatewayErrorKind::AllFailed(failures) => failures
                            .iter()
                            .map(|f| format!("{}: {}", f.provider, f.reason))
                            .collect(),
                        GatewayErrorKind::NotConfigured(_) => Vec::new(),
                    },
                    _ => Vec::new(),
                };
                TransformResponse::failure(error.to_string(), tried)
            }
        }
    }

    /// Walk the provider chain for a validated request.
    ///
    /// Providers run strictly in configured order. Each is tried up to
    /// `retry_count + 1` times with exponential backoff between attempts;
    /// a non-retryable failure advances the chain immediately. The first
    /// success short-circuits everything behind it.
    ///
    /// # Errors
    ///
    /// [`NotConfigured`](GatewayErrorKind::NotConfigured) when no provider
    /// serves the kind, [`AllFailed`](GatewayErrorKind::AllFailed) with the
    /// ordered attempt log when the whole chain is exhausted.
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn execute(&self, request: &TransformRequest) -> AtelierResult<GatewayResult> {
        let chain = self.registry.chain(request.kind);
        if chain.is_empty() {
            return Err(GatewayError::new(GatewayErrorKind::NotConfigured(
                request.kind.to_string(),
            )))?;
        }

        let started = Instant::now();
        let mut failures: Vec<AttemptFailure> = Vec::new();

        'chain: for provider in chain {
            if !provider.supports(request.kind) {
                continue;
            }
            // 2s, 4s, 8s... between attempts against the same provider
            let mut backoff = ExponentialBackoff::from_millis(2)
                .factor(1000)
                .map(jitter)
                .take(self.config.retry_count as usize);

            for attempt in 1..=self.config.retry_count + 1 {
                let mut deadline = provider.timeout();
                if let Some(budget) = self.config.request_budget {
                    let remaining = budget.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        warn!("Request budget exhausted, abandoning remaining providers");
                        break 'chain;
                    }
                    deadline = deadline.min(remaining);
                }

                info!(provider = provider.name(), attempt, "Invoking provider");
                let attempt_result =
                    tokio::time::timeout(deadline, provider.invoke(request)).await;

                let (reason, retryable) = match attempt_result {
                    Ok(Ok(outcome)) => {
                        info!(provider = provider.name(), attempt, "Provider succeeded");
                        return self.deliver(request, outcome).await;
                    }
                    Ok(Err(error)) => classify(&error),
                    Err(_) => (
                        ProviderErrorKind::Timeout {
                            elapsed_secs: deadline.as_secs(),
                            job_id: None,
                        },
                        true,
                    ),
                };

                warn!(
                    provider = provider.name(),
                    attempt,
                    %reason,
                    retryable,
                    "Provider attempt failed"
                );
                failures.push(AttemptFailure {
                    provider: provider.name().to_string(),
                    attempt,
                    reason,
                });

                if !retryable {
                    continue 'chain;
                }
                if attempt <= self.config.retry_count
                    && let Some(delay) = backoff.next()
                {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(GatewayError::new(GatewayErrorKind::AllFailed(failures)))?
    }

    /// Apply the caller's delivery preference to a provider outcome.
    async fn deliver(
        &self,
        request: &TransformRequest,
        outcome: ProviderOutcome,
    ) -> AtelierResult<GatewayResult> {
        let result = match outcome {
            ProviderOutcome::Resolved(success) => {
                let media = match (request.preference, success.media) {
                    (ResultPreference::Inline, MediaReference::Url(url)) => {
                        self.validator.check_fetch_allowed(&url)?;
                        let (bytes, mime) = self
                            .downloader
                            .download(&url, self.config.download_timeout)
                            .await?;
                        MediaReference::InlineBytes { bytes, mime }
                    }
                    (_, media) => media,
                };
                GatewayResult::Resolved {
                    media,
                    provider: success.provider,
                    attribution: success.attribution,
                }
            }
            ProviderOutcome::Accepted(job) => GatewayResult::Accepted {
                job_id: job.job_id,
                provider: job.provider,
            },
        };
        Ok(result)
    }
}

fn render_media(media: &MediaReference) -> String {
    match media {
        MediaReference::Url(url) => url.clone(),
        MediaReference::InlineBytes { bytes, mime } => atelier_codec::to_data_uri(bytes, mime),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> Gateway {
        Gateway::new(ProviderRegistry::new(), GatewayConfig::default())
    }

    #[test]
    fn face_swap_without_secondary_fails_validation() {
        let input = TransformInput::builder()
            .kind(TransformKind::FaceSwap)
            .primary("https://cdn.example.com/target.png")
            .build()
            .unwrap();
        let error = gateway().validate(&input).unwrap_err();
        assert!(matches!(
            error.kind(),
            AtelierErrorKind::Validation(e) if e.field == "secondary"
        ));
    }

    #[test]
    fn insecure_webhook_fails_validation() {
        let input = TransformInput::builder()
            .kind(TransformKind::Upscale)
            .primary("https://cdn.example.com/in.png")
            .webhook_url("http://hooks.example.com/done")
            .build()
            .unwrap();
        let error = gateway().validate(&input).unwrap_err();
        assert!(matches!(
            error.kind(),
            AtelierErrorKind::Validation(e) if e.field == "webhook_url"
        ));
    }

    #[test]
    fn validation_applies_default_params() {
        let input = TransformInput::builder()
            .kind(TransformKind::Upscale)
            .primary("https://cdn.example.com/in.png")
            .build()
            .unwrap();
        let request = gateway().validate(&input).unwrap();
        assert_eq!(request.params, Some(TransformParams::default_for(TransformKind::Upscale)));
        assert_eq!(request.preference, ResultPreference::PassThrough);
    }

    #[test]
    fn classify_keeps_provider_retryability() {
        let retryable: AtelierError =
            atelier_error::ProviderError::new(ProviderErrorKind::Remote {
                status: Some(503),
                message: "unavailable".to_string(),
            })
            .into();
        assert!(classify(&retryable).1);

        let permanent: AtelierError = atelier_error::ProviderError::new(
            ProviderErrorKind::Unsupported("no video".to_string()),
        )
        .into();
        assert!(!classify(&permanent).1);

        let foreign: AtelierError = ValidationError::new("field", "bad").into();
        assert!(!classify(&foreign).1);
    }
}
