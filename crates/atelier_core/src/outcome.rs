//! Provider and gateway outcome types.

use crate::MediaReference;
use serde::{Deserialize, Serialize};

/// A provider's successful, fully-resolved result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSuccess {
    /// The resolved output media (URL or inline bytes)
    pub media: MediaReference,
    /// Name of the provider that produced it
    pub provider: String,
    /// Model or service attribution, e.g. "easel/advanced-face-swap"
    pub attribution: Option<String>,
}

/// A submit-and-poll task accepted for webhook completion.
///
/// Returned instead of polling when the caller supplied a webhook URL; the
/// remote service calls the webhook when the job finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedJob {
    /// Opaque job id issued by the remote service
    pub job_id: String,
    /// Name of the provider holding the job
    pub provider: String,
}

/// What a single provider invocation produced.
///
/// Failures travel on the error channel as
/// [`ProviderError`](atelier_error::ProviderError); an invocation never
/// reports both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProviderOutcome {
    /// Result media is ready
    Resolved(ProviderSuccess),
    /// Job created; completion arrives via webhook
    Accepted(AcceptedJob),
}

/// The value the gateway returns to its caller on success.
///
/// Failure is an [`AtelierError`](atelier_error::AtelierError) carrying
/// either `NotConfigured` or the ordered per-provider failure list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GatewayResult {
    /// Transformation complete; media resolved per the caller's preference
    Resolved {
        /// The result media
        media: MediaReference,
        /// Provider that satisfied the request
        provider: String,
        /// Model or service attribution
        attribution: Option<String>,
    },
    /// Job accepted for async completion via webhook
    Accepted {
        /// Opaque job id issued by the remote service
        job_id: String,
        /// Provider holding the job
        provider: String,
    },
}

impl From<ProviderOutcome> for GatewayResult {
    fn from(outcome: ProviderOutcome) -> Self {
        match outcome {
            ProviderOutcome::Resolved(success) => GatewayResult::Resolved {
                media: success.media,
                provider: success.provider,
                attribution: success.attribution,
            },
            ProviderOutcome::Accepted(job) => GatewayResult::Accepted {
                job_id: job.job_id,
                provider: job.provider,
            },
        }
    }
}
