//! Trait definitions for transformation providers.

use async_trait::async_trait;
use atelier_core::{ProviderOutcome, TransformKind, TransformRequest};
use atelier_error::AtelierResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a provider talks to its remote service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InvocationMode {
    /// One blocking inference call; the result is ready when it returns
    SyncCall,
    /// Create a task, then poll its status until terminal
    SubmitAndPoll,
}

/// Core trait every transformation provider implements.
///
/// A provider is read-only configuration plus behavior: credentials are
/// bound at construction and no mutable state survives across calls. The
/// metadata accessors are pure.
#[async_trait]
pub trait TransformDriver: Send + Sync {
    /// Perform one transformation attempt against the remote service.
    ///
    /// Wall-clock time is bounded by [`timeout`](TransformDriver::timeout).
    /// Failures (timeout, remote error, empty output) surface as
    /// [`ProviderError`](atelier_error::ProviderError) values; the gateway
    /// converts them into next-provider signals.
    async fn invoke(&self, request: &TransformRequest) -> AtelierResult<ProviderOutcome>;

    /// Provider name for logging and attribution (e.g. "Replicate", "PiAPI").
    fn name(&self) -> &str;

    /// Overall wall-clock budget for one invocation.
    fn timeout(&self) -> Duration;

    /// The provider's call protocol.
    fn mode(&self) -> InvocationMode;

    /// Whether the provider serves this transformation kind.
    fn supports(&self, kind: TransformKind) -> bool;

    /// Whether the provider can accept a webhook URL at task creation and
    /// return immediately instead of polling.
    fn supports_webhook(&self) -> bool {
        false
    }
}
