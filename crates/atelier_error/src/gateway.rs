//! Gateway error types: configuration gaps and aggregate failures.

use crate::ProviderErrorKind;

/// One failed provider attempt, recorded in configured order.
///
/// The aggregate `AllFailed` error retains enough detail per attempt
/// (provider name + reason) for operational diagnosis.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{} (attempt {}): {}", provider, attempt, reason)]
pub struct AttemptFailure {
    /// Provider name, as reported by its metadata accessor
    pub provider: String,
    /// 1-based attempt number against this provider
    pub attempt: u32,
    /// The failure that ended this attempt
    pub reason: ProviderErrorKind,
}

/// Specific gateway failure conditions.
#[derive(Debug, Clone, derive_more::Display)]
pub enum GatewayErrorKind {
    /// No providers are configured for the requested transformation kind
    #[display("No providers configured for `{}` (missing credentials)", _0)]
    NotConfigured(String),
    /// Every provider/retry combination failed; carries the ordered
    /// per-attempt failure list
    #[display("All providers failed after {} attempt(s)", _0.len())]
    AllFailed(Vec<AttemptFailure>),
}

/// Gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::NotConfigured("face_swap".into()));
/// assert!(format!("{}", err).contains("face_swap"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
