//! Provider error types and retry classification.

/// Specific provider failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Provider exceeded its allotted wall-clock time. Carries the remote
    /// job id when a task had already been created, for observability.
    #[display("Provider timed out after {}s (job: {})", elapsed_secs, job_id.as_deref().unwrap_or("none"))]
    Timeout {
        /// Seconds elapsed before the deadline fired
        elapsed_secs: u64,
        /// Remote job id, if a submit-and-poll task was already created
        job_id: Option<String>,
    },
    /// Remote service reported a failure (non-success HTTP status or a
    /// provider-reported task failure)
    #[display("Remote error (status {}): {}", status.map(|s| s.to_string()).unwrap_or_else(|| "n/a".into()), message)]
    Remote {
        /// HTTP status, when the failure surfaced at the transport layer
        status: Option<u16>,
        /// Remote-reported error message
        message: String,
    },
    /// Provider returned a success status but no usable result field
    #[display("Provider returned success with no usable output")]
    EmptyOutput,
    /// Provider cannot serve this media kind or transformation
    #[display("Provider does not support this request: {}", _0)]
    Unsupported(String),
    /// Request could not be sent at all (connection refused, DNS, TLS)
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Provider response could not be parsed
    #[display("Failed to parse provider response: {}", _0)]
    Parse(String),
}

impl ProviderErrorKind {
    /// Check if this failure is worth retrying against the same provider.
    ///
    /// Transient conditions (5xx, rate limiting, timeouts, transport blips)
    /// retry; `Unsupported` is permanent and advances to the next provider
    /// immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::Remote { status, .. } => match status {
                Some(code) => matches!(*code, 408 | 429 | 500 | 502 | 503 | 504),
                None => true,
            },
            ProviderErrorKind::Timeout { .. } => true,
            ProviderErrorKind::Transport(_) => true,
            ProviderErrorKind::EmptyOutput => true,
            ProviderErrorKind::Parse(_) => true,
            ProviderErrorKind::Unsupported(_) => false,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Remote {
///     status: Some(503),
///     message: "service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Timeout shorthand without a remote job id.
    #[track_caller]
    pub fn timeout(elapsed_secs: u64) -> Self {
        Self::new(ProviderErrorKind::Timeout {
            elapsed_secs,
            job_id: None,
        })
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable), 429 (rate limit), or
/// network timeouts return true. Permanent errors like an unsupported media
/// kind return false and the gateway advances to the next provider without
/// burning retry budget.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
