//! Top-level error wrapper types.

use crate::{BuilderError, CodecError, ConfigError, GatewayError, ProviderError, ValidationError};

/// The foundation error enum for the Atelier workspace.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierError, ValidationError};
///
/// let err: AtelierError = ValidationError::new("source", "not https").into();
/// assert!(format!("{}", err).contains("source"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AtelierErrorKind {
    /// Request validation error (bad input shape; never reaches a provider)
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Media codec error (decode, re-encode, download)
    #[from(CodecError)]
    Codec(CodecError),
    /// Provider-level error (timeout, remote failure, empty output)
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Gateway error (not configured, aggregate failure)
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Atelier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, ConfigError};
///
/// fn might_fail() -> AtelierResult<()> {
///     Err(ConfigError::new("REPLICATE_API_TOKEN", "not set"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Atelier Error: {}", _0)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, CodecError, CodecErrorKind};
///
/// fn fetch() -> AtelierResult<Vec<u8>> {
///     Err(CodecError::new(CodecErrorKind::DownloadError { status: 404 }))?
/// }
/// ```
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
