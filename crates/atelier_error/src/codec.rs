//! Media codec error types.

/// Specific codec failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CodecErrorKind {
    /// Base64 payload could not be decoded even after cleanup and padding
    #[display("Invalid base64 encoding: {}", _0)]
    InvalidEncoding(String),
    /// Data-URI did not match the `data:<mime>;base64,<payload>` shape
    #[display("Malformed data URI: {}", _0)]
    MalformedDataUri(String),
    /// Remote download returned a non-success status
    #[display("Download failed with HTTP status {}", status)]
    DownloadError {
        /// HTTP status code returned by the remote host
        status: u16,
    },
    /// Download transport failed before any status was received
    #[display("Download transport error: {}", _0)]
    Transport(String),
    /// Downloaded body is not recognizable media (HTML error page, truncated
    /// file, or unknown signature)
    #[display("Downloaded content is not valid media: {}", _0)]
    InvalidContent(String),
}

/// Codec error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{CodecError, CodecErrorKind};
///
/// let err = CodecError::new(CodecErrorKind::DownloadError { status: 502 });
/// assert!(format!("{}", err).contains("502"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Codec Error: {} at line {} in {}", kind, line, file)]
pub struct CodecError {
    /// The kind of error that occurred
    pub kind: CodecErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl CodecError {
    /// Create a new CodecError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CodecErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
