//! Input validation error types.

/// Validation failure for a single request field.
///
/// Raised before any provider is invoked; a request that fails validation
/// never reaches the gateway loop.
///
/// # Examples
///
/// ```
/// use atelier_error::ValidationError;
///
/// let err = ValidationError::new("target", "http URLs are not allowed");
/// assert!(format!("{}", err).contains("target"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: field `{}`: {} at line {} in {}", field, reason, line, file)]
pub struct ValidationError {
    /// Request field that failed validation
    pub field: String,
    /// Reason for the failure
    pub reason: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError at the current location.
    #[track_caller]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            field: field.into(),
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
