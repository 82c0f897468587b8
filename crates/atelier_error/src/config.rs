//! Configuration error types.

/// Environment configuration error with source location.
///
/// Carries the name of the offending variable so operators can tell which
/// `ATELIER_*` or credential setting needs correcting.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Configuration Error: variable `{}`: {} at line {} in {}",
    variable,
    reason,
    line,
    file
)]
pub struct ConfigError {
    /// Environment variable at fault
    pub variable: String,
    /// What was wrong with its value
    pub reason: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError for a variable at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::ConfigError;
    ///
    /// let err = ConfigError::new("REPLICATE_API_TOKEN", "not set");
    /// assert_eq!(err.variable, "REPLICATE_API_TOKEN");
    /// ```
    #[track_caller]
    pub fn new(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            variable: variable.into(),
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
