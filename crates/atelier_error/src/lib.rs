//! Error types for the Atelier media-transformation gateway.
//!
//! This crate provides the foundation error types used throughout the Atelier
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use atelier_error::{AtelierResult, ValidationError};
//!
//! fn check_input(raw: &str) -> AtelierResult<()> {
//!     if raw.is_empty() {
//!         Err(ValidationError::new("media", "empty input"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_input("").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod codec;
mod config;
mod error;
mod gateway;
mod provider;
mod validation;

pub use builder::BuilderError;
pub use codec::{CodecError, CodecErrorKind};
pub use config::ConfigError;
pub use error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use gateway::{AttemptFailure, GatewayError, GatewayErrorKind};
pub use provider::{ProviderError, ProviderErrorKind, RetryableError};
pub use validation::ValidationError;
