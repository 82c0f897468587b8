//! Provider orchestration for the Atelier media-transformation gateway.
//!
//! The [`Gateway`] is the single entry point: it validates raw inputs,
//! walks the ordered provider chain for the requested transformation kind
//! with per-provider retries, and delivers the first success according to
//! the caller's result preference.
//!
//! # Examples
//!
//! ```no_run
//! use atelier_core::TransformKind;
//! use atelier_gateway::{Gateway, TransformInput};
//!
//! # async fn example() -> atelier_error::AtelierResult<()> {
//! let gateway = Gateway::from_env()?;
//! let result = gateway
//!     .transform(
//!         TransformInput::builder()
//!             .kind(TransformKind::Upscale)
//!             .primary("https://cdn.example.com/photo.png")
//!             .build()
//!             .map_err(|e| atelier_error::BuilderError::new(e.to_string()))?,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gateway;
mod registry;

pub use config::{Credentials, GatewayConfig};
pub use gateway::{Gateway, TransformInput, TransformInputBuilder};
pub use registry::ProviderRegistry;
