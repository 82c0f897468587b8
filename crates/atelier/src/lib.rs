//! Atelier - Multi-Provider Media-Transformation Gateway
//!
//! Atelier turns one request (upscale this photo, restore it, swap a face
//! into it) into calls against remote inference providers, walking an
//! ordered fallback chain with retries until one succeeds.
//!
//! # Features
//!
//! - **Unified Interface**: Single `TransformDriver` trait for all providers
//! - **Ordered Fallback**: Specialists first, generalists behind them
//! - **Retry with Backoff**: Exponential backoff on transient failures
//! - **Two Protocols**: Blocking sync calls and submit-and-poll tasks
//! - **Webhook Hand-off**: Return a job id instead of polling
//! - **Validated Media**: https-only URLs, sniffed base64, SSRF allow-list
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use atelier::{Gateway, TransformInput, TransformKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Gateway::from_env()?;
//!
//!     let result = gateway
//!         .transform(
//!             TransformInput::builder()
//!                 .kind(TransformKind::Upscale)
//!                 .primary("https://cdn.example.com/photo.png")
//!                 .build()?,
//!         )
//!         .await?;
//!
//!     println!("Result: {:?}", result);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Atelier is organized as a workspace with focused crates:
//!
//! - `atelier_core` - Core data types (requests, outcomes, parameters)
//! - `atelier_interface` - TransformDriver trait definition
//! - `atelier_error` - Error types
//! - `atelier_codec` - Media decoding, sniffing, validation, downloads
//! - `atelier_providers` - Remote provider implementations
//! - `atelier_gateway` - Orchestration: registry, fallback, retry
//!
//! This crate (`atelier`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use atelier_codec::*;
pub use atelier_core::*;
pub use atelier_error::*;
pub use atelier_gateway::*;
pub use atelier_interface::*;
pub use atelier_providers::*;
