//! Trait definitions for Atelier transformation providers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{InvocationMode, TransformDriver};
