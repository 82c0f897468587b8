//! Remote inference provider integrations for the Atelier gateway.
//!
//! Each provider implements [`TransformDriver`](atelier_interface::TransformDriver)
//! against one remote service:
//! - [`ReplicateProvider`]: sync-call, version-pinned models across all kinds
//! - [`HuggingFaceProvider`]: sync-call, raw bytes in and out (upscaling)
//! - [`PiApiProvider`]: submit-and-poll face swap, webhook-capable
//! - [`VModelProvider`]: submit-and-poll template video swap
//!
//! Submit-and-poll providers share the [`JobPoller`] loop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod huggingface;
mod piapi;
mod poller;
mod replicate;
mod vmodel;

pub use huggingface::HuggingFaceProvider;
pub use piapi::PiApiProvider;
pub use poller::{JobPoller, PollStatus};
pub use replicate::{ReplicateModel, ReplicateProvider};
pub use vmodel::VModelProvider;

use atelier_codec::to_data_uri;
use atelier_core::MediaReference;

/// Render a media reference into the string form providers transport:
/// URLs pass through untouched, inline bytes become a data URI.
pub(crate) fn render(reference: &MediaReference) -> String {
    match reference {
        MediaReference::Url(url) => url.clone(),
        MediaReference::InlineBytes { bytes, mime } => to_data_uri(bytes, mime),
    }
}
