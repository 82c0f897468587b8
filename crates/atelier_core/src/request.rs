//! Transformation request types.

use crate::{MediaReference, TransformKind, TransformParams};
use serde::{Deserialize, Serialize};

/// How the caller wants URL results delivered.
///
/// Providers answer with a result URL on their own CDN; callers that cannot
/// fetch it themselves ask for inline delivery and the gateway downloads it
/// server-side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ResultPreference {
    /// Return the provider's result URL untouched (default)
    #[default]
    PassThrough,
    /// Download the result server-side and return inline bytes
    Inline,
}

/// An immutable media-transformation request.
///
/// One or two validated media references (face swap takes target + source),
/// kind-specific parameters, an optional webhook URL for async completion,
/// and the caller's result-delivery preference.
///
/// # Examples
///
/// ```
/// use atelier_core::{MediaReference, TransformKind, TransformRequest};
///
/// let request = TransformRequest::builder()
///     .kind(TransformKind::Upscale)
///     .primary(MediaReference::Url("https://cdn.example.com/in.png".into()))
///     .build()
///     .unwrap();
///
/// assert!(request.secondary.is_none());
/// assert!(request.webhook_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), pattern = "owned")]
pub struct TransformRequest {
    /// The transformation to perform
    pub kind: TransformKind,
    /// Primary media reference (target image/video, or the single input)
    pub primary: MediaReference,
    /// Secondary media reference (face-swap source image)
    #[builder(default, setter(strip_option))]
    pub secondary: Option<MediaReference>,
    /// Kind-specific parameters; defaults applied when absent
    #[builder(default, setter(strip_option))]
    pub params: Option<TransformParams>,
    /// Webhook for async completion, honored by providers that support
    /// async submission
    #[builder(default, setter(strip_option))]
    pub webhook_url: Option<String>,
    /// How URL results should be delivered
    #[builder(default)]
    pub preference: ResultPreference,
}

impl TransformRequest {
    /// Start building a request.
    pub fn builder() -> TransformRequestBuilder {
        TransformRequestBuilder::default()
    }

    /// The request parameters, falling back to the kind's defaults.
    pub fn params_or_default(&self) -> TransformParams {
        self.params
            .clone()
            .unwrap_or_else(|| TransformParams::default_for(self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScaleFactor, TransformParams};

    #[test]
    fn builder_applies_defaults() {
        let request = TransformRequest::builder()
            .kind(TransformKind::Upscale)
            .primary(MediaReference::Url("https://cdn.example.com/a.png".into()))
            .build()
            .unwrap();
        assert_eq!(request.preference, ResultPreference::PassThrough);
        assert_eq!(
            request.params_or_default(),
            TransformParams::Upscale {
                scale: ScaleFactor::X4
            }
        );
    }

    #[test]
    fn builder_requires_primary() {
        let result = TransformRequest::builder()
            .kind(TransformKind::Memoji)
            .build();
        assert!(result.is_err());
    }
}
