//! Media reference types.

use serde::{Deserialize, Serialize};

/// What a transformation operates on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    /// Still image (JPEG, PNG, GIF, WEBP, BMP)
    Image,
    /// Video (MP4, WebM)
    Video,
}

/// A normalized reference to one piece of input or output media.
///
/// Exactly one variant is populated. URLs handed to providers or fetched
/// server-side must be `https`; inline bytes are non-empty and carry their
/// declared mime type.
///
/// # Examples
///
/// ```
/// use atelier_core::MediaReference;
///
/// let url = MediaReference::Url("https://cdn.example.com/face.png".to_string());
/// assert!(url.is_url());
///
/// let inline = MediaReference::InlineBytes {
///     bytes: vec![0x89, 0x50, 0x4E, 0x47],
///     mime: "image/png".to_string(),
/// };
/// assert_eq!(inline.mime(), Some("image/png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MediaReference {
    /// Remote media, passed through to providers or downloaded server-side
    Url(String),
    /// Inline media bytes with their mime type
    InlineBytes {
        /// Decoded media bytes
        bytes: Vec<u8>,
        /// MIME type, e.g. "image/png" or "video/mp4"
        mime: String,
    },
}

impl MediaReference {
    /// True when the reference is a pass-through URL.
    pub fn is_url(&self) -> bool {
        matches!(self, MediaReference::Url(_))
    }

    /// The URL, when this reference is one.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            MediaReference::Url(url) => Some(url),
            MediaReference::InlineBytes { .. } => None,
        }
    }

    /// The declared mime type of inline bytes.
    pub fn mime(&self) -> Option<&str> {
        match self {
            MediaReference::Url(_) => None,
            MediaReference::InlineBytes { mime, .. } => Some(mime),
        }
    }
}
