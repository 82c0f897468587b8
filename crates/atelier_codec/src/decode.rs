//! Base64 and data-URI codecs.

use crate::sniff_format;
use atelier_core::MediaReference;
use atelier_error::{AtelierResult, CodecError, CodecErrorKind};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::sync::LazyLock;

static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:(image|video)/(jpeg|jpg|png|gif|webp|bmp|mp4|avi|mov|webm);base64,")
        .expect("data-URI pattern is valid")
});

/// Normalize a raw base64 payload: strip whitespace and newlines, then
/// right-pad with `=` to a multiple of 4.
///
/// # Examples
///
/// ```
/// use atelier_codec::normalize_base64;
///
/// assert_eq!(normalize_base64("aGVs\nbG8"), "aGVsbG8=");
/// ```
pub fn normalize_base64(payload: &str) -> String {
    let mut cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let remainder = cleaned.len() % 4;
    if remainder != 0 {
        cleaned.extend(std::iter::repeat_n('=', 4 - remainder));
    }
    cleaned
}

/// Decode an inbound media string into its canonical representation.
///
/// - `http://` / `https://` prefixes pass through as [`MediaReference::Url`]
///   (the https requirement is enforced at validation, before any
///   server-side fetch)
/// - data-URIs are stripped of their prefix, keeping the declared mime
/// - anything else is treated as raw base64, normalized, and decoded; the
///   mime is sniffed from the decoded bytes, defaulting to `image/png`
///
/// # Examples
///
/// ```
/// use atelier_codec::decode;
/// use atelier_core::MediaReference;
///
/// let reference = decode("https://cdn.example.com/in.png").unwrap();
/// assert!(reference.is_url());
///
/// assert!(decode("not valid base64!!!").is_err());
/// ```
pub fn decode(input: &str) -> AtelierResult<MediaReference> {
    if input.starts_with("http://") || input.starts_with("https://") {
        return Ok(MediaReference::Url(input.to_string()));
    }

    if DATA_URI_RE.is_match(input) {
        let (bytes, mime) = from_data_uri(input)?;
        return Ok(MediaReference::InlineBytes { bytes, mime });
    }

    let normalized = normalize_base64(input);
    let bytes = STANDARD.decode(&normalized).map_err(|e| {
        CodecError::new(CodecErrorKind::InvalidEncoding(format!(
            "payload of length {}: {e}",
            normalized.len()
        )))
    })?;
    if bytes.is_empty() {
        return Err(CodecError::new(CodecErrorKind::InvalidEncoding(
            "decoded payload is empty".to_string(),
        )))?;
    }
    let mime = sniff_format(&bytes).unwrap_or("image/png").to_string();
    Ok(MediaReference::InlineBytes { bytes, mime })
}

/// Re-encode media bytes as a `data:<mime>;base64,<payload>` string.
///
/// Pure and total; never touches the network.
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a data-URI into decoded bytes and its declared mime type.
///
/// `jpg` normalizes to `jpeg`. Pure and total; never touches the network.
///
/// # Examples
///
/// ```
/// use atelier_codec::{from_data_uri, to_data_uri};
///
/// let uri = to_data_uri(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg");
/// let (bytes, mime) = from_data_uri(&uri).unwrap();
/// assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
/// assert_eq!(mime, "image/jpeg");
/// ```
pub fn from_data_uri(input: &str) -> AtelierResult<(Vec<u8>, String)> {
    let captures = DATA_URI_RE.captures(input).ok_or_else(|| {
        CodecError::new(CodecErrorKind::MalformedDataUri(
            "missing or unrecognized data-URI prefix".to_string(),
        ))
    })?;

    let category = captures[1].to_ascii_lowercase();
    let mut format = captures[2].to_ascii_lowercase();
    if format == "jpg" {
        format = "jpeg".to_string();
    }
    let mime = format!("{category}/{format}");

    let payload = &input[captures[0].len()..];
    let normalized = normalize_base64(payload);
    let bytes = STANDARD.decode(&normalized).map_err(|e| {
        CodecError::new(CodecErrorKind::InvalidEncoding(format!(
            "data-URI payload: {e}"
        )))
    })?;
    Ok((bytes, mime))
}
