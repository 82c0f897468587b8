//! Media codec and request validation for the Atelier gateway.
//!
//! Decodes inbound media references (URL, data-URI, raw base64) into the
//! canonical [`MediaReference`](atelier_core::MediaReference) representation,
//! re-encodes provider output, sniffs media formats by magic bytes, performs
//! validated downloads, and enforces the request validation rules (https
//! only, domain allow-listing for server-side fetches).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decode;
mod download;
mod sniff;
mod validate;

pub use decode::{decode, from_data_uri, normalize_base64, to_data_uri};
pub use download::Downloader;
pub use sniff::{looks_like_html, sniff_format};
pub use validate::{AllowedHosts, Validator};
