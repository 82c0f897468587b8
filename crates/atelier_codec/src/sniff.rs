//! Magic-byte format detection.

/// Detect a media format from its leading bytes.
///
/// Returns the mime type for recognized image and video signatures, `None`
/// otherwise. Used both to validate that a download actually returned media
/// (rejecting HTML error pages) and to choose an output mime when none is
/// declared.
///
/// # Examples
///
/// ```
/// use atelier_codec::sniff_format;
///
/// assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
/// assert_eq!(sniff_format(b"<!DOCTYPE html>"), None);
/// ```
pub fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }
    if bytes.starts_with(b"GIF8") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }
    // ISO BMFF: size prefix then `ftyp`
    if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
        return Some("video/mp4");
    }
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/webm");
    }
    None
}

/// Check whether a body looks like an HTML page rather than media.
///
/// Remote services sometimes answer a result URL with an HTML error page and
/// a 200 status; those must never be treated as a valid image.
pub fn looks_like_html(bytes: &[u8]) -> bool {
    let head: Vec<u8> = bytes
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(16)
        .collect();
    let head = head.to_ascii_lowercase();
    head.starts_with(b"<!doctype") || head.starts_with(b"<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_image_signatures() {
        assert_eq!(sniff_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]), Some("image/png"));
        assert_eq!(sniff_format(b"GIF89a"), Some("image/gif"));
        assert_eq!(sniff_format(b"BM\x00\x00"), Some("image/bmp"));
        let webp = [b"RIFF".as_slice(), &[0, 0, 0, 0], b"WEBP"].concat();
        assert_eq!(sniff_format(&webp), Some("image/webp"));
    }

    #[test]
    fn recognizes_video_signatures() {
        let mp4 = [&[0x00, 0x00, 0x00, 0x20], b"ftyp".as_slice(), b"isom"].concat();
        assert_eq!(sniff_format(&mp4), Some("video/mp4"));
        assert_eq!(sniff_format(&[0x1A, 0x45, 0xDF, 0xA3, 0x01]), Some("video/webm"));
    }

    #[test]
    fn rejects_unknown_and_html() {
        assert_eq!(sniff_format(b"hello world"), None);
        assert!(looks_like_html(b"<!DOCTYPE html><html>"));
        assert!(looks_like_html(b"  \n<HTML><head>"));
        assert!(!looks_like_html(&[0xFF, 0xD8, 0xFF]));
    }
}
