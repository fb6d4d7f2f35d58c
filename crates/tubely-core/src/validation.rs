//! Media type validation
//!
//! Content types are taken from the client-declared part header. They are never
//! sniffed from the bytes; these helpers only normalise and inspect the string.

/// Normalize MIME type by stripping parameters and lowercasing
/// (e.g. "Image/PNG; charset=utf-8" -> "image/png").
pub fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// File extension for a media type: its subtype after `/`.
///
/// Returns `None` when the type has no subtype or the subtype holds anything other
/// than ASCII alphanumerics, `-`, `+` and single dots, so the result is always safe
/// as the tail of a flat file name.
pub fn extension_for_media_type(content_type: &str) -> Option<String> {
    let normalized = normalize_media_type(content_type);
    let (top_level, subtype) = normalized.split_once('/')?;

    if top_level.is_empty() || subtype.is_empty() || subtype.len() > 64 {
        return None;
    }
    if subtype.starts_with('.') || subtype.ends_with('.') || subtype.contains("..") {
        return None;
    }
    let valid = subtype
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+' || c == '.');
    if !valid {
        return None;
    }

    Some(subtype.to_string())
}
