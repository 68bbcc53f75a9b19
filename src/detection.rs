//! MIME type and extension detection.
//!
//! Resolution order for a source's MIME type:
//! 1. An authoritative declared type (HTTP `Content-Type`, upload descriptor)
//! 2. `infer` magic bytes, then a text sniffer for SVG/XML/HTML
//! 3. `mime_guess` from the extension

use std::path::Path;

/// Number of leading bytes read when sniffing content.
pub const SNIFF_LEN: usize = 8192;

const GENERIC_BINARY: &str = "application/octet-stream";

/// Sniff a MIME type from leading content bytes.
pub fn sniff(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    if let Some(kind) = infer::get(bytes) {
        let mime = kind.mime_type();
        // infer reports XML for SVG documents; the text sniffer tells them apart.
        if mime == "text/xml" || mime == "application/xml" {
            if let Some(text_mime) = sniff_markup(bytes) {
                return Some(text_mime.to_string());
            }
        }
        return Some(mime.to_string());
    }
    sniff_markup(bytes).map(str::to_string)
}

/// Guess a MIME type from a lower-cased extension.
pub fn guess_from_extension(ext: &str) -> Option<String> {
    mime_guess::from_ext(ext).first().map(|m| m.essence_str().to_string())
}

/// Normalize a declared content type.
///
/// Parameters are stripped and the essence lower-cased. Empty values and
/// `application/octet-stream` carry no information and yield `None`.
pub fn declared(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() || essence == GENERIC_BINARY || !essence.contains('/') {
        None
    } else {
        Some(essence)
    }
}

/// Resolve a MIME type from whatever a source can offer.
///
/// `head` is only consulted when no declared type is present; `extension`
/// only when neither a declared type nor sniffing produced an answer.
pub fn resolve<F>(declared_type: Option<&str>, head: F, extension: Option<&str>) -> Option<String>
where
    F: FnOnce() -> Option<Vec<u8>>,
{
    if let Some(mime) = declared_type.and_then(declared) {
        return Some(mime);
    }
    if let Some(mime) = head().as_deref().and_then(sniff) {
        return Some(mime);
    }
    extension.and_then(guess_from_extension)
}

/// Lower-cased suffix after the last dot of a file name.
///
/// Dotfiles such as `.bashrc` and names ending in a dot have no extension.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}

/// The last component of a path or URL path, without any directory part.
///
/// Both `/` and `\` are treated as separators since client-declared names may
/// come from any platform.
pub fn basename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

fn sniff_markup(bytes: &[u8]) -> Option<&'static str> {
    let window = &bytes[..bytes.len().min(SNIFF_LEN)];
    let text = match std::str::from_utf8(window) {
        Ok(s) => s,
        // The window may cut a multi-byte character in half.
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&window[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let lower = trimmed
        .get(..trimmed.len().min(64))
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    if lower.starts_with("<svg") || (lower.starts_with("<?xml") && trimmed.contains("<svg")) {
        return Some("image/svg+xml");
    }
    if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
        return Some("text/html");
    }
    if lower.starts_with("<?xml") || lower.starts_with("<!doctype") {
        return Some("application/xml");
    }
    None
}
