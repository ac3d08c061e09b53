//! Storage key and content-type derivation from an identifier.

use chrono::Utc;

/// Final `/`-separated segment of `identifier`, ignoring trailing slashes.
///
/// Works the same for local paths and URLs: `http://host/a/b.png` yields `b.png`.
pub fn base_name(identifier: &str) -> &str {
    if identifier.is_empty() {
        return ".";
    }
    let trimmed = identifier.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Derive the storage key for `identifier`, stamping the current unix time when asked.
pub fn build_key(identifier: &str, add_timestamp: bool) -> String {
    let timestamp = add_timestamp.then(|| Utc::now().timestamp());
    build_key_at(identifier, timestamp)
}

/// Key derivation with an explicit timestamp.
///
/// The base name is split on every `.`. Only the first segment is kept as the
/// name, and the extension is re-attached only when there were exactly two
/// segments, so `archive.tar.gz` becomes `archive`.
pub fn build_key_at(identifier: &str, timestamp: Option<i64>) -> String {
    let segments: Vec<&str> = base_name(identifier).split('.').collect();

    let mut key = match timestamp {
        Some(ts) => format!("{}-{}", segments[0], ts),
        None => segments[0].to_string(),
    };

    if segments.len() == 2 {
        key.push('.');
        key.push_str(segments[1]);
    }

    key
}

/// Extension of the final path segment, including the leading dot.
fn extension(identifier: &str) -> Option<&str> {
    let last = identifier.rsplit('/').next().unwrap_or(identifier);
    last.rfind('.').map(|idx| &last[idx..])
}

/// Content type for `identifier` based on its extension. `None` when unknown.
pub fn content_type_for(identifier: &str) -> Option<String> {
    let ext = extension(identifier)?;
    let mime = mime_guess::from_ext(&ext[1..]).first()?;
    if mime.type_() == mime_guess::mime::TEXT {
        Some(format!("{}; charset=utf-8", mime.essence_str()))
    } else {
        Some(mime.essence_str().to_string())
    }
}
