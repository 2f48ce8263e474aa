//! Plain-text normalization.
//!
//! Output never contains two consecutive whitespace characters and never
//! starts or ends with whitespace.

/// Collapse whitespace runs (including newlines) into single spaces and trim.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize and cap at `max_chars` characters.
///
/// Truncation happens after collapsing but before the final trim, so a cut
/// that lands right after a space never leaves a trailing blank. The cut may
/// fall mid-word.
pub fn bounded(text: &str, max_chars: usize) -> String {
    let collapsed = normalize(text);
    match collapsed.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => collapsed[..byte_idx].trim_end().to_string(),
        None => collapsed,
    }
}

/// Join non-empty parts with a single space, then bound.
pub fn combine<'a>(parts: impl IntoIterator<Item = &'a str>, max_chars: usize) -> String {
    let joined = parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    bounded(&joined, max_chars)
}
