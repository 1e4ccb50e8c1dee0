//! Sanitization for request-derived path components.
//!
//! Every path component that originates from a request (session id,
//! codec, quality, part id) passes through [`component`] before it is
//! joined onto the storage root. A component must stay at its own
//! directory level: separators, traversal sequences, and drive markers
//! are stripped, and a component that strips away to nothing is
//! rejected outright.

/// Characters that can never appear in a single path component.
const DISALLOWED: &[char] = &['/', '\\', ':', '\0'];

/// Sanitize one path component.
///
/// Removes path separators, control characters, and drive markers, then
/// eliminates every `..` sequence (iteratively, so runs of dots cannot
/// reassemble into a traversal). Returns `None` when the component is
/// empty after sanitization, or reduces to `.` — callers treat that as
/// not-found rather than substituting a default.
pub fn component(raw: &str) -> Option<String> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !DISALLOWED.contains(c) && !c.is_control())
        .collect();

    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "." {
        return None;
    }

    Some(cleaned.to_string())
}
