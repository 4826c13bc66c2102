//! Caption composition
//!
//! Assembles the final post text from the caption body, hashtags, and
//! call-to-action. Pure function; the only special case is the fixed
//! fallback for fully-empty input so the provider never receives an
//! empty caption.

/// Caption used when body, hashtags, and call-to-action are all empty.
pub const FALLBACK_CAPTION: &str = "See what we have been working on.";

/// Compose the final caption: body, then hashtags, then call-to-action,
/// separated by blank lines. Parts are trimmed and skipped when empty;
/// the ordering is fixed and never varies by locale or platform.
pub fn compose(body: &str, hashtags: &str, call_to_action: &str) -> String {
    let parts: Vec<&str> = [body, hashtags, call_to_action]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        FALLBACK_CAPTION.to_string()
    } else {
        parts.join("\n\n")
    }
}
