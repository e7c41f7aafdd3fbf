//! Strip markdown code fences that models wrap around JSON answers.

const FENCE: &str = "```";

/// Trim, drop a leading fence with its optional language tag, drop a trailing
/// fence, and trim again. No validation of what remains.
pub fn sanitize_response(response: &str) -> &str {
    let mut s = response.trim();

    if let Some(rest) = s.strip_prefix(FENCE) {
        s = strip_language_tag(rest);
    }
    if let Some(rest) = s.strip_suffix(FENCE) {
        s = rest;
    }

    s.trim()
}

/// Drop a tag such as `json` directly after an opening fence. A run of
/// letters is only treated as a tag when followed by whitespace, the start of
/// a JSON value, a closing fence, or nothing.
fn strip_language_tag(after_fence: &str) -> &str {
    let tag_len = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_fence.len());
    let rest = &after_fence[tag_len..];

    match rest.chars().next() {
        None => rest,
        Some(c) if c.is_whitespace() || matches!(c, '{' | '[' | '`') => rest,
        Some(_) => after_fence,
    }
}
