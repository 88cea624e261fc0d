//! Query-centered preview snippets.

use crate::text::find_ci_chars;

/// Characters kept on each side of a match.
pub const DEFAULT_RADIUS: usize = 60;

const ELLIPSIS: &str = "...";

/// Cut a preview of `text` around the first case-insensitive occurrence of
/// `query`.
///
/// With a match, the window spans `radius` characters before the match
/// through `radius` characters after it, with `...` marking each side that
/// was cut. Without a match, the first `radius * 2` characters are kept.
pub fn excerpt(text: &str, query: &str, radius: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let needle: Vec<char> = query.chars().collect();

    match find_ci_chars(&chars, &needle) {
        Some(pos) => {
            let start = pos.saturating_sub(radius);
            let end = (pos + needle.len() + radius).min(chars.len());

            let mut out = String::new();
            if start > 0 {
                out.push_str(ELLIPSIS);
            }
            out.extend(&chars[start..end]);
            if end < chars.len() {
                out.push_str(ELLIPSIS);
            }
            out
        }
        None => {
            let keep = radius.saturating_mul(2);
            let mut out: String = chars.iter().take(keep).collect();
            if chars.len() > keep {
                out.push_str(ELLIPSIS);
            }
            out
        }
    }
}
