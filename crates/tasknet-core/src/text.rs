//! Case-insensitive substring matching.
//!
//! Comparison is per character using Unicode lowercase mappings, and
//! positions are character offsets rather than byte offsets, so callers can
//! slice windows without landing inside a multi-byte sequence.

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Character offset of the first case-insensitive occurrence of `needle`
/// in `haystack`.
pub fn find_ci_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| {
        haystack[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_eq_ci(*a, *b))
    })
}

/// Like [`find_ci_chars`], over string slices.
pub fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack: Vec<char> = haystack.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    find_ci_chars(&haystack, &needle)
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    find_ci(haystack, needle).is_some()
}

/// Full Unicode lowercase of `s`, for backends whose own matching only
/// folds ASCII.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find_ci("Quarterly BUDGET review", "budget"), Some(10));
        assert!(contains_ci("Quarterly BUDGET review", "Budget"));
    }

    #[test]
    fn test_find_returns_char_offsets() {
        // "é" is two bytes but one character
        assert_eq!(find_ci("café plan", "plan"), Some(5));
        assert_eq!(find_ci("ÉTÉ", "été"), Some(0));
    }

    #[test]
    fn test_find_misses() {
        assert_eq!(find_ci("short", "much longer needle"), None);
        assert!(!contains_ci("roadmap", "budget"));
    }

    #[test]
    fn test_fold_case_lowers_non_ascii() {
        assert_eq!(fold_case("ÉTÉ CAFÉ Plan"), "été café plan");
        assert_eq!(fold_case("ÄRGER"), "ärger");
        assert!(fold_case("ÉTÉ CAFÉ plan").contains(&fold_case("Café")));
    }

    #[test]
    fn test_empty_needle_matches_at_start() {
        assert_eq!(find_ci("anything", ""), Some(0));
    }
}
