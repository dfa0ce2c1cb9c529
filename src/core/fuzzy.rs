//! Candidate filter: case-insensitive subsequence match per query token.
//!
//! Accept/reject only. Results keep candidate order so they can be emitted
//! while the scan is still running.

/// Whether every whitespace-separated token of `query` matches `text`.
///
/// An empty or all-whitespace query accepts everything.
pub fn matches_query(query: &str, text: &str) -> bool {
    let text_lower = text.to_lowercase();
    query
        .split_whitespace()
        .all(|token| matches_token(&token.to_lowercase(), &text_lower))
}

/// Subsequence match of one lowercase token.
///
/// Tokens made of letters then digits (or digits then letters) also try the
/// swapped order, so `ab12` finds `12ab`.
pub fn matches_token(token: &str, text_lower: &str) -> bool {
    if is_subsequence(token, text_lower) {
        return true;
    }
    match swapped_token(token) {
        Some(swapped) => is_subsequence(&swapped, text_lower),
        None => false,
    }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle.chars().all(|wanted| hay.any(|ch| ch == wanted))
}

fn swapped_token(token: &str) -> Option<String> {
    let split = token
        .char_indices()
        .find(|(_, ch)| ch.is_ascii_digit() != token.starts_with(|c: char| c.is_ascii_digit()))
        .map(|(idx, _)| idx)?;
    let (head, tail) = token.split_at(split);
    let head_digits = head.chars().all(|ch| ch.is_ascii_digit());
    let tail_digits = tail.chars().all(|ch| ch.is_ascii_digit());
    let head_letters = head.chars().all(|ch| ch.is_ascii_lowercase());
    let tail_letters = tail.chars().all(|ch| ch.is_ascii_lowercase());

    if (head_letters && tail_digits) || (head_digits && tail_letters) {
        Some(format!("{tail}{head}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{matches_query, matches_token};

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches_query("", "anything"));
        assert!(matches_query("   ", ""));
    }

    #[test]
    fn tokens_match_as_subsequences_ignoring_case() {
        assert!(matches_query("SbK", "Sheet1 Book.xlsx"));
        assert!(!matches_query("kbs", "Sheet1 Book.xlsx"));
    }

    #[test]
    fn all_tokens_must_match() {
        assert!(matches_query("alpha beta", "beta alpha"));
        assert!(!matches_query("alpha gamma", "beta alpha"));
    }

    #[test]
    fn letter_digit_tokens_try_swapped_order() {
        assert!(matches_token("ab12", "12ab"));
        assert!(matches_token("12ab", "ab12"));
        assert!(!matches_token("a1b2", "21ba"));
    }
}
