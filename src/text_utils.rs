//! Small string helpers shared by the block builder, the classifier and the
//! paging detectors.

use crate::patterns::{DIGIT, WHITESPACE_NORMALIZE, WORD};

/// Check whether a string contains only whitespace (or nothing).
///
/// Non-breaking spaces count as whitespace.
#[must_use]
pub fn is_all_whitespace(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace() || c == '\u{00A0}')
}

/// Count words using the terms pattern.
#[must_use]
pub fn count_words(s: &str) -> usize {
    WORD.find_iter(s).count()
}

/// Parse a string made only of ASCII digits.
///
/// Returns `None` for an empty string, any non-digit character, or a value
/// that does not fit in `i32`.
#[must_use]
pub fn to_number(s: &str) -> Option<i32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Check whether a string contains at least one digit.
#[must_use]
pub fn contains_digit(s: &str) -> bool {
    DIGIT.is_match(s)
}

/// Parse the leading integer of a string the way `parseInt(s, 10)` does:
/// optional leading whitespace and sign, then digits. Anything else yields
/// `None`.
#[must_use]
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Collapse whitespace runs to a single space and trim.
#[must_use]
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(s, " ").trim().to_string()
}
