//! Compiled regex patterns used across the extraction pipeline.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the pass that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Text Patterns
// =============================================================================

/// Matches a single word: any non-space run containing a letter or digit,
/// including Latin-1 supplement through CJK ranges.
pub static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\S*[\w\x{00C0}-\x{1FFF}\x{2C00}-\x{D7FF}]\S*").expect("WORD regex")
});

/// Matches runs of whitespace for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

// =============================================================================
// Block Labelling Patterns
// =============================================================================

/// Matches class/id values that mark a comment section.
pub static COMMENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcomments?\b").expect("COMMENT_CLASS regex"));

/// Matches short blocks that start the comment section or other trailing
/// boilerplate of an article.
pub static TERMINATING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^(comments|© reuters|please rate this|post a comment|\d+\s+(comments|users responded in))|what you think\.\.\.|add your comment|add comment|reader views|have your say|reader comments|rätta artikeln|^thanks for your comments - this feedback is now closed$)",
    )
    .expect("TERMINATING_BLOCK regex")
});

// =============================================================================
// Title Patterns
// =============================================================================

/// Separators tried in turn when looking for the longest title part.
pub static TITLE_PART_SEPARATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"[ ]*[\|»|-][ ]*",
        r"[ ]*[\|»|:][ ]*",
        r"[ ]*[\|»|:\(\)][ ]*",
        r"[ ]*[\|»|:\(\)\-][ ]*",
        r"[ ]*[\|»|,|:\(\)\-][ ]*",
        r"[ ]*[\|»|,|:\(\)\-\x{00A0}][ ]*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("TITLE_PART_SEPARATORS regex"))
    .collect()
});

/// Separators whose every long-enough part is itself a candidate title.
pub static TITLE_SPACED_SEPARATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"[ ]+[\|][ ]+", r"[ ]+[\-][ ]+"]
        .iter()
        .map(|p| Regex::new(p).expect("TITLE_SPACED_SEPARATORS regex"))
        .collect()
});

/// Matches a trailing ` - site name` segment.
pub static TITLE_TRAILING_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" - [^\-]+$").expect("TITLE_TRAILING_SEGMENT regex"));

/// Matches a leading `site name - ` segment.
pub static TITLE_LEADING_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\-]+ - ").expect("TITLE_LEADING_SEGMENT regex"));

/// Matches punctuation stripped before a second title comparison.
pub static TITLE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\?\!\.\-\:]+").expect("TITLE_PUNCTUATION regex"));

/// Matches the ` | ` or ` - ` separator between an article title and a site name.
pub static TITLE_SITE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\|\-] ").expect("TITLE_SITE_SEPARATOR regex"));

/// Everything before the last ` | ` / ` - ` style separator.
pub static TITLE_BEFORE_LAST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)[\|\-] .*").expect("TITLE_BEFORE_LAST_SEPARATOR regex"));

/// Everything after the first `|` or `-`.
pub static TITLE_AFTER_FIRST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\|\-]*[\|\-](.*)").expect("TITLE_AFTER_FIRST_SEPARATOR regex")
});

/// Everything after the last colon.
pub static TITLE_AFTER_LAST_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*:(.*)").expect("TITLE_AFTER_LAST_COLON regex"));

/// Everything after the first colon.
pub static TITLE_AFTER_FIRST_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^:]*[:](.*)").expect("TITLE_AFTER_FIRST_COLON regex"));

// =============================================================================
// Paging Link Patterns
// =============================================================================

/// Next page: next, continue, >, >>, » but not >|, »| which usually mean last.
pub static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(next|weiter|continue|>([^\|]|$)|»([^\|]|$))").expect("NEXT_LINK regex")
});

pub static PREV_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(prev|early|old|new|<|«)").expect("PREV_LINK regex"));

pub static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|main|page|pagination|post|text|blog|story")
        .expect("POSITIVE regex")
});

pub static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|shoutbox|sidebar|sponsor|shopping|tags|tool|widget",
    )
    .expect("NEGATIVE regex")
});

pub static EXTRANEOUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)print|archive|comment|discuss|e[\-]?mail|share|reply|all|login|sign|single|as one|article",
    )
    .expect("EXTRANEOUS regex")
});

pub static PAGINATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pag(e|ing|inat)").expect("PAGINATION regex"));

/// Paging in a URL: /page/2, ?p=3, ?pagination=34.
pub static LINK_PAGINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)p(a|g|ag)?(e|ing|ination)?(=|/)[0-9]{1,2}$").expect("LINK_PAGINATION regex")
});

pub static FIRST_LAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(first|last)").expect("FIRST_LAST regex"));

/// Matches a trailing slash and/or fragment.
pub static HREF_CLEANER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/?(#.*)?$").expect("HREF_CLEANER regex"));

pub static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("DIGIT regex"));

// =============================================================================
// Page Parameter Patterns
// =============================================================================

/// Brackets removed from anchor text before reading it as a number.
pub static LINK_TEXT_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\[\]{}]").expect("LINK_TEXT_BRACKETS regex"));

/// A term that is a number surrounded only by punctuation, e.g. `[3]` or `3,`.
pub static SURROUNDING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\W_]*(\d+)[\W_]*$").expect("SURROUNDING_DIGITS regex"));

pub static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("DIGITS regex"));

/// A leading slash or a trailing `.htm`/`.html`.
pub static SLASH_OR_HTM_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/|(\.html?)$").expect("SLASH_OR_HTM_EXT regex"));

/// Nothing or only an `.htm`/`.html`/`.shtml` extension.
pub static HTM_EXT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\.s?html?)?$").expect("HTM_EXT_ONLY regex"));

/// The path component just before a trailing slash.
pub static LAST_PATH_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/]*)/$").expect("LAST_PATH_COMPONENT regex"));

/// Link text or parameter values that point at the whole article on one page.
pub static SINGLE_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(all|single([-_ ]?page)?|one[-_ ]?page|(view|show|read|see)[-_ ]+(all|full|entire)([-_ ]+\w+)*|print([-_ ]?(version|view|all))?)\W*$",
    )
    .expect("SINGLE_PAGE regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_matches_terms_with_letters_or_digits() {
        let words: Vec<&str> = WORD.find_iter("Hello, world - 42 ...").map(|m| m.as_str()).collect();
        assert_eq!(words, vec!["Hello,", "world", "42"]);
    }

    #[test]
    fn word_counts_accented_and_cjk_text() {
        assert_eq!(WORD.find_iter("café naïve").count(), 2);
        assert_eq!(WORD.find_iter("日本語").count(), 1);
    }

    #[test]
    fn terminating_block_matches_comment_markers() {
        assert!(TERMINATING_BLOCK.is_match("Comments"));
        assert!(TERMINATING_BLOCK.is_match("23 comments"));
        assert!(TERMINATING_BLOCK.is_match("Add your comment"));
        assert!(TERMINATING_BLOCK.is_match("Have your say"));
        assert!(!TERMINATING_BLOCK.is_match("No comments here in the middle"));
    }

    #[test]
    fn next_link_ignores_last_markers() {
        assert!(NEXT_LINK.is_match("Next page"));
        assert!(NEXT_LINK.is_match(">"));
        assert!(NEXT_LINK.is_match("»"));
        assert!(!NEXT_LINK.is_match(">|"));
        assert!(!NEXT_LINK.is_match("»|"));
    }

    #[test]
    fn link_pagination_matches_paging_urls() {
        assert!(LINK_PAGINATION.is_match("http://a.com/story/page/2"));
        assert!(LINK_PAGINATION.is_match("http://a.com/story?p=3"));
        assert!(LINK_PAGINATION.is_match("http://a.com/story?pg=11"));
        assert!(!LINK_PAGINATION.is_match("http://a.com/story?p=123"));
    }

    #[test]
    fn surrounding_digits_extracts_number() {
        let caps = SURROUNDING_DIGITS.captures("[12]");
        assert_eq!(caps.and_then(|c| c.get(1)).map(|m| m.as_str()), Some("12"));
        assert!(SURROUNDING_DIGITS.captures("a12").is_none());
    }

    #[test]
    fn htm_ext_only_requires_extension_or_nothing() {
        assert!(HTM_EXT_ONLY.is_match(""));
        assert!(HTM_EXT_ONLY.is_match(".html"));
        assert!(HTM_EXT_ONLY.is_match(".shtml"));
        assert!(!HTM_EXT_ONLY.is_match("a"));
        assert!(!HTM_EXT_ONLY.is_match("/more"));
    }

    #[test]
    fn single_page_matches_view_all_variants() {
        assert!(SINGLE_PAGE.is_match("all"));
        assert!(SINGLE_PAGE.is_match("View all"));
        assert!(SINGLE_PAGE.is_match("Single page"));
        assert!(SINGLE_PAGE.is_match("Print"));
        assert!(!SINGLE_PAGE.is_match("Next"));
        assert!(!SINGLE_PAGE.is_match("2"));
    }

    #[test]
    fn whitespace_normalize_collapses_spaces() {
        let result = WHITESPACE_NORMALIZE.replace_all("hello   world", " ");
        assert_eq!(result, "hello world");
    }
}
