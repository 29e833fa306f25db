//! Document title extraction.
//!
//! The `<title>` text is cleaned of site names the way readability does it:
//! split on ` | `/` - ` or `: `, and fall back to the first visible `<h1>`
//! when the title is implausibly short or long.

use crate::dom::{self, Document};
use crate::patterns::{
    TITLE_AFTER_FIRST_COLON, TITLE_AFTER_FIRST_SEPARATOR, TITLE_AFTER_LAST_COLON,
    TITLE_BEFORE_LAST_SEPARATOR, TITLE_SITE_SEPARATOR,
};
use crate::text_utils::count_words;

/// A cleaned title with this few words is not trusted over the original.
const MIN_CLEANED_WORDS: usize = 4;

/// Text of the first `<title>` element, untrimmed. Empty if there is none.
#[must_use]
pub fn raw_title(doc: &Document) -> String {
    doc.select("title")
        .nodes()
        .first()
        .map(|t| dom::text_content(t).to_string())
        .unwrap_or_default()
}

fn first_h1(doc: &Document) -> String {
    doc.select("h1")
        .nodes()
        .iter()
        .map(dom::inner_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Clean a raw title, using the document's headings when needed.
#[must_use]
pub fn clean_title(original: &str, doc: &Document) -> String {
    if original.is_empty() {
        return String::new();
    }

    let mut current = original.to_string();
    if TITLE_SITE_SEPARATOR.is_match(original) {
        current = TITLE_BEFORE_LAST_SEPARATOR
            .replace_all(original, "$1")
            .into_owned();
        if count_words(&current) < 3 {
            current = TITLE_AFTER_FIRST_SEPARATOR
                .replace_all(original, "$1")
                .into_owned();
        }
    } else if original.contains(": ") {
        current = TITLE_AFTER_LAST_COLON.replace_all(original, "$1").into_owned();
        if count_words(&current) < 3 {
            current = TITLE_AFTER_FIRST_COLON
                .replace_all(original, "$1")
                .into_owned();
        }
    } else {
        let len = original.chars().count();
        if len > 150 || len < 15 {
            current = first_h1(doc);
            if current.is_empty() {
                current = original.to_string();
            }
        }
    }

    let current = current.trim();
    if count_words(current) <= MIN_CLEANED_WORDS {
        original.to_string()
    } else {
        current.to_string()
    }
}

/// The cleaned document title.
#[must_use]
pub fn document_title(doc: &Document) -> String {
    clean_title(&raw_title(doc), doc)
}

/// Candidate titles in priority order: the raw title and its cleaned form,
/// without duplicates or empty strings.
#[must_use]
pub fn candidate_titles(doc: &Document) -> Vec<String> {
    let raw = raw_title(doc);
    let cleaned = clean_title(&raw, doc);
    let mut titles: Vec<String> = Vec::new();
    for title in [raw, cleaned] {
        if !title.trim().is_empty() && !titles.contains(&title) {
            titles.push(title);
        }
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str) -> String {
        document_title(&dom::parse(html))
    }

    #[test]
    fn test_site_name_after_separator_removed() {
        let html = "<html><head><title>Big Storm Hits The Coast Tonight | Daily News</title></head></html>";
        assert_eq!(title_of(html), "Big Storm Hits The Coast Tonight");
    }

    #[test]
    fn test_site_name_before_separator_removed() {
        let html = "<html><head><title>News - Big Storm Hits The Coast Tonight</title></head></html>";
        // The part before the separator is too short, so the tail is used.
        assert_eq!(title_of(html), "Big Storm Hits The Coast Tonight");
    }

    #[test]
    fn test_colon_takes_last_part() {
        let html = "<html><head><title>Weather: Big Storm Hits The Coast Tonight</title></head></html>";
        assert_eq!(title_of(html), "Big Storm Hits The Coast Tonight");
    }

    #[test]
    fn test_short_title_uses_h1() {
        let html = "<html><head><title>Story</title></head><body><h1>A Much Longer Heading For The Story</h1></body></html>";
        assert_eq!(title_of(html), "A Much Longer Heading For The Story");
    }

    #[test]
    fn test_short_cleaned_title_keeps_original() {
        let html = "<html><head><title>Short | Site</title></head></html>";
        assert_eq!(title_of(html), "Short | Site");
    }

    #[test]
    fn test_missing_title() {
        assert_eq!(title_of("<html><body><p>x</p></body></html>"), "");
        assert!(candidate_titles(&dom::parse("<p>x</p>")).is_empty());
    }

    #[test]
    fn test_candidates_are_deduplicated() {
        let doc = dom::parse("<html><head><title>A Plain Enough Title For Testing</title></head></html>");
        assert_eq!(candidate_titles(&doc), vec!["A Plain Enough Title For Testing".to_string()]);

        let doc = dom::parse("<html><head><title>Big Storm Hits The Coast Tonight | Daily News</title></head></html>");
        assert_eq!(candidate_titles(&doc).len(), 2);
    }
}
