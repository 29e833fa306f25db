//! Labels blocks that repeat the document title.

use std::collections::HashSet;

use regex::Regex;

use crate::document::{Label, TextBlock};
use crate::patterns::{
    TITLE_LEADING_SEGMENT, TITLE_PART_SEPARATORS, TITLE_PUNCTUATION, TITLE_SPACED_SEPARATORS,
    TITLE_TRAILING_SEGMENT,
};
use crate::text_utils::count_words;

/// Parts split off by a spaced separator need this many words to count as a
/// title on their own.
const MIN_PART_WORDS: usize = 4;

/// Matches block texts against a set of title variants.
#[derive(Debug, Clone, Default)]
pub struct TitleMatcher {
    variants: HashSet<String>,
    /// Normalised candidate titles and their word counts.
    titles: Vec<(String, usize)>,
}

fn normalize(text: &str) -> String {
    text.replace('\u{00A0}', " ")
        .replace('\'', "")
        .trim()
        .to_lowercase()
}

/// Split like `String.split` in most languages: trailing empty parts are
/// dropped.
fn split_parts<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    let mut parts: Vec<&str> = pattern.split(text).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

fn longest_part(title: &str, pattern: &Regex) -> Option<String> {
    let parts = split_parts(pattern, title);
    if parts.len() <= 1 {
        return None;
    }
    let mut longest_words = 0;
    let mut longest = "";
    for part in parts.into_iter().filter(|p| !p.contains(".com")) {
        let words = count_words(part);
        if words > longest_words || part.len() > longest.len() {
            longest_words = words;
            longest = part;
        }
    }
    if longest.is_empty() {
        None
    } else {
        Some(longest.trim().to_string())
    }
}

impl TitleMatcher {
    #[must_use]
    pub fn new(candidate_titles: &[String]) -> Self {
        let mut matcher = Self::default();
        for title in candidate_titles {
            matcher.add_title(title);
        }
        matcher
    }

    fn add_title(&mut self, title: &str) {
        let title = normalize(title);
        if title.is_empty() || !self.variants.insert(title.clone()) {
            return;
        }
        self.titles.push((title.clone(), count_words(&title)));

        for pattern in TITLE_PART_SEPARATORS.iter() {
            if let Some(part) = longest_part(&title, pattern) {
                self.variants.insert(part);
            }
        }
        for pattern in TITLE_SPACED_SEPARATORS.iter() {
            let parts = split_parts(pattern, &title);
            if parts.len() > 1 {
                for part in parts {
                    if !part.contains(".com") && count_words(part) >= MIN_PART_WORDS {
                        self.variants.insert(part.to_string());
                    }
                }
            }
        }
        self.variants
            .insert(TITLE_TRAILING_SEGMENT.replace(&title, "").into_owned());
        self.variants
            .insert(TITLE_LEADING_SEGMENT.replace(&title, "").into_owned());
    }

    /// Whether the text of a block is one of the title variants, or wraps
    /// a candidate title in only a little extra text.
    #[must_use]
    pub fn matches(&self, block: &TextBlock) -> bool {
        let text = normalize(&block.text);
        if text.is_empty() {
            return false;
        }
        if self.variants.contains(&text) {
            return true;
        }
        let stripped = TITLE_PUNCTUATION.replace_all(&text, "");
        if self.variants.contains(stripped.trim()) {
            return true;
        }
        self.titles.iter().any(|(title, words)| {
            *words > 0 && block.num_words <= words * 2 && text.contains(title.as_str())
        })
    }

    /// Label matching blocks `TITLE`.
    pub fn process(&self, blocks: &mut [TextBlock]) -> bool {
        let mut changed = false;
        for block in blocks.iter_mut() {
            if self.matches(block) {
                block.add_label(Label::Title);
                changed = true;
            }
        }
        changed
    }

    #[cfg(test)]
    fn has_variant(&self, variant: &str) -> bool {
        self.variants.contains(variant)
    }
}
