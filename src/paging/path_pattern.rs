//! Page patterns where the page number is in the path, e.g.
//! `http://a.com/thread/12/page/[*!]` or `http://a.com/story-[*!].html`.

use super::url::ParsedUrl;
use super::{is_page_param_name_bad, is_plain_number, PagePattern, PAGE_PARAM_PLACEHOLDER};
use crate::patterns::{HTM_EXT_ONLY, LAST_PATH_COMPONENT};
use crate::text_utils::to_number;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComponentPattern {
    url: ParsedUrl,
    page_param_value: i32,
    /// Index of the path component holding the placeholder.
    param_index: usize,
    placeholder_start: usize,
    /// Offset of the `/` that opens the placeholder's component.
    segment_start: usize,
    prefix: String,
    suffix: String,
}

impl PathComponentPattern {
    /// Build a pattern by replacing the digits at `digit_start..digit_end`
    /// of `url` with the placeholder.
    #[must_use]
    pub fn new(url: &ParsedUrl, digit_start: usize, digit_end: usize) -> Option<Self> {
        let url_str = url.as_str();
        if digit_start >= digit_end
            || is_last_numeric_path_component_bad(url_str, url.path_start(), digit_start, digit_end)
        {
            return None;
        }
        let page_param_value = to_number(url_str.get(digit_start..digit_end)?)?;

        let pattern = format!(
            "{}{PAGE_PARAM_PLACEHOLDER}{}",
            &url_str[..digit_start],
            &url_str[digit_end..]
        );
        let parsed = ParsedUrl::parse(&pattern)?;
        if parsed.as_str() != pattern {
            return None;
        }
        let placeholder_start = digit_start;
        let segment_start = pattern[..placeholder_start].rfind('/')?;
        let components = parsed.path_components();
        let param_index = components
            .iter()
            .position(|c| c.contains(PAGE_PARAM_PLACEHOLDER))
            .unwrap_or(components.len());

        Some(Self {
            prefix: pattern[..segment_start].to_string(),
            suffix: pattern[placeholder_start + PAGE_PARAM_PLACEHOLDER.len()..].to_string(),
            url: parsed,
            page_param_value,
            param_index,
            placeholder_start,
            segment_start,
        })
    }

    fn pattern(&self) -> &str {
        self.url.as_str()
    }

    fn is_placeholder_at_component_start(&self) -> bool {
        self.placeholder_start > 0 && self.pattern().as_bytes()[self.placeholder_start - 1] == b'/'
    }

    /// Compare path components, skipping the placeholder's one. A document
    /// URL with one component fewer lines up with the components after it.
    fn has_same_path_components(&self, url_components: &[&str], pattern_components: &[&str]) -> bool {
        let (mut i, mut j) = (0, 0);
        let mut passed_param = false;
        while i < url_components.len() && j < pattern_components.len() {
            if i == self.param_index && !passed_param {
                passed_param = true;
                if url_components.len() >= pattern_components.len() {
                    i += 1;
                }
                j += 1;
                continue;
            }
            if !url_components[i].eq_ignore_ascii_case(pattern_components[j]) {
                return false;
            }
            i += 1;
            j += 1;
        }
        true
    }

    /// `/2012/01/[*!]` is a day of a calendar, not a page.
    fn is_calendar_page(&self, pattern_components: &[&str]) -> bool {
        if self.param_index < 2 || self.param_index >= pattern_components.len() {
            return false;
        }
        if pattern_components[self.param_index].len() != PAGE_PARAM_PLACEHOLDER.len() {
            return false;
        }
        let month = to_number(pattern_components[self.param_index - 1]);
        if !month.is_some_and(|m| (1..=12).contains(&m)) {
            return false;
        }
        let year = to_number(pattern_components[self.param_index - 2]);
        year.is_some_and(|y| y > 1970 && y < 3000)
    }

    fn is_paging_url_at_component_start(&self, url: &str) -> bool {
        let url_len = url.len();
        let suffix_len = self.suffix.len();
        let Some(suffix_start) = url_len.checked_sub(suffix_len) else {
            return false;
        };

        // `/a/[*!]/b` also covers `/b`, with the parent component dropped.
        let path_start = self.url.path_start();
        if let Some(search_end) = self.segment_start.checked_sub(path_start + 1) {
            let path = self.url.path();
            if let Some(prev_slash) = path.get(..=search_end).and_then(|p| p.rfind('/')) {
                let prev_pos = prev_slash + path_start;
                if prev_pos + suffix_len == url_len {
                    return url.get(..prev_pos) == self.pattern().get(..prev_pos);
                }
            }
        }

        if !url.starts_with(&self.prefix) {
            return false;
        }
        let accepted_len = self.segment_start + suffix_len;
        if accepted_len == url_len {
            return true;
        }
        if accepted_len > url_len || url.as_bytes()[self.segment_start] != b'/' {
            return false;
        }
        url.get(self.segment_start + 1..suffix_start)
            .is_some_and(is_plain_number)
    }

    fn is_paging_url_inside_component(&self, url: &str) -> bool {
        let Some(suffix_start) = url.len().checked_sub(self.suffix.len()) else {
            return false;
        };
        if !url.starts_with(&self.prefix) {
            return false;
        }
        let url_bytes = url.as_bytes();
        let pattern_bytes = self.pattern().as_bytes();
        let max_pos = self.placeholder_start.min(suffix_start);
        let mut first_diff = self.segment_start;
        while first_diff < max_pos && url_bytes[first_diff] == pattern_bytes[first_diff] {
            first_diff += 1;
        }

        if first_diff == suffix_start {
            // `/abc-[*!].html` covers `/abc.html`.
            return first_diff + 1 == self.placeholder_start
                && is_page_param_separator(pattern_bytes[first_diff]);
        }
        if first_diff == self.placeholder_start {
            return url
                .get(first_diff..suffix_start)
                .is_some_and(is_plain_number);
        }
        false
    }
}

impl PagePattern for PathComponentPattern {
    fn as_str(&self) -> &str {
        self.pattern()
    }

    fn page_param_value(&self) -> i32 {
        self.page_param_value
    }

    fn is_valid_for(&self, doc_url: &ParsedUrl) -> bool {
        let url_components = doc_url.path_components();
        let pattern_components = self.url.path_components();
        if url_components.len() > pattern_components.len() {
            return false;
        }

        // With a single component, the document's must resemble the
        // pattern's: `/article-2.html` for `/article-[*!].html`.
        if url_components.len() == 1 && pattern_components.len() == 1 {
            let url_component = url_components[0];
            let pattern_component = pattern_components[0];
            let common_prefix = common_prefix_len(url_component, pattern_component);
            let common_suffix = common_suffix_len(url_component, pattern_component, common_prefix);
            return (common_prefix + common_suffix) * 2 >= url_component.len();
        }

        self.has_same_path_components(&url_components, &pattern_components)
            && !self.is_calendar_page(&pattern_components)
    }

    fn is_paging_url(&self, url: &str) -> bool {
        if !self.suffix.is_empty() && !url.ends_with(&self.suffix) {
            return false;
        }
        if self.is_placeholder_at_component_start() {
            self.is_paging_url_at_component_start(url)
        } else {
            self.is_paging_url_inside_component(url)
        }
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn suffix(&self) -> &str {
        &self.suffix
    }
}

fn is_page_param_separator(b: u8) -> bool {
    matches!(b, b'-' | b'_' | b';' | b',')
}

/// Rejects `/tag/2` or `/wiki/2.html`: a number forming a whole trailing
/// component after a non-paging name.
pub(crate) fn is_last_numeric_path_component_bad(
    url: &str,
    path_start: usize,
    digit_start: usize,
    digit_end: usize,
) -> bool {
    if digit_start == 0 || path_start + 1 >= digit_start {
        return false;
    }
    if url.as_bytes()[digit_start - 1] != b'/' {
        return false;
    }
    let rest = url.get(digit_end..).unwrap_or_default();
    let post_match = rest.split(['?', '#']).next().unwrap_or_default();
    if !HTM_EXT_ONLY.is_match(post_match) {
        return false;
    }
    url.get(path_start + 1..digit_start)
        .and_then(|head| LAST_PATH_COMPONENT.captures(head))
        .and_then(|caps| caps.get(1))
        .is_some_and(|name| is_page_param_name_bad(name.as_str()))
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

/// Common suffix length, not reaching into the first `start_limit` bytes of
/// either string.
fn common_suffix_len(a: &str, b: &str, start_limit: usize) -> usize {
    a.bytes()
        .rev()
        .zip(b.bytes().rev())
        .take(a.len().min(b.len()).saturating_sub(start_limit))
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build the pattern for the last `1` in the path of `pattern_url`.
    fn pattern(pattern_url: &str) -> PathComponentPattern {
        let url = ParsedUrl::parse(pattern_url).unwrap();
        let start = url.path_start() + url.path().rfind('1').unwrap();
        PathComponentPattern::new(&url, start, start + 1).unwrap()
    }

    fn is_paging(pattern_url: &str, url: &str) -> bool {
        pattern(pattern_url).is_paging_url(url)
    }

    fn is_valid(pattern_url: &str, doc_url: &str) -> bool {
        pattern(pattern_url).is_valid_for(&ParsedUrl::parse(doc_url).unwrap())
    }

    #[test]
    fn test_creation() {
        let p = pattern("http://www.foo.com/a/1/abc.html");
        assert_eq!(p.as_str(), "http://www.foo.com/a/[*!]/abc.html");
        assert_eq!(p.page_param_value(), 1);
        assert_eq!(p.prefix(), "http://www.foo.com/a");
        assert_eq!(p.suffix(), "/abc.html");
    }

    #[test]
    fn test_placeholder_at_component_start() {
        let pat = "http://www.foo.com/a/1/abc.html";
        assert!(is_paging(pat, "http://www.foo.com/abc.html"));
        assert!(is_paging(pat, "http://www.foo.com/a/abc.html"));
        assert!(is_paging(pat, "http://www.foo.com/a/2/abc.html"));
        assert!(!is_paging(pat, "http://www.foo.com/a/b/abc.html"));
        assert!(!is_paging(pat, "http://www.foo.com/a/2/abc.htm"));

        let pat = "http://www.foo.com/a/page/1";
        assert!(is_paging(pat, "http://www.foo.com/a"));
        assert!(is_paging(pat, "http://www.foo.com/a/page"));
        assert!(is_paging(pat, "http://www.foo.com/a/page/2"));
        assert!(!is_paging(pat, "http://www.foo.com/a/page/b"));
        assert!(!is_paging(pat, "http://www.foo.com/m/page/2"));

        let pat = "http://www.foo.com/a/page/1page";
        assert!(is_paging(pat, "http://www.foo.com/a/page/2page"));
        assert!(!is_paging(pat, "http://www.foo.com/a/page/2"));
    }

    #[test]
    fn test_placeholder_inside_component() {
        let pat = "http://www.foo.com/a/abc-1.html";
        assert!(is_paging(pat, "http://www.foo.com/a/abc.html"));
        assert!(is_paging(pat, "http://www.foo.com/a/abc-2.html"));
        assert!(!is_paging(pat, "http://www.foo.com/a/abc-page.html"));

        let pat = "http://www.foo.com/a/abc1.html";
        assert!(!is_paging(pat, "http://www.foo.com/a/abc.html"));
        assert!(is_paging(pat, "http://www.foo.com/a/abc2.html"));

        let pat = "http://www.foo.com/a-1-c-3";
        assert!(is_paging(pat, "http://www.foo.com/a-c-3"));
        assert!(is_paging(pat, "http://www.foo.com/a-2-c-3"));

        let pat = "http://www.foo.com/a/abc-1";
        assert!(!is_paging(pat, "http://www.foo.com/a/2"));
        assert!(!is_paging(pat, "http://www.foo.com/a"));
    }

    #[test]
    fn test_is_valid_for() {
        assert!(is_valid("http://www.foo.com/thread/12/page/1", "http://www.foo.com/thread/12"));
        assert!(is_valid("http://www.foo.com/thread/12/1/foo", "http://www.foo.com/thread/12/foo"));
        assert!(!is_valid("http://www.foo.com/thread/12/page/1/foo", "http://www.foo.com/thread/12/foo"));
        assert!(!is_valid("http://www.foo.com/a/page/1", "http://www.foo.com/a/b/c/d"));

        assert!(is_valid("http://www.foo.com/article-1.html", "http://www.foo.com/article.html"));
        assert!(!is_valid("http://www.foo.com/article-1.html", "http://www.foo.com/other-thing-entirely"));
    }

    #[test]
    fn test_calendar_pages_are_rejected() {
        assert!(!is_valid("http://www.foo.com/forum-12/food/2012/02/1", "http://www.foo.com/forum-12/food"));
        assert!(is_valid("http://www.foo.com/forum-12/food/2012/13/1", "http://www.foo.com/forum-12/food"));
    }

    #[test]
    fn test_bad_last_component() {
        let url = "http://www.foo.com/wiki/2";
        assert!(is_last_numeric_path_component_bad(url, 18, 24, 25));
        let url = "http://www.foo.com/wiki/2.html";
        assert!(is_last_numeric_path_component_bad(url, 18, 24, 25));
        let url = "http://www.foo.com/good/2";
        assert!(!is_last_numeric_path_component_bad(url, 18, 24, 25));
        let url = "http://www.foo.com/2";
        assert!(!is_last_numeric_path_component_bad(url, 18, 19, 20));
        let url = "http://www.foo.com/tag/2-more";
        assert!(!is_last_numeric_path_component_bad(url, 18, 23, 24));

        let parsed = ParsedUrl::parse("http://www.foo.com/tag/2").unwrap();
        assert!(PathComponentPattern::new(&parsed, 23, 24).is_none());
    }
}
