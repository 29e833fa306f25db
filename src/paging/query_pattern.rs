//! Page patterns where the page number is a query value, e.g.
//! `http://a.com/forum?page=[*!]&sort=d`.

use super::url::ParsedUrl;
use super::{is_page_param_name_bad, is_plain_number, PagePattern, PAGE_PARAM_PLACEHOLDER};
use crate::patterns::SLASH_OR_HTM_EXT;
use crate::text_utils::to_number;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamPattern {
    pattern: String,
    trimmed_path: String,
    page_param_value: i32,
    /// Offset of the placeholder in `pattern`.
    placeholder_start: usize,
    /// Offset of the `&` or `?` that opens the page parameter.
    segment_start: usize,
    /// Length of the pattern after the placeholder, separator included.
    suffix_len: usize,
    prefix: String,
    suffix: String,
}

impl QueryParamPattern {
    /// Build a pattern from a query pair of `url`. Fails unless the value
    /// is a plain number and the name is not a known non-paging name.
    #[must_use]
    pub fn new(url: &ParsedUrl, name: &str, value: &str) -> Option<Self> {
        if name.is_empty() || is_page_param_name_bad(name) {
            return None;
        }
        let page_param_value = to_number(value)?;

        let pattern = url.replace_query_value(name, value, PAGE_PARAM_PLACEHOLDER);
        ParsedUrl::parse(&pattern)?;
        let placeholder_start = pattern.find(PAGE_PARAM_PLACEHOLDER)?;
        let before = &pattern[..placeholder_start];
        let query_start = before.rfind('?')?;
        let segment_start = before.rfind('&').filter(|&amp| amp > query_start).unwrap_or(query_start);

        let suffix_len = pattern.len() - placeholder_start - PAGE_PARAM_PLACEHOLDER.len();
        let suffix = if suffix_len == 0 {
            String::new()
        } else {
            pattern[pattern.len() - suffix_len + 1..].to_string()
        };

        Some(Self {
            prefix: pattern[..segment_start].to_string(),
            trimmed_path: url.trimmed_path().to_string(),
            pattern,
            page_param_value,
            placeholder_start,
            segment_start,
            suffix_len,
            suffix,
        })
    }
}

impl PagePattern for QueryParamPattern {
    fn as_str(&self) -> &str {
        &self.pattern
    }

    fn page_param_value(&self) -> i32 {
        self.page_param_value
    }

    /// Pages that only differ in the query share the document's path.
    fn is_valid_for(&self, doc_url: &ParsedUrl) -> bool {
        doc_url.trimmed_path().eq_ignore_ascii_case(&self.trimmed_path)
    }

    fn is_paging_url(&self, url: &str) -> bool {
        if self.suffix_len != 0 && !url.ends_with(&self.suffix) {
            return false;
        }
        let Some(suffix_start) = url.len().checked_sub(self.suffix_len) else {
            return false;
        };
        if !url.starts_with(&self.prefix) {
            return false;
        }
        if self.segment_start == suffix_start {
            return true;
        }
        let Some(diff) = url.get(self.segment_start..suffix_start) else {
            return false;
        };
        // `foo.com/a/b` or `foo.com/a/b.html` is the first page of
        // `foo.com/a/b?page=[*!]`.
        if SLASH_OR_HTM_EXT.is_match(&diff.to_ascii_lowercase()) {
            return true;
        }

        let name_part = &self.pattern[self.segment_start..self.placeholder_start];
        if url.get(self.segment_start..self.placeholder_start) != Some(name_part) {
            return false;
        }
        url.get(self.placeholder_start..suffix_start)
            .is_some_and(is_plain_number)
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn suffix(&self) -> &str {
        &self.suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(url: &str, name: &str, value: &str) -> Option<QueryParamPattern> {
        QueryParamPattern::new(&ParsedUrl::parse(url).unwrap(), name, value)
    }

    fn is_paging(pattern_url: &str, url: &str) -> bool {
        let parsed = ParsedUrl::parse(pattern_url).unwrap();
        let (name, value) = parsed
            .query_params()
            .into_iter()
            .find(|(_, v)| v == "1")
            .unwrap();
        let pattern = QueryParamPattern::new(&parsed, &name, &value).unwrap();
        pattern.is_paging_url(url)
    }

    #[test]
    fn test_creation() {
        let p = pattern("http://www.foo.com/a/b?queryA=v1&queryB=2&queryC=v3", "queryB", "2").unwrap();
        assert_eq!(p.as_str(), "http://www.foo.com/a/b?queryA=v1&queryB=[*!]&queryC=v3");
        assert_eq!(p.page_param_value(), 2);
        assert_eq!(p.prefix(), "http://www.foo.com/a/b?queryA=v1");
        assert_eq!(p.suffix(), "queryC=v3");

        assert!(pattern("http://www.foo.com/a/b?tag=2", "tag", "2").is_none());
        assert!(pattern("http://www.foo.com/a/b?page=two", "page", "two").is_none());
        assert!(pattern("http://www.foo.com/a/b?page=", "page", "").is_none());
    }

    #[test]
    fn test_is_paging_url() {
        let pat = "http://www.foo.com/a/b?queryA=v1&queryB=1&queryC=v3";
        assert!(is_paging(pat, "http://www.foo.com/a/b?queryA=v1&queryB=4&queryC=v3"));
        assert!(is_paging(pat, "http://www.foo.com/a/b?queryA=v1&queryC=v3"));
        assert!(!is_paging(pat, "http://www.foo.com/a/b?queryA=v1&queryB=bar&queryC=v3"));
        assert!(!is_paging(pat, "http://www.foo.com/a/b?queryA=v1&queryC=v3&queryB=4"));
        assert!(!is_paging(pat, "http://www.foo.com/a/b?queryA=v1"));

        let pat = "http://www.foo.com/a/b?page=1";
        assert!(is_paging(pat, "http://www.foo.com/a/b?page=3"));
        assert!(is_paging(pat, "http://www.foo.com/a/b"));
        assert!(is_paging(pat, "http://www.foo.com/a/b.html"));
        assert!(is_paging(pat, "http://www.foo.com/a/b.htm"));
        assert!(is_paging(pat, "http://www.foo.com/a/b/"));
        assert!(!is_paging(pat, "http://www.foo.com/a/b?page=x"));
        assert!(!is_paging(pat, "http://www.foo.com/a/b.shtml"));
        assert!(!is_paging(pat, "http://www.foo.com/a/c?page=3"));
    }

    #[test]
    fn test_is_valid_for() {
        let p = pattern("http://www.foo.com/forum-12?page=2&sort=d", "page", "2").unwrap();
        assert!(p.is_valid_for(&ParsedUrl::parse("http://www.foo.com/forum-12?sid=12345").unwrap()));
        assert!(p.is_valid_for(&ParsedUrl::parse("http://www.foo.com/Forum-12/").unwrap()));
        assert!(!p.is_valid_for(&ParsedUrl::parse("http://www.foo.com/forum-13?page=2").unwrap()));
    }
}
