//! Page-parameter detection over the monotonic page-number groups.

use std::cmp::Ordering;

use tracing::{debug, instrument};
use url::Url;

use super::groups::MonotonicGroups;
use super::page_info::{PageInfo, PageLinkInfo, PageParamInfo};
use super::parser::parse_page_infos;
use super::path_pattern::PathComponentPattern;
use super::query_pattern::QueryParamPattern;
use super::url::{trim_trailing_slash, ParsedUrl};
use super::{is_plain_number, PagePattern};
use crate::dom::{self, Document};
use crate::patterns::{DIGITS, SINGLE_PAGE};
use crate::url_utils::document_base_url;

/// Pattern candidates keyed by pattern string, in insertion order.
#[derive(Default)]
struct PageCandidates {
    entries: Vec<(Box<dyn PagePattern>, Vec<PageLinkInfo>)>,
}

impl PageCandidates {
    fn add(&mut self, pattern: Box<dyn PagePattern>, link: PageLinkInfo) {
        if let Some((_, links)) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == pattern.as_str())
        {
            links.push(link);
        } else {
            self.entries.push((pattern, vec![link]));
        }
    }

    /// Query and path candidates of one page URL.
    fn add_url(&mut self, page: &PageInfo, pos_in_ascending: usize) {
        let Some(url) = ParsedUrl::parse(&page.url) else {
            return;
        };
        let link_for = |pattern: &dyn PagePattern| PageLinkInfo {
            page_num: page.page_num,
            page_param_value: pattern.page_param_value(),
            pos_in_ascending,
        };

        for (name, value) in url.query_params() {
            if let Some(pattern) = QueryParamPattern::new(&url, &name, &value) {
                let link = link_for(&pattern);
                self.add(Box::new(pattern), link);
            }
        }

        let path_start = url.path_start();
        let path = &url.as_str()[path_start..url.path_end()];
        for digits in DIGITS.find_iter(path) {
            let (start, end) = (path_start + digits.start(), path_start + digits.end());
            if let Some(pattern) = PathComponentPattern::new(&url, start, end) {
                let link = link_for(&pattern);
                self.add(Box::new(pattern), link);
            }
        }
    }
}

/// The best candidate so far, with what is needed to finish it.
struct Best {
    info: PageParamInfo,
    ascending: Vec<PageInfo>,
    prefix: String,
    suffix: String,
}

impl Best {
    /// Add the document as page 1 when it is the missing first page, then
    /// settle the next page.
    fn complete_pages(&mut self, doc_url_str: &str) {
        if self.info.can_insert_first_page(doc_url_str, &self.ascending) {
            self.info.insert_first_page(doc_url_str);
        }
        self.info.determine_next_paging_url(doc_url_str);
    }
}

/// Pick the best page pattern across all groups for the document at
/// `doc_url` (already stripped of its trailing slash).
#[must_use]
pub fn detect_from_groups(groups: &MonotonicGroups, doc_url: &ParsedUrl, doc_url_str: &str) -> Option<PageParamInfo> {
    let mut best = best_candidate(groups, doc_url, doc_url_str)?;
    best.complete_pages(doc_url_str);
    Some(best.info)
}

fn best_candidate(groups: &MonotonicGroups, doc_url: &ParsedUrl, doc_url_str: &str) -> Option<Best> {
    let mut best: Option<Best> = None;
    for group in groups.groups() {
        if group.pages.len() < 2 {
            continue;
        }
        let ascending = group.ascending();
        let first_page_url = match ascending.iter().find(|p| p.page_num == 1) {
            Some(first) if !first.url.is_empty() => first.url.clone(),
            Some(_) => doc_url_str.to_string(),
            None => String::new(),
        };

        let mut candidates = PageCandidates::default();
        for (pos, page) in ascending.iter().enumerate() {
            if !page.url.is_empty() {
                candidates.add_url(page, pos);
            }
        }

        for (pattern, links) in &candidates.entries {
            if !pattern.is_valid_for(doc_url) {
                continue;
            }
            let Some(info) = PageParamInfo::evaluate(pattern.as_ref(), links, &ascending, &first_page_url) else {
                continue;
            };
            debug!(pattern = pattern.as_str(), pages = info.all_page_info.len(), "page pattern candidate");
            if best
                .as_ref()
                .is_none_or(|b| info.compare(&b.info) == Ordering::Greater)
            {
                best = Some(Best {
                    info,
                    ascending: ascending.clone(),
                    prefix: pattern.prefix().to_string(),
                    suffix: pattern.suffix().to_string(),
                });
            }
        }
    }
    best
}

/// A link to the whole article on one page: it fits the winning pattern's
/// prefix and suffix, is none of the detected pages, and its text or
/// parameter value says so.
fn find_single_page_url(doc: &Document, base: &Url, best: &Best, doc_url_str: &str) -> String {
    for link in doc.select("a").nodes() {
        let Some(href) = dom::get_attribute(link, "href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with("javascript:") {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let url = ParsedUrl::from_url(resolved).without_fragment();
        if url == doc_url_str || best.info.all_page_info.iter().any(|p| p.url == url) {
            continue;
        }
        if !url.starts_with(&best.prefix)
            || !url.ends_with(&best.suffix)
            || url.len() < best.prefix.len() + best.suffix.len()
        {
            continue;
        }
        let middle = &url[best.prefix.len()..url.len() - best.suffix.len()];
        let value = middle
            .rsplit(['=', '/'])
            .next()
            .unwrap_or_default()
            .trim_matches(['?', '&']);
        if is_plain_number(value) {
            continue;
        }
        if SINGLE_PAGE.is_match(value) || SINGLE_PAGE.is_match(&dom::inner_text(link)) {
            return url;
        }
    }
    String::new()
}

/// Detect the page parameter of a document.
///
/// Returns an `Unset` info when `doc_url` is invalid or no page pattern
/// fits the document's links.
#[must_use]
#[instrument(skip_all, fields(url = doc_url))]
pub fn detect(doc: &Document, doc_url: &str, max_page_number: i32) -> PageParamInfo {
    let Some(parsed) = ParsedUrl::parse(trim_trailing_slash(doc_url.trim())) else {
        debug!("invalid document url");
        return PageParamInfo::default();
    };
    let doc_url_str = trim_trailing_slash(parsed.as_str()).to_string();
    let base = document_base_url(doc, parsed.url());

    let groups = parse_page_infos(doc, &parsed, &base, max_page_number);
    let Some(mut best) = best_candidate(&groups, &parsed, &doc_url_str) else {
        return PageParamInfo::default();
    };
    best.complete_pages(&doc_url_str);
    let single_page_url = find_single_page_url(doc, &base, &best, &doc_url_str);

    let mut info = best.info;
    info.single_page_url = single_page_url;
    debug!(pattern = %info.page_pattern, pages = info.all_page_info.len(), "page parameter detected");
    info
}
