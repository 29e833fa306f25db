//! Collects page numbers from a document's links and the plain numbers
//! around them.

use tracing::trace;
use url::Url;

use super::groups::MonotonicGroups;
use super::page_info::PageInfo;
use super::url::ParsedUrl;
use crate::dom::{self, Document, NodeRef};
use crate::patterns::{LINK_TEXT_BRACKETS, SURROUNDING_DIGITS, WORD};
use crate::text_utils::{contains_digit, count_words, to_number};

struct PageNumberParser<'u> {
    doc_url: &'u ParsedUrl,
    base: &'u Url,
    max_page_number: i32,
    groups: MonotonicGroups,
    forward_links_processed: usize,
}

impl PageNumberParser<'_> {
    fn is_plain_page_number(&self, number: i32) -> bool {
        (0..=self.max_page_number).contains(&number)
    }

    /// Page number and URL of a link whose visible text is a number.
    ///
    /// Links without `href`, `javascript:` links and disabled links keep
    /// their number with an empty URL. Links to other hosts are ignored.
    fn page_info(&self, link: &NodeRef) -> Option<PageInfo> {
        if !dom::is_visible(link) {
            return None;
        }
        let text = dom::inner_text(link);
        let number = to_number(LINK_TEXT_BRACKETS.replace_all(&text, "").trim())?;
        if !self.is_plain_page_number(number) {
            return None;
        }

        let href = dom::get_attribute(link, "href").unwrap_or_default();
        let href = href.trim();
        if href.is_empty() || href.starts_with("javascript:") {
            return Some(PageInfo::new(number, ""));
        }
        let url = ParsedUrl::from_url(self.base.join(href).ok()?);
        if !url.host().eq_ignore_ascii_case(&self.doc_url.host()) {
            return None;
        }
        if dom::is_disabled_link(link) {
            return Some(PageInfo::new(number, ""));
        }
        Some(PageInfo::new(number, url.without_fragment()))
    }

    fn add_link_if_valid(&mut self, link: &NodeRef) -> bool {
        match self.page_info(link) {
            Some(page) => {
                self.groups.add_page_info(page);
                true
            }
            None => {
                self.groups.add_group();
                false
            }
        }
    }

    /// Add every page number in `text`; any other term closes the group.
    fn add_non_link_text(&mut self, text: &str) -> bool {
        if !contains_digit(text) {
            self.groups.add_group();
            return false;
        }
        let mut added = false;
        for term in WORD.find_iter(text) {
            let number = SURROUNDING_DIGITS
                .captures(term.as_str())
                .and_then(|caps| caps.get(1))
                .and_then(|digits| to_number(digits.as_str()))
                .filter(|&n| self.is_plain_page_number(n));
            match number {
                Some(n) => {
                    self.groups.add_number(n, "");
                    added = true;
                }
                None => self.groups.add_group(),
            }
        }
        added
    }

    /// Walk the leaves next to `start`, climbing to parents when siblings
    /// run out.
    ///
    /// Backward, only the closest text is considered. Forward, the walk
    /// continues through numeric text and page-number links and stops at
    /// anything else.
    fn add_closest_leaves(&mut self, start: &NodeRef, backward: bool) {
        let mut node = start.clone();
        let mut check_start = false;
        loop {
            let candidate = if check_start {
                Some(node.clone())
            } else if backward {
                node.prev_sibling()
            } else {
                node.next_sibling()
            };
            check_start = false;

            let Some(current) = candidate else {
                let Some(parent) = node.parent() else {
                    return;
                };
                if !parent.is_element() || dom::has_tag(&parent, "body") || dom::has_tag(&parent, "html") {
                    return;
                }
                node = parent;
                continue;
            };

            if current.is_text() {
                let text = dom::text_content(&current);
                if count_words(&text) > 0 {
                    let added = self.add_non_link_text(&text);
                    if backward || !added {
                        return;
                    }
                }
            } else if current.is_element() && dom::has_tag(&current, "a") {
                if backward {
                    return;
                }
                self.forward_links_processed += 1;
                if !self.add_link_if_valid(&current) {
                    return;
                }
            } else {
                let child = if backward {
                    current.last_child()
                } else {
                    current.first_child()
                };
                if let Some(child) = child {
                    node = child;
                    check_start = true;
                    continue;
                }
            }
            node = current;
        }
    }
}

/// Collect the document's page numbers into monotonic groups.
///
/// `doc_url` is the document URL (links to other hosts are ignored) and
/// `base` is what relative links resolve against.
#[must_use]
pub fn parse_page_infos(
    doc: &Document,
    doc_url: &ParsedUrl,
    base: &Url,
    max_page_number: i32,
) -> MonotonicGroups {
    let mut parser = PageNumberParser {
        doc_url,
        base,
        max_page_number,
        groups: MonotonicGroups::new(),
        forward_links_processed: 0,
    };

    let links = doc.select("a").nodes().to_vec();
    let mut idx = 0;
    while idx < links.len() {
        let link = &links[idx];
        let Some(page) = parser.page_info(link) else {
            idx += 1;
            continue;
        };
        trace!(page_num = page.page_num, url = %page.url, "page number link");

        parser.groups.add_group();
        parser.add_closest_leaves(link, true);
        parser.groups.add_page_info(page);
        parser.forward_links_processed = 0;
        parser.add_closest_leaves(link, false);

        // Links met by the forward walk are already processed.
        idx += 1 + parser.forward_links_processed;
    }

    parser.groups.cleanup();
    parser.groups
}
