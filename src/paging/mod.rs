//! Pagination detection.
//!
//! Two independent detectors live here:
//!
//! - The page-parameter detector ([`detect`]) collects numeric anchors and
//!   the numbers around them, groups them into monotonic runs and looks for a
//!   query value or path segment that changes linearly with the page number.
//! - The paging-link scorer ([`find_next`], [`find_previous`]) scores every
//!   anchor with word heuristics and reports the best next/previous link.

mod detector;
mod groups;
mod links;
mod page_info;
mod parser;
mod path_pattern;
mod query_pattern;
mod url;

pub use detector::{detect, detect_from_groups};
pub use groups::{MonotonicGroups, PageGroup};
pub use links::{find_next, find_paging_link, find_previous, PageDirection};
pub use page_info::{linear_formula, LinearFormula, PageInfo, PageLinkInfo, PageParamInfo, PageParamType};
pub use parser::parse_page_infos;
pub use path_pattern::PathComponentPattern;
pub use query_pattern::QueryParamPattern;
pub use url::ParsedUrl;

use crate::text_utils::to_number;

/// Stands in for the page parameter value in a URL pattern.
pub const PAGE_PARAM_PLACEHOLDER: &str = "[*!]";

/// Query names and path components that carry numbers unrelated to paging.
const BAD_PAGE_PARAM_NAMES: &[&str] = &[
    "baixar-gratis",
    "category",
    "content",
    "date",
    "day",
    "definition",
    "etiket",
    "film-seyret",
    "key",
    "keys",
    "keyword",
    "label",
    "news",
    "q",
    "query",
    "rating",
    "s",
    "search",
    "search_keyword",
    "search_query",
    "seasons",
    "sortby",
    "subscriptions",
    "tag",
    "tags",
    "video",
    "videos",
    "w",
    "wiki",
];

/// Check a query name or path component against the known non-paging names.
#[must_use]
pub fn is_page_param_name_bad(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BAD_PAGE_PARAM_NAMES.contains(&lower.as_str())
}

pub(crate) fn is_plain_number(s: &str) -> bool {
    to_number(s).is_some()
}

/// A URL with one component replaced by [`PAGE_PARAM_PLACEHOLDER`].
pub trait PagePattern {
    /// The pattern string, e.g. `http://a.com/b?page=[*!]`.
    fn as_str(&self) -> &str;

    /// Page parameter value of the URL the pattern was built from.
    fn page_param_value(&self) -> i32;

    /// Whether the document URL belongs to the same family of pages.
    fn is_valid_for(&self, doc_url: &ParsedUrl) -> bool;

    /// Whether `url` is one of the pages described by the pattern. A URL
    /// without the page parameter counts, since it is usually page 1.
    fn is_paging_url(&self, url: &str) -> bool;

    /// Part of the pattern before the page parameter's segment.
    fn prefix(&self) -> &str;

    /// Part of the pattern after the placeholder, without its separator.
    fn suffix(&self) -> &str;
}
