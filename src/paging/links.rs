//! Heuristic next/previous page link finder.
//!
//! Every visible same-origin anchor gets a score from its text, class, id,
//! ancestors and href. The best scoring link above a threshold wins.

use tracing::{debug, instrument, trace};

use super::url::ParsedUrl;
use crate::dom::{self, Document, NodeRef};
use crate::patterns::{
    DIGIT, EXTRANEOUS, FIRST_LAST, HREF_CLEANER, LINK_PAGINATION, NEGATIVE, NEXT_LINK, PAGINATION,
    POSITIVE, PREV_LINK,
};
use crate::text_utils::parse_leading_int;
use crate::url_utils::document_base_url;

/// Link text longer than this is never a paging link.
const MAX_LINK_TEXT_CHARS: usize = 25;

/// Which paging link to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Next,
    Previous,
}

impl PageDirection {
    fn is_next(self) -> bool {
        self == Self::Next
    }

    fn matches_own_words(self, text: &str) -> bool {
        match self {
            Self::Next => NEXT_LINK.is_match(text),
            Self::Previous => PREV_LINK.is_match(text),
        }
    }

    fn matches_opposite_words(self, text: &str) -> bool {
        match self {
            Self::Next => PREV_LINK.is_match(text),
            Self::Previous => NEXT_LINK.is_match(text),
        }
    }
}

/// URLs derived from the document URL that every candidate is checked
/// against.
struct LinkContext {
    doc_url: String,
    /// Document URL up to its last `/`.
    folder: String,
    /// Document URL without a trailing `/`.
    current: String,
    /// `scheme://host[:port]/`
    allowed_prefix: String,
}

impl LinkContext {
    fn new(parsed: &ParsedUrl) -> Self {
        let doc_url = parsed.as_str().to_string();
        let folder = doc_url
            .rfind('/')
            .map_or_else(|| doc_url.clone(), |idx| doc_url[..idx].to_string());
        let current = doc_url.strip_suffix('/').unwrap_or(&doc_url).to_string();
        let allowed_prefix = format!("{}://{}/", parsed.url().scheme(), parsed.host());
        Self {
            doc_url,
            folder,
            current,
            allowed_prefix,
        }
    }

    fn has_allowed_prefix(&self, href: &str) -> bool {
        href.get(..self.allowed_prefix.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(&self.allowed_prefix))
    }
}

/// Find the link to the next page of a paginated document.
///
/// Returns the absolute URL, without a trailing slash, of the best link
/// scoring at least `min_score`.
#[must_use]
pub fn find_next(doc: &Document, doc_url: &str, min_score: i32) -> Option<String> {
    find_paging_link(doc, doc_url, PageDirection::Next, min_score)
}

/// Find the link to the previous page of a paginated document.
#[must_use]
pub fn find_previous(doc: &Document, doc_url: &str, min_score: i32) -> Option<String> {
    find_paging_link(doc, doc_url, PageDirection::Previous, min_score)
}

/// Find the best paging link in `direction`, or `None` when no link scores
/// at least `min_score` or `doc_url` is invalid.
#[must_use]
#[instrument(skip_all, fields(url = doc_url, direction = ?direction))]
pub fn find_paging_link(
    doc: &Document,
    doc_url: &str,
    direction: PageDirection,
    min_score: i32,
) -> Option<String> {
    let parsed = ParsedUrl::parse(doc_url.trim())?;
    let ctx = LinkContext::new(&parsed);
    let base = document_base_url(doc, parsed.url());

    let mut best: Option<(i32, String)> = None;
    for link in doc.select("a").nodes() {
        let Some(href) = dom::get_attribute(link, "href") else {
            continue;
        };
        let Ok(resolved) = base.join(href.trim()) else {
            continue;
        };
        let Some((score, href)) = score_link(link, resolved.as_str(), &ctx, direction) else {
            continue;
        };
        trace!(score, href = %href, "paging link candidate");
        if score >= min_score && best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, href));
        }
    }

    let (score, href) = best?;
    let href = href.strip_suffix('/').unwrap_or(&href).to_string();
    debug!(score, href = %href, "paging link found");
    Some(href)
}

/// Score one link, or `None` when it cannot be a paging link at all.
fn score_link(
    link: &NodeRef,
    href: &str,
    ctx: &LinkContext,
    direction: PageDirection,
) -> Option<(i32, String)> {
    if !ctx.has_allowed_prefix(href) {
        return None;
    }
    if direction.is_next() && !DIGIT.is_match(&href[ctx.allowed_prefix.len()..]) {
        return None;
    }
    if dom::is_zero_size_link(link) || !dom::is_visible(link) {
        return None;
    }

    let href = HREF_CLEANER.replace(href, "").into_owned();
    if href.eq_ignore_ascii_case(&ctx.current)
        || (direction.is_next() && href.eq_ignore_ascii_case(&ctx.folder))
    {
        return None;
    }

    let text = dom::inner_text(link);
    let text_len = text.chars().count();
    if EXTRANEOUS.is_match(&text) || text_len > MAX_LINK_TEXT_CHARS {
        return None;
    }

    let in_folder = href.starts_with(&ctx.folder);
    if direction.is_next() {
        let remaining = if in_folder { &href[ctx.folder.len()..] } else { href.as_str() };
        if !DIGIT.is_match(remaining) {
            return None;
        }
    }

    let mut score = 0;
    if !in_folder {
        score -= 25;
    }

    let class = dom::get_attribute(link, "class").unwrap_or_default();
    let id = dom::get_attribute(link, "id").unwrap_or_default();
    let link_data = format!("{text} {class} {id}");
    if direction.matches_own_words(&link_data) {
        score += 50;
    }
    if PAGINATION.is_match(&link_data) {
        score += 25;
    }
    if FIRST_LAST.is_match(&link_data) && !direction.matches_own_words(&text) {
        score -= 65;
    }
    if NEGATIVE.is_match(&link_data) || EXTRANEOUS.is_match(&link_data) {
        score -= 50;
    }
    if direction.matches_opposite_words(&link_data) {
        score -= 200;
    }

    score += ancestor_score(link);

    if LINK_PAGINATION.is_match(&href) || PAGINATION.is_match(&href) {
        score += 25;
    }
    if EXTRANEOUS.is_match(&href) {
        score -= 15;
    }
    if text_len > 10 {
        score -= i32::try_from(text_len).unwrap_or(i32::MAX);
    }

    match parse_leading_int(&text) {
        Some(1) => score -= 10,
        Some(n) if n > 1 => score += i32::try_from((10 - n).max(0)).unwrap_or(0),
        _ => {}
    }

    let expected_diff = if direction.is_next() { 1 } else { -1 };
    if page_diff(&ctx.doc_url, &href, ctx.allowed_prefix.len()) == Some(expected_diff) {
        score += 25;
    }

    Some((score, href))
}

/// +25 for the first ancestor that looks like a pager, -25 for the first
/// one that looks like boilerplate.
fn ancestor_score(link: &NodeRef) -> i32 {
    let mut score = 0;
    let (mut positive, mut negative) = (false, false);
    for parent in dom::ancestor_elements(link) {
        if positive && negative {
            break;
        }
        let class_and_id = format!(
            "{} {}",
            dom::get_attribute(&parent, "class").unwrap_or_default(),
            dom::get_attribute(&parent, "id").unwrap_or_default()
        );
        if !positive && PAGINATION.is_match(&class_and_id) {
            score += 25;
            positive = true;
        }
        if !negative && NEGATIVE.is_match(&class_and_id) && !POSITIVE.is_match(&class_and_id) {
            score -= 25;
            negative = true;
        }
    }
    score
}

/// Difference between the numbers that follow the common prefix of two
/// URLs, ignoring the first `skip` bytes. `None` unless both are positive.
fn page_diff(url: &str, link: &str, skip: usize) -> Option<i64> {
    let url_rest = url.get(skip..)?;
    let link_rest = link.get(skip..)?;
    let common = url_rest
        .char_indices()
        .zip(link_rest.chars())
        .find(|((_, a), b)| a != b)
        .map_or_else(|| url_rest.len().min(link_rest.len()), |((idx, _), _)| idx);

    let url_num = parse_leading_int(&url_rest[common..])?;
    let link_num = parse_leading_int(&link_rest[common..])?;
    (url_num > 0 && link_num > 0).then_some(link_num - url_num)
}
