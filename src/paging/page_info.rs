//! Page-parameter results and the evaluation of one pattern candidate.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PagePattern;

/// Fewest links that justify fitting a linear formula.
const MIN_LINKS_TO_JUSTIFY_LINEAR_MAP: usize = 2;

/// A page number and the URL it links to. Plain-text numbers have an
/// empty URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_num: i32,
    pub url: String,
}

impl PageInfo {
    #[must_use]
    pub fn new(page_num: i32, url: impl Into<String>) -> Self {
        Self {
            page_num,
            url: url.into(),
        }
    }
}

/// `page_param_value = coefficient * page_num + delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearFormula {
    pub coefficient: i32,
    pub delta: i32,
}

/// A link matched by a page pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLinkInfo {
    pub page_num: i32,
    pub page_param_value: i32,
    /// Position of the link in the ascending page-number list.
    pub pos_in_ascending: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageParamType {
    /// Nothing detected.
    #[default]
    Unset,
    /// The parameter value is a page number.
    PageNumber,
    Unknown,
}

/// What the page-parameter detector found for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParamInfo {
    #[serde(rename = "type")]
    pub param_type: PageParamType,

    /// URL pattern with the page parameter replaced by `[*!]`.
    pub page_pattern: String,

    /// Detected pages, in discovery order.
    pub all_page_info: Vec<PageInfo>,

    pub formula: Option<LinearFormula>,

    /// URL of the page after the document, empty if unknown.
    pub next_paging_url: String,

    /// URL showing all pages at once, empty if none was found.
    pub single_page_url: String,
}

#[derive(Debug, Default)]
struct PageNumbersState {
    is_adjacent: bool,
    is_consecutive: bool,
    next_paging_url: String,
}

impl PageParamInfo {
    /// Evaluate the links matched by `pattern` against the ascending page
    /// numbers of their group.
    ///
    /// With a single link, `first_page_url` (the page-1 URL or the document
    /// URL) stands in for the missing page 1.
    #[must_use]
    pub fn evaluate(
        pattern: &dyn PagePattern,
        links: &[PageLinkInfo],
        ascending: &[PageInfo],
        first_page_url: &str,
    ) -> Option<Self> {
        if links.len() >= MIN_LINKS_TO_JUSTIFY_LINEAR_MAP {
            let mut state = page_numbers_state(links, ascending);
            if !state.is_adjacent || !state.is_consecutive {
                return None;
            }
            if !is_page_number_sequence(ascending, &mut state) {
                return None;
            }
            let all_page_info = links
                .iter()
                .map(|link| {
                    let url = ascending
                        .get(link.pos_in_ascending)
                        .map(|p| p.url.clone())
                        .unwrap_or_default();
                    PageInfo::new(link.page_num, url)
                })
                .collect();
            return Some(Self {
                param_type: PageParamType::PageNumber,
                page_pattern: pattern.as_str().to_string(),
                all_page_info,
                formula: linear_formula(links),
                next_paging_url: state.next_paging_url,
                single_page_url: String::new(),
            });
        }

        // Articles rarely have more than 3 pages and page 1 usually has no
        // page parameter, so a lone link to page 2 or 3 is enough when the
        // first page URL fits the pattern.
        let [only] = links else {
            return None;
        };
        if first_page_url.is_empty() {
            return None;
        }
        let page_num_at = |i: usize| ascending.get(i).map(|p| p.page_num);
        let second_page_is_outlink = only.page_num == 2 && only.pos_in_ascending == 1;
        let third_page_is_outlink =
            only.page_num == 3 && only.pos_in_ascending == 2 && page_num_at(1) == Some(2);
        if page_num_at(0) != Some(1)
            || !(second_page_is_outlink || third_page_is_outlink)
            || !pattern.is_paging_url(first_page_url)
        {
            return None;
        }

        let mut delta = only.page_param_value.checked_sub(only.page_num)?;
        let coefficient = if delta == 0 || delta == 1 {
            1
        } else {
            delta = 0;
            only.page_param_value
        };
        let only_url = ascending
            .get(only.pos_in_ascending)
            .map(|p| p.url.clone())
            .unwrap_or_default();
        let next_paging_url = if third_page_is_outlink {
            only_url.clone()
        } else {
            String::new()
        };
        Some(Self {
            param_type: PageParamType::PageNumber,
            page_pattern: pattern.as_str().to_string(),
            all_page_info: vec![PageInfo::new(1, first_page_url), PageInfo::new(only.page_num, only_url)],
            formula: Some(LinearFormula { coefficient, delta }),
            next_paging_url,
            single_page_url: String::new(),
        })
    }

    /// Order candidates: a fitted formula wins, then `PageNumber` over other
    /// types. Anything else is a tie.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.formula.is_some(), other.formula.is_some()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        if self.param_type == other.param_type {
            return Ordering::Equal;
        }
        match (self.param_type, other.param_type) {
            (PageParamType::PageNumber, _) => Ordering::Greater,
            (_, PageParamType::PageNumber) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }

    /// Whether the document itself is the missing page 1: it is shorter
    /// than the other page URLs, which are pages 2..n, and no other link
    /// claims to be page 1.
    #[must_use]
    pub fn can_insert_first_page(&self, doc_url: &str, ascending: &[PageInfo]) -> bool {
        let Some(first) = self.all_page_info.first() else {
            return false;
        };
        if self.all_page_info.len() < 2 || first.page_num == 1 {
            return false;
        }
        if doc_url.len() >= first.url.len() {
            return false;
        }
        let pages_follow_first = self
            .all_page_info
            .iter()
            .zip(2..)
            .all(|(page, expected)| page.page_num == expected && page.url != doc_url);
        if !pages_follow_first {
            return false;
        }
        // A link "1" elsewhere means this document is more likely the last page.
        !ascending
            .iter()
            .any(|p| p.page_num == 1 && !p.url.is_empty() && p.url != doc_url)
    }

    pub fn insert_first_page(&mut self, doc_url: &str) {
        self.all_page_info.insert(0, PageInfo::new(1, doc_url));
    }

    /// With no next page known yet, use the page after the document's.
    pub fn determine_next_paging_url(&mut self, doc_url: &str) {
        if !self.next_paging_url.is_empty() {
            return;
        }
        let next = self
            .all_page_info
            .iter()
            .skip_while(|page| page.url != doc_url)
            .nth(1);
        if let Some(next) = next {
            self.next_paging_url = next.url.clone();
        }
    }
}

/// Checks that the links sit next to each other in the ascending list,
/// allowing one gap for the current page shown as plain text, and that the
/// page numbers around them are consecutive.
fn page_numbers_state(links: &[PageLinkInfo], ascending: &[PageInfo]) -> PageNumbersState {
    let mut state = PageNumbersState::default();

    let mut first_pos: Option<usize> = None;
    let mut last_pos: Option<usize> = None;
    let mut gap_pos: Option<usize> = None;
    let mut values = HashSet::new();
    for link in links {
        let curr = link.pos_in_ascending;
        match last_pos {
            None => first_pos = Some(curr),
            Some(last) if curr != last + 1 => {
                // Out of order, a gap wider than one, or a second gap.
                if curr <= last || curr != last + 2 || gap_pos.is_some() {
                    return state;
                }
                gap_pos = Some(curr - 1);
            }
            Some(_) => {}
        }
        if !values.insert(link.page_param_value) {
            return state;
        }
        last_pos = Some(curr);
    }
    let (Some(first_pos), Some(last_pos)) = (first_pos, last_pos) else {
        return state;
    };
    state.is_adjacent = true;

    let page_num = |i: usize| ascending.get(i).map(|p| p.page_num);

    // "[1] [5] 6 [7] [12]" is accepted; "[4] 8 [16]" is not.
    if let Some(gap) = gap_pos {
        if gap == 0 || gap + 1 >= ascending.len() {
            return state;
        }
        let current = ascending[gap].page_num;
        if ascending[gap - 1].page_num == current - 1 && ascending[gap + 1].page_num == current + 1 {
            state.is_consecutive = true;
            state.next_paging_url = ascending[gap + 1].url.clone();
        }
        return state;
    }

    // "[1] [2] ..." or "1 [2] ...".
    if first_pos <= 1 && page_num(0) == Some(1) && page_num(1) == Some(2) {
        state.is_consecutive = true;
        return state;
    }
    // "[1] 2 [3] ..." where [1] has another pattern.
    if first_pos == 2
        && page_num(2) == Some(3)
        && ascending[1].url.is_empty()
        && !ascending[0].url.is_empty()
    {
        state.is_consecutive = true;
        return state;
    }
    // "... [n-1] [n]" or "... [n-1] n".
    let size = ascending.len();
    if size >= 2
        && (last_pos + 1 == size || last_pos + 2 == size)
        && ascending[size - 2].page_num + 1 == ascending[size - 1].page_num
    {
        state.is_consecutive = true;
        return state;
    }
    // "... [i-1] [i] [i+1] ...".
    for i in first_pos + 1..last_pos {
        if let (Some(before), Some(after)) = (page_num(i - 1), page_num(i + 1)) {
            if before + 2 == after {
                state.is_consecutive = true;
                return state;
            }
        }
    }
    state
}

/// The ascending numbers must read like a pager: at most one plain number
/// (the current page), a link for the first entry unless it is page 1, and
/// consecutive numbers except at the head or tail between two links.
fn is_page_number_sequence(ascending: &[PageInfo], state: &mut PageNumbersState) -> bool {
    let [first_page, .., last_page] = ascending else {
        return false;
    };
    if first_page.page_num != 1 && first_page.url.is_empty() {
        return false;
    }

    let mut has_plain_num = false;
    for page in ascending {
        if page.url.is_empty() {
            if has_plain_num {
                return false;
            }
            has_plain_num = true;
        } else if has_plain_num && state.next_paging_url.is_empty() {
            state.next_paging_url = page.url.clone();
        }
    }

    if ascending.len() == 2 {
        return first_page.page_num + 1 == last_page.page_num;
    }

    for i in 1..ascending.len() {
        let (prev, curr) = (&ascending[i - 1], &ascending[i]);
        if curr.page_num - prev.page_num != 1 {
            if i != 1 && i != ascending.len() - 1 {
                return false;
            }
            if curr.url.is_empty() || prev.url.is_empty() {
                return false;
            }
        }
    }
    true
}

/// Fit `value = coefficient * page + delta` exactly through every link.
/// Only `delta` of 0 or `-coefficient` is accepted.
#[must_use]
pub fn linear_formula(links: &[PageLinkInfo]) -> Option<LinearFormula> {
    let [first, second, rest @ ..] = links else {
        return None;
    };
    if rest.is_empty() && first.page_num.max(second.page_num) > 4 {
        return None;
    }

    let delta_x = second.page_num.checked_sub(first.page_num)?;
    if delta_x == 0 {
        return None;
    }
    let delta_y = second.page_param_value.checked_sub(first.page_param_value)?;
    if delta_y.checked_rem(delta_x)? != 0 {
        return None;
    }
    let coefficient = delta_y.checked_div(delta_x)?;
    if coefficient == 0 {
        return None;
    }
    let delta = first
        .page_param_value
        .checked_sub(coefficient.checked_mul(first.page_num)?)?;
    if delta != 0 && Some(delta) != coefficient.checked_neg() {
        return None;
    }

    let fits = |link: &PageLinkInfo| {
        coefficient
            .checked_mul(link.page_num)
            .and_then(|value| value.checked_add(delta))
            == Some(link.page_param_value)
    };
    links
        .iter()
        .all(fits)
        .then_some(LinearFormula { coefficient, delta })
}
