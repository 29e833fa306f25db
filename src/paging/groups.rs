//! Monotonic runs of page numbers, in document order.

use super::page_info::PageInfo;

/// A run of page numbers that only increases or only decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageGroup {
    pub pages: Vec<PageInfo>,
    /// 1 when ascending, -1 when descending, 0 with fewer than two pages.
    pub delta_sign: i32,
}

impl PageGroup {
    /// The pages in ascending order.
    #[must_use]
    pub fn ascending(&self) -> Vec<PageInfo> {
        let mut pages = self.pages.clone();
        if self.delta_sign < 0 {
            pages.reverse();
        }
        pages
    }
}

/// Splits a stream of page numbers into monotonic groups. A repeated
/// number or a change of direction starts a new group; [`add_group`]
/// starts one explicitly when something other than a number intervenes.
///
/// [`add_group`]: MonotonicGroups::add_group
#[derive(Debug, Clone, Default)]
pub struct MonotonicGroups {
    groups: Vec<PageGroup>,
    prev: Option<PageInfo>,
}

impl MonotonicGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new group unless the current one is still empty.
    pub fn add_group(&mut self) {
        if self.groups.last().is_none_or(|g| !g.pages.is_empty()) {
            self.groups.push(PageGroup::default());
        }
        self.prev = None;
    }

    pub fn add_number(&mut self, page_num: i32, url: impl Into<String>) {
        self.add_page_info(PageInfo::new(page_num, url));
    }

    pub fn add_page_info(&mut self, page: PageInfo) {
        if self.groups.is_empty() {
            self.groups.push(PageGroup::default());
        }
        let mut current = self.groups.len() - 1;
        let prev = match &self.prev {
            Some(prev) if !self.groups[current].pages.is_empty() => prev.clone(),
            _ => {
                self.groups[current].pages.push(page.clone());
                self.prev = Some(page);
                return;
            }
        };

        let delta_sign = (page.page_num - prev.page_num).signum();
        let group_sign = self.groups[current].delta_sign;
        if delta_sign != group_sign {
            if group_sign != 0 {
                // Direction changed: the previous number is shared by both
                // runs, a repeated one is not.
                let mut group = PageGroup::default();
                if delta_sign != 0 {
                    group.pages.push(prev);
                }
                self.groups.push(group);
                current += 1;
            }
        } else if delta_sign == 0 {
            self.groups[current].pages.clear();
        }

        let group = &mut self.groups[current];
        group.pages.push(page.clone());
        group.delta_sign = delta_sign;
        self.prev = Some(page);
    }

    /// Drop a trailing empty group.
    pub fn cleanup(&mut self) {
        if self.groups.last().is_some_and(|g| g.pages.is_empty()) {
            self.groups.pop();
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[PageGroup] {
        &self.groups
    }
}
