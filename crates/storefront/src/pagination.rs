//! Page arithmetic over an ordered list.
//!
//! [`Pagination`] is a pure function of `(total items, page size, current
//! page)`. It slices a list for the current page and produces the condensed
//! page-number tokens shown in a pagination bar.

use std::fmt;

/// Products per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Page counts up to this are listed in full; larger ones are condensed.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One entry in a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Pagination state.
///
/// Invariant: `1 <= current_page <= total_pages`, and `total_pages >= 1`
/// even for an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_items: usize,
    page_size: usize,
    current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Start on page 1. A page size of zero is treated as one.
    #[must_use]
    pub const fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            total_items,
            page_size: if page_size == 0 { 1 } else { page_size },
            current_page: 1,
        }
    }

    /// Pagination over `items`, starting on page 1.
    #[must_use]
    pub const fn for_items<T>(items: &[T], page_size: usize) -> Self {
        Self::new(items.len(), page_size)
    }

    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page, 1-indexed.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(total_items / page_size)`, at least 1.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        let pages = self.total_items.div_ceil(self.page_size);
        if pages == 0 { 1 } else { pages }
    }

    /// Replace the underlying item count and return to page 1.
    pub const fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = 1;
    }

    /// Change the page size and return to page 1.
    pub const fn set_page_size(&mut self, page_size: usize) {
        self.page_size = if page_size == 0 { 1 } else { page_size };
        self.current_page = 1;
    }

    /// Jump to `page`, clamped into `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Advance one page; no-op on the last page.
    pub const fn go_to_next(&mut self) {
        if self.can_go_next() {
            self.current_page += 1;
        }
    }

    /// Go back one page; no-op on the first page.
    pub const fn go_to_previous(&mut self) {
        if self.can_go_previous() {
            self.current_page -= 1;
        }
    }

    #[must_use]
    pub const fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    #[must_use]
    pub const fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    /// First index of the current page (0-indexed, inclusive).
    #[must_use]
    pub const fn start_index(&self) -> usize {
        let start = (self.current_page - 1) * self.page_size;
        if start > self.total_items { self.total_items } else { start }
    }

    /// End of the current page (0-indexed, exclusive).
    #[must_use]
    pub const fn end_index(&self) -> usize {
        let end = self.start_index() + self.page_size;
        if end > self.total_items { self.total_items } else { end }
    }

    /// 1-indexed inclusive range for "Showing X–Y of Z"; `(0, 0)` when empty.
    #[must_use]
    pub const fn display_range(&self) -> (usize, usize) {
        if self.total_items == 0 {
            (0, 0)
        } else {
            (self.start_index() + 1, self.end_index())
        }
    }

    /// The current page's slice of `items`.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end_index().min(items.len());
        let start = self.start_index().min(end);
        items.get(start..end).unwrap_or_default()
    }

    /// Page numbers and ellipses for a pagination bar.
    #[must_use]
    pub fn page_tokens(&self) -> Vec<PageToken> {
        let last = self.total_pages();
        let current = self.current_page;

        if last <= MAX_VISIBLE_PAGES {
            return (1..=last).map(PageToken::Page).collect();
        }

        if current <= 3 {
            vec![
                PageToken::Page(1),
                PageToken::Page(2),
                PageToken::Page(3),
                PageToken::Page(4),
                PageToken::Ellipsis,
                PageToken::Page(last),
            ]
        } else if current >= last - 2 {
            vec![
                PageToken::Page(1),
                PageToken::Ellipsis,
                PageToken::Page(last - 3),
                PageToken::Page(last - 2),
                PageToken::Page(last - 1),
                PageToken::Page(last),
            ]
        } else {
            vec![
                PageToken::Page(1),
                PageToken::Ellipsis,
                PageToken::Page(current - 1),
                PageToken::Page(current),
                PageToken::Page(current + 1),
                PageToken::Ellipsis,
                PageToken::Page(last),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use super::PageToken::{Ellipsis, Page};

    #[test]
    fn test_twenty_one_items_nine_per_page() {
        let items: Vec<u32> = (1..=21).collect();
        let mut pagination = Pagination::for_items(&items, 9);

        assert_eq!(pagination.total_pages(), 3);
        assert_eq!(pagination.slice(&items).len(), 9);

        pagination.go_to_page(2);
        assert_eq!(pagination.start_index(), 9);
        assert_eq!(pagination.end_index(), 18);
        assert_eq!(pagination.display_range(), (10, 18));
        assert_eq!(pagination.slice(&items).len(), 9);

        pagination.go_to_page(3);
        assert_eq!(pagination.slice(&items), &[19, 20, 21]);
        assert_eq!(pagination.display_range(), (19, 21));
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut pagination = Pagination::new(21, 9);
        pagination.go_to_page(999);
        assert_eq!(pagination.current_page(), 3);
        pagination.go_to_page(0);
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn test_next_and_previous_stop_at_bounds() {
        let mut pagination = Pagination::new(10, 5);
        assert!(!pagination.can_go_previous());
        pagination.go_to_previous();
        assert_eq!(pagination.current_page(), 1);

        pagination.go_to_next();
        assert_eq!(pagination.current_page(), 2);
        assert!(!pagination.can_go_next());
        pagination.go_to_next();
        assert_eq!(pagination.current_page(), 2);
    }

    #[test]
    fn test_empty_list() {
        let pagination = Pagination::new(0, 9);
        assert_eq!(pagination.total_pages(), 1);
        assert_eq!(pagination.display_range(), (0, 0));
        assert!(pagination.slice::<u8>(&[]).is_empty());
        assert_eq!(pagination.page_tokens(), vec![Page(1)]);
    }

    #[test]
    fn test_zero_page_size_is_normalized() {
        let pagination = Pagination::new(3, 0);
        assert_eq!(pagination.page_size(), 1);
        assert_eq!(pagination.total_pages(), 3);
    }

    #[test]
    fn test_changes_reset_to_first_page() {
        let mut pagination = Pagination::new(50, 10);
        pagination.go_to_page(4);
        pagination.set_page_size(20);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.total_pages(), 3);

        pagination.go_to_page(3);
        pagination.set_total_items(5);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.total_pages(), 1);
    }

    #[test]
    fn test_page_tokens_small() {
        let pagination = Pagination::new(45, 9);
        assert_eq!(
            pagination.page_tokens(),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn test_page_tokens_condensed() {
        let mut pagination = Pagination::new(100, 10);

        pagination.go_to_page(2);
        assert_eq!(
            pagination.page_tokens(),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );

        pagination.go_to_page(6);
        assert_eq!(
            pagination.page_tokens(),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(10)]
        );

        pagination.go_to_page(8);
        assert_eq!(
            pagination.page_tokens(),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_page_token_display() {
        assert_eq!(Page(7).to_string(), "7");
        assert_eq!(Ellipsis.to_string(), "…");
    }

    proptest! {
        #[test]
        fn pages_reassemble_the_list(
            items in prop::collection::vec(any::<u16>(), 0..200),
            page_size in 1usize..25,
        ) {
            let mut pagination = Pagination::for_items(&items, page_size);
            let mut rebuilt = Vec::with_capacity(items.len());

            for page in 1..=pagination.total_pages() {
                pagination.go_to_page(page);
                prop_assert_eq!(pagination.current_page(), page);
                rebuilt.extend_from_slice(pagination.slice(&items));
            }

            prop_assert_eq!(rebuilt, items);
        }
    }
}
