// TableKit - app/pager.rs
//
// Pager controller: owns the latest paginator snapshot and rebuilds it from
// scratch on every navigation action. Rendering is left to the host; it
// receives plain page-button descriptors.

use crate::core::paginator::{Paginator, PaginatorOptions};

/// What the host needs to render one page-number button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub page: i64,
    pub label: String,
    pub active: bool,
    pub aria_label: String,
}

/// Navigation state for a paged list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerController {
    paginator: Paginator,
}

impl Default for PagerController {
    fn default() -> Self {
        Self::new(&PaginatorOptions::default())
    }
}

impl PagerController {
    pub fn new(options: &PaginatorOptions) -> Self {
        Self {
            paginator: Paginator::from_options(options),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &Paginator {
        &self.paginator
    }

    /// Inputs of the current snapshot (items, page, size, pages).
    pub fn config(&self) -> PaginatorOptions {
        self.paginator.to_options()
    }

    /// Overlay `options` on the current config and recompute.
    pub fn update(&mut self, options: &PaginatorOptions) {
        let merged = self.config().merge(options);
        self.paginator = Paginator::from_options(&merged);
    }

    /// Recompute for a new item count, keeping page, size and window.
    pub fn set_items(&mut self, items: usize) {
        self.update(&PaginatorOptions::new().items(items));
    }

    pub fn page(&self) -> i64 {
        self.paginator.page
    }

    pub fn total_pages(&self) -> i64 {
        self.paginator.total_pages
    }

    pub fn get_range<'a, T>(&self, collection: &'a [T]) -> &'a [T] {
        self.paginator.get_range(collection)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn has_prev(&self) -> bool {
        self.paginator.items > 0
    }

    pub fn has_next(&self) -> bool {
        self.paginator.items > 0
    }

    pub fn has_pages(&self) -> bool {
        !self.paginator.active_pages.is_empty()
    }

    /// The visible window includes page 1.
    pub fn has_first(&self) -> bool {
        self.paginator.active_pages.contains(&1)
    }

    /// The visible window includes the last page.
    pub fn has_last(&self) -> bool {
        self.paginator
            .active_pages
            .contains(&self.paginator.total_pages)
    }

    pub fn is_prev_disabled(&self) -> bool {
        !self.has_prev() || self.paginator.page <= 1
    }

    pub fn is_next_disabled(&self) -> bool {
        !self.has_next() || self.paginator.page >= self.paginator.total_pages
    }

    pub fn is_page_active(&self, page: i64) -> bool {
        page == self.paginator.page
    }

    /// `page` is between 1 and the last page.
    pub fn can_page(&self, page: i64) -> bool {
        self.paginator.has_page(page)
    }

    // -------------------------------------------------------------------------
    // Navigation. Each returns false and changes nothing when the target
    // page does not exist.
    // -------------------------------------------------------------------------

    pub fn to(&mut self, page: i64) -> bool {
        if !self.can_page(page) {
            tracing::debug!(page, total = self.paginator.total_pages, "Ignoring navigation to missing page");
            return false;
        }
        self.update(&PaginatorOptions::new().page(page));
        true
    }

    pub fn next(&mut self) -> bool {
        self.to(self.paginator.page.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.to(self.paginator.page.saturating_sub(1))
    }

    pub fn first(&mut self) -> bool {
        self.to(1)
    }

    pub fn last(&mut self) -> bool {
        self.to(self.paginator.total_pages)
    }

    /// Buttons for the visible window, in order.
    pub fn page_buttons(&self) -> Vec<PageButton> {
        self.paginator
            .active_pages
            .iter()
            .map(|&page| PageButton {
                page,
                label: page.to_string(),
                active: self.is_page_active(page),
                aria_label: format!("Page {page}"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(items: i64, page: i64) -> PagerController {
        PagerController::new(&PaginatorOptions::new().items(items).page(page).size(10).pages(3))
    }

    #[test]
    fn test_navigation_moves_window() {
        let mut p = pager(100, 1);
        assert!(p.next());
        assert!(p.next());
        assert!(p.next());
        assert_eq!(p.page(), 4);
        assert_eq!(p.snapshot().active_pages, vec![3, 4, 5]);
        assert!(p.last());
        assert_eq!(p.snapshot().active_pages, vec![8, 9, 10]);
        assert!(p.first());
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_navigation_past_bounds_is_ignored() {
        let mut p = pager(25, 1);
        assert!(!p.previous());
        assert!(!p.to(4));
        assert!(!p.to(0));
        assert_eq!(p.page(), 1);
        assert!(p.to(3));
        assert!(!p.next());
        assert_eq!(p.page(), 3);
    }

    #[test]
    fn test_next_beyond_visible_window() {
        // The last visible button is 3 but page 4 exists.
        let mut p = pager(100, 3);
        assert_eq!(p.snapshot().active_pages, vec![2, 3, 4]);
        let mut p2 = pager(100, 1);
        assert!(p2.to(3));
        assert!(p2.to(9));
        assert_eq!(p2.page(), 9);
        assert!(p.next());
        assert_eq!(p.page(), 4);
    }

    #[test]
    fn test_disabled_flags() {
        let p = pager(25, 1);
        assert!(p.is_prev_disabled());
        assert!(!p.is_next_disabled());

        let last = pager(25, 3);
        assert!(!last.is_prev_disabled());
        assert!(last.is_next_disabled());

        let empty = pager(0, 1);
        assert!(empty.is_prev_disabled() && empty.is_next_disabled());
        assert!(!empty.has_pages());
        assert!(!empty.has_prev());
    }

    #[test]
    fn test_first_and_last_visibility() {
        let start = pager(100, 1);
        assert!(start.has_first());
        assert!(!start.has_last());

        let middle = pager(100, 5);
        assert!(!middle.has_first() && !middle.has_last());
    }

    #[test]
    fn test_set_items_keeps_page_when_possible() {
        let mut p = pager(100, 5);
        p.set_items(60);
        assert_eq!(p.page(), 5);
        p.set_items(12);
        assert_eq!(p.page(), 2, "page clamps to the new last page");
        assert_eq!(p.config().size, Some(10.into()));
    }

    #[test]
    fn test_page_buttons() {
        let p = pager(100, 5);
        let buttons = p.page_buttons();
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[1].page, 5);
        assert!(buttons[1].active);
        assert!(!buttons[0].active);
        assert_eq!(buttons[2].aria_label, "Page 6");
        assert_eq!(buttons[0].label, "4");
    }
}
