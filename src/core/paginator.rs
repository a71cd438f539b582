// TableKit - core/paginator.rs
//
// Paginator: derives page boundaries, the visible window of page numbers and
// the slice range for the current page from an item count.
//
// Never fails. Malformed or inconsistent input (unparsable text, negative
// counts, zero or negative page size) degrades to a defined, possibly empty
// snapshot instead of an error, because callers are render paths.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::util::constants::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_WINDOW_PAGES, MAX_PAGE_WINDOW,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Tolerant numeric input
// =============================================================================

/// A number supplied either as an integer or as text such as `"25"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageInput {
    Int(i64),
    Text(String),
}

impl PageInput {
    /// Integer value, or `None` when the text has no leading integer.
    pub fn coerce(&self) -> Option<i64> {
        match self {
            PageInput::Int(n) => Some(*n),
            PageInput::Text(text) => parse_leading_int(text),
        }
    }
}

/// Lenient integer parse: leading whitespace, optional sign, then as many
/// digits as are present. `"12px"` is 12, `"3.9"` is 3, `"px"` is `None`.
/// Saturates instead of overflowing.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: Vec<i64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits
        .iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(*d));
    Some(if negative { -magnitude } else { magnitude })
}

impl From<i64> for PageInput {
    fn from(n: i64) -> Self {
        PageInput::Int(n)
    }
}

impl From<i32> for PageInput {
    fn from(n: i32) -> Self {
        PageInput::Int(i64::from(n))
    }
}

impl From<u32> for PageInput {
    fn from(n: u32) -> Self {
        PageInput::Int(i64::from(n))
    }
}

impl From<usize> for PageInput {
    fn from(n: usize) -> Self {
        PageInput::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for PageInput {
    fn from(s: &str) -> Self {
        PageInput::Text(s.to_string())
    }
}

impl From<String> for PageInput {
    fn from(s: String) -> Self {
        PageInput::Text(s)
    }
}

// =============================================================================
// Options
// =============================================================================

/// Raw paginator inputs; every field is optional and tolerant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginatorOptions {
    /// Number of items in the collection.
    pub items: Option<PageInput>,
    /// Current page (1-based).
    pub page: Option<PageInput>,
    /// Items per page.
    pub size: Option<PageInput>,
    /// Page-number buttons in the visible window.
    pub pages: Option<PageInput>,
}

impl PaginatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(mut self, items: impl Into<PageInput>) -> Self {
        self.items = Some(items.into());
        self
    }

    pub fn page(mut self, page: impl Into<PageInput>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn size(mut self, size: impl Into<PageInput>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn pages(mut self, pages: impl Into<PageInput>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    /// Take the item count from a collection's length.
    pub fn items_of<T>(self, collection: &[T]) -> Self {
        self.items(collection.len())
    }

    /// Overlay `other` on top of `self`: fields set in `other` win.
    pub fn merge(self, other: &PaginatorOptions) -> Self {
        Self {
            items: other.items.clone().or(self.items),
            page: other.page.clone().or(self.page),
            size: other.size.clone().or(self.size),
            pages: other.pages.clone().or(self.pages),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Fully resolved pagination snapshot.
///
/// Immutable: navigating means building a new snapshot. When there are no
/// pages (`total_pages == 0`) `page` is 0, `end_page` is 0 and
/// `active_pages` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub items: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
    pub total_pages: i64,
    pub start_page: i64,
    pub end_page: i64,
    /// Index of the first item on the current page.
    pub range_start: i64,
    /// Index of the last item on the current page (inclusive).
    pub range_end: i64,
    /// Page numbers in the visible window, `start_page..=end_page`.
    pub active_pages: Vec<i64>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::from_options(&PaginatorOptions::default())
    }
}

impl Paginator {
    /// Build a snapshot from positional inputs.
    pub fn new(
        items: impl Into<PageInput>,
        page: impl Into<PageInput>,
        size: impl Into<PageInput>,
        pages: impl Into<PageInput>,
    ) -> Self {
        Self::compute(
            items.into().coerce().unwrap_or(0),
            page.into().coerce().unwrap_or(DEFAULT_PAGE),
            size.into().coerce().unwrap_or(DEFAULT_PAGE_SIZE),
            pages.into().coerce().unwrap_or(DEFAULT_WINDOW_PAGES),
        )
    }

    /// Build a snapshot from an options record; absent or unparsable fields
    /// take their defaults (items 0, page 1, size 10, pages 3).
    pub fn from_options(options: &PaginatorOptions) -> Self {
        let field = |input: &Option<PageInput>, default: i64| {
            input.as_ref().and_then(PageInput::coerce).unwrap_or(default)
        };
        Self::compute(
            field(&options.items, 0),
            field(&options.page, DEFAULT_PAGE),
            field(&options.size, DEFAULT_PAGE_SIZE),
            field(&options.pages, DEFAULT_WINDOW_PAGES),
        )
    }

    /// Build a snapshot whose item count is the collection's length.
    pub fn for_collection<T>(
        collection: &[T],
        page: impl Into<PageInput>,
        size: impl Into<PageInput>,
        pages: impl Into<PageInput>,
    ) -> Self {
        Self::new(collection.len(), page, size, pages)
    }

    fn compute(items: i64, page: i64, size: i64, pages: i64) -> Self {
        let items = items.max(0);
        let pages = pages.clamp(1, MAX_PAGE_WINDOW);

        let total_pages = if size > 0 {
            items / size + i64::from(items % size != 0)
        } else {
            if items > 0 {
                tracing::warn!(items, size, "Page size must be positive; no pages produced");
            }
            0
        };

        // 0 when there are no pages.
        let page = page.max(1).min(total_pages);

        let (start_page, end_page) = if total_pages <= pages {
            (1, total_pages)
        } else {
            let before = pages / 2;
            let after = (pages + 1) / 2 - 1;
            if page <= before {
                (1, pages)
            } else if page.saturating_add(after) >= total_pages {
                (total_pages - pages + 1, total_pages)
            } else {
                (page - before, page + after)
            }
        };

        let range_start = (page - 1).saturating_mul(size);
        let range_end = range_start
            .saturating_add(size)
            .saturating_sub(1)
            .min(items - 1);

        let active_pages: Vec<i64> = (start_page..=end_page).collect();

        tracing::debug!(
            items,
            page,
            size,
            pages,
            total_pages,
            start_page,
            end_page,
            "Paginator computed"
        );

        Self {
            items,
            page,
            size,
            pages,
            total_pages,
            start_page,
            end_page,
            range_start,
            range_end,
            active_pages,
        }
    }

    /// The items of `collection` on the current page, or an empty slice when
    /// the range falls outside it.
    pub fn get_range<'a, T>(&self, collection: &'a [T]) -> &'a [T] {
        if self.range_start < 0 || self.range_end < self.range_start {
            return &[];
        }
        let (Ok(start), Ok(end)) = (
            usize::try_from(self.range_start),
            usize::try_from(self.range_end),
        ) else {
            return &[];
        };
        if start >= collection.len() {
            return &[];
        }
        let end = end.saturating_add(1).min(collection.len());
        &collection[start..end]
    }

    /// True when there is nothing to page through.
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    /// True when `page` is a real page number.
    pub fn has_page(&self, page: i64) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    /// The inputs that reproduce this snapshot.
    pub fn to_options(&self) -> PaginatorOptions {
        PaginatorOptions::new()
            .items(self.items)
            .page(self.page)
            .size(self.size)
            .pages(self.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_three() {
        let p = Paginator::new(25, 1, 10, 3);
        assert_eq!(
            p,
            Paginator {
                items: 25,
                page: 1,
                size: 10,
                pages: 3,
                total_pages: 3,
                start_page: 1,
                end_page: 3,
                range_start: 0,
                range_end: 9,
                active_pages: vec![1, 2, 3],
            }
        );
    }

    #[test]
    fn test_last_page_window_clamps_to_end() {
        let p = Paginator::new(100, 10, 10, 3);
        assert_eq!((p.start_page, p.end_page), (8, 10));
        assert_eq!(p.active_pages, vec![8, 9, 10]);
        assert_eq!((p.range_start, p.range_end), (90, 99));
    }

    #[test]
    fn test_window_centres_on_current_page() {
        assert_eq!(Paginator::new(100, 5, 10, 3).active_pages, vec![4, 5, 6]);
        assert_eq!(Paginator::new(100, 1, 10, 3).active_pages, vec![1, 2, 3]);
        // Even window: one more page before than after.
        assert_eq!(Paginator::new(100, 5, 10, 4).active_pages, vec![3, 4, 5, 6]);
        assert_eq!(Paginator::new(100, 9, 10, 4).active_pages, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_window_never_exceeds_pages() {
        for page in 1..=20 {
            let p = Paginator::new(200, page, 10, 5);
            assert_eq!(p.active_pages.len(), 5, "page {page}");
            assert!(p.start_page >= 1 && p.end_page <= p.total_pages);
            assert!(p.active_pages.contains(&p.page));
        }
    }

    #[test]
    fn test_fewer_pages_than_window_shows_all() {
        let p = Paginator::new(15, 2, 10, 5);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.active_pages, vec![1, 2]);
        assert_eq!((p.range_start, p.range_end), (10, 14));
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(Paginator::new(25, 0, 10, 3).page, 1);
        assert_eq!(Paginator::new(25, -4, 10, 3).page, 1);
        assert_eq!(Paginator::new(25, 99, 10, 3).page, 3);
    }

    #[test]
    fn test_degenerate_empty() {
        let p = Paginator::new(0, 1, 10, 3);
        assert_eq!(p.items, 0);
        assert_eq!(p.total_pages, 0);
        assert!(p.is_empty());
        assert!(p.active_pages.is_empty());
        assert!(p.get_range(&[1, 2, 3]).is_empty());
        assert_eq!(Paginator::default(), p);
        assert_eq!(p.page, 0);
        assert_eq!(Paginator::new(0, -3, 10, 3).page, 0);
    }

    #[test]
    fn test_non_positive_size_degrades_without_panic() {
        for size in [0, -1, -10] {
            let p = Paginator::new(25, 2, size, 3);
            assert_eq!(p.total_pages, 0, "size {size}");
            assert!(p.active_pages.is_empty());
            assert!(p.get_range(&[0u8; 25]).is_empty());
        }
    }

    #[test]
    fn test_non_positive_window_treated_as_one() {
        let p = Paginator::new(50, 3, 10, 0);
        assert_eq!(p.pages, 1);
        assert_eq!(p.active_pages, vec![3]);
    }

    #[test]
    fn test_huge_inputs_keep_window_bounded() {
        let p = Paginator::new("9223372036854775807", 1, 1, "9223372036854775807");
        assert_eq!(p.total_pages, i64::MAX);
        assert_eq!(p.pages, MAX_PAGE_WINDOW);
        assert_eq!(p.active_pages.len() as i64, MAX_PAGE_WINDOW);
        assert_eq!((p.start_page, p.end_page), (1, MAX_PAGE_WINDOW));

        let last = Paginator::new(i64::MAX, i64::MAX, 1, i64::MAX);
        assert_eq!(last.page, i64::MAX);
        assert_eq!(last.end_page, i64::MAX);
        assert_eq!(last.active_pages.len() as i64, MAX_PAGE_WINDOW);

        // A full window under the cap is still shown whole.
        let small = Paginator::new(50, 1, 1, i64::MAX);
        assert_eq!(small.active_pages, (1..=50).collect::<Vec<i64>>());
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let p = Paginator::new("25", "2", "10", "3");
        assert_eq!(p, Paginator::new(25, 2, 10, 3));

        let lenient = Paginator::new(" 30items", "2.7", "+10", "3");
        assert_eq!((lenient.items, lenient.page, lenient.size), (30, 2, 10));
    }

    #[test]
    fn test_garbage_input_degrades_to_defaults() {
        let p = Paginator::new("lots", "first", "big", "some");
        assert_eq!(p.items, 0);
        assert_eq!(p.size, 10);
        assert_eq!(p.pages, 3);
        assert_eq!(p.total_pages, 0);

        let negative = Paginator::new(-5, 1, 10, 3);
        assert_eq!(negative.items, 0);
    }

    #[test]
    fn test_from_options_and_collection() {
        let rows: Vec<u32> = (0..42).collect();
        let opts = PaginatorOptions::new().items_of(&rows).page("5").size(10);
        let p = Paginator::from_options(&opts);
        assert_eq!(p, Paginator::for_collection(&rows, 5, 10, 3));
        assert_eq!(p.get_range(&rows), &[40, 41]);
        assert_eq!(Paginator::from_options(&p.to_options()), p);
    }

    #[test]
    fn test_options_deserialize_tolerant() {
        let opts: PaginatorOptions =
            serde_json::from_str(r#"{ "items": "12", "page": 2, "size": "5" }"#).unwrap();
        let p = Paginator::from_options(&opts);
        assert_eq!((p.items, p.page, p.size, p.pages), (12, 2, 5, 3));
        assert_eq!(p.active_pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = PaginatorOptions::new().items(40).page(1).size(10);
        let merged = base.merge(&PaginatorOptions::new().page(3));
        assert_eq!(Paginator::from_options(&merged).page, 3);
        assert_eq!(merged.items, Some(PageInput::Int(40)));
    }

    #[test]
    fn test_get_range_pages_reconstruct_collection() {
        for (len, size) in [(0usize, 3), (1, 3), (9, 3), (10, 3), (37, 7), (5, 10)] {
            let collection: Vec<usize> = (0..len).collect();
            let total = Paginator::for_collection(&collection, 1, size, 3).total_pages;
            let mut rebuilt = Vec::new();
            for page in 1..=total {
                let p = Paginator::for_collection(&collection, page, size, 3);
                rebuilt.extend_from_slice(p.get_range(&collection));
            }
            assert_eq!(rebuilt, collection, "len {len} size {size}");
        }
    }

    #[test]
    fn test_get_range_on_shorter_collection() {
        let p = Paginator::new(100, 3, 10, 3);
        let short = [1, 2, 3];
        assert!(p.get_range(&short).is_empty());
        let partial: Vec<i32> = (0..25).collect();
        assert_eq!(p.get_range(&partial), &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_has_page() {
        let p = Paginator::new(25, 1, 10, 3);
        assert!(p.has_page(1) && p.has_page(3));
        assert!(!p.has_page(0) && !p.has_page(4));
    }
}
