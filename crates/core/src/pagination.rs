//! Bounded page-number windows for listing navigation.
//!
//! Pages are 0-based throughout, matching the bookstore API's page
//! envelopes; templates add one for display.

use serde::{Deserialize, Serialize};

/// One slot in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageItem {
    /// A navigable page number (0-based).
    Page(u32),
    /// A gap between page numbers.
    Ellipsis,
}

/// Compute the window of page numbers to display.
///
/// With five or fewer pages, every page is shown. Otherwise the control
/// always shows page 0 and the last page, a contiguous window of
/// `[current - 1, current + 1]` clamped to the valid range, and ellipses
/// wherever a gap remains.
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 5 {
        return (0..total).map(PageItem::Page).collect();
    }

    let mut pages = Vec::new();

    // Leading edge: the window itself covers page 0 while current <= 1.
    if current > 1 {
        pages.push(PageItem::Page(0));
        if current > 2 {
            pages.push(PageItem::Ellipsis);
        }
    }

    let start = current.saturating_sub(1);
    let end = (total - 1).min(current + 1);
    for page in start..=end {
        pages.push(PageItem::Page(page));
    }

    // Trailing edge: the window covers the last page once current is
    // within one of it.
    if current < total - 2 {
        if current + 3 < total {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Page(total - 1));
    }

    pages
}

/// The page before `current`; stays at 0 at the boundary.
#[must_use]
pub const fn previous_page(current: u32) -> u32 {
    current.saturating_sub(1)
}

/// The page after `current`; stays at the last page at the boundary.
#[must_use]
pub const fn next_page(current: u32, total: u32) -> u32 {
    if current + 1 < total { current + 1 } else { current }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    #[test]
    fn test_few_pages_show_all() {
        assert_eq!(page_window(0, 1), vec![Page(0)]);
        assert_eq!(
            page_window(2, 5),
            vec![Page(0), Page(1), Page(2), Page(3), Page(4)]
        );
        assert_eq!(page_window(0, 0), vec![]);
    }

    #[test]
    fn test_middle_window_with_both_gaps() {
        assert_eq!(
            page_window(5, 10),
            vec![
                Page(0),
                Ellipsis,
                Page(4),
                Page(5),
                Page(6),
                Ellipsis,
                Page(9)
            ]
        );
    }

    #[test]
    fn test_near_start_no_leading_gap() {
        assert_eq!(
            page_window(0, 10),
            vec![Page(0), Page(1), Ellipsis, Page(9)]
        );
        assert_eq!(
            page_window(1, 10),
            vec![Page(0), Page(1), Page(2), Ellipsis, Page(9)]
        );
        // current == 2: page 0 shown, but no gap yet.
        assert_eq!(
            page_window(2, 10),
            vec![Page(0), Page(1), Page(2), Page(3), Ellipsis, Page(9)]
        );
    }

    #[test]
    fn test_near_end_no_trailing_gap() {
        assert_eq!(
            page_window(8, 10),
            vec![Page(0), Ellipsis, Page(7), Page(8), Page(9)]
        );
        assert_eq!(
            page_window(9, 10),
            vec![Page(0), Ellipsis, Page(8), Page(9)]
        );
        // One step from the gapless tail: ellipsis collapses away.
        assert_eq!(
            page_window(7, 10),
            vec![Page(0), Ellipsis, Page(6), Page(7), Page(8), Page(9)]
        );
    }

    #[test]
    fn test_edges_always_present() {
        for current in 0..20 {
            let window = page_window(current, 20);
            assert!(window.contains(&Page(0)), "page 0 missing at {current}");
            assert!(window.contains(&Page(19)), "last page missing at {current}");
        }
    }

    #[test]
    fn test_navigation_clamps_at_boundaries() {
        assert_eq!(previous_page(0), 0);
        assert_eq!(previous_page(3), 2);
        assert_eq!(next_page(9, 10), 9);
        assert_eq!(next_page(4, 10), 5);
    }
}
