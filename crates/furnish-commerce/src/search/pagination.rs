//! Page slicing for the unfiltered catalog view.

use serde::{Deserialize, Serialize};

/// One page of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    /// Current page (1-indexed).
    pub current_page: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Page numbers to show around the current one, at most `max_visible`.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        if self.total_pages <= max_visible {
            return (1..=self.total_pages).collect();
        }

        // An out-of-range page anchors the window at the last page.
        let current = self.current_page.min(self.total_pages);
        let half = max_visible / 2;
        let start = current.saturating_sub(half).max(1);
        let end = start
            .saturating_add(max_visible.saturating_sub(1))
            .min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }
}

/// Slice `items` into the requested page.
///
/// `page` and `page_size` are clamped to at least 1. A page past the end
/// yields no items but still reports the real page count.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let slice = items
        .get(start..)
        .map(|rest| &rest[..rest.len().min(page_size)])
        .unwrap_or(&[]);

    Page {
        items: slice.to_vec(),
        total_pages,
        current_page: page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_page() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_prev());

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<u32> = (1..=5).collect();
        let page = paginate(&items, 4, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 4);
    }

    #[test]
    fn test_zero_page_and_size_are_clamped() {
        let items: Vec<u32> = (1..=3).collect();
        let page = paginate(&items, 0, 0);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.items, vec![1]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate::<u32>(&[], 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_page_numbers_window() {
        let items: Vec<u32> = (1..=100).collect();
        assert_eq!(paginate(&items, 1, 10).page_numbers(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(&items, 5, 10).page_numbers(5), vec![3, 4, 5, 6, 7]);
        assert_eq!(paginate(&items, 10, 10).page_numbers(5), vec![6, 7, 8, 9, 10]);
        assert_eq!(paginate(&items, 2, 50).page_numbers(5), vec![1, 2]);
    }

    #[test]
    fn test_page_numbers_past_the_end() {
        let items: Vec<u32> = (1..=100).collect();
        assert_eq!(
            paginate(&items, usize::MAX, 10).page_numbers(7),
            vec![4, 5, 6, 7, 8, 9, 10]
        );
        assert_eq!(paginate(&items, 11, 10).page_numbers(5), vec![6, 7, 8, 9, 10]);
    }
}
