//! Windowing and pagination metadata

use crate::core::PaginationMeta;

/// Slice the page out of an ordered, filtered view
///
/// `total` is the view length before windowing. A page past the end yields
/// an empty window with `has_next == false`.
pub fn window<T: Clone>(view: &[T], page: usize, limit: usize) -> (Vec<T>, PaginationMeta) {
    let meta = PaginationMeta::new(page, limit, view.len());
    (view[meta.range()].to_vec(), meta)
}

/// Page reached by a guarded "next"; `None` when there is no next page
pub fn next_page(meta: &PaginationMeta) -> Option<usize> {
    meta.has_next.then(|| meta.page + 1)
}

/// Page reached by a guarded "previous"; `None` when there is none
pub fn previous_page(meta: &PaginationMeta) -> Option<usize> {
    meta.has_prev.then(|| meta.page - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_length_law() {
        let data: Vec<u32> = (0..23).collect();
        for limit in 1..=7 {
            for page in 1..=8 {
                let (items, meta) = window(&data, page, limit);
                let expected = limit.min(data.len().saturating_sub((page - 1) * limit));
                assert_eq!(items.len(), expected, "page {page} limit {limit}");
                assert_eq!(meta.has_next, page < meta.pages);
                assert_eq!(meta.has_prev, page > 1);
            }
        }
    }

    #[test]
    fn test_window_contents() {
        let data = vec!['a', 'b', 'c', 'd', 'e'];
        let (items, meta) = window(&data, 2, 2);
        assert_eq!(items, vec!['c', 'd']);
        assert_eq!(meta.pages, 3);

        let (items, _) = window(&data, 3, 2);
        assert_eq!(items, vec!['e']);
    }

    #[test]
    fn test_guards() {
        let first = PaginationMeta::new(1, 2, 5);
        assert_eq!(next_page(&first), Some(2));
        assert_eq!(previous_page(&first), None);

        let last = PaginationMeta::new(3, 2, 5);
        assert_eq!(next_page(&last), None);
        assert_eq!(previous_page(&last), Some(2));
    }
}
