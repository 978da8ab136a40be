//! Stateless paging over a search result list
//!
//! A result list is cut into fixed-size pages; the active page index lives in
//! the session, not here. Out-of-range pages are rejected so callers disable
//! navigation instead of wrapping around.

use crate::error::{AppError, Result};
use serde::Serialize;

/// Paging position reported alongside each result page
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub page_count: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Total pages for a result list: ceil(total / page_size)
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

/// The slice of `items` belonging to `page`, plus paging info
///
/// Page 0 of an empty list is valid and yields an empty slice; any other
/// out-of-range page is an error.
pub fn page_slice<T>(items: &[T], page_size: usize, page: usize) -> Result<(&[T], PageInfo)> {
    if page_size == 0 {
        return Err(AppError::InvalidInput("page size must be positive".to_string()));
    }

    let pages = page_count(items.len(), page_size);
    if page >= pages && !(page == 0 && items.is_empty()) {
        return Err(AppError::InvalidInput(format!(
            "page {} out of range (0..{})",
            page, pages
        )));
    }

    let start = page * page_size;
    let end = (start + page_size).min(items.len());
    let info = PageInfo {
        page,
        page_size,
        total: items.len(),
        page_count: pages,
        has_prev: page > 0,
        has_next: page + 1 < pages,
    };

    Ok((&items[start..end], info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(page_count(0, 12), 0);
        assert_eq!(page_count(1, 12), 1);
        assert_eq!(page_count(12, 12), 1);
        assert_eq!(page_count(13, 12), 2);
        assert_eq!(page_count(100, 12), 9);
    }

    #[test]
    fn test_full_pages_except_last() {
        let items: Vec<u32> = (0..100).collect();
        let pages = page_count(items.len(), 12);

        for page in 0..pages {
            let (slice, info) = page_slice(&items, 12, page).unwrap();
            if page + 1 < pages {
                assert_eq!(slice.len(), 12);
                assert!(info.has_next);
            } else {
                // Last page holds the remainder: 100 - 12 * 8 = 4
                assert_eq!(slice.len(), 100 - 12 * (pages - 1));
                assert!(!info.has_next);
            }
            assert_eq!(info.has_prev, page > 0);
        }
    }

    #[test]
    fn test_page_contents_are_contiguous() {
        let items: Vec<u32> = (0..30).collect();
        let (slice, _) = page_slice(&items, 12, 1).unwrap();
        assert_eq!(slice, &(12..24).collect::<Vec<u32>>()[..]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let items: Vec<u32> = (0..24).collect();
        assert!(page_slice(&items, 12, 2).is_err());
        assert!(page_slice(&items, 12, 100).is_err());
        assert!(page_slice(&items, 0, 0).is_err());
    }

    #[test]
    fn test_empty_list_page_zero() {
        let items: Vec<u32> = vec![];
        let (slice, info) = page_slice(&items, 12, 0).unwrap();
        assert!(slice.is_empty());
        assert_eq!(info.page_count, 0);
        assert!(!info.has_prev && !info.has_next);

        assert!(page_slice(&items, 12, 1).is_err());
    }
}
