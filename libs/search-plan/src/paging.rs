//! Pagination resolver.
//!
//! Page numbers and sizes coming from clients are clamped, never rejected:
//! a zero or negative page becomes page 1 and page sizes are bounded by the
//! descriptor's limits before anything reaches the store.

use serde::Serialize;

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: u64,
    pub page_size: u32,
    /// Number of matches to skip before the page starts.
    pub skip: u64,
}

impl PageWindow {
    /// Number of rows to fetch for this page.
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Clamp the requested page and page size against the configured bounds.
pub fn resolve(
    requested_page: Option<i64>,
    requested_page_size: Option<i64>,
    default_page_size: u32,
    max_page_size: u32,
) -> PageWindow {
    let max_page_size = max_page_size.max(1);

    let page = requested_page.unwrap_or(1).max(1) as u64;

    let page_size = requested_page_size
        .unwrap_or(i64::from(default_page_size))
        .clamp(1, i64::from(max_page_size)) as u32;

    let skip = (page - 1).saturating_mul(u64::from(page_size));

    PageWindow {
        page,
        page_size,
        skip,
    }
}

/// Number of pages needed for `total_count` matches; zero when nothing matched.
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if total_count == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_apply_when_nothing_requested() {
        let w = resolve(None, None, 10, 50);
        assert_eq!(
            w,
            PageWindow {
                page: 1,
                page_size: 10,
                skip: 0
            }
        );
    }

    #[test]
    fn clamps_page_and_size() {
        assert_eq!(resolve(Some(0), None, 10, 50).page, 1);
        assert_eq!(resolve(Some(-7), None, 10, 50).page, 1);
        assert_eq!(resolve(None, Some(500), 10, 50).page_size, 50);
        assert_eq!(resolve(None, Some(0), 10, 50).page_size, 1);
        assert_eq!(resolve(None, Some(-3), 10, 50).page_size, 1);
    }

    #[test]
    fn computes_skip() {
        let w = resolve(Some(3), Some(20), 10, 50);
        assert_eq!(w.skip, 40);
        assert_eq!(w.limit(), 20);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let w = resolve(Some(i64::MAX), Some(50), 10, 50);
        assert_eq!(w.page, i64::MAX as u64);
        assert_eq!(w.skip, u64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(23, 10), 3);
    }

    proptest! {
        #[test]
        fn non_positive_page_is_one(page in i64::MIN..=0, size in 1i64..100) {
            prop_assert_eq!(resolve(Some(page), Some(size), 10, 50).page, 1);
        }

        #[test]
        fn oversized_page_size_is_max(size in 51i64..i64::MAX) {
            prop_assert_eq!(resolve(Some(1), Some(size), 10, 50).page_size, 50);
        }

        #[test]
        fn non_positive_page_size_is_at_least_one(size in i64::MIN..=0) {
            prop_assert!(resolve(Some(1), Some(size), 10, 50).page_size >= 1);
        }

        #[test]
        fn total_pages_matches_ceiling(total in 1u64..1_000_000, size in 1u32..500) {
            let pages = total_pages(total, size);
            prop_assert!(pages * u64::from(size) >= total);
            prop_assert!((pages - 1) * u64::from(size) < total);
        }
    }
}
