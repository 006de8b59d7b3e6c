//! Pagination for listing pages
//!
//! Listings show a fixed number of rows per page. The requested page comes
//! from the `page` query parameter and is clamped into range.

use serde::Deserialize;

/// Rows per listing page
pub const PAGE_SIZE: i64 = 10;

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Total number of pages (at least 1)
    pub total_pages: i64,
    /// Row offset for SQL OFFSET clause
    pub offset: i64,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `?page=` query parameter
///
/// Kept as a string: anything non-numeric means the first page rather than a
/// rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn requested_page(&self) -> i64 {
        parse_page_number(self.page.as_deref())
    }
}

/// Parse a raw page parameter; missing or malformed means page 1
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// Calculate pagination from total rows and requested page
///
/// # Examples
/// ```
/// use atm_site::pagination::calculate_pagination;
///
/// let p = calculate_pagination(25, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 10);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(25, 99);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 20);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64) -> Pagination {
    let total_pages = ((total_results + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page = requested_page.clamp(1, total_pages);
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(25, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 10);
        assert!(p.has_previous());
        assert!(p.has_next());
    }

    #[test]
    fn test_pagination_beyond_last_page() {
        let p = calculate_pagination(25, 7);
        assert_eq!(p.page, 3);
        assert_eq!(p.offset, 20);
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_below_first_page() {
        let p = calculate_pagination(25, -4);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 3);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_exact_multiple() {
        let p = calculate_pagination(20, 3);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.page, 2);
    }

    #[test]
    fn test_page_parsing() {
        assert_eq!(parse_page_number(None), 1);
        assert_eq!(parse_page_number(Some("abc")), 1);
        assert_eq!(parse_page_number(Some("4")), 4);
        assert_eq!(parse_page_number(Some("")), 1);
    }
}
