//! Offset/limit pagination
//!
//! `PageRequest` is only constructible from validated input, so a bad
//! `page` or `limit` is rejected before any query runs.

use serde::{Deserialize, Serialize};

use super::validation::{parse_positive, ValidationError};

/// Largest accepted page size
pub const MAX_LIMIT: i64 = 100;

/// Page number used when the request omits it
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the request omits it
pub const DEFAULT_LIMIT: i64 = 10;

/// Validated pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-indexed)
    page: i64,
    /// Rows per page
    limit: i64,
}

impl PageRequest {
    /// Create a page request, rejecting non-positive values and
    /// limits above [`MAX_LIMIT`].
    pub fn new(page: i64, limit: i64) -> Result<Self, ValidationError> {
        if page <= 0 {
            return Err(ValidationError::NotPositive {
                field: "page",
                value: page,
            });
        }
        if limit <= 0 {
            return Err(ValidationError::NotPositive {
                field: "limit",
                value: limit,
            });
        }
        if limit > MAX_LIMIT {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                max: MAX_LIMIT,
            });
        }
        // offset must fit in a BIGINT
        if (page - 1).checked_mul(limit).is_none() {
            return Err(ValidationError::OutOfRange {
                field: "page",
                max: i64::MAX / limit + 1,
            });
        }

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip before the page starts.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Wrap fetched rows and the total count into a page result.
    pub fn into_result<T>(self, data: Vec<T>, total_records: i64) -> PageResult<T> {
        PageResult {
            data,
            total_records,
            total_pages: total_pages(total_records, self.limit),
            current_page: self.page,
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// `ceil(total_records / limit)`; zero records means zero pages.
pub fn total_pages(total_records: i64, limit: i64) -> i64 {
    if total_records <= 0 || limit <= 0 {
        return 0;
    }
    (total_records + limit - 1) / limit
}

/// Query string parameters for list endpoints.
///
/// Kept as raw text so non-numeric input surfaces as a
/// [`ValidationError`] instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationParams {
    /// Validate into a [`PageRequest`], applying defaults for omitted values.
    pub fn parse(&self) -> Result<PageRequest, ValidationError> {
        let page = match self.page.as_deref() {
            Some(raw) => parse_positive("page", raw)?,
            None => DEFAULT_PAGE,
        };
        let limit = match self.limit.as_deref() {
            Some(raw) => parse_positive("limit", raw)?,
            None => DEFAULT_LIMIT,
        };
        PageRequest::new(page, limit)
    }
}

/// One page of rows plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Total count across all pages (taken by a separate COUNT query)
    pub total_records: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
    /// Rows for the current page
    pub data: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert each row, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            total_records: self.total_records,
            total_pages: self.total_pages,
            current_page: self.current_page,
            limit: self.limit,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Unpaged list plus its total, for small lookup tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub total_records: i64,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        let p = PageRequest::new(1, 10).unwrap();
        assert_eq!(p.offset(), 0);

        let p = PageRequest::new(2, 10).unwrap();
        assert_eq!(p.offset(), 10);

        let p = PageRequest::new(3, 25).unwrap();
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn rejects_non_positive() {
        assert!(matches!(
            PageRequest::new(0, 10),
            Err(ValidationError::NotPositive { field: "page", .. })
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(ValidationError::NotPositive { field: "limit", .. })
        ));
        assert!(matches!(
            PageRequest::new(-1, -1),
            Err(ValidationError::NotPositive { field: "page", .. })
        ));
    }

    #[test]
    fn rejects_limit_above_cap() {
        assert!(PageRequest::new(1, MAX_LIMIT).is_ok());
        assert_eq!(
            PageRequest::new(1, MAX_LIMIT + 1),
            Err(ValidationError::OutOfRange {
                field: "limit",
                max: MAX_LIMIT
            })
        );
    }

    #[test]
    fn rejects_page_whose_offset_overflows() {
        let params = PaginationParams {
            page: Some(i64::MAX.to_string()),
            limit: Some("10".into()),
        };
        assert_eq!(
            params.parse(),
            Err(ValidationError::OutOfRange {
                field: "page",
                max: i64::MAX / 10 + 1
            })
        );

        let last = PageRequest::new(i64::MAX / 10 + 1, 10).unwrap();
        assert_eq!(last.offset(), (i64::MAX / 10) * 10);
        assert!(PageRequest::new(i64::MAX / 10 + 2, 10).is_err());
        assert!(PageRequest::new(i64::MAX, 1).is_ok());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn params_default_to_first_page_of_ten() {
        let req = PaginationParams::default().parse().unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!((req.page(), req.limit()), (1, 10));
    }

    #[test]
    fn params_reject_bad_text() {
        let params = PaginationParams {
            page: Some("two".into()),
            limit: None,
        };
        assert!(matches!(
            params.parse(),
            Err(ValidationError::NotAnInteger { field: "page", .. })
        ));

        let params = PaginationParams {
            page: Some("1".into()),
            limit: Some("-5".into()),
        };
        assert!(matches!(
            params.parse(),
            Err(ValidationError::NotPositive { field: "limit", .. })
        ));
    }

    #[test]
    fn into_result_carries_totals() {
        let req = PageRequest::new(2, 10).unwrap();
        let result = req.into_result(vec![11, 12], 25);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.current_page, 2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalRecords"], 25);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["data"], serde_json::json!([11, 12]));
    }
}
