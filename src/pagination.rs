//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A validated, one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    /// The one-based page number.
    pub number: u64,
    /// The maximum number of items on the page.
    pub size: u64,
}

impl Page {
    /// Build a page from optional request parameters, filling in defaults from `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if the page number or page size is zero.
    pub fn from_params(
        page: Option<u64>,
        per_page: Option<u64>,
        config: PaginationConfig,
    ) -> Result<Self, Error> {
        let number = page.unwrap_or(config.default_page);
        let size = per_page.unwrap_or(config.default_page_size);

        if number == 0 {
            return Err(Error::InvalidPagination("page must be 1 or greater"));
        }

        if size == 0 {
            return Err(Error::InvalidPagination("perPage must be 1 or greater"));
        }

        Ok(Self { number, size })
    }

    /// The number of items to skip to reach the start of this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        pagination::{Page, PaginationConfig},
    };

    #[test]
    fn uses_defaults_when_params_missing() {
        let got = Page::from_params(None, None, PaginationConfig::default()).unwrap();

        assert_eq!(got, Page { number: 1, size: 10 });
        assert_eq!(got.offset(), 0);
    }

    #[test]
    fn uses_configured_defaults() {
        let config = PaginationConfig {
            default_page: 2,
            default_page_size: 25,
        };

        let got = Page::from_params(None, None, config).unwrap();

        assert_eq!(got, Page { number: 2, size: 25 });
    }

    #[test]
    fn offset_skips_previous_pages() {
        let got = Page::from_params(Some(3), Some(7), PaginationConfig::default()).unwrap();

        assert_eq!(got.offset(), 14);
    }

    #[test]
    fn rejects_page_zero() {
        let got = Page::from_params(Some(0), None, PaginationConfig::default());

        assert!(matches!(got, Err(Error::InvalidPagination(_))));
    }

    #[test]
    fn rejects_zero_page_size() {
        let got = Page::from_params(None, Some(0), PaginationConfig::default());

        assert!(matches!(got, Err(Error::InvalidPagination(_))));
    }
}
