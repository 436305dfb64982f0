//! List pagination parameters.

use crate::error::AppError;
use std::collections::HashMap;

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// `page` 0 and 1 both mean the first page; page N > 0 starts at (N-1) * page_size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub order: String,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            order: String::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64, order: impl Into<String>) -> Result<Self, AppError> {
        if page < 0 || page_size <= 0 {
            return Err(AppError::BadParams);
        }
        // offset must be representable
        if page > 0 && (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::BadParams);
        }
        Ok(PageRequest {
            page,
            page_size,
            order: order.into(),
        })
    }

    /// Read `page`, `pagesize` and `order` from query parameters. Empty values take the default.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let page = read_int(params, "page", DEFAULT_PAGE)?;
        let page_size = read_int(params, "pagesize", DEFAULT_PAGE_SIZE)?;
        let order = params.get("order").map(|s| s.trim().to_string()).unwrap_or_default();
        Self::new(page, page_size, order)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> Option<i64> {
        (self.page > 0).then(|| (self.page - 1) * self.page_size)
    }

    pub fn order(&self) -> Option<&str> {
        (!self.order.is_empty()).then_some(self.order.as_str())
    }
}

fn read_int(params: &HashMap<String, String>, name: &str, default: i64) -> Result<i64, AppError> {
    match params.get(name).map(|s| s.trim()) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse().map_err(|_| AppError::BadParams),
    }
}
