//! Pagination types for the items listing

use serde::{Deserialize, Serialize};

use super::params::parse_leading_int;

/// Maximum items per page
pub const MAX_LIMIT: u32 = 1000;

/// Default items per page
pub const DEFAULT_LIMIT: u32 = 100;

/// Limit/offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: u32,
    offset: u64,
}

impl Pagination {
    /// Create pagination with clamping.
    ///
    /// - Limit is clamped to 1..=1000
    /// - Offset is clamped to a minimum of 0
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT as i64) as u32,
            offset: offset.max(0) as u64,
        }
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Get OFFSET value.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Query parameters for pagination, kept as raw strings
///
/// Unparsable values fall back to the defaults instead of rejecting the
/// request.
#[derive(Debug, Clone, Default)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl From<&PaginationParams> for Pagination {
    fn from(params: &PaginationParams) -> Self {
        let limit = params
            .limit
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(DEFAULT_LIMIT as i64);
        let offset = params
            .offset
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(0);
        Self::new(limit, offset)
    }
}

/// Echo of the pagination actually applied, with whole-table metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMeta {
    /// Row count of the whole table, ignoring any search filter
    pub total: i64,
    pub limit: u32,
    pub offset: u64,
    /// Latest `atualizado_em` across the table (RFC 3339)
    pub last_updated: Option<String>,
}

/// Paginated listing wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: ListMeta,
}
