//! Pagination parameters for user list fetches.
//!
//! The API collaborator pages by `page` (1-indexed) and `page_size`. A
//! `limit` overrides the page size when present, and `pagination = false`
//! asks for the full list in one response.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Deserializes an optional string into an optional i64.
///
/// Query strings and hand-edited snapshots may carry empty strings,
/// which are treated as `None`.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Page that was returned
    pub page: i64,
    /// Page size that was applied
    pub page_size: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

/// Page selection for a list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PaginationParams {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Page number, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to [1, MAX_PAGE_SIZE].
    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Items skipped before the page, saturating for absurd page numbers.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// Slices `items` to the selected page.
    pub fn apply<T: Clone>(&self, items: &[T]) -> (Vec<T>, PaginationMeta) {
        let len = items.len();
        let bound = |n: i64| usize::try_from(n).map_or(len, |n| n.min(len));
        let start = bound(self.offset());
        let end = bound(self.offset().saturating_add(self.page_size()));
        let meta = PaginationMeta {
            total: i64::try_from(len).unwrap_or(i64::MAX),
            page: self.page(),
            page_size: self.page_size(),
            has_more: end < len,
        };
        (items[start..end].to_vec(), meta)
    }
}
