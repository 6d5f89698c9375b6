//! Document reader port (read side).
//!
//! Defines the contract for paged, filtered document queries. Reads take no
//! family isolation and may run fully concurrently with lifecycle writes.
//!
//! # Matching rule
//!
//! A document matches a filter when, for every *provided* field, the
//! document's field contains the filter text as a case-insensitive,
//! accent-insensitive substring. Absent or blank filters match everything.

use crate::domain::foundation::{DocumentId, DomainError, Phase, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for document queries.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Fetch one page of documents matching the filter, sorted by id.
    async fn find_page(
        &self,
        filter: &DocumentFilter,
        page: &PageRequest,
    ) -> Result<Page<DocumentSummary>, DomainError>;

    /// Fetch one page of acronym families, sorted by acronym.
    async fn find_acronym_groups(
        &self,
        page: &PageRequest,
    ) -> Result<Page<AcronymGroup>, DomainError>;
}

/// Optional filters for document listing.
///
/// Blank strings are normalized to `None` so that callers passing empty
/// query parameters get unfiltered results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    title: Option<String>,
    acronym: Option<String>,
    phase: Option<String>,
}

impl DocumentFilter {
    /// Create a filter, treating blank values as absent.
    pub fn new(title: Option<String>, acronym: Option<String>, phase: Option<String>) -> Self {
        Self {
            title: normalize(title),
            acronym: normalize(acronym),
            phase: normalize(phase),
        }
    }

    /// Title filter, if provided.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Acronym filter, if provided.
    pub fn acronym(&self) -> Option<&str> {
        self.acronym.as_deref()
    }

    /// Phase filter, if provided.
    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    /// True when no filter is provided.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.acronym.is_none() && self.phase.is_none()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Sort direction for paged queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Zero-based pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    items_per_page: u32,
    sort_direction: SortDirection,
}

impl PageRequest {
    /// Create a page request; `items_per_page` is clamped to at least 1.
    pub fn new(page: u32, items_per_page: u32, sort_direction: SortDirection) -> Self {
        Self {
            page,
            items_per_page: items_per_page.max(1),
            sort_direction,
        }
    }

    /// Zero-based page index.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.items_per_page)
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> u64 {
        u64::from(self.items_per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 10, SortDirection::default())
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching rows across all pages.
    pub total_results: u64,

    /// Total number of pages at the requested page size.
    pub total_pages: u32,

    /// Zero-based index of this page.
    pub current_page: u32,

    /// Rows in this page.
    pub content: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page, deriving the page count from the total.
    pub fn new(total_results: u64, request: &PageRequest, content: Vec<T>) -> Self {
        let per_page = u64::from(request.items_per_page());
        let total_pages = ((total_results + per_page - 1) / per_page).min(u64::from(u32::MAX)) as u32;
        Self {
            total_results,
            total_pages,
            current_page: request.page(),
            content,
        }
    }
}

/// Read-side projection of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID.
    pub id: DocumentId,

    /// Document title.
    pub title: String,

    /// Document description.
    pub description: String,

    /// Family grouping key.
    pub acronym: String,

    /// Version number.
    pub version: u32,

    /// Current lifecycle phase.
    pub phase: Phase,

    /// When the document was created.
    pub created_at: Timestamp,

    /// When the document was last updated.
    pub updated_at: Timestamp,
}

/// Aggregated view of one acronym family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymGroup {
    /// Family grouping key.
    pub acronym: String,

    /// Number of documents in the family.
    pub documents: u64,

    /// Highest version present in the family.
    pub latest_version: u32,

    /// Version currently ACTIVE, if any.
    pub active_version: Option<u32>,
}
