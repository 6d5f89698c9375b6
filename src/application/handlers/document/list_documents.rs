//! ListDocumentsHandler - paged, filtered document listing.

use std::sync::Arc;

use crate::domain::document::DocumentError;
use crate::ports::{
    DocumentFilter, DocumentReader, DocumentSummary, Page, PageRequest, SortDirection,
};

/// Query for a filtered page of documents.
///
/// Every filter is independently optional; blank values mean "no filter".
#[derive(Debug, Clone, Default)]
pub struct ListDocumentsQuery {
    pub title: Option<String>,
    pub acronym: Option<String>,
    pub phase: Option<String>,
    pub page: u32,
    pub items_per_page: u32,
    pub sort_direction: SortDirection,
}

/// Handler for listing documents.
pub struct ListDocumentsHandler {
    reader: Arc<dyn DocumentReader>,
}

impl ListDocumentsHandler {
    pub fn new(reader: Arc<dyn DocumentReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListDocumentsQuery,
    ) -> Result<Page<DocumentSummary>, DocumentError> {
        let filter = DocumentFilter::new(query.title, query.acronym, query.phase);
        let request = PageRequest::new(query.page, query.items_per_page, query.sort_direction);
        let page = self.reader.find_page(&filter, &request).await?;
        Ok(page)
    }
}
