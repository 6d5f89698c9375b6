//! ListAcronymGroupsHandler - paged listing of acronym families.

use std::sync::Arc;

use crate::domain::document::DocumentError;
use crate::ports::{AcronymGroup, DocumentReader, Page, PageRequest, SortDirection};

/// Query for a page of acronym families.
#[derive(Debug, Clone, Copy)]
pub struct ListAcronymGroupsQuery {
    pub page: u32,
    pub items_per_page: u32,
    pub sort_direction: SortDirection,
}

/// Handler for listing acronym families, sorted by acronym.
pub struct ListAcronymGroupsHandler {
    reader: Arc<dyn DocumentReader>,
}

impl ListAcronymGroupsHandler {
    pub fn new(reader: Arc<dyn DocumentReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListAcronymGroupsQuery,
    ) -> Result<Page<AcronymGroup>, DocumentError> {
        let request = PageRequest::new(query.page, query.items_per_page, query.sort_direction);
        let page = self.reader.find_acronym_groups(&request).await?;
        Ok(page)
    }
}
