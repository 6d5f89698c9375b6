//! In-memory implementation of DocumentReader.
//!
//! Filtering mirrors the Postgres reader: case-insensitive,
//! accent-insensitive substring matching per provided filter field.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::document::Document;
use crate::domain::foundation::{DomainError, Phase};
use crate::ports::{
    AcronymGroup, DocumentFilter, DocumentReader, DocumentSummary, Page, PageRequest,
    SortDirection,
};

use super::InMemoryDocumentStore;

/// In-memory reader over the shared document map.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentReader {
    store: InMemoryDocumentStore,
}

impl InMemoryDocumentReader {
    /// Create a reader over the given store.
    pub fn new(store: InMemoryDocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DocumentReader for InMemoryDocumentReader {
    async fn find_page(
        &self,
        filter: &DocumentFilter,
        page: &PageRequest,
    ) -> Result<Page<DocumentSummary>, DomainError> {
        let mut matching: Vec<Document> = self
            .store
            .snapshot()
            .await
            .into_iter()
            .filter(|d| matches(filter, d))
            .collect();

        matching.sort_by_key(|d| *d.id().as_uuid());
        if page.sort_direction() == SortDirection::Desc {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let content: Vec<DocumentSummary> = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(summarize)
            .collect();

        Ok(Page::new(total, page, content))
    }

    async fn find_acronym_groups(
        &self,
        page: &PageRequest,
    ) -> Result<Page<AcronymGroup>, DomainError> {
        let mut families: BTreeMap<String, Vec<Document>> = BTreeMap::new();
        for doc in self.store.snapshot().await {
            families.entry(doc.acronym().to_string()).or_default().push(doc);
        }

        let mut groups: Vec<AcronymGroup> = families
            .into_iter()
            .map(|(acronym, members)| AcronymGroup {
                acronym,
                documents: members.len() as u64,
                latest_version: members.iter().map(Document::version).max().unwrap_or(0),
                active_version: members
                    .iter()
                    .find(|d| d.phase() == Phase::Active)
                    .map(Document::version),
            })
            .collect();

        if page.sort_direction() == SortDirection::Desc {
            groups.reverse();
        }

        let total = groups.len() as u64;
        let content: Vec<AcronymGroup> = groups
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(total, page, content))
    }
}

fn summarize(doc: Document) -> DocumentSummary {
    DocumentSummary {
        id: *doc.id(),
        title: doc.title().to_string(),
        description: doc.description().to_string(),
        acronym: doc.acronym().to_string(),
        version: doc.version(),
        phase: doc.phase(),
        created_at: *doc.created_at(),
        updated_at: *doc.updated_at(),
    }
}

fn matches(filter: &DocumentFilter, doc: &Document) -> bool {
    let title_ok = filter
        .title()
        .map_or(true, |needle| contains_folded(doc.title(), needle));
    let acronym_ok = filter
        .acronym()
        .map_or(true, |needle| contains_folded(doc.acronym(), needle));
    let phase_ok = filter
        .phase()
        .map_or(true, |needle| contains_folded(&doc.phase().to_string(), needle));
    title_ok && acronym_ok && phase_ok
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

/// Lowercase and strip diacritics from Latin letters.
///
/// Covers the Latin-1 repertoire, which matches what the Postgres
/// `unaccent` dictionary does for the data this service stores.
fn fold(s: &str) -> String {
    s.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ñ' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::NewDocument;
    use crate::ports::DocumentStore;

    async fn seeded_store() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        for (title, acronym, version) in [
            ("Quality Policy", "POL", 1),
            ("Quality Policy", "POL", 2),
            ("Operating Procédure", "SOP", 1),
            ("Work Instruction", "WI", 1),
        ] {
            store
                .insert(NewDocument::draft(title, "Description", acronym, version).unwrap())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn unfiltered_page_returns_everything() {
        let reader = InMemoryDocumentReader::new(seeded_store().await);
        let page = reader
            .find_page(&DocumentFilter::default(), &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_results, 4);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 0);
        assert_eq!(page.content.len(), 4);
    }

    #[tokio::test]
    async fn title_filter_is_case_insensitive_substring() {
        let reader = InMemoryDocumentReader::new(seeded_store().await);
        let filter = DocumentFilter::new(Some("quality".to_string()), None, None);
        let page = reader
            .find_page(&filter, &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_results, 2);
        assert!(page.content.iter().all(|d| d.acronym == "POL"));
    }

    #[tokio::test]
    async fn title_filter_is_accent_insensitive() {
        let reader = InMemoryDocumentReader::new(seeded_store().await);

        // Stored title carries the accent; the query does not.
        let filter = DocumentFilter::new(Some("procedure".to_string()), None, None);
        let page = reader
            .find_page(&filter, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_results, 1);

        // And the other way around.
        let filter = DocumentFilter::new(Some("instructión".to_string()), None, None);
        let page = reader
            .find_page(&filter, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_results, 1);
    }

    #[tokio::test]
    async fn provided_filters_combine_conjunctively() {
        let reader = InMemoryDocumentReader::new(seeded_store().await);
        let filter = DocumentFilter::new(Some("Quality".to_string()), Some("WI".to_string()), None);
        let page = reader
            .find_page(&filter, &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn phase_filter_matches_phase_name_substring() {
        let store = seeded_store().await;
        let reader = InMemoryDocumentReader::new(store.clone());

        let filter = DocumentFilter::new(None, None, Some("dra".to_string()));
        let page = reader
            .find_page(&filter, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_results, 4);

        let filter = DocumentFilter::new(None, None, Some("active".to_string()));
        let page = reader
            .find_page(&filter, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn pagination_slices_and_counts() {
        let reader = InMemoryDocumentReader::new(seeded_store().await);
        let request = PageRequest::new(1, 3, SortDirection::Asc);
        let page = reader
            .find_page(&DocumentFilter::default(), &request)
            .await
            .unwrap();

        assert_eq!(page.total_results, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.content.len(), 1);
    }

    #[tokio::test]
    async fn sort_directions_reverse_each_other() {
        let reader = InMemoryDocumentReader::new(seeded_store().await);
        let asc = reader
            .find_page(
                &DocumentFilter::default(),
                &PageRequest::new(0, 10, SortDirection::Asc),
            )
            .await
            .unwrap();
        let desc = reader
            .find_page(
                &DocumentFilter::default(),
                &PageRequest::new(0, 10, SortDirection::Desc),
            )
            .await
            .unwrap();

        let mut reversed: Vec<_> = desc.content.iter().map(|d| d.id).collect();
        reversed.reverse();
        let ascending: Vec<_> = asc.content.iter().map(|d| d.id).collect();
        assert_eq!(ascending, reversed);
    }

    #[tokio::test]
    async fn acronym_groups_aggregate_families() {
        let store = seeded_store().await;
        let reader = InMemoryDocumentReader::new(store.clone());

        let page = reader
            .find_acronym_groups(&PageRequest::new(0, 10, SortDirection::Asc))
            .await
            .unwrap();

        assert_eq!(page.total_results, 3);
        let pol = page.content.iter().find(|g| g.acronym == "POL").unwrap();
        assert_eq!(pol.documents, 2);
        assert_eq!(pol.latest_version, 2);
        assert_eq!(pol.active_version, None);
    }

    #[tokio::test]
    async fn acronym_groups_report_active_version() {
        let store = seeded_store().await;
        let mut target = store
            .find_all_by_acronym("POL")
            .await
            .unwrap()
            .into_iter()
            .find(|d| d.version() == 2)
            .unwrap();
        target.promote().unwrap();
        store.update(&target).await.unwrap();

        let reader = InMemoryDocumentReader::new(store);
        let page = reader
            .find_acronym_groups(&PageRequest::new(0, 10, SortDirection::Asc))
            .await
            .unwrap();

        let pol = page.content.iter().find(|g| g.acronym == "POL").unwrap();
        assert_eq!(pol.active_version, Some(2));
    }

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Résumé"), "resume");
        assert_eq!(fold("AÇÃO"), "acao");
        assert_eq!(fold("plain"), "plain");
    }
}
