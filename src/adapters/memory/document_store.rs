//! In-memory implementation of DocumentStore.
//!
//! Documents live in a shared map. Family transactions take a per-acronym
//! mutex and stage their writes; staged writes become visible atomically on
//! commit and are discarded if the transaction is dropped.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::document::{Document, NewDocument};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp};
use crate::ports::{DocumentStore, FamilyTransaction};

/// In-memory store for documents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    documents: RwLock<HashMap<DocumentId, Document>>,
    family_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every committed document (useful for tests and readers).
    pub async fn snapshot(&self) -> Vec<Document> {
        let documents = self.inner.documents.read().await;
        let mut all: Vec<Document> = documents.values().cloned().collect();
        all.sort_by(|a, b| (a.acronym(), a.version()).cmp(&(b.acronym(), b.version())));
        all
    }

    /// Number of committed documents.
    pub async fn len(&self) -> usize {
        self.inner.documents.read().await.len()
    }

    /// True when the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.inner.documents.read().await.is_empty()
    }

    async fn family_lock(&self, acronym: &str) -> Arc<Mutex<()>> {
        let mut locks = self.inner.family_locks.lock().await;
        locks
            .entry(acronym.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn materialize(document: NewDocument) -> Document {
    let now = Timestamp::now();
    Document::reconstitute(
        DocumentId::new(),
        document.title().to_string(),
        document.description().to_string(),
        document.acronym().to_string(),
        document.version(),
        document.phase(),
        now,
        now,
    )
}

fn refresh(document: &Document) -> Document {
    Document::reconstitute(
        *document.id(),
        document.title().to_string(),
        document.description().to_string(),
        document.acronym().to_string(),
        document.version(),
        document.phase(),
        *document.created_at(),
        Timestamp::now(),
    )
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, document: NewDocument) -> Result<Document, DomainError> {
        let mut documents = self.inner.documents.write().await;
        let clash = documents
            .values()
            .any(|d| d.acronym() == document.acronym() && d.version() == document.version());
        if clash {
            return Err(DomainError::new(
                ErrorCode::DuplicateVersion,
                format!(
                    "Document with acronym '{}' and version {} already exists",
                    document.acronym(),
                    document.version()
                ),
            ));
        }

        let stored = materialize(document);
        documents.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, document: &Document) -> Result<Document, DomainError> {
        let mut documents = self.inner.documents.write().await;
        if !documents.contains_key(document.id()) {
            return Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document not found: {}", document.id()),
            ));
        }

        let stored = refresh(document);
        documents.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let documents = self.inner.documents.read().await;
        Ok(documents.get(id).cloned())
    }

    async fn find_all_by_acronym(&self, acronym: &str) -> Result<Vec<Document>, DomainError> {
        let documents = self.inner.documents.read().await;
        let mut family: Vec<Document> = documents
            .values()
            .filter(|d| d.acronym() == acronym)
            .cloned()
            .collect();
        family.sort_by_key(Document::version);
        Ok(family)
    }

    async fn exists_by_acronym_and_version(
        &self,
        acronym: &str,
        version: u32,
    ) -> Result<bool, DomainError> {
        let documents = self.inner.documents.read().await;
        Ok(documents
            .values()
            .any(|d| d.acronym() == acronym && d.version() == version))
    }

    async fn begin_family(
        &self,
        acronym: &str,
    ) -> Result<Box<dyn FamilyTransaction>, DomainError> {
        let lock = self.family_lock(acronym).await;
        let guard = lock.lock_owned().await;
        Ok(Box::new(InMemoryFamilyTransaction {
            store: self.clone(),
            acronym: acronym.to_string(),
            staged: HashMap::new(),
            _guard: guard,
        }))
    }
}

/// Family transaction staging writes against the in-memory store.
struct InMemoryFamilyTransaction {
    store: InMemoryDocumentStore,
    acronym: String,
    staged: HashMap<DocumentId, Document>,
    _guard: OwnedMutexGuard<()>,
}

impl InMemoryFamilyTransaction {
    async fn family_view(&self) -> Vec<Document> {
        let documents = self.store.inner.documents.read().await;
        let mut view: HashMap<DocumentId, Document> = documents
            .values()
            .filter(|d| d.acronym() == self.acronym)
            .map(|d| (*d.id(), d.clone()))
            .collect();
        for (id, doc) in &self.staged {
            view.insert(*id, doc.clone());
        }
        let mut family: Vec<Document> = view.into_values().collect();
        family.sort_by_key(Document::version);
        family
    }
}

#[async_trait]
impl FamilyTransaction for InMemoryFamilyTransaction {
    async fn documents(&mut self) -> Result<Vec<Document>, DomainError> {
        Ok(self.family_view().await)
    }

    async fn insert(&mut self, document: NewDocument) -> Result<Document, DomainError> {
        if document.acronym() != self.acronym {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!(
                    "Family transaction for '{}' cannot insert into '{}'",
                    self.acronym,
                    document.acronym()
                ),
            ));
        }

        let clash = self
            .family_view()
            .await
            .iter()
            .any(|d| d.version() == document.version());
        if clash {
            return Err(DomainError::new(
                ErrorCode::DuplicateVersion,
                format!(
                    "Document with acronym '{}' and version {} already exists",
                    document.acronym(),
                    document.version()
                ),
            ));
        }

        let stored = materialize(document);
        self.staged.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&mut self, document: &Document) -> Result<Document, DomainError> {
        let known = self.staged.contains_key(document.id()) || {
            let documents = self.store.inner.documents.read().await;
            documents.contains_key(document.id())
        };
        if !known {
            return Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document not found: {}", document.id()),
            ));
        }

        let stored = refresh(document);
        self.staged.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let mut documents = self.store.inner.documents.write().await;
        for (id, doc) in &self.staged {
            documents.insert(*id, doc.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Phase;

    fn draft(acronym: &str, version: u32) -> NewDocument {
        NewDocument::draft("Title", "Description", acronym, version).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = InMemoryDocumentStore::new();
        let stored = store.insert(draft("POL", 1)).await.unwrap();

        assert_eq!(stored.phase(), Phase::Draft);
        assert_eq!(stored.version(), 1);
        assert_eq!(stored.created_at(), stored.updated_at());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_version() {
        let store = InMemoryDocumentStore::new();
        store.insert(draft("POL", 1)).await.unwrap();

        let err = store.insert(draft("POL", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateVersion);
    }

    #[tokio::test]
    async fn insert_allows_same_version_in_other_family() {
        let store = InMemoryDocumentStore::new();
        store.insert(draft("POL", 1)).await.unwrap();
        assert!(store.insert(draft("SOP", 1)).await.is_ok());
    }

    #[tokio::test]
    async fn update_refreshes_updated_at() {
        let store = InMemoryDocumentStore::new();
        let mut stored = store.insert(draft("POL", 1)).await.unwrap();
        let created = *stored.created_at();

        stored
            .edit_info("New".to_string(), "New".to_string())
            .unwrap();
        let updated = store.update(&stored).await.unwrap();

        assert_eq!(updated.created_at(), &created);
        assert!(updated.updated_at() >= updated.created_at());
        assert_eq!(updated.title(), "New");
    }

    #[tokio::test]
    async fn update_unknown_document_fails() {
        let store = InMemoryDocumentStore::new();
        let other = InMemoryDocumentStore::new();
        let stored = other.insert(draft("POL", 1)).await.unwrap();

        let err = store.update(&stored).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentNotFound);
    }

    #[tokio::test]
    async fn find_all_by_acronym_returns_family_sorted_by_version() {
        let store = InMemoryDocumentStore::new();
        store.insert(draft("POL", 2)).await.unwrap();
        store.insert(draft("POL", 1)).await.unwrap();
        store.insert(draft("SOP", 1)).await.unwrap();

        let family = store.find_all_by_acronym("POL").await.unwrap();
        let versions: Vec<u32> = family.iter().map(Document::version).collect();
        assert_eq!(versions, vec![1, 2]);
    }

    #[tokio::test]
    async fn exists_by_acronym_and_version_works() {
        let store = InMemoryDocumentStore::new();
        store.insert(draft("POL", 1)).await.unwrap();

        assert!(store.exists_by_acronym_and_version("POL", 1).await.unwrap());
        assert!(!store.exists_by_acronym_and_version("POL", 2).await.unwrap());
        assert!(!store.exists_by_acronym_and_version("SOP", 1).await.unwrap());
    }

    #[tokio::test]
    async fn transaction_writes_are_invisible_until_commit() {
        let store = InMemoryDocumentStore::new();
        let mut tx = store.begin_family("POL").await.unwrap();
        tx.insert(draft("POL", 1)).await.unwrap();

        assert!(store.is_empty().await);
        tx.commit().await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = InMemoryDocumentStore::new();
        {
            let mut tx = store.begin_family("POL").await.unwrap();
            tx.insert(draft("POL", 1)).await.unwrap();
            // dropped without commit
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn transaction_sees_its_own_writes() {
        let store = InMemoryDocumentStore::new();
        store.insert(draft("POL", 1)).await.unwrap();

        let mut tx = store.begin_family("POL").await.unwrap();
        tx.insert(draft("POL", 2)).await.unwrap();

        let family = tx.documents().await.unwrap();
        assert_eq!(family.len(), 2);
    }

    #[tokio::test]
    async fn transaction_rejects_duplicate_version_including_staged() {
        let store = InMemoryDocumentStore::new();
        let mut tx = store.begin_family("POL").await.unwrap();
        tx.insert(draft("POL", 1)).await.unwrap();

        let err = tx.insert(draft("POL", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateVersion);
    }

    #[tokio::test]
    async fn transaction_rejects_foreign_family_insert() {
        let store = InMemoryDocumentStore::new();
        let mut tx = store.begin_family("POL").await.unwrap();
        assert!(tx.insert(draft("SOP", 1)).await.is_err());
    }

    #[tokio::test]
    async fn concurrent_family_transactions_serialize() {
        let store = InMemoryDocumentStore::new();
        let tx1 = store.begin_family("POL").await.unwrap();

        // A second writer to the same family must wait for the first.
        let store2 = store.clone();
        let second = tokio::spawn(async move {
            let mut tx2 = store2.begin_family("POL").await.unwrap();
            tx2.insert(draft("POL", 2)).await.unwrap();
            tx2.commit().await.unwrap();
        });

        tokio::task::yield_now().await;
        assert!(!second.is_finished());

        drop(tx1);
        second.await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn other_family_transactions_do_not_block() {
        let store = InMemoryDocumentStore::new();
        let _tx1 = store.begin_family("POL").await.unwrap();

        let mut tx2 = store.begin_family("SOP").await.unwrap();
        tx2.insert(draft("SOP", 1)).await.unwrap();
        tx2.commit().await.unwrap();

        assert_eq!(store.len().await, 1);
    }
}
