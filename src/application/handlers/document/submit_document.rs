//! SubmitDocumentHandler - promotes a document to ACTIVE.
//!
//! Submitting enforces the single-ACTIVE-per-family invariant: whichever
//! sibling currently holds ACTIVE is moved to OBSOLETE in the same family
//! transaction that promotes the target, so no reader ever observes zero or
//! two ACTIVE documents in a family.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{DocumentId, Phase};
use crate::ports::DocumentStore;

/// Command to submit a document.
#[derive(Debug, Clone, Copy)]
pub struct SubmitDocumentCommand {
    pub id: DocumentId,
}

/// Handler for submitting documents.
///
/// Submitting an already-ACTIVE document is an idempotent success;
/// submitting an OBSOLETE document is rejected.
pub struct SubmitDocumentHandler {
    store: Arc<dyn DocumentStore>,
}

impl SubmitDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: SubmitDocumentCommand) -> Result<Document, DocumentError> {
        let target = self
            .store
            .find_by_id(&cmd.id)
            .await?
            .ok_or(DocumentError::NotFound(cmd.id))?;

        let mut tx = self.store.begin_family(target.acronym()).await?;
        let family = tx.documents().await?;

        // Re-read the target under the family lock; the copy fetched before
        // the lock may be stale.
        let mut target = family
            .iter()
            .find(|d| d.id() == &cmd.id)
            .cloned()
            .ok_or(DocumentError::NotFound(cmd.id))?;

        if target.phase() == Phase::Active {
            return Ok(target);
        }

        let previous_active = family
            .iter()
            .find(|d| d.phase().is_active() && d.id() != &cmd.id)
            .cloned();

        // Rejects OBSOLETE targets before any write is staged.
        target.promote()?;

        // The superseded sibling is written first so the write order inside
        // the transaction mirrors the lifecycle order.
        if let Some(mut active) = previous_active {
            active.supersede()?;
            tx.update(&active).await?;
            tracing::info!(
                id = %active.id(),
                acronym = %active.acronym(),
                version = active.version(),
                "document superseded"
            );
        }

        let stored = tx.update(&target).await?;
        tx.commit().await?;

        tracing::info!(
            id = %stored.id(),
            acronym = %stored.acronym(),
            version = stored.version(),
            "document submitted"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDocumentStore;
    use crate::domain::document::NewDocument;

    async fn insert_draft(store: &InMemoryDocumentStore, acronym: &str, version: u32) -> Document {
        store
            .insert(NewDocument::draft("Title", "Description", acronym, version).unwrap())
            .await
            .unwrap()
    }

    async fn active_count(store: &InMemoryDocumentStore, acronym: &str) -> usize {
        store
            .find_all_by_acronym(acronym)
            .await
            .unwrap()
            .iter()
            .filter(|d| d.phase() == Phase::Active)
            .count()
    }

    #[tokio::test]
    async fn submit_promotes_draft_to_active() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let doc = insert_draft(&store, "POL", 1).await;
        let handler = SubmitDocumentHandler::new(store.clone());

        let submitted = handler
            .handle(SubmitDocumentCommand { id: *doc.id() })
            .await
            .unwrap();

        assert_eq!(submitted.phase(), Phase::Active);
        assert_eq!(active_count(&store, "POL").await, 1);
    }

    #[tokio::test]
    async fn submit_obsoletes_the_previous_active_sibling() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let first = insert_draft(&store, "POL", 1).await;
        let second = insert_draft(&store, "POL", 2).await;
        let handler = SubmitDocumentHandler::new(store.clone());

        handler
            .handle(SubmitDocumentCommand { id: *first.id() })
            .await
            .unwrap();
        handler
            .handle(SubmitDocumentCommand { id: *second.id() })
            .await
            .unwrap();

        let family = store.find_all_by_acronym("POL").await.unwrap();
        let first_now = family.iter().find(|d| d.id() == first.id()).unwrap();
        let second_now = family.iter().find(|d| d.id() == second.id()).unwrap();

        assert_eq!(first_now.phase(), Phase::Obsolete);
        assert_eq!(second_now.phase(), Phase::Active);
        assert_eq!(active_count(&store, "POL").await, 1);
    }

    #[tokio::test]
    async fn submit_does_not_touch_other_families() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pol = insert_draft(&store, "POL", 1).await;
        let sop = insert_draft(&store, "SOP", 1).await;
        let handler = SubmitDocumentHandler::new(store.clone());

        handler
            .handle(SubmitDocumentCommand { id: *sop.id() })
            .await
            .unwrap();
        handler
            .handle(SubmitDocumentCommand { id: *pol.id() })
            .await
            .unwrap();

        let sop_now = store.find_by_id(sop.id()).await.unwrap().unwrap();
        assert_eq!(sop_now.phase(), Phase::Active);
    }

    #[tokio::test]
    async fn submit_unknown_id_fails_with_not_found() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = SubmitDocumentHandler::new(store);

        let result = handler
            .handle(SubmitDocumentCommand { id: DocumentId::new() })
            .await;
        assert!(matches!(result, Err(DocumentError::NotFound(_))));
    }

    #[tokio::test]
    async fn submit_already_active_is_idempotent() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let doc = insert_draft(&store, "POL", 1).await;
        let handler = SubmitDocumentHandler::new(store.clone());

        handler
            .handle(SubmitDocumentCommand { id: *doc.id() })
            .await
            .unwrap();
        let again = handler
            .handle(SubmitDocumentCommand { id: *doc.id() })
            .await
            .unwrap();

        assert_eq!(again.phase(), Phase::Active);
        assert_eq!(active_count(&store, "POL").await, 1);
    }

    #[tokio::test]
    async fn submit_obsolete_document_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let first = insert_draft(&store, "POL", 1).await;
        let second = insert_draft(&store, "POL", 2).await;
        let handler = SubmitDocumentHandler::new(store.clone());

        handler
            .handle(SubmitDocumentCommand { id: *first.id() })
            .await
            .unwrap();
        handler
            .handle(SubmitDocumentCommand { id: *second.id() })
            .await
            .unwrap();

        // first is now OBSOLETE; reviving it must fail and change nothing.
        let result = handler
            .handle(SubmitDocumentCommand { id: *first.id() })
            .await;

        assert!(matches!(result, Err(DocumentError::InvalidPhase(_))));
        let family = store.find_all_by_acronym("POL").await.unwrap();
        let second_now = family.iter().find(|d| d.id() == second.id()).unwrap();
        assert_eq!(second_now.phase(), Phase::Active);
        assert_eq!(active_count(&store, "POL").await, 1);
    }

    #[tokio::test]
    async fn concurrent_submits_leave_one_active() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let first = insert_draft(&store, "POL", 1).await;
        let second = insert_draft(&store, "POL", 2).await;

        let h1 = SubmitDocumentHandler::new(store.clone());
        let h2 = SubmitDocumentHandler::new(store.clone());
        let id1 = *first.id();
        let id2 = *second.id();

        let (r1, r2) = tokio::join!(
            h1.handle(SubmitDocumentCommand { id: id1 }),
            h2.handle(SubmitDocumentCommand { id: id2 }),
        );
        r1.unwrap();
        r2.unwrap();

        assert_eq!(active_count(&store, "POL").await, 1);
    }
}
