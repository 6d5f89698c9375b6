//! CreateDocumentHandler - Command handler for creating draft documents.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError, NewDocument};
use crate::domain::foundation::ErrorCode;
use crate::ports::DocumentStore;

/// Command to create a new document.
#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub title: String,
    pub description: String,
    pub acronym: String,
    pub version: u32,
}

/// Handler for creating documents.
///
/// New documents always start in DRAFT; no sibling is touched.
pub struct CreateDocumentHandler {
    store: Arc<dyn DocumentStore>,
}

impl CreateDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: CreateDocumentCommand) -> Result<Document, DocumentError> {
        let draft = NewDocument::draft(cmd.title, cmd.description, cmd.acronym.clone(), cmd.version)?;

        if self
            .store
            .exists_by_acronym_and_version(&cmd.acronym, cmd.version)
            .await?
        {
            return Err(DocumentError::version_conflict(&cmd.acronym, cmd.version));
        }

        // The store's unique constraint backs the check above; a concurrent
        // create racing past it surfaces here as DuplicateVersion.
        let stored = self.store.insert(draft).await.map_err(|e| {
            if e.code == ErrorCode::DuplicateVersion {
                DocumentError::version_conflict(&cmd.acronym, cmd.version)
            } else {
                e.into()
            }
        })?;

        tracing::info!(
            id = %stored.id(),
            acronym = %stored.acronym(),
            version = stored.version(),
            "document created"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDocumentStore;
    use crate::domain::foundation::{DocumentId, DomainError, Phase};
    use crate::ports::FamilyTransaction;
    use async_trait::async_trait;

    fn command(acronym: &str, version: u32) -> CreateDocumentCommand {
        CreateDocumentCommand {
            title: "Quality Policy".to_string(),
            description: "Company quality policy".to_string(),
            acronym: acronym.to_string(),
            version,
        }
    }

    #[tokio::test]
    async fn creates_draft_document() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateDocumentHandler::new(store.clone());

        let doc = handler.handle(command("POL", 1)).await.unwrap();

        assert_eq!(doc.phase(), Phase::Draft);
        assert_eq!(doc.acronym(), "POL");
        assert_eq!(doc.version(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_version_fails_with_conflict_and_no_mutation() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateDocumentHandler::new(store.clone());
        handler.handle(command("POL", 1)).await.unwrap();

        let result = handler.handle(command("POL", 1)).await;

        assert!(matches!(
            result,
            Err(DocumentError::VersionConflict { .. })
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn same_version_in_other_family_is_allowed() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateDocumentHandler::new(store.clone());
        handler.handle(command("POL", 1)).await.unwrap();

        assert!(handler.handle(command("SOP", 1)).await.is_ok());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn blank_title_fails_validation() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateDocumentHandler::new(store.clone());

        let mut cmd = command("POL", 1);
        cmd.title = "   ".to_string();
        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(DocumentError::ValidationFailed { .. })));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn zero_version_fails_validation() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateDocumentHandler::new(store);

        let result = handler.handle(command("POL", 0)).await;
        assert!(matches!(result, Err(DocumentError::ValidationFailed { .. })));
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn insert(&self, _document: NewDocument) -> Result<Document, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "boom"))
        }

        async fn update(&self, _document: &Document) -> Result<Document, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "boom"))
        }

        async fn find_by_id(&self, _id: &DocumentId) -> Result<Option<Document>, DomainError> {
            Ok(None)
        }

        async fn find_all_by_acronym(&self, _acronym: &str) -> Result<Vec<Document>, DomainError> {
            Ok(vec![])
        }

        async fn exists_by_acronym_and_version(
            &self,
            _acronym: &str,
            _version: u32,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn begin_family(
            &self,
            _acronym: &str,
        ) -> Result<Box<dyn FamilyTransaction>, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "boom"))
        }
    }

    #[tokio::test]
    async fn store_failure_propagates_as_infrastructure() {
        let handler = CreateDocumentHandler::new(Arc::new(FailingStore));
        let result = handler.handle(command("POL", 1)).await;
        assert!(matches!(result, Err(DocumentError::Infrastructure(_))));
    }
}
