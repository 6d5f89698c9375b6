//! Document store port (write side).
//!
//! Defines the persistence contract for Document aggregates. The store
//! assigns ids and owns both timestamps: `insert` populates `id` and
//! `created_at`/`updated_at`, `update` refreshes `updated_at`.
//!
//! # Family transactions
//!
//! Lifecycle operations that read a version family and then write to it
//! (submit, generate-version) must not interleave with concurrent writers to
//! the same family, or the single-ACTIVE and unique-version invariants can be
//! violated by a race. `begin_family` returns a transactional unit scoped to
//! one acronym: reads and writes through it are isolated from other writers
//! until `commit`. Dropping the unit without committing rolls back.

use crate::domain::document::{Document, NewDocument};
use crate::domain::foundation::{DocumentId, DomainError};
use async_trait::async_trait;

/// Store port for Document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document, assigning id and timestamps.
    ///
    /// # Errors
    ///
    /// - `DuplicateVersion` if the (acronym, version) pair already exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, document: NewDocument) -> Result<Document, DomainError>;

    /// Update an existing document, refreshing `updated_at`.
    ///
    /// Returns the stored document.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, document: &Document) -> Result<Document, DomainError>;

    /// Find a document by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Find all documents in an acronym family.
    async fn find_all_by_acronym(&self, acronym: &str) -> Result<Vec<Document>, DomainError>;

    /// Check whether a document exists with the given acronym and version.
    async fn exists_by_acronym_and_version(
        &self,
        acronym: &str,
        version: u32,
    ) -> Result<bool, DomainError>;

    /// Begin a transaction scoped to one acronym family.
    ///
    /// Until commit, reads and writes through the returned unit are isolated
    /// from concurrent writers to the same family.
    async fn begin_family(&self, acronym: &str)
        -> Result<Box<dyn FamilyTransaction>, DomainError>;
}

/// Transactional unit of work over a single acronym family.
///
/// All writes become visible atomically on `commit`; dropping the unit
/// without committing discards them.
#[async_trait]
pub trait FamilyTransaction: Send {
    /// Read every document in the family as of this transaction.
    async fn documents(&mut self) -> Result<Vec<Document>, DomainError>;

    /// Insert a new document into the family.
    async fn insert(&mut self, document: NewDocument) -> Result<Document, DomainError>;

    /// Update an existing document in the family.
    async fn update(&mut self, document: &Document) -> Result<Document, DomainError>;

    /// Commit all writes performed through this unit.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
