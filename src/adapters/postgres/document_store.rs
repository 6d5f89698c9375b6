//! PostgreSQL implementation of DocumentStore.
//!
//! The store assigns ids and timestamps. Family transactions map to a
//! Postgres transaction holding an advisory lock on the acronym, which
//! serializes writers to the same family (including inserts, which row
//! locks alone would not cover).

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::document::{Document, NewDocument};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Phase, Timestamp};
use crate::ports::{DocumentStore, FamilyTransaction};

const SELECT_COLUMNS: &str =
    "id, title, description, acronym, version, phase, created_at, updated_at";

/// PostgreSQL implementation of DocumentStore.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgresDocumentStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(&self, document: NewDocument) -> Result<Document, DomainError> {
        insert_document(&self.pool, document).await
    }

    async fn update(&self, document: &Document) -> Result<Document, DomainError> {
        update_document(&self.pool, document).await
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch document: {}", e),
            )
        })?;

        row.map(row_to_document).transpose()
    }

    async fn find_all_by_acronym(&self, acronym: &str) -> Result<Vec<Document>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM documents WHERE acronym = $1 ORDER BY version",
            SELECT_COLUMNS
        ))
        .bind(acronym)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch documents by acronym: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_document).collect()
    }

    async fn exists_by_acronym_and_version(
        &self,
        acronym: &str,
        version: u32,
    ) -> Result<bool, DomainError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM documents WHERE acronym = $1 AND version = $2")
                .bind(acronym)
                .bind(version as i32)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to check document existence: {}", e),
                    )
                })?;

        Ok(result.0 > 0)
    }

    async fn begin_family(
        &self,
        acronym: &str,
    ) -> Result<Box<dyn FamilyTransaction>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        // Serialize writers to this family for the life of the transaction.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(acronym)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to lock family: {}", e),
                )
            })?;

        Ok(Box::new(PgFamilyTransaction {
            tx,
            acronym: acronym.to_string(),
        }))
    }
}

/// Family transaction backed by a Postgres transaction.
///
/// Dropping without commit rolls back (sqlx default).
struct PgFamilyTransaction {
    tx: Transaction<'static, Postgres>,
    acronym: String,
}

#[async_trait]
impl FamilyTransaction for PgFamilyTransaction {
    async fn documents(&mut self) -> Result<Vec<Document>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM documents WHERE acronym = $1 ORDER BY version",
            SELECT_COLUMNS
        ))
        .bind(&self.acronym)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch family: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_document).collect()
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
        insert_document(&mut *self.tx, document).await
    }

    async fn update(&mut self, document: &Document) -> Result<Document, DomainError> {
        update_document(&mut *self.tx, document).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Shared statements
// ════════════════════════════════════════════════════════════════════════════

async fn insert_document<'e, E>(executor: E, document: NewDocument) -> Result<Document, DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let id = DocumentId::new();
    let now = Timestamp::now();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO documents (
            id, title, description, acronym, version, phase, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {}
        "#,
        SELECT_COLUMNS
    ))
    .bind(id.as_uuid())
    .bind(document.title())
    .bind(document.description())
    .bind(document.acronym())
    .bind(document.version() as i32)
    .bind(phase_to_str(document.phase()))
    .bind(now.as_datetime())
    .fetch_one(executor)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::new(
            ErrorCode::DuplicateVersion,
            format!(
                "Document with acronym '{}' and version {} already exists",
                document.acronym(),
                document.version()
            ),
        ),
        _ => DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to insert document: {}", e),
        ),
    })?;

    row_to_document(row)
}

async fn update_document<'e, E>(executor: E, document: &Document) -> Result<Document, DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        r#"
        UPDATE documents SET
            title = $2,
            description = $3,
            phase = $4,
            updated_at = $5
        WHERE id = $1
        RETURNING {}
        "#,
        SELECT_COLUMNS
    ))
    .bind(document.id().as_uuid())
    .bind(document.title())
    .bind(document.description())
    .bind(phase_to_str(document.phase()))
    .bind(Timestamp::now().as_datetime())
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to update document: {}", e),
        )
    })?;

    match row {
        Some(row) => row_to_document(row),
        None => Err(DomainError::new(
            ErrorCode::DocumentNotFound,
            format!("Document not found: {}", document.id()),
        )),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn phase_to_str(phase: Phase) -> &'static str {
    match phase {
        Phase::Draft => "DRAFT",
        Phase::Active => "ACTIVE",
        Phase::Obsolete => "OBSOLETE",
    }
}

fn str_to_phase(s: &str) -> Result<Phase, DomainError> {
    match s {
        "DRAFT" => Ok(Phase::Draft),
        "ACTIVE" => Ok(Phase::Active),
        "OBSOLETE" => Ok(Phase::Obsolete),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid phase: {}", s),
        )),
    }
}

fn row_to_document(row: PgRow) -> Result<Document, DomainError> {
    let id: uuid::Uuid = get_column(&row, "id")?;
    let title: String = get_column(&row, "title")?;
    let description: String = get_column(&row, "description")?;
    let acronym: String = get_column(&row, "acronym")?;
    let version: i32 = get_column(&row, "version")?;
    let phase_str: String = get_column(&row, "phase")?;
    let created_at: chrono::DateTime<chrono::Utc> = get_column(&row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = get_column(&row, "updated_at")?;

    Ok(Document::reconstitute(
        DocumentId::from_uuid(id),
        title,
        description,
        acronym,
        version as u32,
        str_to_phase(&phase_str)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn get_column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}
