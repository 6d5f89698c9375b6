//! PostgreSQL implementation of DocumentReader.
//!
//! Filter matching is case- and accent-insensitive substring matching,
//! delegated to the `unaccent` extension (installed by the migrations).

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Phase, Timestamp};
use crate::ports::{
    AcronymGroup, DocumentFilter, DocumentReader, DocumentSummary, Page, PageRequest,
    SortDirection,
};

/// PostgreSQL implementation of DocumentReader.
#[derive(Clone)]
pub struct PostgresDocumentReader {
    pool: PgPool,
}

impl PostgresDocumentReader {
    /// Creates a new PostgresDocumentReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentReader for PostgresDocumentReader {
    async fn find_page(
        &self,
        filter: &DocumentFilter,
        page: &PageRequest,
    ) -> Result<Page<DocumentSummary>, DomainError> {
        let (where_clause, params) = build_filter_clause(filter);

        let sql = format!(
            "SELECT id, title, description, acronym, version, phase, created_at, updated_at \
             FROM documents{} ORDER BY id {} LIMIT {} OFFSET {}",
            where_clause,
            direction_sql(page.sort_direction()),
            page.limit(),
            page.offset(),
        );
        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param.as_str());
        }
        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list documents: {}", e),
            )
        })?;

        let content: Result<Vec<DocumentSummary>, DomainError> =
            rows.into_iter().map(row_to_summary).collect();

        let count_sql = format!("SELECT COUNT(*) FROM documents{}", where_clause);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for param in &params {
            count_query = count_query.bind(param.as_str());
        }
        let (total,) = count_query.fetch_one(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count documents: {}", e),
            )
        })?;

        Ok(Page::new(total as u64, page, content?))
    }

    async fn find_acronym_groups(
        &self,
        page: &PageRequest,
    ) -> Result<Page<AcronymGroup>, DomainError> {
        let sql = format!(
            "SELECT acronym, \
                    COUNT(*) AS documents, \
                    MAX(version) AS latest_version, \
                    MAX(version) FILTER (WHERE phase = 'ACTIVE') AS active_version \
             FROM documents \
             GROUP BY acronym \
             ORDER BY acronym {} LIMIT {} OFFSET {}",
            direction_sql(page.sort_direction()),
            page.limit(),
            page.offset(),
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list acronym groups: {}", e),
            )
        })?;

        let content: Result<Vec<AcronymGroup>, DomainError> =
            rows.into_iter().map(row_to_group).collect();

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT acronym) FROM documents")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to count acronym groups: {}", e),
                    )
                })?;

        Ok(Page::new(total as u64, page, content?))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Build the WHERE clause for the provided filters.
///
/// Only placeholders go into the SQL text; the filter values themselves are
/// returned for binding.
fn build_filter_clause(filter: &DocumentFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    let mut add = |column: &str, value: &str, params: &mut Vec<String>| {
        params.push(format!("%{}%", value));
        conditions.push(format!(
            "unaccent(lower({})) LIKE unaccent(lower(${}))",
            column,
            params.len()
        ));
    };

    if let Some(title) = filter.title() {
        add("title", title, &mut params);
    }
    if let Some(acronym) = filter.acronym() {
        add("acronym", acronym, &mut params);
    }
    if let Some(phase) = filter.phase() {
        add("phase", phase, &mut params);
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn row_to_summary(row: PgRow) -> Result<DocumentSummary, DomainError> {
    let id: uuid::Uuid = get_column(&row, "id")?;
    let title: String = get_column(&row, "title")?;
    let description: String = get_column(&row, "description")?;
    let acronym: String = get_column(&row, "acronym")?;
    let version: i32 = get_column(&row, "version")?;
    let phase_str: String = get_column(&row, "phase")?;
    let created_at: chrono::DateTime<chrono::Utc> = get_column(&row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = get_column(&row, "updated_at")?;

    let phase: Phase = phase_str.parse().map_err(|e: String| {
        DomainError::new(ErrorCode::DatabaseError, e)
    })?;

    Ok(DocumentSummary {
        id: DocumentId::from_uuid(id),
        title,
        description,
        acronym,
        version: version as u32,
        phase,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

fn row_to_group(row: PgRow) -> Result<AcronymGroup, DomainError> {
    let acronym: String = get_column(&row, "acronym")?;
    let documents: i64 = get_column(&row, "documents")?;
    let latest_version: i32 = get_column(&row, "latest_version")?;
    let active_version: Option<i32> = get_column(&row, "active_version")?;

    Ok(AcronymGroup {
        acronym,
        documents: documents as u64,
        latest_version: latest_version as u32,
        active_version: active_version.map(|v| v as u32),
    })
}

fn get_column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}
