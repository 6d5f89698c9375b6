//! HTTP DTOs for document endpoints.
//!
//! These types decouple the HTTP API from domain types. The wire format is
//! camelCase JSON; documents carry id, title, description, acronym, version,
//! phase, createdAt, updatedAt.

use serde::{Deserialize, Serialize};

use crate::domain::document::Document;
use crate::domain::foundation::Phase;
use crate::ports::{AcronymGroup, DocumentSummary, Page, SortDirection};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub description: String,
    pub acronym: String,
    pub version: u32,
}

/// Request to edit a draft document's title and description.
#[derive(Debug, Clone, Deserialize)]
pub struct EditDocumentRequest {
    pub title: String,
    pub description: String,
}

/// Query parameters for the document listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDocumentsParams {
    pub title: Option<String>,
    pub acronym: Option<String>,
    pub phase: Option<String>,
    pub page: u32,
    pub items_per_page: u32,
    pub sort_direction: SortDirection,
}

impl Default for ListDocumentsParams {
    fn default() -> Self {
        Self {
            title: None,
            acronym: None,
            phase: None,
            page: 0,
            items_per_page: 10,
            sort_direction: SortDirection::Desc,
        }
    }
}

/// Query parameters for paged endpoints without filters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageParams {
    pub page: u32,
    pub items_per_page: u32,
    pub sort_direction: SortDirection,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            items_per_page: 10,
            sort_direction: SortDirection::Desc,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full document view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub acronym: String,
    pub version: u32,
    pub phase: Phase,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            description: doc.description().to_string(),
            acronym: doc.acronym().to_string(),
            version: doc.version(),
            phase: doc.phase(),
            created_at: doc.created_at().as_datetime().to_rfc3339(),
            updated_at: doc.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

impl From<DocumentSummary> for DocumentResponse {
    fn from(summary: DocumentSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title,
            description: summary.description,
            acronym: summary.acronym,
            version: summary.version,
            phase: summary.phase,
            created_at: summary.created_at.as_datetime().to_rfc3339(),
            updated_at: summary.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Acronym family view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcronymGroupResponse {
    pub acronym: String,
    pub documents: u64,
    pub latest_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_version: Option<u32>,
}

impl From<AcronymGroup> for AcronymGroupResponse {
    fn from(group: AcronymGroup) -> Self {
        Self {
            acronym: group.acronym,
            documents: group.documents,
            latest_version: group.latest_version,
            active_version: group.active_version,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub total_results: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub content: Vec<T>,
}

impl<S, T: From<S>> From<Page<S>> for PageResponse<T> {
    fn from(page: Page<S>) -> Self {
        Self {
            total_results: page.total_results,
            total_pages: page.total_pages,
            current_page: page.current_page,
            content: page.content.into_iter().map(Into::into).collect(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DocumentId, Timestamp};

    #[test]
    fn create_request_deserializes() {
        let json = r#"{"title": "Policy", "description": "d", "acronym": "POL", "version": 1}"#;
        let req: CreateDocumentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "Policy");
        assert_eq!(req.version, 1);
    }

    #[test]
    fn list_params_default_matches_original_api() {
        let params: ListDocumentsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.items_per_page, 10);
        assert_eq!(params.sort_direction, SortDirection::Desc);
        assert!(params.title.is_none());
    }

    #[test]
    fn list_params_accept_camel_case_keys() {
        let json = r#"{"itemsPerPage": 25, "sortDirection": "ASC", "acronym": "POL"}"#;
        let params: ListDocumentsParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.items_per_page, 25);
        assert_eq!(params.sort_direction, SortDirection::Asc);
        assert_eq!(params.acronym.as_deref(), Some("POL"));
    }

    #[test]
    fn document_response_serializes_camel_case() {
        let doc = Document::reconstitute(
            DocumentId::new(),
            "Policy".to_string(),
            "d".to_string(),
            "POL".to_string(),
            1,
            Phase::Draft,
            Timestamp::now(),
            Timestamp::now(),
        );
        let response: DocumentResponse = doc.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"phase\":\"DRAFT\""));
    }

    #[test]
    fn page_response_converts_content() {
        let page = Page {
            total_results: 1,
            total_pages: 1,
            current_page: 0,
            content: vec![DocumentSummary {
                id: DocumentId::new(),
                title: "Policy".to_string(),
                description: "d".to_string(),
                acronym: "POL".to_string(),
                version: 1,
                phase: Phase::Active,
                created_at: Timestamp::now(),
                updated_at: Timestamp::now(),
            }],
        };
        let response: PageResponse<DocumentResponse> = page.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"totalResults\":1"));
        assert!(json.contains("\"totalPages\":1"));
        assert!(json.contains("\"currentPage\":0"));
        assert!(json.contains("\"content\""));
    }

    #[test]
    fn group_response_omits_absent_active_version() {
        let response: AcronymGroupResponse = AcronymGroup {
            acronym: "POL".to_string(),
            documents: 2,
            latest_version: 2,
            active_version: None,
        }
        .into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("activeVersion"));
    }

    #[test]
    fn error_response_constructors_set_codes() {
        assert_eq!(ErrorResponse::bad_request("x").code, "BAD_REQUEST");
        assert_eq!(ErrorResponse::not_found("x").code, "NOT_FOUND");
        assert_eq!(ErrorResponse::conflict("x").code, "CONFLICT");
        assert_eq!(ErrorResponse::internal("x").code, "INTERNAL_ERROR");
    }
}
