//! HTTP handlers for document endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;

use crate::application::handlers::document::{
    CreateDocumentCommand, CreateDocumentHandler, EditDocumentCommand, EditDocumentHandler,
    GenerateVersionCommand, GenerateVersionHandler, GetDocumentHandler, GetDocumentQuery,
    ListAcronymGroupsHandler, ListAcronymGroupsQuery, ListDocumentsHandler, ListDocumentsQuery,
    SubmitDocumentCommand, SubmitDocumentHandler,
};
use crate::domain::document::DocumentError;
use crate::domain::foundation::DocumentId;

use super::dto::{
    AcronymGroupResponse, CreateDocumentRequest, DocumentResponse, EditDocumentRequest,
    ErrorResponse, ListDocumentsParams, PageParams, PageResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DocumentHandlers {
    create_handler: Arc<CreateDocumentHandler>,
    edit_handler: Arc<EditDocumentHandler>,
    submit_handler: Arc<SubmitDocumentHandler>,
    generate_handler: Arc<GenerateVersionHandler>,
    get_handler: Arc<GetDocumentHandler>,
    list_handler: Arc<ListDocumentsHandler>,
    group_handler: Arc<ListAcronymGroupsHandler>,
}

impl DocumentHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_handler: Arc<CreateDocumentHandler>,
        edit_handler: Arc<EditDocumentHandler>,
        submit_handler: Arc<SubmitDocumentHandler>,
        generate_handler: Arc<GenerateVersionHandler>,
        get_handler: Arc<GetDocumentHandler>,
        list_handler: Arc<ListDocumentsHandler>,
        group_handler: Arc<ListAcronymGroupsHandler>,
    ) -> Self {
        Self {
            create_handler,
            edit_handler,
            submit_handler,
            generate_handler,
            get_handler,
            list_handler,
            group_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/documents - list documents with filters and pagination
pub async fn list_documents(
    State(handlers): State<DocumentHandlers>,
    Query(params): Query<ListDocumentsParams>,
) -> Response {
    let query = ListDocumentsQuery {
        title: params.title,
        acronym: params.acronym,
        phase: params.phase,
        page: params.page,
        items_per_page: params.items_per_page,
        sort_direction: params.sort_direction,
    };

    match handlers.list_handler.handle(query).await {
        Ok(page) => {
            let response: PageResponse<DocumentResponse> = page.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/documents/by-acronym - list acronym families
pub async fn list_acronym_groups(
    State(handlers): State<DocumentHandlers>,
    Query(params): Query<PageParams>,
) -> Response {
    let query = ListAcronymGroupsQuery {
        page: params.page,
        items_per_page: params.items_per_page,
        sort_direction: params.sort_direction,
    };

    match handlers.group_handler.handle(query).await {
        Ok(page) => {
            let response: PageResponse<AcronymGroupResponse> = page.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/documents/:id - fetch one document
pub async fn get_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetDocumentQuery { id }).await {
        Ok(doc) => {
            let response: DocumentResponse = doc.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// POST /api/documents - create a new draft document
pub async fn create_document(
    State(handlers): State<DocumentHandlers>,
    Json(req): Json<CreateDocumentRequest>,
) -> Response {
    let cmd = CreateDocumentCommand {
        title: req.title,
        description: req.description,
        acronym: req.acronym,
        version: req.version,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(doc) => {
            let response: DocumentResponse = doc.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// PATCH /api/documents/:id - edit a draft document
pub async fn edit_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
    Json(req): Json<EditDocumentRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = EditDocumentCommand {
        id,
        title: req.title,
        description: req.description,
    };

    match handlers.edit_handler.handle(cmd).await {
        Ok(doc) => {
            let response: DocumentResponse = doc.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// PATCH /api/documents/:id/submit - promote a document to ACTIVE
pub async fn submit_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .submit_handler
        .handle(SubmitDocumentCommand { id })
        .await
    {
        Ok(doc) => {
            let response: DocumentResponse = doc.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// POST /api/documents/:id/generate-version - derive the next draft
pub async fn generate_version(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .generate_handler
        .handle(GenerateVersionCommand { id })
        .await
    {
        Ok(doc) => {
            let response: DocumentResponse = doc.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_id(raw: &str) -> Result<DocumentId, Response> {
    raw.parse::<DocumentId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid document ID")),
        )
            .into_response()
    })
}

fn handle_document_error(error: DocumentError) -> Response {
    match &error {
        DocumentError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(error.message())),
        )
            .into_response(),
        DocumentError::VersionConflict { .. } => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(error.message())),
        )
            .into_response(),
        DocumentError::InvalidPhase(_)
        | DocumentError::EmptyFamily(_)
        | DocumentError::ValidationFailed { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.message())),
        )
            .into_response(),
        DocumentError::Infrastructure(_) => {
            tracing::error!(error = %error, "document operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(error.message())),
            )
                .into_response()
        }
    }
}
