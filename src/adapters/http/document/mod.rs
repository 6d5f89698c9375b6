//! HTTP adapter for document endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AcronymGroupResponse, CreateDocumentRequest, DocumentResponse, EditDocumentRequest,
    ErrorResponse, ListDocumentsParams, PageParams, PageResponse,
};
pub use handlers::DocumentHandlers;
pub use routes::document_routes;
