//! Document handlers.
//!
//! Write side (lifecycle engine): create, edit, submit, generate-version.
//! Read side (query facade): get, list, group by acronym.

mod create_document;
mod edit_document;
mod generate_version;
mod get_document;
mod list_acronym_groups;
mod list_documents;
mod submit_document;

pub use create_document::{CreateDocumentCommand, CreateDocumentHandler};
pub use edit_document::{EditDocumentCommand, EditDocumentHandler};
pub use generate_version::{GenerateVersionCommand, GenerateVersionHandler};
pub use get_document::{GetDocumentHandler, GetDocumentQuery};
pub use list_acronym_groups::{ListAcronymGroupsHandler, ListAcronymGroupsQuery};
pub use list_documents::{ListDocumentsHandler, ListDocumentsQuery};
pub use submit_document::{SubmitDocumentCommand, SubmitDocumentHandler};
