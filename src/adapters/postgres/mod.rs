//! PostgreSQL adapter implementations.

mod document_reader;
mod document_store;

pub use document_reader::PostgresDocumentReader;
pub use document_store::PostgresDocumentStore;
