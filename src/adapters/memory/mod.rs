//! In-memory adapter implementations.
//!
//! Back the store and reader ports with a shared map. Useful for tests and
//! development; family transactions serialize on a per-acronym mutex.

mod document_reader;
mod document_store;

pub use document_reader::InMemoryDocumentReader;
pub use document_store::InMemoryDocumentStore;
