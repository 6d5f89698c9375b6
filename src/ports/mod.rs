//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - write side: persistence plus family-scoped
//!   transactions for multi-step lifecycle operations
//! - `DocumentReader` - read side: filtered, paged queries

mod document_reader;
mod document_store;

pub use document_reader::{
    AcronymGroup, DocumentFilter, DocumentReader, DocumentSummary, Page, PageRequest,
    SortDirection,
};
pub use document_store::{DocumentStore, FamilyTransaction};
