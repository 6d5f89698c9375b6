//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod phase;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::DocumentId;
pub use phase::Phase;
pub use timestamp::Timestamp;
