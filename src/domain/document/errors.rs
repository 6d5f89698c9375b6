//! Document-specific error types.

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};

/// Errors produced by document lifecycle and query operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No document with the given id exists.
    NotFound(DocumentId),
    /// A document with this (acronym, version) pair already exists.
    VersionConflict { acronym: String, version: u32 },
    /// The document's phase forbids the operation.
    InvalidPhase(String),
    /// A version family had no members when one was required.
    EmptyFamily(String),
    /// Input validation failed.
    ValidationFailed { field: String, message: String },
    /// Store or other infrastructure failure, propagated unmodified.
    Infrastructure(String),
}

impl DocumentError {
    pub fn not_found(id: DocumentId) -> Self {
        DocumentError::NotFound(id)
    }

    pub fn version_conflict(acronym: impl Into<String>, version: u32) -> Self {
        DocumentError::VersionConflict {
            acronym: acronym.into(),
            version,
        }
    }

    pub fn invalid_phase(message: impl Into<String>) -> Self {
        DocumentError::InvalidPhase(message.into())
    }

    pub fn empty_family(acronym: impl Into<String>) -> Self {
        DocumentError::EmptyFamily(acronym.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DocumentError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::NotFound(_) => ErrorCode::DocumentNotFound,
            DocumentError::VersionConflict { .. } => ErrorCode::DuplicateVersion,
            DocumentError::InvalidPhase(_) => ErrorCode::InvalidPhaseTransition,
            DocumentError::EmptyFamily(_) => ErrorCode::EmptyFamily,
            DocumentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DocumentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DocumentError::NotFound(id) => format!("Document with id {} not found", id),
            DocumentError::VersionConflict { acronym, version } => format!(
                "A document with acronym '{}' already exists in version {}",
                acronym, version
            ),
            DocumentError::InvalidPhase(msg) => msg.clone(),
            DocumentError::EmptyFamily(acronym) => {
                format!("No documents found for acronym '{}'", acronym)
            }
            DocumentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            DocumentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DocumentError {}

impl From<DomainError> for DocumentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidPhaseTransition => DocumentError::InvalidPhase(err.message),
            ErrorCode::DuplicateVersion => DocumentError::Infrastructure(err.message),
            ErrorCode::ValidationFailed | ErrorCode::EmptyField => DocumentError::ValidationFailed {
                field: "unknown".to_string(),
                message: err.message,
            },
            _ => DocumentError::Infrastructure(err.message),
        }
    }
}
