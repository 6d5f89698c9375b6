//! Document aggregate entity.
//!
//! Documents are immutable values from the store's point of view: the store
//! assigns `id` on insert and owns both timestamps. Mutating methods change
//! the in-memory value; the change only becomes visible once written back
//! through the store.

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, Phase, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};

/// A document that has not been persisted yet.
///
/// Carries everything except the store-assigned id and timestamps.
/// New documents always start in DRAFT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    title: String,
    description: String,
    acronym: String,
    version: u32,
}

impl NewDocument {
    /// Create a new draft document value.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title, description, or acronym is blank,
    ///   or if version is zero
    pub fn draft(
        title: impl Into<String>,
        description: impl Into<String>,
        acronym: impl Into<String>,
        version: u32,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let description = description.into();
        let acronym = acronym.into();

        validate_non_blank("title", &title)?;
        validate_non_blank("description", &description)?;
        validate_non_blank("acronym", &acronym)?;
        if version == 0 {
            return Err(ValidationError::below_minimum("version", 1, version).into());
        }

        Ok(Self {
            title,
            description,
            acronym,
            version,
        })
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the acronym.
    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    /// Returns the version number.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the phase a new document is created in.
    pub fn phase(&self) -> Phase {
        Phase::Draft
    }
}

/// Document aggregate - one versioned instance within an acronym family.
///
/// # Invariants
///
/// - `version` is unique within the family (store-enforced)
/// - phase transitions are monotonic along DRAFT -> ACTIVE -> OBSOLETE
/// - title/description change only while DRAFT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned unique identifier.
    id: DocumentId,

    /// Document title.
    title: String,

    /// Document description.
    description: String,

    /// Family grouping key.
    acronym: String,

    /// Version number, unique per acronym.
    version: u32,

    /// Current lifecycle phase.
    phase: Phase,

    /// When the document was inserted (store-assigned).
    created_at: Timestamp,

    /// When the document was last written (store-assigned).
    updated_at: Timestamp,
}

impl Document {
    /// Reconstitute a document from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DocumentId,
        title: String,
        description: String,
        acronym: String,
        version: u32,
        phase: Phase,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            description,
            acronym,
            version,
            phase,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the document ID.
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the acronym.
    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    /// Returns the version number.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns when the document was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the document was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace title and description.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` unless the document is DRAFT
    /// - `ValidationFailed` if either field is blank
    pub fn edit_info(&mut self, title: String, description: String) -> Result<(), DomainError> {
        if !self.phase.is_editable() {
            return Err(DomainError::new(
                ErrorCode::InvalidPhaseTransition,
                "Only DRAFT documents may be edited",
            ));
        }
        validate_non_blank("title", &title)?;
        validate_non_blank("description", &description)?;

        self.title = title;
        self.description = description;
        Ok(())
    }

    /// Promote the document to ACTIVE.
    ///
    /// Submitting the document that is already ACTIVE is an idempotent
    /// success; the return value tells whether the phase actually changed.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` if the document is OBSOLETE
    pub fn promote(&mut self) -> Result<bool, DomainError> {
        match self.phase {
            Phase::Draft => {
                self.phase = Phase::Active;
                Ok(true)
            }
            Phase::Active => Ok(false),
            Phase::Obsolete => Err(DomainError::new(
                ErrorCode::InvalidPhaseTransition,
                "An OBSOLETE document cannot be submitted",
            )),
        }
    }

    /// Mark the document OBSOLETE because a sibling was promoted.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` unless the document is ACTIVE
    pub fn supersede(&mut self) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(&Phase::Obsolete) {
            return Err(DomainError::new(
                ErrorCode::InvalidPhaseTransition,
                format!("Cannot obsolete a document in phase {}", self.phase),
            ));
        }
        self.phase = Phase::Obsolete;
        Ok(())
    }

    /// Derive the next draft in this family from this document.
    ///
    /// The new value copies title/description/acronym and takes the given
    /// version; this document is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` unless the document is ACTIVE
    /// - `ValidationFailed` if the version is zero
    pub fn derive_draft(&self, version: u32) -> Result<NewDocument, DomainError> {
        if !self.phase.is_active() {
            return Err(DomainError::new(
                ErrorCode::InvalidPhaseTransition,
                "Only ACTIVE documents may generate a new version",
            ));
        }
        NewDocument::draft(
            self.title.clone(),
            self.description.clone(),
            self.acronym.clone(),
            version,
        )
    }
}

fn validate_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field).into());
    }
    Ok(())
}
