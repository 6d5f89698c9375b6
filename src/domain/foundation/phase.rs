//! Phase enum for tracking the lifecycle of document instances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase of a document instance.
///
/// Every document is created as `Draft`. Transitions are monotonic: a
/// document never moves backward along DRAFT -> ACTIVE -> OBSOLETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Draft,
    Active,
    Obsolete,
}

impl Phase {
    /// Returns true if title/description may still be edited.
    pub fn is_editable(&self) -> bool {
        matches!(self, Phase::Draft)
    }

    /// Returns true if this is the published phase.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Active)
    }

    /// Validates a transition from this phase to another.
    ///
    /// Valid transitions:
    /// - Draft -> Active
    /// - Active -> Obsolete
    pub fn can_transition_to(&self, target: &Phase) -> bool {
        use Phase::*;
        matches!((self, target), (Draft, Active) | (Active, Obsolete))
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Obsolete)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Draft => "DRAFT",
            Phase::Active => "ACTIVE",
            Phase::Obsolete => "OBSOLETE",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Phase::Draft),
            "ACTIVE" => Ok(Phase::Active),
            "OBSOLETE" => Ok(Phase::Obsolete),
            other => Err(format!("Unknown phase: {}", other)),
        }
    }
}
