//! Operation phases and change classification.

use crate::hook::{InstanceDiff, InstanceState};
use std::fmt;

/// Where an operation currently sits.
///
/// Exactly one phase holds for an id once it has been seen. `Completed` and
/// `Errored` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The change is in flight.
    Active,
    /// The change finished without error.
    Completed,
    /// The change finished with an error.
    Errored,
}

/// The kind of change a pending apply is about to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// The resource does not exist yet.
    Create,
    /// The resource exists and is being changed in place or replaced.
    Modify,
    /// The resource is being removed.
    Destroy,
}

impl OperationKind {
    /// Classify a pending change.
    ///
    /// A destructive diff wins over everything else; otherwise a missing or
    /// id-less state means the resource is being created.
    pub fn classify(state: Option<&InstanceState>, diff: &InstanceDiff) -> Self {
        if diff.destroy {
            Self::Destroy
        } else if state.is_none_or(InstanceState::is_empty) {
            Self::Create
        } else {
            Self::Modify
        }
    }

    /// Status text shown next to the id while the change is in flight.
    pub const fn status_text(self) -> &'static str {
        match self {
            Self::Create => "Creating...",
            Self::Modify => "Modifying...",
            Self::Destroy => "Destroying...",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}
