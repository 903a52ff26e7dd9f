//! CompletionStatus enum for tracking whether a todo is done.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Completion state of a todo.
///
/// Valid transitions:
/// - Incomplete -> Completed
/// - Completed -> Incomplete
///
/// Staying in the same state is not a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    #[default]
    Incomplete,
    Completed,
}

impl CompletionStatus {
    /// Maps the persisted boolean flag onto a status.
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            CompletionStatus::Completed
        } else {
            CompletionStatus::Incomplete
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CompletionStatus::Completed)
    }
}

impl StateMachine for CompletionStatus {
    const EDGES: &'static [(Self, Self)] = &[
        (CompletionStatus::Incomplete, CompletionStatus::Completed),
        (CompletionStatus::Completed, CompletionStatus::Incomplete),
    ];
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompletionStatus::Incomplete => "Incomplete",
            CompletionStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}
