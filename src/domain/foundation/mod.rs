//! Identifiers, error vocabulary and the transition table trait shared by
//! the todo domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::TodoId;
pub use state_machine::{InvalidTransition, StateMachine};
