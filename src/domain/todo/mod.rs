//! Todo domain module.
//!
//! Holds the todo aggregate, its completion state machine, and the
//! errors raised by todo operations.

mod aggregate;
mod errors;
mod status;

pub use aggregate::{Todo, TodoRecord, MAX_TITLE_LENGTH};
pub use errors::TodoError;
pub use status::CompletionStatus;
