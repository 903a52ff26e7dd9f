//! HTTP middleware for axum.
//!
//! - `session_scope` - Opens one unit of work per request and commits or
//!   rolls it back from the response status

pub mod session_scope;

pub use session_scope::{session_scope, SessionState};
