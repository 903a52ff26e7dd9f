//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, state machine trait, errors)
//! - `todo` - Todo aggregate and completion lifecycle

pub mod foundation;
pub mod todo;
