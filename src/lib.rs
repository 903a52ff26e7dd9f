//! Todo API - layered CRUD service for todo items.
//!
//! Every request runs inside a unit of work bound to its tokio task.
//! Repositories reach the store through that session, and multi-step use
//! cases nest their own transaction inside it with a savepoint.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
