//! HTTP adapters - REST API implementations.
//!
//! - `todo` - `/todos` endpoints
//! - `middleware` - per-request session scope
//! - `error` - shared error envelope and 404 fallback

pub mod error;
pub mod middleware;
pub mod todo;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::adapters::session::ContextProvider;
use crate::ports::{ConnectionSource, TransactionRunner};

pub use error::ErrorResponse;
pub use todo::{todo_routes, TodoHandlers};

/// GET /healthcheck
pub async fn healthcheck() -> &'static str {
    "OK"
}

/// Build the complete application router.
///
/// Todo routes run inside a per-request session; the health check and the
/// 404 fallback never touch the store.
pub fn app_router<S, R>(provider: Arc<ContextProvider<S>>, handlers: TodoHandlers<R>) -> Router
where
    S: ConnectionSource,
    R: TransactionRunner + 'static,
{
    let api = Router::new()
        .nest("/todos", todo_routes(handlers))
        .layer(axum::middleware::from_fn_with_state(
            provider,
            middleware::session_scope::<S>,
        ));

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(api)
        .fallback(error::not_found_fallback)
        .layer(TraceLayer::new_for_http())
}
