//! Per-request unit of work.
//!
//! Every request that passes through [`session_scope`] runs inside its own
//! session:
//!
//! ```text
//! Request → session_scope → opens session (connection + BEGIN)
//!                 ↓
//!           handler → use cases → repositories use provider.current()
//!                 ↓
//!           2xx response → COMMIT, anything else → ROLLBACK
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(ContextProvider::new(PgConnectionSource::new(pool)));
//!
//! let app = Router::new()
//!     .nest("/todos", todo_routes(handlers))
//!     .layer(middleware::from_fn_with_state(provider, session_scope::<PgConnectionSource>));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::adapters::http::error::error_response;
use crate::adapters::session::ContextProvider;
use crate::ports::{ConnectionSource, UnitOfWorkError};

/// Middleware state - the provider sessions are opened on.
pub type SessionState<S> = Arc<ContextProvider<S>>;

/// Run the rest of the request inside a session.
///
/// The session is marked successful only for 2xx responses. If the session
/// cannot be opened or committed the client gets a 500 envelope instead of
/// the handler's response.
pub async fn session_scope<S: ConnectionSource>(
    State(provider): State<SessionState<S>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let result = provider
        .scope(|session| async move {
            let response = next.run(request).await;
            if response.status().is_success() {
                session.mark_success();
            } else {
                tracing::debug!(
                    session_id = %session.id(),
                    status = %response.status(),
                    "Request failed, session will roll back"
                );
                session.mark_failure();
            }
            Ok::<_, UnitOfWorkError>(response)
        })
        .await;

    match result {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(%method, %path, error = %err, "Unit of work failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDatabase, InMemoryTodoRepository};
    use crate::domain::todo::Todo;
    use crate::ports::TodoRepository;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::post, Router};
    use tower::ServiceExt;

    fn app(db: &InMemoryDatabase, status: StatusCode) -> Router {
        let provider = Arc::new(ContextProvider::new(db.clone()));
        let repo = InMemoryTodoRepository::new(provider.clone());

        Router::new()
            .route(
                "/write",
                post(move || {
                    let repo = repo.clone();
                    async move {
                        let todo = Todo::new("from request", None).unwrap();
                        match repo.save(&todo).await {
                            Ok(()) => status,
                            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
                        }
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(
                provider,
                session_scope::<InMemoryDatabase>,
            ))
    }

    fn write_request() -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/write")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn successful_response_commits() {
        let db = InMemoryDatabase::new();

        let response = app(&db, StatusCode::CREATED)
            .oneshot(write_request())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(db.committed_todos().await.len(), 1);
    }

    #[tokio::test]
    async fn error_response_rolls_back() {
        let db = InMemoryDatabase::new();

        let response = app(&db, StatusCode::CONFLICT)
            .oneshot(write_request())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(db.committed_todos().await.is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_yields_500() {
        let db = InMemoryDatabase::new();
        db.close();

        let response = app(&db, StatusCode::OK)
            .oneshot(write_request())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
