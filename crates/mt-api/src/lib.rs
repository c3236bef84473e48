//! # mt-api
//!
//! The web routing and orchestration layer for the Mistake Tracker.

pub mod error;
pub mod handlers;
pub mod middleware;

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

pub use error::{ApiError, ApiResult};
pub use handlers::AppState;

/// Builds the full application router.
///
/// `static_dir` is mounted under `/static` for the page's script and styles.
/// Request bodies are unbounded unless `max_body_bytes` is set; pasted
/// question images travel inline as data URIs and easily pass a few MiB.
pub fn configure_routes(
    state: AppState,
    static_dir: impl AsRef<Path>,
    max_body_bytes: Option<usize>,
) -> Router {
    let body_limit = match max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let api = Router::new()
        .route(
            "/mistakes",
            get(handlers::list_mistakes).post(handlers::create_mistake),
        )
        .route(
            "/mistakes/{id}",
            get(handlers::get_mistake)
                .put(handlers::update_mistake)
                .delete(handlers::delete_mistake),
        )
        .route("/topics", get(handlers::list_topics))
        .route("/analytics", get(handlers::analytics))
        .route("/mistake-types", get(handlers::mistake_types));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(body_limit)
        .layer(middleware::cors_policy())
        .layer(middleware::standard_middleware())
        .with_state(state)
}
