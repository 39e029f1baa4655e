//! Route configuration.

use crate::auth::auth_middleware;
use crate::error::ErrorResponse;
use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::HeaderValue;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chartdeck_core::config::StorageConfig;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health check (intentionally unauthenticated for load balancers/probes)
        .route("/health", get(handlers::health_check))
        // Token issuance and identity
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        // Spreadsheet ingest
        .route("/upload", post(handlers::upload_spreadsheet))
        .route("/upload/history", get(handlers::upload_history))
        .route(
            "/upload/{ingest_id}",
            get(handlers::get_upload).delete(handlers::delete_upload),
        )
        // Chart definitions
        .route(
            "/charts",
            post(handlers::create_chart).get(handlers::list_charts),
        )
        .route(
            "/charts/{chart_id}",
            get(handlers::get_chart).delete(handlers::delete_chart),
        )
        // Admin endpoints (all require the admin role)
        .route("/admin/users", get(handlers::list_users))
        .route("/admin/stats", get(handlers::get_stats))
        .route("/admin/users/{user_id}", delete(handlers::delete_user));

    let mut router = Router::new().merge(api_routes);

    // Stored spreadsheets are served back read-only under /uploads.
    let StorageConfig::Filesystem { path } = &state.config.storage;
    router = router.nest_service("/uploads", ServeDir::new(path));

    let cors = cors_layer(&state.config.server.allowed_origins);

    // Middleware layers are applied in reverse order (outermost last).
    // Order of execution: TraceLayer -> CatchPanic -> CORS -> Auth -> BodyLimit -> Handler
    router
        // Uploads are capped at the ingest size limit plus multipart overhead.
        .layer(DefaultBodyLimit::max(chartdeck_core::MAX_UPLOAD_SIZE + 64 * 1024))
        // Auth middleware (validates tokens and sets the CurrentUser extension)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        // Any handler panic still produces a JSON 500 instead of a closed connection.
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from the configured origin list.
/// An empty list is the permissive development default.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring unparseable allowed origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Convert a handler panic into the standard JSON error shape.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            code: "internal_error".to_string(),
            message: "internal server error".to_string(),
        }),
    )
        .into_response()
}
