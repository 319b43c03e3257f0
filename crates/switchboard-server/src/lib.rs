//! Switchboard server library logic.

pub mod api_admin;
pub mod api_sse;
pub mod api_webhooks;
pub mod config;
pub mod directory;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use switchboard_db::DbPool;
use switchboard_observe::CallNotifier;
use switchboard_routing::RoutingEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub use directory::SqliteDirectory;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// The call-routing engine.
    pub engine: Arc<RoutingEngine>,
    /// Notification fanout shared with the engine; the SSE handler
    /// subscribes here.
    pub notifier: CallNotifier,
}

/// Maximum request body size (64 KiB). Webhook and admin payloads are
/// small; anything larger is abuse.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        // Telephony webhooks, one per engine entry point.
        .route("/voice", post(api_webhooks::voice_handler))
        .route("/handle-gather", post(api_webhooks::gather_handler))
        .route("/handle-recording", post(api_webhooks::recording_handler))
        .route(
            "/handle-dial-status",
            post(api_webhooks::dial_status_handler),
        )
        .route("/handle-accept", post(api_webhooks::accept_handler))
        .route("/handle-tcpa", post(api_webhooks::tcpa_handler))
        // Whisper documents fetched for the destination leg. The provider
        // may use either method depending on configuration.
        .route(
            "/whisper",
            get(api_webhooks::whisper_handler).post(api_webhooks::whisper_handler),
        )
        .route(
            "/whisper-screened",
            get(api_webhooks::screened_whisper_handler)
                .post(api_webhooks::screened_whisper_handler),
        )
        // Admin API.
        .route(
            "/api/contacts",
            get(api_admin::list_contacts_handler).post(api_admin::add_contact_handler),
        )
        .route(
            "/api/contacts/{contactId}",
            delete(api_admin::delete_contact_handler),
        )
        .route(
            "/api/blacklist",
            get(api_admin::list_blacklist_handler).post(api_admin::add_blacklist_handler),
        )
        .route(
            "/api/blacklist/{entryId}",
            delete(api_admin::delete_blacklist_handler),
        )
        .route(
            "/api/call-logs",
            get(api_admin::list_call_logs_handler).delete(api_admin::clear_call_logs_handler),
        )
        .route(
            "/api/call-logs/{logId}",
            delete(api_admin::delete_call_log_handler),
        )
        // Dashboard push channel.
        .route("/events/calls", get(api_sse::get_call_stream_handler));

    // Serve dashboard static files if the directory exists.
    // Configured via SWITCHBOARD_DASHBOARD_DIR env var; defaults to "public".
    let dashboard_dir =
        std::env::var("SWITCHBOARD_DASHBOARD_DIR").unwrap_or_else(|_| "public".to_string());
    let router = if std::path::Path::new(&dashboard_dir).join("index.html").exists() {
        tracing::info!(path = %dashboard_dir, "serving dashboard static files");
        let index = format!("{}/index.html", dashboard_dir);
        router.fallback_service(ServeDir::new(&dashboard_dir).fallback(ServeFile::new(index)))
    } else {
        tracing::info!(path = %dashboard_dir, "dashboard directory not found, skipping static file serving");
        router
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
