//! Admin API handlers for contacts, the blacklist, and call logs.
//!
//! The dashboard manages the two record sets and inspects the call log
//! through these JSON endpoints. The routing engine only ever reads the
//! record sets; all mutation happens here.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use switchboard_db::StoreError;
use switchboard_types::{BlacklistEntry, CallLogEntry, Contact, PatternType};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn store_error(e: StoreError, duplicate_message: &str) -> ApiError {
    if e.is_unique_violation() {
        ApiError::Conflict(duplicate_message.to_string())
    } else {
        ApiError::InternalServerError(e.to_string())
    }
}

/// Runs a store operation on the blocking pool.
async fn with_conn<T, F>(state: Arc<AppState>, operation: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {e}")))?;
        operation(&conn)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {e}")))?
}

// ── Contacts ─────────────────────────────────────────────────────────

/// Request body for contact creation.
#[derive(Debug, Deserialize)]
pub struct AddContactRequest {
    /// Display name.
    pub name: String,
    /// Phone number in any formatting.
    pub phone_number: String,
}

/// Handler for `GET /api/contacts`.
pub async fn list_contacts_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = with_conn(state, |conn| {
        switchboard_db::all_contacts(conn).map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;
    Ok(Json(contacts))
}

/// Handler for `POST /api/contacts`.
pub async fn add_contact_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AddContactRequest>,
) -> Result<Json<Contact>, ApiError> {
    if payload.name.trim().is_empty() || payload.phone_number.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "name and phone number are required".to_string(),
        ));
    }

    let contact = with_conn(state, move |conn| {
        switchboard_db::add_contact(conn, payload.name.trim(), payload.phone_number.trim())
            .map_err(|e| store_error(e, "phone number already exists"))
    })
    .await?;
    Ok(Json(contact))
}

/// Handler for `DELETE /api/contacts/{contactId}`.
pub async fn delete_contact_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(contact_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let changes = with_conn(state, move |conn| {
        switchboard_db::delete_contact(conn, contact_id)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;

    if changes == 0 {
        return Err(ApiError::NotFound(format!("contact {contact_id}")));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ── Blacklist ────────────────────────────────────────────────────────

/// Request body for blacklist entry creation.
#[derive(Debug, Deserialize)]
pub struct AddBlacklistRequest {
    /// The number or pattern value to list.
    pub phone_number: String,
    /// Why the number is being listed.
    #[serde(default)]
    pub reason: String,
    /// Matching semantics; defaults to exact.
    #[serde(default)]
    pub pattern_type: Option<String>,
}

/// Handler for `GET /api/blacklist`.
pub async fn list_blacklist_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<BlacklistEntry>>, ApiError> {
    let entries = with_conn(state, |conn| {
        switchboard_db::all_blacklist_entries(conn)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;
    Ok(Json(entries))
}

/// Handler for `POST /api/blacklist`.
pub async fn add_blacklist_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AddBlacklistRequest>,
) -> Result<Json<BlacklistEntry>, ApiError> {
    if payload.phone_number.trim().is_empty() {
        return Err(ApiError::BadRequest("phone number is required".to_string()));
    }

    let pattern_type = match payload.pattern_type.as_deref() {
        None | Some("") => PatternType::Exact,
        Some(raw) => PatternType::from_str(raw).map_err(|_| {
            ApiError::BadRequest(format!(
                "invalid pattern type: {raw}. Expected one of: exact, area_code, prefix"
            ))
        })?,
    };

    let entry = with_conn(state, move |conn| {
        switchboard_db::add_blacklist_entry(
            conn,
            payload.phone_number.trim(),
            payload.reason.trim(),
            pattern_type,
        )
        .map_err(|e| store_error(e, "phone number already blacklisted"))
    })
    .await?;
    Ok(Json(entry))
}

/// Handler for `DELETE /api/blacklist/{entryId}`.
pub async fn delete_blacklist_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(entry_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let changes = with_conn(state, move |conn| {
        switchboard_db::delete_blacklist_entry(conn, entry_id)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;

    if changes == 0 {
        return Err(ApiError::NotFound(format!("blacklist entry {entry_id}")));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ── Call logs ────────────────────────────────────────────────────────

/// Query parameters for `GET /api/call-logs`.
#[derive(Debug, Deserialize)]
pub struct CallLogsQuery {
    /// Maximum number of rows to return (default: 50, max: 500).
    pub limit: Option<i64>,
}

/// Response wrapper for call-log retrieval.
#[derive(Debug, Serialize)]
pub struct CallLogsResponse {
    /// The matching rows, newest first.
    pub logs: Vec<CallLogEntry>,
    /// The number of rows returned.
    pub count: usize,
}

/// Handler for `GET /api/call-logs`.
pub async fn list_call_logs_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<CallLogsQuery>,
) -> Result<Json<CallLogsResponse>, ApiError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);

    let logs = with_conn(state, move |conn| {
        switchboard_db::recent_call_logs(conn, limit)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;

    let count = logs.len();
    Ok(Json(CallLogsResponse { logs, count }))
}

/// Handler for `DELETE /api/call-logs/{logId}`.
pub async fn delete_call_log_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(log_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let changes = with_conn(state, move |conn| {
        switchboard_db::delete_call_log(conn, log_id)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;

    if changes == 0 {
        return Err(ApiError::NotFound(format!("call log {log_id}")));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Handler for `DELETE /api/call-logs`.
pub async fn clear_call_logs_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let changes = with_conn(state, |conn| {
        switchboard_db::clear_call_logs(conn)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await?;
    Ok(Json(serde_json::json!({ "deleted": changes })))
}
