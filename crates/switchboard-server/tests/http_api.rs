//! End-to-end HTTP tests over the full router with a real on-disk
//! database and a stubbed classifier.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use switchboard_classify::SpeechClassifier;
use switchboard_observe::CallNotifier;
use switchboard_routing::RoutingEngine;
use switchboard_server::{app, AppState, SqliteDirectory};
use switchboard_types::{CallCategory, Classification};
use tower::ServiceExt;

const FORWARD_TO: &str = "+15550009999";

struct StubClassifier;

#[async_trait]
impl SpeechClassifier for StubClassifier {
    async fn classify(&self, _text: &str) -> Classification {
        Classification {
            category: CallCategory::Support,
            summary: "Account inquiry".to_string(),
        }
    }
}

struct TestApp {
    router: Router,
    // Kept alive so the database file outlives the test.
    _dir: tempfile::TempDir,
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join("switchboard.db");
    let pool = switchboard_db::create_pool(
        db_path.to_str().expect("utf-8 path"),
        switchboard_db::DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");

    {
        let conn = pool.get().expect("failed to get connection");
        switchboard_db::run_migrations(&conn).expect("failed to run migrations");
    }

    let notifier = CallNotifier::new();
    let engine = RoutingEngine::new(
        Arc::new(SqliteDirectory::new(pool.clone())),
        Arc::new(StubClassifier),
        notifier.clone(),
        FORWARD_TO,
        None,
    );

    let router = app(AppState {
        pool,
        engine: Arc::new(engine),
        notifier,
    });

    TestApp { router, _dir: dir }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8_lossy(&body).to_string())
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn call_log_statuses(router: &Router) -> Vec<String> {
    let (status, body) = send(router, get("/api/call-logs")).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: Value = serde_json::from_str(&body).unwrap();
    parsed["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["status"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(get("/health"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn unknown_caller_gets_screening_greeting() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(form_post("/voice", "From=%2B15551234567&CallSid=CA1"))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/xml")
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let xml = String::from_utf8_lossy(&body);
    assert!(xml.contains("Hello. What can I help you with today?"));
    assert!(xml.contains("<Gather input=\"speech\""));
    assert!(xml.contains("action=\"/handle-gather\""));

    assert_eq!(call_log_statuses(&app.router).await, vec!["Screening"]);
}

#[tokio::test]
async fn whitelisted_contact_is_forwarded() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        json_post(
            "/api/contacts",
            json!({ "name": "Alice", "phone_number": "555-123-4567" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, xml) = send(
        &app.router,
        form_post("/voice", "From=%2B15551234567&CallSid=CA2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("<Dial"));
    assert!(xml.contains(FORWARD_TO));
    assert!(xml.contains("url=\"/whisper?name=Alice\""));

    assert_eq!(call_log_statuses(&app.router).await, vec!["Whitelisted"]);
}

#[tokio::test]
async fn blacklisted_caller_gets_compliance_then_removal() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        json_post(
            "/api/blacklist",
            json!({ "phone_number": "+15558675309", "reason": "Robocaller" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Formatting differs from the stored entry; matching normalizes.
    let (status, xml) = send(
        &app.router,
        form_post("/voice", "From=%28555%29%20867-5309&CallSid=CA3"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("press 1"));
    assert!(xml.contains("action=\"/handle-tcpa\""));

    let (status, xml) = send(
        &app.router,
        form_post(
            "/handle-tcpa",
            "From=%2B15558675309&CallSid=CA3&Digits=1",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("removal request has been recorded"));

    let statuses = call_log_statuses(&app.router).await;
    assert!(statuses.contains(&"Blacklisted".to_string()));
    assert!(statuses.contains(&"TCPA Removal".to_string()));
}

#[tokio::test]
async fn gather_routes_support_speech_to_voicemail() {
    let app = test_app();

    let (status, xml) = send(
        &app.router,
        form_post(
            "/handle-gather",
            "From=%2B15551234567&CallSid=CA4&SpeechResult=I%20need%20to%20talk%20about%20my%20account",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("<Record"));
    assert!(xml.contains("action=\"/handle-recording\""));

    assert_eq!(call_log_statuses(&app.router).await, vec!["Voicemail"]);
}

#[tokio::test]
async fn gather_without_speech_rejects() {
    let app = test_app();

    let (status, xml) = send(
        &app.router,
        form_post("/handle-gather", "From=%2B15551234567&CallSid=CA5"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("Sorry, I cannot take your call right now"));
    assert!(xml.contains("<Hangup/>"));

    assert_eq!(call_log_statuses(&app.router).await, vec!["Rejected"]);
}

#[tokio::test]
async fn whisper_document_speaks_contact_name() {
    let app = test_app();

    let (status, xml) = send(&app.router, get("/whisper?name=Alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("Direct call from Alice."));
    assert!(xml.contains("action=\"/handle-accept\""));

    let (status, xml) = send(&app.router, get("/whisper-screened?summary=Account+inquiry")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("Screened call about: Account inquiry."));
}

#[tokio::test]
async fn contact_validation_and_conflicts() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        json_post("/api/contacts", json!({ "name": "", "phone_number": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        json_post(
            "/api/contacts",
            json!({ "name": "Alice", "phone_number": "+15551234567" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app.router,
        json_post(
            "/api/contacts",
            json!({ "name": "Alice Again", "phone_number": "+15551234567" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app.router, delete("/api/contacts/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blacklist_rejects_unknown_pattern_type() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        json_post(
            "/api/blacklist",
            json!({ "phone_number": "+15558675309", "pattern_type": "fuzzy" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid pattern type"));
}

#[tokio::test]
async fn call_logs_can_be_cleared() {
    let app = test_app();

    send(
        &app.router,
        form_post("/voice", "From=%2B15551234567&CallSid=CA6"),
    )
    .await;
    assert_eq!(call_log_statuses(&app.router).await.len(), 1);

    let (status, _) = send(&app.router, delete("/api/call-logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(call_log_statuses(&app.router).await.is_empty());
}

#[tokio::test]
async fn dial_status_failure_speaks_and_logs() {
    let app = test_app();

    let (status, xml) = send(
        &app.router,
        form_post(
            "/handle-dial-status",
            "From=%2B15551234567&CallSid=CA7&DialCallStatus=no-answer",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("The call could not be completed"));

    assert_eq!(call_log_statuses(&app.router).await, vec!["NotAccepted"]);
}

#[tokio::test]
async fn acceptance_digit_connects() {
    let app = test_app();

    let (status, xml) = send(
        &app.router,
        form_post(
            "/handle-accept",
            "From=%2B15551234567&CallSid=CA8&Digits=5",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("Connecting you now."));

    assert_eq!(call_log_statuses(&app.router).await, vec!["Accepted"]);
}
