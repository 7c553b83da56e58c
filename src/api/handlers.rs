//! HTTP request handlers

use super::types::{
    ActionInfo, ActionsResponse, ChatRequest, CredentialRequest, CredentialResponse,
    ErrorResponse, ImportResponse, MessagesResponse, ResetResponse, StatusResponse,
};
use super::AppState;
use crate::db::{DbError, ImportError};
use crate::dispatcher::TurnOutcome;
use crate::persona::{QuickAction, UnknownAction};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

const SNAPSHOT_FILENAME: &str = "memoria_susana.sql";

/// Largest snapshot accepted for upload
const MAX_SNAPSHOT_BYTES: usize = 200 * 1024 * 1024;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Conversation log
        .route("/api/messages", get(get_messages))
        .route("/api/chat", post(send_chat))
        .route("/api/reset", post(reset_conversation))
        // Quick actions
        .route("/api/actions", get(list_actions))
        .route("/api/actions/:action", post(run_action))
        // Snapshot download / upload
        .route(
            "/api/snapshot",
            get(export_snapshot)
                .post(import_snapshot)
                .layer(DefaultBodyLimit::max(MAX_SNAPSHOT_BYTES)),
        )
        // Session credential
        .route("/api/credential", post(set_credential).delete(clear_credential))
        .route("/api/status", get(get_status))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Conversation Log
// ============================================================

async fn get_messages(State(state): State<AppState>) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state.db.history()?;
    Ok(Json(MessagesResponse {
        messages,
        generation: state.db.generation(),
    }))
}

async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<TurnOutcome>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Message text is empty".to_string()));
    }

    let outcome = state.dispatcher.submit(&req.text).await?;
    Ok(Json(outcome))
}

async fn reset_conversation(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    let generation = state.db.clear()?;
    Ok(Json(ResetResponse { generation }))
}

// ============================================================
// Quick Actions
// ============================================================

async fn list_actions() -> Json<ActionsResponse> {
    let actions = QuickAction::ALL
        .iter()
        .map(|action| ActionInfo {
            slug: action.slug(),
            label: action.label(),
            text: action.text(),
        })
        .collect();
    Json(ActionsResponse { actions })
}

async fn run_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Json<TurnOutcome>, AppError> {
    let action: QuickAction = action
        .parse()
        .map_err(|e: UnknownAction| AppError::NotFound(e.to_string()))?;

    let outcome = state.dispatcher.quick_action(action).await?;
    Ok(Json(outcome))
}

// ============================================================
// Snapshot
// ============================================================

async fn export_snapshot(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = state.db.export()?;
    let disposition = format!("attachment; filename=\"{SNAPSHOT_FILENAME}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "application/sql; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn import_snapshot(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    let summary = state.db.import(&body)?;
    Ok(Json(ImportResponse {
        restored: summary.restored,
        generation: summary.generation,
    }))
}

// ============================================================
// Session Credential
// ============================================================

async fn set_credential(
    State(state): State<AppState>,
    Json(req): Json<CredentialRequest>,
) -> Result<Json<CredentialResponse>, AppError> {
    if !state.session.set(&req.api_key) {
        return Err(AppError::BadRequest("API key is empty".to_string()));
    }
    tracing::info!("Session credential stored");

    Ok(Json(CredentialResponse {
        mode: state.dispatcher.mode(),
    }))
}

async fn clear_credential(State(state): State<AppState>) -> Json<CredentialResponse> {
    state.session.clear();
    tracing::info!("Session credential cleared");

    Json(CredentialResponse {
        mode: state.dispatcher.mode(),
    })
}

// ============================================================
// Status
// ============================================================

async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(StatusResponse {
        mode: state.dispatcher.mode(),
        model: state.dispatcher.model_id().to_string(),
        message_count: state.db.message_count()?,
        generation: state.db.generation(),
    }))
}

async fn get_version() -> &'static str {
    concat!("susana ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        tracing::error!(error = %e, "Storage failure");
        AppError::Internal(e.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::Storage(inner) => inner.into(),
            other => {
                tracing::warn!(error = %other, "Snapshot rejected");
                AppError::BadRequest(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, Role};
    use crate::dispatcher::testing::MockBridge;
    use crate::dispatcher::{DispatchConfig, Dispatcher};
    use crate::llm::{CredentialResolver, SessionCredential};
    use crate::persona::WELCOME_MESSAGE;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        db: Database,
        bridge: Arc<MockBridge>,
    }

    fn app() -> TestApp {
        let db = Database::open_in_memory().unwrap();
        let bridge = Arc::new(MockBridge::new("mock-model"));
        let session = Arc::new(SessionCredential::default());
        let credentials = CredentialResolver::new().with_source(session.clone());
        let dispatcher = Dispatcher::new(
            db.clone(),
            bridge.clone(),
            credentials,
            DispatchConfig::default(),
        )
        .with_seed(3);
        let state = AppState::new(db.clone(), Arc::new(dispatcher), session);
        TestApp {
            router: create_router(state),
            db,
            bridge,
        }
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, Bytes) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes)
    }

    async fn call_json(
        router: &Router,
        method: Method,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        let (status, bytes) = call(router, method, uri, Body::from(body.to_string())).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_messages_start_with_welcome() {
        let app = app();
        let (status, body) = call_json(&app.router, Method::GET, "/api/messages", Value::Null).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["content"], WELCOME_MESSAGE);
        assert_eq!(body["messages"][0]["role"], "assistant");
        assert_eq!(body["generation"], 0);
    }

    #[tokio::test]
    async fn test_chat_runs_a_demo_turn() {
        let app = app();
        let (status, body) =
            call_json(&app.router, Method::POST, "/api/chat", json!({"text": "Hola"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "demo");
        assert_eq!(body["user"]["content"], "Hola");
        assert!(body.get("remote_error").is_none());
        assert_eq!(app.db.message_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_blank_chat_is_rejected() {
        let app = app();
        let (status, body) =
            call_json(&app.router, Method::POST, "/api/chat", json!({"text": "  \n"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(app.db.message_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_session_credential_switches_to_live() {
        let app = app();
        app.bridge.queue_reply("¡Qué piedra tan brillante!");

        let (status, body) = call_json(
            &app.router,
            Method::POST,
            "/api/credential",
            json!({"api_key": "abc"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "live");

        let (_, body) =
            call_json(&app.router, Method::POST, "/api/chat", json!({"text": "Mira mi celular"}))
                .await;
        assert_eq!(body["mode"], "live");
        assert_eq!(body["reply"]["content"], "¡Qué piedra tan brillante!");

        let (_, body) =
            call_json(&app.router, Method::DELETE, "/api/credential", Value::Null).await;
        assert_eq!(body["mode"], "demo");
    }

    #[tokio::test]
    async fn test_blank_credential_is_rejected() {
        let app = app();
        let (status, _) = call_json(
            &app.router,
            Method::POST,
            "/api/credential",
            json!({"api_key": " "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_quick_actions() {
        let app = app();
        let (status, body) = call_json(&app.router, Method::GET, "/api/actions", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["actions"].as_array().unwrap().len(), QuickAction::ALL.len());

        let (status, body) =
            call_json(&app.router, Method::POST, "/api/actions/regalar", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["content"], QuickAction::OfferGift.text());

        let (status, _) =
            call_json(&app.router, Method::POST, "/api/actions/bailar", Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_bumps_generation() {
        let app = app();
        app.db.append(Role::User, "hola").unwrap();

        let (status, body) = call_json(&app.router, Method::POST, "/api/reset", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], 1);
        assert_eq!(app.db.message_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_download_and_upload() {
        let app = app();
        app.db.append(Role::User, "Hola, ¿cómo está la vaca 'Lola'?").unwrap();
        app.db.append(Role::Assistant, "¡Muy gordita!").unwrap();

        let request = Request::builder()
            .uri("/api/snapshot")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(SNAPSHOT_FILENAME));
        let snapshot = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        app.db.clear().unwrap();
        let (status, bytes) =
            call(&app.router, Method::POST, "/api/snapshot", Body::from(snapshot)).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["restored"], 2);

        let log = app.db.read_all().unwrap();
        assert_eq!(log[0].content, "Hola, ¿cómo está la vaca 'Lola'?");
    }

    #[tokio::test]
    async fn test_large_snapshot_round_trips() {
        let app = app();
        let line = "muuu ".repeat(200);
        for i in 0..2_500 {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            app.db.append(role, &line).unwrap();
        }

        let (status, snapshot) =
            call(&app.router, Method::GET, "/api/snapshot", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(snapshot.len() > 2 * 1024 * 1024);

        app.db.clear().unwrap();
        let (status, bytes) =
            call(&app.router, Method::POST, "/api/snapshot", Body::from(snapshot)).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["restored"], 2_500);
        assert_eq!(app.db.message_count().unwrap(), 2_500);
    }

    #[tokio::test]
    async fn test_bad_snapshot_is_rejected() {
        let app = app();
        app.db.append(Role::User, "hola").unwrap();

        let (status, bytes) = call(
            &app.router,
            Method::POST,
            "/api/snapshot",
            Body::from("not a snapshot"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Unsupported"));
        assert_eq!(app.db.message_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_status() {
        let app = app();
        let (status, body) = call_json(&app.router, Method::GET, "/api/status", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "demo");
        assert_eq!(body["model"], "mock-model");
        assert_eq!(body["message_count"], 0);
    }
}
