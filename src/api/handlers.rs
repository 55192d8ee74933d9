//! HTTP request handlers

use super::assets::{serve_index, serve_static};
use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, SessionResponse, SuccessResponse, VersionResponse,
};
use super::AppState;
use crate::runtime::SessionError;
use crate::session::EXPORT_FILE_NAME;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat page
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/delete", post(delete_session))
        // Turns
        .route("/api/sessions/:id/chat", post(send_chat))
        // Transcript download
        .route("/api/sessions/:id/export", get(export_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionResponse { session }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.snapshot(&id).await?;
    Ok(Json(SessionResponse { session }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.reset(&id).await?;
    Ok(Json(SessionResponse { session }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.discard(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Turns
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let (outcome, snapshot) = state.sessions.chat(&id, &req.text).await?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        stage: outcome.stage,
        stage_number: outcome.stage.number(),
        emotion: outcome.emotion,
        notice: outcome.notice,
        messages: snapshot.messages,
    }))
}

// ============================================================
// Export
// ============================================================

async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let text = state.sessions.export(&id).await?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    )
        .into_response())
}

// ============================================================
// Version
// ============================================================

async fn get_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        model: state.sessions.relay().model_id().to_string(),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
            SessionError::EmptyMessage => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
