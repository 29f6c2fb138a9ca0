//! Route handler functions for the chat API.
//!
//! Handlers look sessions up in the registry and return JSON snapshots.
//! Submitting a message returns as soon as the user message is recorded;
//! the assistant reply is appended by a background task and picked up by
//! polling the session.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use floatchat_chat::{ChatSession, Message, QuickPrompt, SessionState, QUICK_PROMPTS};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: u64,
}

#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    pub prompts: &'static [QuickPrompt],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub state: SessionState,
    pub awaiting_response: bool,
    pub transcript: Vec<Message>,
}

impl SessionResponse {
    fn from_session(session: &ChatSession) -> Self {
        let (state, transcript) = session.snapshot();
        Self {
            id: session.id(),
            created_at: session.created_at(),
            state,
            awaiting_response: state == SessionState::AwaitingResponse,
            transcript,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: Message,
    pub awaiting_response: bool,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness and session count.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.sessions.len() as u64,
    })
}

/// GET /chat/prompts - quick prompts for the input shortcuts.
pub async fn list_prompts() -> Json<PromptsResponse> {
    Json(PromptsResponse {
        prompts: QUICK_PROMPTS,
    })
}

/// POST /chat/sessions - open a new session.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state.sessions.create()?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from_session(&session)),
    ))
}

/// GET /chat/sessions/{id} - session status and transcript.
pub async fn get_session(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Path(id) = path?;
    let session = state.sessions.get(id)?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// DELETE /chat/sessions/{id} - discard a session and its transcript.
pub async fn delete_session(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /chat/sessions/{id}/messages - transcript only.
pub async fn get_transcript(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Path(id) = path?;
    let session = state.sessions.get(id)?;
    Ok(Json(TranscriptResponse {
        session_id: id,
        messages: session.transcript(),
    }))
}

/// POST /chat/sessions/{id}/messages - submit a user message.
///
/// 202 with the recorded user message when accepted, 204 when the text is
/// blank, 409 while the previous reply is still pending, 400 for a
/// malformed id or body.
pub async fn submit_message(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let session = state.sessions.get(id)?;

    let Some(submission) = session.dispatch(&req.text)? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    tracing::debug!(
        session_id = %id,
        message_id = %submission.user_message.id,
        "User message accepted"
    );

    // The reply task holds its own session handle; dropping the join
    // handle detaches it.
    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            message: submission.user_message,
            awaiting_response: true,
        }),
    )
        .into_response())
}
