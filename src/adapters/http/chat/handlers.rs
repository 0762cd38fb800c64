//! HTTP handlers for the chat endpoints.
//!
//! Thin translation layer: resolve the session key, map DTOs onto the
//! application handler, and map its errors onto status codes. The login
//! endpoint is a demo stub with fixed credentials and belongs here rather
//! than behind a port.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::application::handlers::{ChatTurnError, ChatTurnHandler, TurnRequest};

use super::dto::{
    ChatRequestBody, ChatResponseBody, ErrorResponse, LoginRequestBody, LoginResponseBody,
};

const ANONYMOUS_SESSION_KEY: &str = "anonymous";
const INTERNAL_ERROR_REPLY: &str = "Something went wrong. Please try again.";

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "password123";

/// Shared state for the chat routes.
#[derive(Clone)]
pub struct ChatAppState {
    pub chat: Arc<ChatTurnHandler>,
}

impl ChatAppState {
    pub fn new(chat: Arc<ChatTurnHandler>) -> Self {
        Self { chat }
    }
}

/// POST /api/chat - Run one conversational turn.
pub async fn post_chat(
    State(state): State<ChatAppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(body): Json<ChatRequestBody>,
) -> Response {
    let session_key = session_key(&body, connect_info.map(|ConnectInfo(addr)| addr));

    let (wizard_session_id, field_id) = match body.input_request {
        Some(input) => (Some(input.session_id), Some(input.field_id)),
        None => (None, None),
    };
    let request = TurnRequest {
        message: body.message,
        action_intent: body.action_intent,
        wizard_session_id,
        field_id,
    };

    match state.chat.handle(&session_key, request).await {
        Ok(response) => (StatusCode::OK, Json(ChatResponseBody::from(response))).into_response(),
        Err(ChatTurnError::Validation(message)) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
        }
        Err(ChatTurnError::Upstream(message)) => {
            error!(error = %message, "chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(INTERNAL_ERROR_REPLY)),
            )
                .into_response()
        }
    }
}

/// POST /api/login - Demo credential check.
pub async fn post_login(Json(body): Json<LoginRequestBody>) -> Response {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponseBody {
                success: false,
                message: "Username and password are required.".to_string(),
            }),
        )
            .into_response();
    }

    if body.username == DEMO_USERNAME && body.password == DEMO_PASSWORD {
        return (
            StatusCode::OK,
            Json(LoginResponseBody {
                success: true,
                message: "Login successful. Welcome back!".to_string(),
            }),
        )
            .into_response();
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(LoginResponseBody {
            success: false,
            message: "Invalid credentials. Please try again.".to_string(),
        }),
    )
        .into_response()
}

/// GET /health - Liveness probe.
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}

/// Resolve the conversation key: client-supplied id first, then the peer
/// address, then a shared anonymous bucket.
fn session_key(body: &ChatRequestBody, peer: Option<SocketAddr>) -> String {
    body.session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| ANONYMOUS_SESSION_KEY.to_string())
}
