//! Route configuration for the chat endpoints.
//!
//! Routes:
//! - `POST /api/chat` - Run one conversational turn
//! - `POST /api/login` - Demo credential check
//! - `GET /health` - Liveness probe

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, post_chat, post_login, ChatAppState};

/// Creates the chat router with all endpoints.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .route("/api/chat", post(post_chat))
        .route("/api/login", post(post_login))
        .route("/health", get(health))
}
