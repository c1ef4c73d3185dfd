use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::engine::CompanionEngine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyBody {
    pub reply: String,
}

/// Router exposing the companion conversation endpoints.
pub fn companion_router(engine: Arc<CompanionEngine>) -> Router {
    Router::new()
        .route("/api/v1/companion/messages", post(message_handler))
        .route("/api/v1/companion/greeting", get(greeting_handler))
        .with_state(engine)
}

pub(crate) async fn message_handler(
    State(engine): State<Arc<CompanionEngine>>,
    axum::Json(request): axum::Json<MessageRequest>,
) -> Response {
    let message = request.message.trim();
    if message.is_empty() {
        let payload = json!({
            "error": "no message provided",
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }
    let reply = engine.reply(message);
    (StatusCode::OK, axum::Json(ReplyBody { reply })).into_response()
}

pub(crate) async fn greeting_handler(State(engine): State<Arc<CompanionEngine>>) -> Response {
    let body = ReplyBody {
        reply: engine.greeting().to_owned(),
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}
