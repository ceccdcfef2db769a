//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State, routing::post};

use super::public::{ChatRequest, ChatResponse};
use crate::ai::{Agent, AgentOutcome};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// One conversational turn. This handler never fails: malformed
/// bodies, agent faults and timeouts all flatten into an `error`
/// field in a 200 response so the chat widget always has something
/// to show.
async fn chat_handler(State(state): State<SharedState>, body: String) -> Json<ChatResponse> {
    let message = serde_json::from_str::<ChatRequest>(&body)
        .ok()
        .and_then(|req| req.message)
        .unwrap_or_default();

    if message.trim().is_empty() {
        return Json(ChatResponse::Error {
            error: String::from("No message provided"),
        });
    }

    let agent = {
        let shared_state = state.read().expect("Unable to read shared state");
        Agent::new(&shared_state.config)
    };

    tracing::info!("Processing chat message");

    match agent.converse(&message).await {
        AgentOutcome::Reply(reply) => Json(ChatResponse::Reply { reply }),
        AgentOutcome::TimedOut => Json(ChatResponse::Error {
            error: String::from("Request timed out - agent took too long to respond"),
        }),
        AgentOutcome::Failed(e) => Json(ChatResponse::Error {
            error: format!("Internal server error: {}", e),
        }),
    }
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
