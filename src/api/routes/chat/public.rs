//! Public types for the chat API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// Reply envelope: exactly one of `reply` or `error`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply { reply: String },
    Error { error: String },
}
