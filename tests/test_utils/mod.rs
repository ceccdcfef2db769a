//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};

use slotwise::api::AppState;
use slotwise::api::app;
use slotwise::core::AppConfig;

/// An `AppConfig` wired to test servers instead of real services.
/// Pass `mockito` server URLs for whichever collaborator the test
/// exercises and an unroutable address for the rest.
pub fn test_config(backend_api_url: &str, llm_api_url: &str, gcal_api_url: &str) -> AppConfig {
    AppConfig {
        backend_api_url: backend_api_url.to_string(),
        calendar_id: String::from("primary"),
        gcal_api_base_url: gcal_api_url.to_string(),
        gcal_api_token: String::from("test-token"),
        timezone: chrono_tz::Asia::Kolkata,
        max_events: 10,
        openai_api_hostname: llm_api_url.to_string(),
        openai_api_key: String::from("test-api-key"),
        openai_model: String::from("gpt-4.1-mini"),
        system_message: String::from("You are a helpful scheduling assistant."),
        agent_timeout_secs: 5,
        agent_max_iterations: 3,
    }
}

/// Creates a test application router for the given config.
pub fn test_app(config: AppConfig) -> Router {
    let app_state = AppState::new(config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not utf-8")
}
