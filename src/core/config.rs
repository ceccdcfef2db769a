use std::env;

use chrono_tz::Tz;

use crate::ai::prompt::SYSTEM_PROMPT;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of this service's own API. The agent tools go through
    /// it for calendar reads and writes.
    pub backend_api_url: String,
    pub calendar_id: String,
    pub gcal_api_base_url: String,
    pub gcal_api_token: String,
    /// The single timezone the assistant reasons in.
    pub timezone: Tz,
    /// Cap on how many upcoming events one busy-list query returns.
    pub max_events: u32,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub system_message: String,
    pub agent_timeout_secs: u64,
    pub agent_max_iterations: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = "127.0.0.1";
        let port = "3000";
        let backend_api_url = env::var("SLOTWISE_BACKEND_API_URL")
            .unwrap_or(format!("http://{}:{}", host, port));
        let calendar_id =
            env::var("SLOTWISE_CALENDAR_ID").unwrap_or_else(|_| "primary".to_string());
        let gcal_api_base_url = env::var("SLOTWISE_GCAL_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());
        let gcal_api_token = env::var("SLOTWISE_GCAL_TOKEN").unwrap_or_default();
        let timezone = env::var("SLOTWISE_TIMEZONE")
            .ok()
            .and_then(|name| name.parse().ok())
            .unwrap_or(chrono_tz::Asia::Kolkata);
        let openai_api_hostname =
            env::var("SLOTWISE_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model =
            env::var("SLOTWISE_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let system_message =
            env::var("SLOTWISE_SYSTEM_MESSAGE").unwrap_or_else(|_| SYSTEM_PROMPT.to_string());
        let agent_timeout_secs = env::var("SLOTWISE_AGENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        let agent_max_iterations = env::var("SLOTWISE_AGENT_MAX_ITERATIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        Self {
            backend_api_url,
            calendar_id,
            gcal_api_base_url,
            gcal_api_token,
            timezone,
            max_events: 10,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            system_message,
            agent_timeout_secs,
            agent_max_iterations,
        }
    }
}
