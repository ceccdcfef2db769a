//! The conversation entry point: one utterance in, one reply out.
//!
//! A turn runs the tool-calling reasoning loop under a hard wall-clock
//! budget. The timeout is enforced from outside the loop by dropping
//! the in-flight future at the deadline; a side effect the loop
//! already performed (a booking) stays done and is not rolled back.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono_tz::Tz;

use crate::ai::tools::{AvailabilityTool, BookingGuard, BookingTool};
use crate::calendar::{CalendarApi, HttpCalendarApi};
use crate::core::AppConfig;
use crate::openai::{BoxedToolCall, Message, Role, chat};

/// What a conversation turn produced, before it is flattened into
/// user-facing text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentOutcome {
    Reply(String),
    TimedOut,
    Failed(String),
}

pub struct Agent {
    api_base_url: String,
    timezone: Tz,
    openai_api_hostname: String,
    openai_api_key: String,
    openai_model: String,
    system_message: String,
    max_iterations: usize,
    timeout: Duration,
}

impl Agent {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_base_url: config.backend_api_url.clone(),
            timezone: config.timezone,
            openai_api_hostname: config.openai_api_hostname.clone(),
            openai_api_key: config.openai_api_key.clone(),
            openai_model: config.openai_model.clone(),
            system_message: config.system_message.clone(),
            max_iterations: config.agent_max_iterations,
            timeout: Duration::from_secs(config.agent_timeout_secs),
        }
    }

    /// Run one conversation turn under the wall-clock budget and
    /// classify the result. Never panics.
    pub async fn converse(&self, message: &str) -> AgentOutcome {
        match tokio::time::timeout(self.timeout, self.run_turn(message)).await {
            Ok(Ok(reply)) => AgentOutcome::Reply(reply),
            Ok(Err(e)) => {
                tracing::error!("Agent turn failed: {:#}", e);
                AgentOutcome::Failed(e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    "Agent turn exceeded the {}s budget",
                    self.timeout.as_secs()
                );
                AgentOutcome::TimedOut
            }
        }
    }

    /// `converse` flattened to a plain string for callers that only
    /// speak text. Every failure path becomes a prefixed message.
    pub async fn run(&self, message: &str) -> String {
        match self.converse(message).await {
            AgentOutcome::Reply(reply) => reply,
            AgentOutcome::TimedOut => {
                format!("⚠️ Agent timed out ({}s limit)", self.timeout.as_secs())
            }
            AgentOutcome::Failed(e) => format!("❌ Agent error: {}", e),
        }
    }

    async fn run_turn(&self, message: &str) -> Result<String> {
        let calendar: Arc<dyn CalendarApi> = Arc::new(HttpCalendarApi::new(&self.api_base_url));

        // Fresh guard per turn: the booking budget belongs to this
        // conversation turn and nothing else.
        let guard = BookingGuard::new();
        let tools: Option<Vec<BoxedToolCall>> = Some(vec![
            Box::new(AvailabilityTool::new(Arc::clone(&calendar), self.timezone)),
            Box::new(BookingTool::new(calendar, self.timezone, guard)),
        ]);

        let history = vec![
            Message::new(Role::System, &self.system_message),
            Message::new(Role::User, message),
        ];

        let messages = chat(
            &tools,
            &history,
            &self.openai_api_hostname,
            &self.openai_api_key,
            &self.openai_model,
            self.max_iterations,
        )
        .await?;

        messages
            .last()
            .and_then(|m| m.content.clone())
            .ok_or_else(|| anyhow!("the agent produced no reply"))
    }
}
