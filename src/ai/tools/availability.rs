use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ToolOutcome;
use crate::calendar::{CalendarApi, TimeInterval};
use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};
use crate::timeparse;

#[derive(Serialize)]
pub struct AvailabilityProps {
    pub time_text: Property,
}

#[derive(Deserialize)]
pub struct AvailabilityArgs {
    pub time_text: String,
}

#[derive(Serialize)]
pub struct AvailabilityTool {
    pub r#type: ToolType,
    pub function: Function<AvailabilityProps>,
    #[serde(skip)]
    calendar: Arc<dyn CalendarApi>,
    #[serde(skip)]
    timezone: Tz,
}

#[async_trait]
impl ToolCall for AvailabilityTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: AvailabilityArgs = match serde_json::from_str(args) {
            Ok(fn_args) => fn_args,
            Err(e) => return Ok(format!("❌ Could not read the availability request: {}", e)),
        };
        Ok(self.check(&fn_args.time_text).await.into_message())
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl AvailabilityTool {
    pub fn new(calendar: Arc<dyn CalendarApi>, timezone: Tz) -> Self {
        let function = Function {
            name: String::from("check_calendar_availability"),
            description: String::from(
                "Check if a calendar slot is free. Use with queries like 'Is 10th July at 3PM available?'",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: AvailabilityProps {
                    time_text: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "The requested date and time in the user's own words.",
                        ),
                    },
                },
                required: vec![String::from("time_text")],
                additional_properties: false,
            },
            strict: true,
        };

        Self {
            r#type: ToolType::Function,
            function,
            calendar,
            timezone,
        }
    }

    /// Resolve the requested time to a one hour slot and scan the busy
    /// list for a conflict. The first overlapping interval settles the
    /// answer.
    pub async fn check(&self, text: &str) -> ToolOutcome {
        let now = Utc::now().with_timezone(&self.timezone);
        let start = match timeparse::resolve(text, now) {
            Ok(start) => start,
            Err(e) => return ToolOutcome::Recoverable(format!("❌ {}", e)),
        };

        let slot = TimeInterval::hour_slot(start.with_timezone(&Utc));
        let busy = match self.calendar.list_busy(Utc::now()).await {
            Ok(busy) => busy,
            Err(e) => {
                return ToolOutcome::Recoverable(format!("❌ Error checking calendar: {}", e));
            }
        };

        let when = start.format("%I:%M %p on %d %b %Y");
        if busy.iter().any(|interval| slot.overlaps(interval)) {
            ToolOutcome::Success(format!("❌ Slot at {} is already booked.", when))
        } else {
            ToolOutcome::Success(format!("✅ Slot at {} is available.", when))
        }
    }
}
