use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Error, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ToolOutcome;
use crate::calendar::CalendarApi;
use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};
use crate::timeparse;

/// At-most-one-booking guard for a single conversation turn. Every
/// turn constructs a fresh guard and hands it to its booking tool, so
/// concurrent conversations cannot interfere with each other's count.
#[derive(Clone, Default)]
pub struct BookingGuard(Arc<AtomicBool>);

impl BookingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once; every later claim in the same turn loses.
    pub fn claim(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

#[derive(Serialize)]
pub struct BookingProps {
    pub title: Property,
    pub start_time: Property,
    pub end_time: Property,
}

#[derive(Deserialize)]
pub struct BookingArgs {
    pub title: String,
    pub start_time: String,
    pub end_time: Option<String>,
}

/// A validated booking. Only constructed from arguments that passed
/// validation; loose text in the time fields goes through the time
/// resolver before it gets here.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingRequest {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: Option<DateTime<Tz>>,
}

impl BookingRequest {
    pub fn from_args(args: &BookingArgs, now: DateTime<Tz>) -> Result<Self> {
        let title = args.title.trim();
        if title.is_empty() {
            bail!("the meeting needs a title");
        }
        let start = timeparse::resolve(&args.start_time, now)?;
        let end = match &args.end_time {
            Some(text) => Some(timeparse::resolve(text, now)?),
            None => None,
        };
        if let Some(end) = end {
            if end <= start {
                bail!("the end time must be after the start time");
            }
        }
        Ok(Self {
            title: title.to_string(),
            start,
            end,
        })
    }
}

#[derive(Serialize)]
pub struct BookingTool {
    pub r#type: ToolType,
    pub function: Function<BookingProps>,
    #[serde(skip)]
    calendar: Arc<dyn CalendarApi>,
    #[serde(skip)]
    timezone: Tz,
    #[serde(skip)]
    guard: BookingGuard,
}

#[async_trait]
impl ToolCall for BookingTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: BookingArgs = match serde_json::from_str(args) {
            Ok(fn_args) => fn_args,
            Err(e) => return Ok(format!("❌ Could not parse booking input: {}", e)),
        };
        Ok(self.book(&fn_args).await.into_message())
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl BookingTool {
    pub fn new(calendar: Arc<dyn CalendarApi>, timezone: Tz, guard: BookingGuard) -> Self {
        let function = Function {
            name: String::from("book_meeting"),
            description: String::from(
                "Book a calendar event. Provide title, start_time, and optionally end_time.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: BookingProps {
                    title: Property {
                        r#type: String::from("string"),
                        description: String::from("The title of the meeting."),
                    },
                    start_time: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "Start time of the meeting (natural language or ISO 8601).",
                        ),
                    },
                    end_time: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "End time of the meeting (optional, defaults to one hour after the start).",
                        ),
                    },
                },
                required: vec![String::from("title"), String::from("start_time")],
                additional_properties: false,
            },
            strict: true,
        };

        Self {
            r#type: ToolType::Function,
            function,
            calendar,
            timezone,
            guard,
        }
    }

    /// Validate the request, claim this turn's one booking, and write
    /// the event to the calendar.
    pub async fn book(&self, args: &BookingArgs) -> ToolOutcome {
        let now = Utc::now().with_timezone(&self.timezone);
        let request = match BookingRequest::from_args(args, now) {
            Ok(request) => request,
            Err(e) => {
                return ToolOutcome::Recoverable(format!("❌ Could not parse booking input: {}", e));
            }
        };

        // One booking per conversation turn. Asking again is answered,
        // not re-executed, and no calendar call is made.
        if !self.guard.claim() {
            return ToolOutcome::Refused(String::from(
                "Booking already completed. No need to book again.",
            ));
        }

        let start = request.start;
        let end = request.end.unwrap_or(start + Duration::hours(1));

        match self
            .calendar
            .create_event(
                &request.title,
                start.with_timezone(&Utc),
                end.with_timezone(&Utc),
            )
            .await
        {
            Ok(event) => {
                let confirmation = format!(
                    "📅 Meeting '{}' booked from {} to {}",
                    request.title,
                    start.format("%I:%M %p"),
                    end.format("%I:%M %p"),
                );
                match event.link {
                    Some(link) => {
                        ToolOutcome::Success(format!("{} — [Open event]({})", confirmation, link))
                    }
                    None => ToolOutcome::Success(format!("{}. Booking complete.", confirmation)),
                }
            }
            Err(e) => ToolOutcome::Recoverable(format!("❌ Booking failed with {}", e)),
        }
    }
}
