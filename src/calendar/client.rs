use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::TimeInterval;
use crate::api::public::calendar::{BookRequest, BookResponse, EventResponse};

/// An event created by the calendar provider. The link is best-effort;
/// a provider that returns none degrades to a generic confirmation.
#[derive(Clone, Debug)]
pub struct CreatedEvent {
    pub link: Option<String>,
}

/// The two calendar capabilities the agent tools consume.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Upcoming busy intervals from `from` onward, ordered by start
    /// time and capped by the backing service.
    async fn list_busy(&self, from: DateTime<Utc>) -> Result<Vec<TimeInterval>>;

    /// Create a calendar event and return its link, if the provider
    /// gives one.
    async fn create_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CreatedEvent>;
}

/// `CalendarApi` backed by the service's own events and booking
/// routes, which in turn talk to the calendar provider.
pub struct HttpCalendarApi {
    api_base_url: String,
}

impl HttpCalendarApi {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CalendarApi for HttpCalendarApi {
    async fn list_busy(&self, from: DateTime<Utc>) -> Result<Vec<TimeInterval>> {
        let mut url = reqwest::Url::parse(&format!("{}/api/events", self.api_base_url))?;
        url.query_pairs_mut()
            .append_pair("time_min", &from.to_rfc3339());

        let resp = reqwest::Client::new()
            .get(url)
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(10))
            .send()
            .await?;
        if !resp.status().is_success() {
            bail!("status {}", resp.status().as_u16());
        }
        let events: Vec<EventResponse> = resp.json().await?;

        // Entries without a well-formed start and end are skipped
        // rather than failing the whole query.
        let mut busy = Vec::new();
        for event in events {
            let (Ok(start), Ok(end)) = (
                DateTime::parse_from_rfc3339(&event.start),
                DateTime::parse_from_rfc3339(&event.end),
            ) else {
                continue;
            };
            if let Ok(interval) =
                TimeInterval::new(start.with_timezone(&Utc), end.with_timezone(&Utc))
            {
                busy.push(interval);
            }
        }
        Ok(busy)
    }

    async fn create_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CreatedEvent> {
        let payload = BookRequest {
            summary: Some(summary.to_string()),
            start_time: Some(start.to_rfc3339()),
            end_time: Some(end.to_rfc3339()),
        };

        let resp = reqwest::Client::new()
            .post(format!("{}/api/book", self.api_base_url))
            .timeout(Duration::from_secs(10))
            .json(&payload)
            .send()
            .await?;
        if !resp.status().is_success() {
            bail!("status {}", resp.status().as_u16());
        }

        match resp.json::<BookResponse>().await? {
            BookResponse::Booked { event_link, .. } => Ok(CreatedEvent { link: event_link }),
            BookResponse::Error { error } => bail!("{}", error),
        }
    }
}
