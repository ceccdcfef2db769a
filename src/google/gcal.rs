//! Google Calendar API client for listing upcoming events and
//! inserting bookings. Thin adapter over the Calendar v3 REST API;
//! auth is a bearer token supplied by configuration.

use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    /// All-day events carry a date instead of a dateTime.
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEventsResponse {
    items: Option<Vec<Event>>,
}

/// Fetch upcoming events from `time_min` onward, ordered by start
/// time, at most `max_results` of them.
pub async fn list_events(
    api_base_url: &str,
    token: &str,
    calendar_id: &str,
    time_min: DateTime<Utc>,
    max_results: u32,
) -> Result<Vec<Event>> {
    let mut url = reqwest::Url::parse(&format!(
        "{}/calendars/{}/events",
        api_base_url.trim_end_matches('/'),
        urlencoding::encode(calendar_id),
    ))?;
    url.query_pairs_mut()
        .append_pair("timeMin", &time_min.to_rfc3339())
        .append_pair("maxResults", &max_results.to_string())
        .append_pair("singleEvents", "true")
        .append_pair("orderBy", "startTime");

    let resp = reqwest::Client::new()
        .get(url)
        .bearer_auth(token)
        .timeout(Duration::from_secs(10))
        .send()
        .await?;
    if !resp.status().is_success() {
        bail!("calendar list failed with status {}", resp.status().as_u16());
    }

    let body: ListEventsResponse = resp.json().await?;
    Ok(body.items.unwrap_or_default())
}

/// Create an event in the configured timezone and return it, link
/// included when the provider supplies one.
pub async fn insert_event(
    api_base_url: &str,
    token: &str,
    calendar_id: &str,
    summary: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    timezone: &str,
) -> Result<Event> {
    let url = format!(
        "{}/calendars/{}/events",
        api_base_url.trim_end_matches('/'),
        urlencoding::encode(calendar_id),
    );

    let payload = json!({
        "summary": summary,
        "start": { "dateTime": start.to_rfc3339(), "timeZone": timezone },
        "end": { "dateTime": end.to_rfc3339(), "timeZone": timezone },
    });

    let resp = reqwest::Client::new()
        .post(url)
        .bearer_auth(token)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(10))
        .json(&payload)
        .send()
        .await?;
    if !resp.status().is_success() {
        bail!(
            "calendar insert failed with status {}",
            resp.status().as_u16()
        );
    }

    let event: Event = resp.json().await?;
    Ok(event)
}
