//! Router for the calendar events and booking API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};

use super::public::{BookRequest, BookResponse, EventResponse, EventsQuery};
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::google::gcal;

type SharedState = Arc<RwLock<AppState>>;

async fn events_handler(
    State(state): State<SharedState>,
    Query(params): Query<EventsQuery>,
) -> Result<Json<Vec<EventResponse>>, crate::api::public::ApiError> {
    let config: AppConfig = {
        state
            .read()
            .expect("Unable to read shared state")
            .config
            .clone()
    };

    let time_min = params
        .time_min
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let events = gcal::list_events(
        &config.gcal_api_base_url,
        &config.gcal_api_token,
        &config.calendar_id,
        time_min,
        config.max_events,
    )
    .await?;

    // All-day entries and events without concrete times are dropped;
    // the availability check only reasons over timed intervals.
    let resp = events
        .into_iter()
        .filter_map(|event| {
            let start = event.start.and_then(|s| s.date_time)?;
            let end = event.end.and_then(|e| e.date_time)?;
            Some(EventResponse {
                summary: event.summary.unwrap_or_else(|| "No title".to_string()),
                start,
                end,
            })
        })
        .collect();

    Ok(Json(resp))
}

async fn book_handler(
    State(state): State<SharedState>,
    Json(payload): Json<BookRequest>,
) -> Result<Json<BookResponse>, crate::api::public::ApiError> {
    let config: AppConfig = {
        state
            .read()
            .expect("Unable to read shared state")
            .config
            .clone()
    };

    let Some(start_time) = payload.start_time else {
        return Ok(Json(BookResponse::Error {
            error: String::from("Missing start_time in request"),
        }));
    };
    let Ok(start) = DateTime::parse_from_rfc3339(&start_time) else {
        return Ok(Json(BookResponse::Error {
            error: format!("Invalid start_time: {}", start_time),
        }));
    };
    let start = start.with_timezone(&Utc);

    let end = match payload.end_time {
        Some(end_time) => {
            let Ok(end) = DateTime::parse_from_rfc3339(&end_time) else {
                return Ok(Json(BookResponse::Error {
                    error: format!("Invalid end_time: {}", end_time),
                }));
            };
            end.with_timezone(&Utc)
        }
        None => start + Duration::hours(1),
    };

    let summary = payload.summary.unwrap_or_else(|| "Untitled Event".to_string());

    let event = gcal::insert_event(
        &config.gcal_api_base_url,
        &config.gcal_api_token,
        &config.calendar_id,
        &summary,
        start,
        end,
        config.timezone.name(),
    )
    .await?;

    Ok(Json(BookResponse::Booked {
        status: String::from("booked"),
        event_link: event.html_link,
    }))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/events", get(events_handler))
        .route("/book", post(book_handler))
}
