//! Public types for the calendar events and booking API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct EventsQuery {
    /// RFC 3339 lower bound; defaults to now.
    pub time_min: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct EventResponse {
    pub summary: String,
    pub start: String,
    pub end: String,
}

#[derive(Serialize, Deserialize)]
pub struct BookRequest {
    pub summary: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookResponse {
    Booked {
        status: String,
        event_link: Option<String>,
    },
    Error {
        error: String,
    },
}
