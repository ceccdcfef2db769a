//! Integration tests for the agent tools against a mocked events and
//! booking API

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use slotwise::ai::tools::booking::BookingArgs;
use slotwise::ai::tools::{AvailabilityTool, BookingGuard, BookingTool, ToolOutcome};
use slotwise::calendar::HttpCalendarApi;

const TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

fn busy_thursday_afternoon() -> String {
    json!([{
        "summary": "Standup",
        "start": "2025-07-10T15:00:00+05:30",
        "end": "2025-07-10T16:00:00+05:30"
    }])
    .to_string()
}

async fn events_server(status: usize, body: &str) -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/events")
        .match_query(Matcher::Any)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
    (server, mock)
}

/// Tests that a query landing inside a busy interval reads as booked
#[tokio::test]
async fn it_reports_a_conflicting_slot_as_booked() {
    let (server, mock) = events_server(200, &busy_thursday_afternoon()).await;
    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = AvailabilityTool::new(calendar, TZ);

    let outcome = tool.check("Is 10 July 2025 at 3 PM available?").await;
    match outcome {
        ToolOutcome::Success(text) => {
            assert!(text.contains("already booked"), "text: {}", text);
            assert!(text.contains("03:00 PM on 10 Jul 2025"), "text: {}", text);
        }
        other => panic!("expected success, got {:?}", other),
    }
    mock.assert_async().await;
}

/// Tests that a slot outside every busy interval reads as available
#[tokio::test]
async fn it_reports_a_free_slot_as_available() {
    let (server, _mock) = events_server(200, &busy_thursday_afternoon()).await;
    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = AvailabilityTool::new(calendar, TZ);

    let outcome = tool.check("Is 10 July 2025 at 5 PM available?").await;
    match outcome {
        ToolOutcome::Success(text) => {
            assert!(text.contains("is available"), "text: {}", text);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

/// Tests that a failing busy-list read comes back as a recoverable
/// message the agent can reason over
#[tokio::test]
async fn it_recovers_from_a_calendar_read_failure() {
    let (server, _mock) = events_server(500, "oops").await;
    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = AvailabilityTool::new(calendar, TZ);

    let outcome = tool.check("Is 10 July 2025 at 3 PM available?").await;
    match outcome {
        ToolOutcome::Recoverable(text) => {
            assert!(text.contains("Error checking calendar"), "text: {}", text);
        }
        other => panic!("expected recoverable, got {:?}", other),
    }
}

/// Tests that an unintelligible time request surfaces guidance
#[tokio::test]
async fn it_guides_the_user_on_an_unreadable_time() {
    let (server, mock) = events_server(200, "[]").await;
    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = AvailabilityTool::new(calendar, TZ);

    let outcome = tool.check("???").await;
    match outcome {
        ToolOutcome::Recoverable(text) => {
            assert!(text.contains("Try something like"), "text: {}", text);
        }
        other => panic!("expected recoverable, got {:?}", other),
    }
    // No busy-list read happens when the time never resolves
    assert!(!mock.matched_async().await);
}

/// Tests that only the first booking of a turn writes to the calendar
#[tokio::test]
async fn it_books_at_most_once_per_turn() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/book")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "booked",
                "event_link": "https://calendar.google.com/event?eid=xyz"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = BookingTool::new(calendar, TZ, BookingGuard::new());
    let args = BookingArgs {
        title: "Sync".to_string(),
        start_time: "2025-07-10T16:00:00+05:30".to_string(),
        end_time: None,
    };

    let first = tool.book(&args).await;
    match first {
        ToolOutcome::Success(text) => {
            assert!(text.contains("Meeting 'Sync' booked"), "text: {}", text);
            assert!(text.contains("[Open event]("), "text: {}", text);
        }
        other => panic!("expected success, got {:?}", other),
    }

    let second = tool.book(&args).await;
    match second {
        ToolOutcome::Refused(text) => {
            assert!(text.contains("Booking already completed"), "text: {}", text);
        }
        other => panic!("expected refusal, got {:?}", other),
    }

    // Exactly one write reached the calendar
    mock.assert_async().await;
}

/// Tests that a booking without an end time sends a one hour slot
#[tokio::test]
async fn it_books_a_one_hour_slot_by_default() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/book")
        .match_body(Matcher::PartialJson(json!({
            "summary": "Sync",
            "start_time": "2025-07-10T10:30:00+00:00",
            "end_time": "2025-07-10T11:30:00+00:00"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "booked", "event_link": null}).to_string())
        .create_async()
        .await;

    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = BookingTool::new(calendar, TZ, BookingGuard::new());
    let args = BookingArgs {
        title: "Sync".to_string(),
        start_time: "2025-07-10T16:00:00+05:30".to_string(),
        end_time: None,
    };

    let outcome = tool.book(&args).await;
    match outcome {
        ToolOutcome::Success(text) => {
            // Times are reported in the assistant's timezone
            assert!(text.contains("from 04:00 PM to 05:00 PM"), "text: {}", text);
            assert!(text.contains("Booking complete"), "text: {}", text);
        }
        other => panic!("expected success, got {:?}", other),
    }
    mock.assert_async().await;
}

/// Tests that validation failures never claim the turn's booking
#[tokio::test]
async fn it_keeps_the_budget_after_a_validation_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/book")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "booked", "event_link": null}).to_string())
        .expect(1)
        .create_async()
        .await;

    let calendar = Arc::new(HttpCalendarApi::new(&server.url()));
    let tool = BookingTool::new(calendar, TZ, BookingGuard::new());

    let invalid = BookingArgs {
        title: String::new(),
        start_time: "2025-07-10T16:00:00+05:30".to_string(),
        end_time: None,
    };
    let outcome = tool.book(&invalid).await;
    assert!(matches!(outcome, ToolOutcome::Recoverable(_)));

    // The failed attempt did not spend the booking; a corrected call
    // still goes through.
    let valid = BookingArgs {
        title: "Sync".to_string(),
        start_time: "2025-07-10T16:00:00+05:30".to_string(),
        end_time: None,
    };
    let outcome = tool.book(&valid).await;
    assert!(matches!(outcome, ToolOutcome::Success(_)));
    mock.assert_async().await;
}
