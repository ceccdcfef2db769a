//! Integration tests for the calendar events and booking API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mockito::Matcher;
    use serde_json::json;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, test_app, test_config};

    const UNREACHABLE: &str = "http://127.0.0.1:1";

    /// Tests that upcoming events come back with their times and that
    /// all-day entries are dropped
    #[tokio::test]
    async fn it_lists_upcoming_events() {
        let mut gcal = mockito::Server::new_async().await;
        let mock = gcal
            .mock("GET", "/calendars/primary/events")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
                Matcher::UrlEncoded("maxResults".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "items": [
                        {
                            "id": "evt-1",
                            "summary": "Standup",
                            "start": {"dateTime": "2025-07-10T15:00:00+05:30"},
                            "end": {"dateTime": "2025-07-10T16:00:00+05:30"},
                            "htmlLink": "https://calendar.google.com/event?eid=abc"
                        },
                        {
                            "id": "evt-2",
                            "summary": "Holiday",
                            "start": {"date": "2025-07-11"},
                            "end": {"date": "2025-07-12"}
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = test_app(test_config(UNREACHABLE, UNREACHABLE, &gcal.url()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Standup"));
        assert!(body.contains("2025-07-10T15:00:00+05:30"));
        // The all-day entry has no concrete times to check against
        assert!(!body.contains("Holiday"));
        mock.assert_async().await;
    }

    /// Tests that a missing summary falls back to a placeholder
    #[tokio::test]
    async fn it_defaults_the_event_summary() {
        let mut gcal = mockito::Server::new_async().await;
        let _mock = gcal
            .mock("GET", "/calendars/primary/events")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "items": [{
                        "id": "evt-1",
                        "start": {"dateTime": "2025-07-10T15:00:00+05:30"},
                        "end": {"dateTime": "2025-07-10T16:00:00+05:30"}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = test_app(test_config(UNREACHABLE, UNREACHABLE, &gcal.url()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("No title"));
    }

    /// Tests that booking without a start time is answered in-band,
    /// not as a server fault
    #[tokio::test]
    async fn it_requires_a_start_time_to_book() {
        let app = test_app(test_config(UNREACHABLE, UNREACHABLE, UNREACHABLE));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/book")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"summary": "Sync"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Missing start_time in request"));
    }

    /// Tests that an unparseable start time is rejected in-band
    #[tokio::test]
    async fn it_rejects_an_invalid_start_time() {
        let app = test_app(test_config(UNREACHABLE, UNREACHABLE, UNREACHABLE));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/book")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"summary": "Sync", "start_time": "next tuesday"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Invalid start_time"));
    }

    /// Tests that a booking without an end time gets a one hour slot
    /// and that the defaults land in the provider payload
    #[tokio::test]
    async fn it_books_a_default_one_hour_slot() {
        let mut gcal = mockito::Server::new_async().await;
        let mock = gcal
            .mock("POST", "/calendars/primary/events")
            .match_body(Matcher::PartialJson(json!({
                "summary": "Sync",
                "start": {"dateTime": "2025-07-10T10:30:00+00:00", "timeZone": "Asia/Kolkata"},
                "end": {"dateTime": "2025-07-10T11:30:00+00:00", "timeZone": "Asia/Kolkata"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "evt-9",
                    "summary": "Sync",
                    "htmlLink": "https://calendar.google.com/event?eid=xyz"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = test_app(test_config(UNREACHABLE, UNREACHABLE, &gcal.url()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/book")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "summary": "Sync",
                            "start_time": "2025-07-10T16:00:00+05:30"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"status\":\"booked\""));
        assert!(body.contains("https://calendar.google.com/event?eid=xyz"));
        mock.assert_async().await;
    }

    /// Tests that a missing summary books as an untitled event
    #[tokio::test]
    async fn it_defaults_the_booking_summary() {
        let mut gcal = mockito::Server::new_async().await;
        let mock = gcal
            .mock("POST", "/calendars/primary/events")
            .match_body(Matcher::PartialJson(json!({"summary": "Untitled Event"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": "evt-10"}).to_string())
            .create_async()
            .await;

        let app = test_app(test_config(UNREACHABLE, UNREACHABLE, &gcal.url()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/book")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"start_time": "2025-07-10T16:00:00+05:30"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"status\":\"booked\""));
        mock.assert_async().await;
    }
}
