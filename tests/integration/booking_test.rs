//! Integration tests for booking and releasing seats.

mod helpers;

use std::sync::Arc;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_book_and_release_round_trip() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");

    let booked = app.book(&alice, 7).await;
    assert_eq!(booked.status, StatusCode::OK);
    assert_eq!(booked.data()["seat"]["id"], 7);
    assert_eq!(booked.data()["seat"]["status"], "occupied");
    assert_eq!(booked.data()["seat"]["occupant"], "alice");
    assert_eq!(booked.data()["tokens_charged"], 5);

    let profile = app.me(&alice).await;
    assert_eq!(profile.data()["active_seat"], 7);
    assert_eq!(profile.data()["booked_seats"], json!([7]));
    assert_eq!(profile.data()["tokens_spent"], 5);

    let released = app.release(&alice, 7).await;
    assert_eq!(released.status, StatusCode::OK);
    assert_eq!(released.data()["seat_id"], 7);
    assert_eq!(released.data()["tokens_refunded"], 5);

    let profile = app.me(&alice).await;
    assert_eq!(profile.data()["active_seat"], serde_json::Value::Null);
    assert_eq!(profile.data()["booked_seats"], json!([]));
    assert_eq!(profile.data()["tokens_spent"], 0);
    assert_eq!(profile.data()["cooldown_remaining_seconds"], 0);

    // Reset-on-release: the next booking is not gated.
    assert_eq!(app.book(&alice, 8).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_second_booking_is_refused_while_holding_a_seat() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    assert_eq!(app.book(&alice, 7).await.status, StatusCode::OK);

    let response = app.book(&alice, 8).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "ALREADY_BOOKED");
    assert_eq!(response.body["details"]["active_seat"], 7);

    let profile = app.me(&alice).await;
    assert_eq!(profile.data()["tokens_spent"], 5);
}

#[tokio::test]
async fn test_occupied_seat_is_unavailable_to_others() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");
    assert_eq!(app.book(&alice, 7).await.status, StatusCode::OK);

    let response = app.book(&bob, 7).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "SEAT_UNAVAILABLE");
    assert_eq!(response.body["details"]["seat_id"], 7);

    let profile = app.me(&bob).await;
    assert_eq!(profile.data()["active_seat"], serde_json::Value::Null);
    assert_eq!(profile.data()["tokens_spent"], 0);
}

#[tokio::test]
async fn test_seat_outside_pool_is_unavailable() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");

    let response = app.book(&alice, 11).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "SEAT_UNAVAILABLE");
}

#[tokio::test]
async fn test_seat_zero_fails_validation() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");

    let response = app.book(&alice, 0).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_releasing_someone_elses_seat_is_forbidden() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");
    assert_eq!(app.book(&alice, 7).await.status, StatusCode::OK);

    let response = app.release(&bob, 7).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "AUTHORIZATION");

    let seats = app.request("GET", "/api/seats", None, Some(&alice)).await;
    assert_eq!(seats.data()[6]["occupant"], "alice");
    assert_eq!(app.me(&alice).await.data()["tokens_spent"], 5);
}

#[tokio::test]
async fn test_releasing_a_free_seat_is_forbidden() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");

    let response = app.release(&alice, 3).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_releasing_unknown_seat_is_not_found() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");

    let response = app.release(&alice, 999).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_carry_over_cooldown_blocks_rebooking() {
    let app = helpers::TestApp::carry_over().await;
    let alice = app.token("alice");
    assert_eq!(app.book(&alice, 7).await.status, StatusCode::OK);
    assert_eq!(app.release(&alice, 7).await.status, StatusCode::OK);

    let response = app.book(&alice, 8).await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error_code(), "COOLDOWN_ACTIVE");
    let remaining = response.body["details"]["remaining_seconds"]
        .as_i64()
        .expect("remaining_seconds");
    assert!(remaining > 44 * 60 && remaining <= 45 * 60, "remaining = {remaining}");

    let retry_after: i64 = response
        .headers
        .get(http::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("Retry-After header");
    assert_eq!(retry_after, remaining);

    let profile = app.me(&alice).await;
    assert!(profile.data()["cooldown_remaining_seconds"].as_i64().unwrap_or(0) > 0);
}

#[tokio::test]
async fn test_concurrent_bookings_of_one_seat_have_one_winner() {
    let app = Arc::new(helpers::TestApp::new().await);

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            let token = app.token(&format!("employee-{i}"));
            app.book(&token, 5).await.status
        }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.expect("task panicked"));
    }

    let winners = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    assert_eq!(winners, 1, "statuses: {statuses:?}");
    assert!(
        statuses
            .iter()
            .all(|s| *s == StatusCode::OK || *s == StatusCode::CONFLICT)
    );
}

#[tokio::test]
async fn test_concurrent_bookings_by_one_employee_take_one_seat() {
    let app = Arc::new(helpers::TestApp::new().await);
    let token = app.token("alice");
    // Register before racing so every request sees the same record.
    assert_eq!(app.me(&token).await.status, StatusCode::OK);

    let mut handles = Vec::new();
    for seat in 1..=6u32 {
        let app = Arc::clone(&app);
        let token = token.clone();
        handles.push(tokio::spawn(async move { app.book(&token, seat).await.status }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.expect("task panicked") == StatusCode::OK {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    let profile = app.me(&token).await;
    assert_eq!(profile.data()["tokens_spent"], 5);

    let seats = app.request("GET", "/api/seats", None, Some(&token)).await;
    let occupied = seats
        .data()
        .as_array()
        .expect("seat array")
        .iter()
        .filter(|s| s["status"] == "occupied")
        .count();
    assert_eq!(occupied, 1);
}
