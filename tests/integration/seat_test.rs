//! Integration tests for the seat pool.

mod helpers;

use http::StatusCode;

use seatbook_core::config::CooldownPolicy;

#[tokio::test]
async fn test_lists_seeded_seats_in_order() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let response = app.request("GET", "/api/seats", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let seats = response.data().as_array().expect("seat array");
    assert_eq!(seats.len(), 10);
    for (i, seat) in seats.iter().enumerate() {
        assert_eq!(seat["id"], i as u64 + 1);
        assert_eq!(seat["status"], "available");
        assert_eq!(seat["price"], 5);
        assert_eq!(seat["occupant"], serde_json::Value::Null);
    }
}

#[tokio::test]
async fn test_seeding_twice_keeps_existing_seats() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    assert_eq!(app.book(&token, 4).await.status, StatusCode::OK);

    let created = app
        .state
        .coordinator
        .registry()
        .initialize(10, 5)
        .await
        .expect("reseed");
    assert_eq!(created, 0);

    let response = app.request("GET", "/api/seats", None, Some(&token)).await;
    let seat = &response.data()[3];
    assert_eq!(seat["status"], "occupied");
    assert_eq!(seat["occupant"], "alice");
}

#[tokio::test]
async fn test_booking_shows_up_in_listing() {
    let app = helpers::TestApp::with_seating(helpers::seating(3, CooldownPolicy::ResetOnRelease))
        .await;
    let token = app.token("bob");

    assert_eq!(app.book(&token, 2).await.status, StatusCode::OK);

    let response = app.request("GET", "/api/seats", None, Some(&token)).await;
    let seats = response.data().as_array().expect("seat array");
    assert_eq!(seats.len(), 3);
    assert_eq!(seats[1]["status"], "occupied");
    assert_eq!(seats[1]["occupant"], "bob");
    assert!(seats[1]["booking_time"].is_string());
    assert_eq!(seats[0]["status"], "available");
    assert_eq!(seats[2]["status"], "available");
}
