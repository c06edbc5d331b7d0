//! Reservation flows against PostgreSQL.
//!
//! Skipped unless `DATABASE_URL` points at a scratch database:
//! `DATABASE_URL=postgres://... cargo test --test postgres_test -- --ignored`

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use seatbook_auth::Identity;
use seatbook_core::config::{DatabaseConfig, SeatingConfig, StoreBackend};
use seatbook_core::types::{EmployeeId, SeatId};
use seatbook_database::migration::run_migrations;
use seatbook_database::{DatabasePool, PostgresStore};
use seatbook_service::{ReservationCoordinator, ReservationError};

/// Tests share the `seats` and `employees` collections.
static DATABASE: Mutex<()> = Mutex::const_new(());

/// A coordinator over emptied collections with ten seats priced at 5.
async fn coordinator() -> Option<ReservationCoordinator> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let config = DatabaseConfig {
        backend: StoreBackend::Postgres,
        url,
        ..Default::default()
    };
    let pool = DatabasePool::connect(&config).await.expect("connect").into_pool();
    run_migrations(&pool).await.expect("migrate");
    sqlx::query("DELETE FROM documents WHERE collection IN ('seats', 'employees')")
        .execute(&pool)
        .await
        .expect("clear collections");

    let coordinator =
        ReservationCoordinator::new(Arc::new(PostgresStore::new(pool)), &SeatingConfig::default());
    coordinator.registry().initialize(10, 5).await.expect("seed seats");
    Some(coordinator)
}

fn id(value: &str) -> EmployeeId {
    EmployeeId::new(value).unwrap()
}

fn identity(value: &str) -> Identity {
    Identity {
        employee_id: id(value),
        name: value.to_string(),
        email: Some(format!("{value}@example.com")),
        department: None,
        manager: None,
    }
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn test_initialize_is_idempotent() {
    let _guard = DATABASE.lock().await;
    let Some(coordinator) = coordinator().await else { return };

    assert_eq!(coordinator.registry().initialize(10, 5).await.unwrap(), 0);

    let alice = id("alice");
    coordinator.book_seat(&alice, SeatId(4), Utc::now()).await.unwrap();
    assert_eq!(coordinator.registry().initialize(10, 5).await.unwrap(), 0);

    let seats = coordinator.list_seats().await.unwrap();
    assert_eq!(seats.len(), 10);
    assert!(seats[3].is_occupied_by(&alice));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires PostgreSQL running
async fn test_concurrent_first_requests_register_once() {
    let _guard = DATABASE.lock().await;
    let Some(coordinator) = coordinator().await else { return };
    let coordinator = Arc::new(coordinator);
    let now = Utc::now();

    let attempts = (0..8).map(|_| {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.directory().register(&identity("newcomer"), now).await })
    });
    for result in futures::future::join_all(attempts).await {
        result.unwrap().unwrap();
    }

    let employee = coordinator.directory().get(&id("newcomer")).await.unwrap();
    assert_eq!(employee.tokens_spent, 0);
    assert!(employee.booked_seats.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires PostgreSQL running
async fn test_concurrent_bookings_of_one_seat_have_one_winner() {
    let _guard = DATABASE.lock().await;
    let Some(coordinator) = coordinator().await else { return };
    let coordinator = Arc::new(coordinator);
    let now = Utc::now();

    let attempts = (0..10).map(|i| {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .book_seat(&id(&format!("employee-{i}")), SeatId(1), now)
                .await
        })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, ReservationError::SeatUnavailable(SeatId(1))) || e.is_transient())
    );

    let seat = coordinator.registry().get(SeatId(1)).await.unwrap();
    assert!(seat.is_consistent());
    let winner = seat.occupant.clone().unwrap();
    let employee = coordinator.directory().get(&winner).await.unwrap();
    assert_eq!(employee.active_seat, Some(SeatId(1)));
    assert_eq!(employee.tokens_spent, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires PostgreSQL running
async fn test_concurrent_bookings_by_one_employee_keep_one_active_seat() {
    let _guard = DATABASE.lock().await;
    let Some(coordinator) = coordinator().await else { return };
    let coordinator = Arc::new(coordinator);
    let now = Utc::now();
    coordinator.directory().register(&identity("kim"), now).await.unwrap();

    let attempts = (1..=6).map(|seat| {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.book_seat(&id("kim"), SeatId(seat), now).await })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, ReservationError::AlreadyBooked { .. }) || e.is_transient())
    );

    let kim = id("kim");
    let employee = coordinator.directory().get(&kim).await.unwrap();
    assert_eq!(employee.tokens_spent, 5);
    assert_eq!(employee.booked_seats.len(), 1);
    let occupied: Vec<_> = coordinator
        .list_seats()
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.is_occupied_by(&kim))
        .collect();
    assert_eq!(occupied.len(), 1);
    assert_eq!(employee.active_seat, Some(occupied[0].id));
}
