//! Route definitions for the Seatbook HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with every route, bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(employee_routes())
        .merge(seat_routes())
        .merge(booking_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Health: liveness and store status
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// The caller's own record
fn employee_routes() -> Router<AppState> {
    Router::new().route("/me", get(handlers::employee::me))
}

/// Seat pool
fn seat_routes() -> Router<AppState> {
    Router::new().route("/seats", get(handlers::seat::list_seats))
}

/// Book and release
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/book", post(handlers::booking::book))
        .route("/release/{seat_id}", post(handlers::booking::release))
}
