//! Booking eligibility and the book/release workflows.
//!
//! Each operation runs in one store transaction that touches the employee
//! document before the seat document. Either both documents change or
//! neither does.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{info, warn};

use seatbook_core::config::{CooldownPolicy, SeatingConfig};
use seatbook_core::error::ErrorKind;
use seatbook_core::result::AppResult;
use seatbook_core::types::{EmployeeId, SeatId};
use seatbook_database::{DocumentStore, Filter, Update};
use seatbook_entity::EMPLOYEES_COLLECTION;
use seatbook_entity::employee::EmployeeSummary;
use seatbook_entity::seat::Seat;

use super::outcome::{Booking, Release};
use super::retry::with_retries;
use crate::employee::EmployeeDirectory;
use crate::error::ReservationError;
use crate::fields::{employee as field, timestamp};
use crate::seat::SeatRegistry;

/// Applies booking policy across the seat pool and employee records.
#[derive(Clone)]
pub struct ReservationCoordinator {
    store: Arc<dyn DocumentStore>,
    registry: SeatRegistry,
    directory: EmployeeDirectory,
    cooldown_window: Duration,
    cooldown_policy: CooldownPolicy,
    max_retries: u32,
}

impl std::fmt::Debug for ReservationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationCoordinator")
            .field("backend", &self.store.backend_name())
            .field("cooldown_window", &self.cooldown_window)
            .field("cooldown_policy", &self.cooldown_policy)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ReservationCoordinator {
    /// Create a coordinator from the seating settings.
    pub fn new(store: Arc<dyn DocumentStore>, config: &SeatingConfig) -> Self {
        let cooldown_window = config.cooldown_window();
        Self {
            registry: SeatRegistry::new(Arc::clone(&store)),
            directory: EmployeeDirectory::new(Arc::clone(&store), cooldown_window),
            store,
            cooldown_window,
            cooldown_policy: config.cooldown_policy,
            max_retries: config.max_transaction_retries,
        }
    }

    /// The seat registry.
    pub fn registry(&self) -> &SeatRegistry {
        &self.registry
    }

    /// The employee directory.
    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    /// Every seat, ordered by id.
    pub async fn list_seats(&self) -> AppResult<Vec<Seat>> {
        self.registry.list().await
    }

    /// Profile and booking state for an employee.
    pub async fn get_profile(
        &self,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> AppResult<EmployeeSummary> {
        self.directory.get_profile(employee_id, now).await
    }

    /// Book `seat_id` for `employee_id` at `now`.
    ///
    /// Rejections are checked in order: an active seat, then the cooldown,
    /// then seat availability.
    pub async fn book_seat(
        &self,
        employee_id: &EmployeeId,
        seat_id: SeatId,
        now: DateTime<Utc>,
    ) -> Result<Booking, ReservationError> {
        with_retries("book_seat", self.max_retries, || {
            self.try_book(employee_id, seat_id, now)
        })
        .await
    }

    /// Release `seat_id` held by `employee_id` and refund its price.
    pub async fn release_seat(
        &self,
        employee_id: &EmployeeId,
        seat_id: SeatId,
    ) -> Result<Release, ReservationError> {
        with_retries("release_seat", self.max_retries, || {
            self.try_release(employee_id, seat_id)
        })
        .await
    }

    async fn try_book(
        &self,
        employee_id: &EmployeeId,
        seat_id: SeatId,
        now: DateTime<Utc>,
    ) -> Result<Booking, ReservationError> {
        let tx = self.store.begin().await?;

        if let Some(employee) = EmployeeDirectory::find_in(tx.as_ref(), employee_id).await? {
            if let Some(active) = employee.active_seat {
                return Err(ReservationError::AlreadyBooked {
                    employee_id: employee_id.clone(),
                    seat_id: active,
                });
            }
            if let Some(remaining) = employee.cooldown_remaining(now, self.cooldown_window) {
                return Err(ReservationError::CooldownActive { remaining });
            }
        }

        let seat = match SeatRegistry::try_occupy_in(tx.as_ref(), seat_id, employee_id, now).await
        {
            Ok(seat) => seat,
            Err(e) if e.kind == ErrorKind::Conflict => {
                return Err(ReservationError::SeatUnavailable(seat_id));
            }
            Err(e) => return Err(e.into()),
        };

        let update = Update::new()
            .add_to_set(field::BOOKED_SEATS, seat_id.value())
            .set(field::ACTIVE_SEAT, seat_id.value())
            .set(field::LAST_BOOKING_AT, timestamp(now))
            .inc(field::TOKENS_SPENT, seat.price)
            .set_on_insert(field::CREATED_AT, timestamp(now))
            .set_on_insert(field::LAST_SEEN_AT, timestamp(now));
        tx.update_one(
            EMPLOYEES_COLLECTION,
            &Filter::by_id(employee_id.as_str()),
            &update,
            true,
        )
        .await?;

        tx.commit().await?;

        info!(%employee_id, %seat_id, price = seat.price, "Seat booked");
        Ok(Booking {
            tokens_charged: seat.price,
            employee_id: employee_id.clone(),
            seat,
        })
    }

    async fn try_release(
        &self,
        employee_id: &EmployeeId,
        seat_id: SeatId,
    ) -> Result<Release, ReservationError> {
        let tx = self.store.begin().await?;

        let employee = EmployeeDirectory::find_in(tx.as_ref(), employee_id).await?;

        let seat = match SeatRegistry::release_in(tx.as_ref(), seat_id, employee_id).await {
            Ok(seat) => seat,
            Err(e) if e.kind == ErrorKind::NotFound => {
                return Err(ReservationError::NotFound(seat_id));
            }
            Err(e) if e.kind == ErrorKind::Authorization => {
                return Err(ReservationError::Forbidden {
                    seat_id,
                    employee_id: employee_id.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        match employee {
            Some(employee) => {
                let mut update = Update::new()
                    .pull(field::BOOKED_SEATS, seat_id.value())
                    .inc(field::TOKENS_SPENT, -seat.price);
                if employee.active_seat == Some(seat_id) {
                    update = update.set(field::ACTIVE_SEAT, Value::Null);
                } else {
                    warn!(
                        %employee_id,
                        %seat_id,
                        active_seat = ?employee.active_seat,
                        "Released seat is not the employee's active seat"
                    );
                }
                if self.cooldown_policy == CooldownPolicy::ResetOnRelease {
                    update = update.set(field::LAST_BOOKING_AT, Value::Null);
                }
                tx.update_one(
                    EMPLOYEES_COLLECTION,
                    &Filter::by_id(employee_id.as_str()),
                    &update,
                    false,
                )
                .await?;
            }
            None => {
                warn!(%employee_id, %seat_id, "Releasing seat for employee with no record");
            }
        }

        tx.commit().await?;

        info!(%employee_id, %seat_id, refund = seat.price, "Seat released");
        Ok(Release {
            seat_id,
            tokens_refunded: seat.price,
        })
    }
}
