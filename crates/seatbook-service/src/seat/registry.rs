//! Source of truth for seat existence and occupancy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;
use seatbook_core::types::{EmployeeId, SeatId};
use seatbook_database::{DocumentOps, DocumentStore, Filter, Update, from_document, to_document};
use seatbook_entity::SEATS_COLLECTION;
use seatbook_entity::seat::{Seat, SeatStatus};

use crate::fields::{seat as field, timestamp};

/// Seat pool access.
///
/// Every operation has an `_in` form that runs against a caller-supplied
/// transaction, so seat changes can commit together with employee changes.
#[derive(Clone)]
pub struct SeatRegistry {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for SeatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatRegistry")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl SeatRegistry {
    /// Create a registry over a store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create seats `1..=count` if the pool is empty.
    ///
    /// Safe to call on every start: an existing pool is left untouched.
    /// Returns how many seats were created.
    pub async fn initialize(&self, count: u32, unit_price: i64) -> AppResult<u64> {
        let existing = self
            .store
            .count_documents(SEATS_COLLECTION, &Filter::all())
            .await?;
        if existing > 0 {
            info!(existing, "Seat pool already initialized");
            return Ok(0);
        }

        let seats = (1..=count)
            .map(|id| to_document(&Seat::available(SeatId(id), unit_price)))
            .collect::<AppResult<Vec<_>>>()?;

        match self.store.insert_many(SEATS_COLLECTION, seats).await {
            Ok(created) => {
                info!(created, unit_price, "Seat pool initialized");
                Ok(created)
            }
            Err(e) if e.kind == ErrorKind::Conflict => {
                info!("Seat pool initialized concurrently by another instance");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch one seat.
    pub async fn get(&self, seat_id: SeatId) -> AppResult<Seat> {
        Self::get_in(self.store.as_ref(), seat_id).await
    }

    /// Every seat, ordered by id.
    pub async fn list(&self) -> AppResult<Vec<Seat>> {
        Self::list_in(self.store.as_ref()).await
    }

    /// Atomically move an available seat to occupied.
    pub async fn try_occupy(
        &self,
        seat_id: SeatId,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> AppResult<Seat> {
        Self::try_occupy_in(self.store.as_ref(), seat_id, employee_id, now).await
    }

    /// Free a seat held by `employee_id`. Returns the seat as it was.
    pub async fn release(&self, seat_id: SeatId, employee_id: &EmployeeId) -> AppResult<Seat> {
        Self::release_in(self.store.as_ref(), seat_id, employee_id).await
    }

    /// [`get`](Self::get) against `ops`.
    pub async fn get_in<O>(ops: &O, seat_id: SeatId) -> AppResult<Seat>
    where
        O: DocumentOps + ?Sized,
    {
        let doc = ops
            .find_one(SEATS_COLLECTION, &Filter::by_id(seat_id.value()))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))?;
        from_document(doc)
    }

    /// [`list`](Self::list) against `ops`.
    pub async fn list_in<O>(ops: &O) -> AppResult<Vec<Seat>>
    where
        O: DocumentOps + ?Sized,
    {
        ops.find(SEATS_COLLECTION, &Filter::all())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// [`try_occupy`](Self::try_occupy) against `ops`.
    ///
    /// Fails with `Conflict` when the seat is missing or not available.
    pub async fn try_occupy_in<O>(
        ops: &O,
        seat_id: SeatId,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> AppResult<Seat>
    where
        O: DocumentOps + ?Sized,
    {
        let filter = Filter::by_id(seat_id.value()).eq(field::STATUS, SeatStatus::Available.as_str());
        let update = Update::new()
            .set(field::STATUS, SeatStatus::Occupied.as_str())
            .set(field::OCCUPANT, employee_id.as_str())
            .set(field::BOOKING_TIME, timestamp(now));

        match ops.find_one_and_update(SEATS_COLLECTION, &filter, &update).await? {
            Some(doc) => {
                debug!(%seat_id, %employee_id, "Seat occupied");
                from_document(doc)
            }
            None => Err(AppError::conflict(format!(
                "Seat {seat_id} does not exist or is not available"
            ))),
        }
    }

    /// [`release`](Self::release) against `ops`.
    ///
    /// Fails with `NotFound` for an unknown seat and `Authorization` when
    /// the seat is not held by `employee_id`.
    pub async fn release_in<O>(ops: &O, seat_id: SeatId, employee_id: &EmployeeId) -> AppResult<Seat>
    where
        O: DocumentOps + ?Sized,
    {
        let seat = Self::get_in(ops, seat_id).await?;
        if !seat.is_occupied_by(employee_id) {
            return Err(AppError::authorization(format!(
                "Seat {seat_id} is not booked by {employee_id}"
            )));
        }

        let filter = Filter::by_id(seat_id.value())
            .eq(field::STATUS, SeatStatus::Occupied.as_str())
            .eq(field::OCCUPANT, employee_id.as_str());
        let update = Update::new()
            .set(field::STATUS, SeatStatus::Available.as_str())
            .set(field::OCCUPANT, Value::Null)
            .set(field::BOOKING_TIME, Value::Null);

        match ops.find_one_and_update(SEATS_COLLECTION, &filter, &update).await? {
            Some(_) => {
                debug!(%seat_id, %employee_id, "Seat released");
                Ok(seat)
            }
            None => Err(AppError::authorization(format!(
                "Seat {seat_id} is not booked by {employee_id}"
            ))),
        }
    }
}
