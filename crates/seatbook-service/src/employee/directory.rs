//! Employee record creation and profile reads.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;

use seatbook_auth::Identity;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::EmployeeId;
use seatbook_database::{DocumentOps, DocumentStore, Filter, Update, from_document};
use seatbook_entity::EMPLOYEES_COLLECTION;
use seatbook_entity::employee::{Employee, EmployeeSummary};

use crate::fields::{employee as field, timestamp};

/// Employee records keyed by identity-provider id.
#[derive(Clone)]
pub struct EmployeeDirectory {
    store: Arc<dyn DocumentStore>,
    cooldown_window: Duration,
}

impl std::fmt::Debug for EmployeeDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeDirectory")
            .field("cooldown_window", &self.cooldown_window)
            .finish()
    }
}

impl EmployeeDirectory {
    /// Create a directory over a store.
    pub fn new(store: Arc<dyn DocumentStore>, cooldown_window: Duration) -> Self {
        Self {
            store,
            cooldown_window,
        }
    }

    /// Record that `identity` was seen at `now`.
    ///
    /// Creates the record on first sight. Profile fields and booking
    /// defaults are only written on creation.
    pub async fn register(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<()> {
        let optional = |value: &Option<String>| value.clone().map_or(Value::Null, Value::String);
        let update = Update::new()
            .set(field::LAST_SEEN_AT, timestamp(now))
            .set_on_insert(field::NAME, identity.name.as_str())
            .set_on_insert(field::EMAIL, optional(&identity.email))
            .set_on_insert(field::DEPARTMENT, optional(&identity.department))
            .set_on_insert(field::MANAGER, optional(&identity.manager))
            .set_on_insert(field::ACTIVE_SEAT, Value::Null)
            .set_on_insert(field::LAST_BOOKING_AT, Value::Null)
            .set_on_insert(field::BOOKED_SEATS, Value::Array(Vec::new()))
            .set_on_insert(field::TOKENS_SPENT, 0)
            .set_on_insert(field::CREATED_AT, timestamp(now));

        let result = self
            .store
            .update_one(
                EMPLOYEES_COLLECTION,
                &Filter::by_id(identity.employee_id.as_str()),
                &update,
                true,
            )
            .await?;

        if result.upserted {
            debug!(employee_id = %identity.employee_id, "Registered new employee");
        }
        Ok(())
    }

    /// Fetch an employee record.
    pub async fn get(&self, employee_id: &EmployeeId) -> AppResult<Employee> {
        Self::find_in(self.store.as_ref(), employee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))
    }

    /// Profile and booking state, with the cooldown evaluated at `now`.
    pub async fn get_profile(
        &self,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> AppResult<EmployeeSummary> {
        let employee = self.get(employee_id).await?;
        Ok(EmployeeSummary::from_employee(
            employee,
            now,
            self.cooldown_window,
        ))
    }

    /// Look up an employee record against `ops`.
    pub async fn find_in<O>(ops: &O, employee_id: &EmployeeId) -> AppResult<Option<Employee>>
    where
        O: DocumentOps + ?Sized,
    {
        ops.find_one(EMPLOYEES_COLLECTION, &Filter::by_id(employee_id.as_str()))
            .await?
            .map(from_document)
            .transpose()
    }
}
