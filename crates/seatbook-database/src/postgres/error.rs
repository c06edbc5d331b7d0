//! Classification of sqlx errors.

use seatbook_core::error::{AppError, ErrorKind};

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Check whether the error is a primary key collision.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

/// Check whether an application error was caused by a primary key collision.
pub(crate) fn is_key_collision(err: &AppError) -> bool {
    err.source
        .as_deref()
        .and_then(|source| source.downcast_ref::<sqlx::Error>())
        .is_some_and(is_unique_violation)
}

/// Map a sqlx error onto the application error kinds.
///
/// Aborts caused by concurrent writers become `TransactionConflict` so the
/// caller can retry; connectivity failures become `StoreUnavailable`.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match (sqlstate(&err).as_deref(), &err) {
        (Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | UNIQUE_VIOLATION), _) => {
            ErrorKind::TransactionConflict
        }
        (
            _,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed,
        ) => ErrorKind::StoreUnavailable,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}
