//! Employee domain entities.

pub mod model;
pub mod summary;

pub use model::{Employee, EmployeeProfile};
pub use summary::EmployeeSummary;
