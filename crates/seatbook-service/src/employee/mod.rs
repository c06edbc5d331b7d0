//! Employee records.

pub mod directory;

pub use directory::EmployeeDirectory;
