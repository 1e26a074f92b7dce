//! Persistence contracts. Every attendance operation is scoped to the store's
//! own notion of "today", so two app instances on different clocks still agree
//! on which row a check-in belongs to.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::model::attendance::{AttendanceEntry, AttendanceRecord};
use crate::model::employee::{Employee, EmployeeFields, EmployeeOption, NewEmployee};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Newest first. `search` matches id, names or email case-insensitively.
    async fn list_employees(&self, search: Option<&str>, limit: i64) -> AppResult<Vec<Employee>>;

    /// Ordered by first then last name.
    async fn employee_options(&self) -> AppResult<Vec<EmployeeOption>>;

    async fn find_employee(&self, employee_id: &str) -> AppResult<Option<Employee>>;

    /// Fails with `ConstraintViolation` when the id is taken.
    async fn insert_employee(&self, employee: &NewEmployee) -> AppResult<Employee>;

    /// Returns rows affected.
    async fn update_employee(&self, employee_id: &str, fields: &EmployeeFields) -> AppResult<u64>;

    /// Returns rows affected; fails with `ReferentialIntegrity` while attendance
    /// rows reference the employee.
    async fn delete_employee(&self, employee_id: &str) -> AppResult<u64>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert-if-absent-else-coalesce: creates today's row as `Present` with the
    /// current time, or keeps the existing row and its earliest check-in.
    async fn upsert_check_in(&self, employee_id: &str) -> AppResult<AttendanceRecord>;

    /// Sets the check-out time on today's row only if it is checked in and has
    /// no check-out yet. Returns rows affected.
    async fn close_check_in(&self, employee_id: &str) -> AppResult<u64>;

    /// Ensures today's row exists, then overwrites status and notes with `note`.
    async fn write_status(&self, employee_id: &str, note: Option<&str>)
    -> AppResult<AttendanceRecord>;

    /// Returns rows affected.
    async fn delete_today(&self, employee_id: &str) -> AppResult<u64>;

    async fn find_today(&self, employee_id: &str) -> AppResult<Option<AttendanceRecord>>;

    async fn list_today(&self) -> AppResult<Vec<AttendanceEntry>>;

    /// Rows dated on or after today minus `days`, newest date first.
    async fn list_since(&self, days: u32) -> AppResult<Vec<AttendanceEntry>>;
}
