//! Persistence abstraction for attendance records, keyed by (employee, date).
//!
//! The store is the sole authority on the one-record-per-day invariant: the
//! state machine's pre-check is advisory, and `insert` must fail with
//! [`StoreError::Duplicate`] when two check-ins race for the same
//! employee-day. Check-out finalization goes through a conditional update so
//! the analogous double-checkout race is closed in a single write.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::{AttendanceRecord, AttendanceStatus, DeviceInfo, GeoLocation};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlAttendanceStore;

/// What a successful check-in writes.
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub employee_id: u64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub check_in_time: DateTime<Utc>,
    pub check_in_location: GeoLocation,
    pub status: AttendanceStatus,
    pub photo_data: Option<String>,
    pub device_info: Option<DeviceInfo>,
}

/// What check-out finalization writes. Applied atomically, only while the
/// record is not yet checked out.
#[derive(Debug, Clone)]
pub struct CheckoutPatch {
    pub check_out_time: DateTime<Utc>,
    pub check_out_location: GeoLocation,
    pub total_hours: f64,
    /// Written only when present; an absent check-out photo never erases one
    /// already on the record.
    pub photo_data: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The `(employee_id, date)` uniqueness constraint fired.
    #[error("attendance record already exists for employee {employee_id} on {date}")]
    Duplicate { employee_id: u64, date: NaiveDate },

    /// No record with the given id.
    #[error("attendance record {id} not found")]
    NotFound { id: u64 },

    /// The record exists but was already checked out; the conditional update
    /// matched no row.
    #[error("attendance record {id} is already checked out")]
    AlreadyFinalized { id: u64 },

    /// Infrastructure failure (connectivity, timeout, malformed row).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// The day's record for an employee, if one exists.
    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Creates the day's record. Fails with [`StoreError::Duplicate`] when a
    /// record for this employee-day already exists, even when the caller's
    /// own existence check lost a race.
    async fn insert(&self, record: NewAttendanceRecord)
    -> Result<AttendanceRecord, StoreError>;

    /// Atomically finalizes a record: applies the patch only while the
    /// record is not already checked out. Fails with
    /// [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::AlreadyFinalized`] for a terminal record.
    async fn complete_checkout(
        &self,
        id: u64,
        patch: CheckoutPatch,
    ) -> Result<AttendanceRecord, StoreError>;

    /// An employee's records, newest day first, capped at `limit`.
    async fn list_by_employee(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// All records for a day, latest check-in first.
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, StoreError>;
}
