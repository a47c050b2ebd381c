//! In-memory attendance store backing the test suites.
//!
//! Upholds the same contract as the MySQL store: the duplicate check and the
//! checkout guard both run under the write lock, so they are atomic with the
//! mutation exactly as the unique index and conditional UPDATE are.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{AttendanceRecord, AttendanceStatus};

use super::{AttendanceStore, CheckoutPatch, NewAttendanceRecord, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<u64, AttendanceRecord>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn insert(
        &self,
        record: NewAttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut records = self.records.write().unwrap();

        if records
            .values()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            return Err(StoreError::Duplicate {
                employee_id: record.employee_id,
                date: record.date,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = AttendanceRecord {
            id,
            employee_id: record.employee_id,
            employee_name: record.employee_name,
            date: record.date,
            check_in_time: Some(record.check_in_time),
            check_out_time: None,
            check_in_location: Some(record.check_in_location),
            check_out_location: None,
            total_hours: None,
            status: record.status,
            photo_data: record.photo_data,
            check_out_photo_data: None,
            device_info: record.device_info,
        };
        records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn complete_checkout(
        &self,
        id: u64,
        patch: CheckoutPatch,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut records = self.records.write().unwrap();

        let record = records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        if record.status == AttendanceStatus::CheckedOut {
            return Err(StoreError::AlreadyFinalized { id });
        }

        record.check_out_time = Some(patch.check_out_time);
        record.check_out_location = Some(patch.check_out_location);
        record.total_hours = Some(patch.total_hours);
        record.status = AttendanceStatus::CheckedOut;
        if let Some(photo) = patch.photo_data {
            record.check_out_photo_data = Some(photo);
        }

        Ok(record.clone())
    }

    async fn list_by_employee(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let records = self.records.read().unwrap();
        let mut matching: Vec<AttendanceRecord> = records
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, StoreError> {
        let records = self.records.read().unwrap();
        let mut matching: Vec<AttendanceRecord> = records
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        Ok(matching)
    }
}
