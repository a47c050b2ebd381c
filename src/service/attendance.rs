//! The attendance state machine.
//!
//! Transitions: `absent --check_in--> checked-in --check_out--> checked-out`
//! (terminal). No transition goes back to absent, none skips checked-in,
//! and re-entrant calls are rejected rather than silently merged. The store
//! is the sole authority on the one-record-per-day invariant; the lookup
//! here is advisory and the unique index has the final word.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::OfficeLocation;
use crate::error::AttendanceError;
use crate::geofence::{self, GeofenceCheck};
use crate::model::{
    AttendanceRecord, AttendanceStatus, DeviceInfo, GeoLocation, LocationInput,
};
use crate::store::{AttendanceStore, CheckoutPatch, NewAttendanceRecord, StoreError};

use super::clock::Clock;
use super::hours;

/// Check-in input. Identity fields are optional here so that the state
/// machine, not the transport, owns the missing-field rejection.
#[derive(Debug, Default)]
pub struct CheckInCommand {
    pub employee_id: Option<u64>,
    pub employee_name: Option<String>,
    pub location: Option<LocationInput>,
    pub photo_data: Option<String>,
    pub device_info: Option<DeviceInfo>,
}

#[derive(Debug, Default)]
pub struct CheckOutCommand {
    pub record_id: Option<u64>,
    pub location: Option<LocationInput>,
    pub photo_data: Option<String>,
}

/// A committed transition: the record as stored plus the geofence verdict
/// for the reported coordinate. The verdict annotates the response and the
/// log; it is not persisted and never blocks a transition.
#[derive(Debug)]
pub struct TransitionOutcome {
    pub record: AttendanceRecord,
    pub geofence: GeofenceCheck,
}

pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    office: OfficeLocation,
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        clock: Arc<dyn Clock>,
        office: OfficeLocation,
    ) -> Self {
        Self {
            store,
            clock,
            office,
        }
    }

    /// Creates today's attendance record for an employee.
    pub async fn check_in(
        &self,
        cmd: CheckInCommand,
    ) -> Result<TransitionOutcome, AttendanceError> {
        let employee_id = cmd
            .employee_id
            .filter(|id| *id != 0)
            .ok_or(AttendanceError::MissingField {
                field: "employeeId",
            })?;
        let employee_name = cmd
            .employee_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(AttendanceError::MissingField {
                field: "employeeName",
            })?;

        let today = self.clock.today();

        // Advisory: gives a clean conflict without burning an insert. The
        // unique index still catches the race where two check-ins pass this
        // lookup together.
        if self
            .store
            .find_by_employee_and_date(employee_id, today)
            .await
            .map_err(AttendanceError::Store)?
            .is_some()
        {
            return Err(AttendanceError::AlreadyCheckedIn);
        }

        let location = LocationInput::normalize(cmd.location);
        let check = self.classify_and_log(employee_id, &location, "check-in");

        if cmd.photo_data.is_none() {
            warn!(employee_id, "check-in without verification photo");
        }

        let record = match self
            .store
            .insert(NewAttendanceRecord {
                employee_id,
                employee_name,
                date: today,
                check_in_time: self.clock.now(),
                check_in_location: location,
                status: AttendanceStatus::CheckedIn,
                photo_data: cmd.photo_data,
                device_info: cmd.device_info,
            })
            .await
        {
            Ok(record) => record,
            Err(StoreError::Duplicate { .. }) => return Err(AttendanceError::AlreadyCheckedIn),
            Err(e) => return Err(AttendanceError::Store(e)),
        };

        info!(employee_id, record_id = record.id, date = %record.date, "checked in");
        Ok(TransitionOutcome {
            record,
            geofence: check,
        })
    }

    /// Finalizes a record: computes the worked duration and moves it to the
    /// terminal checked-out state.
    pub async fn check_out(
        &self,
        cmd: CheckOutCommand,
    ) -> Result<TransitionOutcome, AttendanceError> {
        let record_id = cmd
            .record_id
            .filter(|id| *id != 0)
            .ok_or(AttendanceError::MissingField { field: "recordId" })?;

        let record = self
            .store
            .find_by_id(record_id)
            .await
            .map_err(AttendanceError::Store)?
            .ok_or(AttendanceError::RecordNotFound { id: record_id })?;

        if record.status == AttendanceStatus::CheckedOut {
            return Err(AttendanceError::AlreadyCheckedOut);
        }

        let now = self.clock.now();
        // A record without a check-in time is unreachable through the normal
        // lifecycle; count it as zero elapsed rather than failing checkout.
        let total_hours = match record.check_in_time {
            Some(check_in) => hours::round2(hours::elapsed_hours(check_in, now)),
            None => {
                warn!(record_id, "checkout of record without check-in time");
                0.0
            }
        };

        let location = LocationInput::normalize(cmd.location);
        let check = self.classify_and_log(record.employee_id, &location, "check-out");

        let updated = match self
            .store
            .complete_checkout(
                record_id,
                CheckoutPatch {
                    check_out_time: now,
                    check_out_location: location,
                    total_hours,
                    photo_data: cmd.photo_data,
                },
            )
            .await
        {
            Ok(updated) => updated,
            Err(StoreError::NotFound { id }) => {
                return Err(AttendanceError::RecordNotFound { id });
            }
            Err(StoreError::AlreadyFinalized { .. }) => {
                return Err(AttendanceError::AlreadyCheckedOut);
            }
            Err(e) => return Err(AttendanceError::Store(e)),
        };

        info!(
            employee_id = updated.employee_id,
            record_id,
            total_hours,
            "checked out"
        );
        Ok(TransitionOutcome {
            record: updated,
            geofence: check,
        })
    }

    /// Geofence verdict for a raw coordinate, for callers that only want the
    /// classification.
    pub fn classify(&self, latitude: f64, longitude: f64) -> GeofenceCheck {
        geofence::classify(&self.office, latitude, longitude)
    }

    pub async fn today_record(
        &self,
        employee_id: u64,
    ) -> Result<Option<AttendanceRecord>, AttendanceError> {
        self.store
            .find_by_employee_and_date(employee_id, self.clock.today())
            .await
            .map_err(AttendanceError::Store)
    }

    pub async fn records_for_today(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        self.records_for_date(self.clock.today()).await
    }

    pub async fn records_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        self.store
            .list_by_date(date)
            .await
            .map_err(AttendanceError::Store)
    }

    pub async fn employee_history(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        self.store
            .list_by_employee(employee_id, limit)
            .await
            .map_err(AttendanceError::Store)
    }

    fn classify_and_log(
        &self,
        employee_id: u64,
        location: &GeoLocation,
        transition: &str,
    ) -> GeofenceCheck {
        let check = geofence::classify(&self.office, location.latitude, location.longitude);
        info!(
            employee_id,
            transition,
            within_geofence = check.is_within_geofence,
            distance_m = check.distance_from_office,
            "geofence classified"
        );
        check
    }
}
