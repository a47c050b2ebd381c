use crate::api::attendance::{
    AttendanceResponse, CheckInRequest, CheckOutRequest, RecordListResponse, TodayRecordResponse,
};
use crate::geofence::GeofenceCheck;
use crate::model::{AttendanceRecord, AttendanceStatus, DeviceInfo, GeoLocation, LocationInput};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

This API powers an employee attendance tracker: one attendance record per
employee per calendar day, driven through a strict state machine.

### Key Features
- **Check-in / Check-out**
  - One record per employee per day, enforced by the storage layer
  - `absent → checked-in → checked-out` with no way back and no skipping
- **Geofence Validation**
  - Haversine distance from the office with an inclusive radius check
  - Location capture is best-effort; a missing GPS fix never blocks a check-in
- **Photo Verification**
  - Base64 photos captured on both transitions; best-effort, never required
- **Time Accounting**
  - Worked hours computed at check-out, rounded to 2 decimals

### Response Format
- JSON-based RESTful responses with a `success` flag
- Conflicts (double check-in/out) surface as 400, unknown records as 404

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today_records,
        crate::api::attendance::records_by_date,
        crate::api::attendance::employee_records,
        crate::api::attendance::employee_today,
        crate::api::attendance::geofence_check
    ),
    components(
        schemas(
            CheckInRequest,
            CheckOutRequest,
            AttendanceResponse,
            RecordListResponse,
            TodayRecordResponse,
            AttendanceRecord,
            AttendanceStatus,
            GeoLocation,
            LocationInput,
            DeviceInfo,
            GeofenceCheck
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance check-in/check-out and geofence APIs"),
    )
)]
pub struct ApiDoc;
