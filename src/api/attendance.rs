use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::AttendanceError;
use crate::geofence::GeofenceCheck;
use crate::model::{AttendanceRecord, DeviceInfo, LocationInput};
use crate::service::{AttendanceService, CheckInCommand, CheckOutCommand};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
    #[schema(example = "John Doe")]
    pub employee_name: Option<String>,
    pub location: Option<LocationInput>,
    /// Base64 verification photo. Best-effort: absence is accepted.
    pub photo_data: Option<String>,
    pub device_info: Option<DeviceInfo>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutRequest {
    #[schema(example = 42)]
    pub record_id: Option<u64>,
    pub location: Option<LocationInput>,
    /// Base64 verification photo. Best-effort: absence is accepted.
    pub photo_data: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceResponse {
    pub success: bool,
    pub record: AttendanceRecord,
    pub geofence: GeofenceCheck,
}

#[derive(Serialize, ToSchema)]
pub struct RecordListResponse {
    pub success: bool,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct TodayRecordResponse {
    pub success: bool,
    pub record: Option<AttendanceRecord>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct GeofenceQuery {
    #[schema(example = 21.1096)]
    pub latitude: f64,
    #[schema(example = 79.0598)]
    pub longitude: f64,
}

impl From<CheckInRequest> for CheckInCommand {
    fn from(req: CheckInRequest) -> Self {
        CheckInCommand {
            employee_id: req.employee_id,
            employee_name: req.employee_name,
            location: req.location,
            photo_data: req.photo_data,
            device_info: req.device_info,
        }
    }
}

impl From<CheckOutRequest> for CheckOutCommand {
    fn from(req: CheckOutRequest) -> Self {
        CheckOutCommand {
            record_id: req.record_id,
            location: req.location,
            photo_data: req.photo_data,
        }
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Checked in successfully", body = AttendanceResponse),
        (status = 400, description = "Missing field or already checked in today", body = Object, example = json!({
            "success": false,
            "error": "Already checked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    service: web::Data<AttendanceService>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let correlation_id = Uuid::new_v4();
    let request = payload.into_inner();
    info!(
        correlation_id = %correlation_id,
        employee_id = ?request.employee_id,
        has_photo = request.photo_data.is_some(),
        "check-in request received"
    );

    let outcome = service.check_in(request.into()).await?;
    Ok(HttpResponse::Created().json(AttendanceResponse {
        success: true,
        record: outcome.record,
        geofence: outcome.geofence,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceResponse),
        (status = 400, description = "Missing field or already checked out", body = Object, example = json!({
            "success": false,
            "error": "Already checked out"
        })),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    service: web::Data<AttendanceService>,
    payload: web::Json<CheckOutRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let correlation_id = Uuid::new_v4();
    let request = payload.into_inner();
    info!(
        correlation_id = %correlation_id,
        record_id = ?request.record_id,
        has_photo = request.photo_data.is_some(),
        "check-out request received"
    );

    let outcome = service.check_out(request.into()).await?;
    Ok(HttpResponse::Ok().json(AttendanceResponse {
        success: true,
        record: outcome.record,
        geofence: outcome.geofence,
    }))
}

/// All of today's records
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's records, latest check-in first", body = RecordListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn today_records(
    service: web::Data<AttendanceService>,
) -> Result<HttpResponse, AttendanceError> {
    let records = service.records_for_today().await?;
    Ok(HttpResponse::Ok().json(RecordListResponse {
        success: true,
        records,
    }))
}

/// Records for a specific date
#[utoipa::path(
    get,
    path = "/api/v1/attendance/date/{date}",
    params(("date" = String, Path, description = "Calendar day, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Records for the date", body = RecordListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn records_by_date(
    service: web::Data<AttendanceService>,
    path: web::Path<NaiveDate>,
) -> Result<HttpResponse, AttendanceError> {
    let records = service.records_for_date(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RecordListResponse {
        success: true,
        records,
    }))
}

/// An employee's attendance history
#[utoipa::path(
    get,
    path = "/api/v1/attendance/employee/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "History, newest day first, capped at 100", body = RecordListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn employee_records(
    service: web::Data<AttendanceService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AttendanceError> {
    let records = service.employee_history(path.into_inner(), 100).await?;
    Ok(HttpResponse::Ok().json(RecordListResponse {
        success: true,
        records,
    }))
}

/// Today's record for an employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/employee/{employee_id}/today",
    params(("employee_id" = u64, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Today's record, or null when absent", body = TodayRecordResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn employee_today(
    service: web::Data<AttendanceService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AttendanceError> {
    let record = service.today_record(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TodayRecordResponse {
        success: true,
        record,
    }))
}

/// Geofence classification for a coordinate
#[utoipa::path(
    get,
    path = "/api/v1/attendance/geofence",
    params(GeofenceQuery),
    responses(
        (status = 200, description = "Verdict for the coordinate", body = GeofenceCheck),
    ),
    tag = "Attendance"
)]
pub async fn geofence_check(
    service: web::Data<AttendanceService>,
    query: web::Query<GeofenceQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.classify(query.latitude, query.longitude))
}
