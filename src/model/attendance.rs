use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a daily attendance record.
///
/// `Absent` is the conceptual default for a day with no record; a record is
/// only ever created in `CheckedIn` state and finalized as `CheckedOut`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Absent,
    CheckedIn,
    CheckedOut,
}

/// A GPS fix as persisted on a record. Latitude/longitude are always present
/// (defaulted to 0/0 when capture failed); `address` comes from the caller's
/// reverse geocoding and `accuracy` from the device, both best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    #[schema(example = 21.1096)]
    pub latitude: f64,
    #[schema(example = 79.0598)]
    pub longitude: f64,
    #[schema(example = "Manish Nagar, Nagpur")]
    pub address: Option<String>,
    /// Reported GPS accuracy in meters.
    pub accuracy: Option<f64>,
}

/// Location as submitted by a client. Every field is optional: GPS capture is
/// best-effort and a check-in/out with no usable fix must still succeed.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub accuracy: Option<f64>,
}

impl LocationInput {
    /// Normalizes a possibly-missing client location into the stored shape,
    /// defaulting absent fields instead of rejecting the request.
    pub fn normalize(input: Option<LocationInput>) -> GeoLocation {
        let input = input.unwrap_or_default();
        GeoLocation {
            latitude: input.latitude.unwrap_or(0.0),
            longitude: input.longitude.unwrap_or(0.0),
            address: Some(
                input
                    .address
                    .unwrap_or_else(|| "Location not available".to_string()),
            ),
            accuracy: input.accuracy,
        }
    }
}

/// Free-form diagnostic metadata captured at check-in. Not subject to any
/// invariant; stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub ip: Option<String>,
    pub browser: Option<String>,
    pub user_agent: Option<String>,
}

/// One employee-day of attendance. At most one record exists per
/// `(employee_id, date)`; the unique index in the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "2026-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_location: Option<GeoLocation>,
    pub check_out_location: Option<GeoLocation>,
    /// Worked duration in hours, rounded to 2 decimals. Set once at check-out.
    #[schema(example = 8.5)]
    pub total_hours: Option<f64>,
    pub status: AttendanceStatus,
    /// Base64 verification photo from check-in, if one was captured.
    pub photo_data: Option<String>,
    /// Base64 verification photo from check-out, if one was captured.
    pub check_out_photo_data: Option<String>,
    pub device_info: Option<DeviceInfo>,
}
