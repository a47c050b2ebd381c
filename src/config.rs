use dotenvy::dotenv;
use std::env;

/// Reference point and radius for on-premises classification.
///
/// Loaded once at startup and treated as a process-wide constant; nothing
/// mutates it at runtime.
#[derive(Debug, Clone)]
pub struct OfficeLocation {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum allowed distance from the office, in meters, to be considered
    /// on premises. The comparison is inclusive.
    pub geofence_radius_m: f64,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_attendance_per_min: u32,

    pub office: OfficeLocation,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_attendance_per_min: env::var("RATE_ATTENDANCE_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),

            office: OfficeLocation {
                name: env::var("OFFICE_NAME")
                    .unwrap_or_else(|_| "Vinayak Enclave, Manish Nagar".to_string()),
                address: env::var("OFFICE_ADDRESS").unwrap_or_else(|_| {
                    "301, Vinayak Enclave, Manish Nagar, Nagpur, Maharashtra 440015".to_string()
                }),
                latitude: env::var("OFFICE_LATITUDE")
                    .unwrap_or_else(|_| "21.1096".to_string())
                    .parse()
                    .unwrap(),
                longitude: env::var("OFFICE_LONGITUDE")
                    .unwrap_or_else(|_| "79.0598".to_string())
                    .parse()
                    .unwrap(),
                geofence_radius_m: env::var("OFFICE_GEOFENCE_RADIUS_M")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()
                    .unwrap(),
            },
        }
    }
}
