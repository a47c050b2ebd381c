pub mod attendance;

pub use attendance::{
    AttendanceRecord, AttendanceStatus, DeviceInfo, GeoLocation, LocationInput,
};
