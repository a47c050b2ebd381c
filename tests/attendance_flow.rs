//! End-to-end tests over the HTTP surface, using the in-memory store and a
//! pinned clock so the whole day can be replayed deterministically.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use actix_web::web::Data;
use actix_web::{App, test};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};

use attendance_tracker::config::{Config, OfficeLocation};
use attendance_tracker::routes;
use attendance_tracker::service::{AttendanceService, Clock};
use attendance_tracker::store::MemoryStore;

struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    fn at(h: u32, m: u32) -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(2026, 1, 15, h, m, 0).unwrap(),
        )))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

fn test_office() -> OfficeLocation {
    OfficeLocation {
        name: "Vinayak Enclave, Manish Nagar".to_string(),
        address: "301, Vinayak Enclave, Manish Nagar, Nagpur".to_string(),
        latitude: 21.1096,
        longitude: 79.0598,
        geofence_radius_m: 100.0,
    }
}

fn test_config() -> Config {
    Config {
        database_url: "mysql://unused".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        api_prefix: "/api".to_string(),
        rate_attendance_per_min: 6000,
        office: test_office(),
    }
}

fn test_service(clock: Arc<TestClock>) -> Data<AttendanceService> {
    Data::new(AttendanceService::new(
        Arc::new(MemoryStore::new()),
        clock,
        test_office(),
    ))
}

fn peer() -> SocketAddr {
    "127.0.0.1:34567".parse().unwrap()
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data($service.clone())
                .configure(|cfg| routes::configure(cfg, test_config())),
        )
        .await
    };
}

fn check_in_body() -> Value {
    json!({
        "employeeId": 1001,
        "employeeName": "Asha Rao",
        "location": {
            "latitude": 21.1096,
            "longitude": 79.0598,
            "address": "At the office",
            "accuracy": 5.0
        },
        "photoData": "data:image/jpeg;base64,checkin-selfie",
        "deviceInfo": { "browser": "Firefox", "userAgent": "Mozilla/5.0" }
    })
}

#[actix_web::test]
async fn full_day_at_the_office() {
    let clock = TestClock::at(9, 5);
    let service = test_service(clock.clone());
    let app = app!(service);

    // Check in at the office reference point with a photo.
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(check_in_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["record"]["status"], "checked-in");
    assert_eq!(body["record"]["employeeName"], "Asha Rao");
    assert_eq!(body["record"]["date"], "2026-01-15");
    assert_eq!(body["geofence"]["isWithinGeofence"], true);
    assert_eq!(body["geofence"]["distanceFromOffice"], 0);
    let record_id = body["record"]["id"].as_u64().unwrap();

    // Eight hours later, check out without a photo.
    clock.advance(Duration::hours(8));
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-out")
        .peer_addr(peer())
        .set_json(json!({ "recordId": record_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["record"]["status"], "checked-out");
    assert_eq!(body["record"]["totalHours"], 8.0);
    assert!(body["record"]["checkOutPhotoData"].is_null());
    // The check-in photo is untouched by the photo-less checkout.
    assert_eq!(
        body["record"]["photoData"],
        "data:image/jpeg;base64,checkin-selfie"
    );
    // Checkout location was not supplied: stored with the defaults.
    assert_eq!(
        body["record"]["checkOutLocation"]["address"],
        "Location not available"
    );
    assert_eq!(body["record"]["checkOutLocation"]["latitude"], 0.0);
}

#[actix_web::test]
async fn second_check_in_same_day_conflicts() {
    let service = test_service(TestClock::at(9, 0));
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(check_in_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(check_in_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Already checked in today");
}

#[actix_web::test]
async fn missing_identity_fields_are_rejected() {
    let service = test_service(TestClock::at(9, 0));
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(json!({ "employeeName": "No Id" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "employeeId is required");
}

#[actix_web::test]
async fn checkout_without_check_in_is_not_found() {
    let service = test_service(TestClock::at(9, 0));
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-out")
        .peer_addr(peer())
        .set_json(json!({ "recordId": 12345 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Record not found");
}

#[actix_web::test]
async fn double_checkout_conflicts() {
    let clock = TestClock::at(9, 0);
    let service = test_service(clock.clone());
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(check_in_body())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let record_id = body["record"]["id"].as_u64().unwrap();

    clock.advance(Duration::hours(4));
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-out")
        .peer_addr(peer())
        .set_json(json!({ "recordId": record_id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-out")
        .peer_addr(peer())
        .set_json(json!({ "recordId": record_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Already checked out");
}

#[actix_web::test]
async fn check_in_without_location_stores_defaults_and_is_outside_geofence() {
    let service = test_service(TestClock::at(9, 0));
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(json!({ "employeeId": 2002, "employeeName": "Vikram Shah" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["record"]["checkInLocation"]["address"],
        "Location not available"
    );
    assert_eq!(body["record"]["checkInLocation"]["latitude"], 0.0);
    assert!(body["record"]["checkInLocation"]["accuracy"].is_null());
    // (0, 0) is nowhere near Nagpur.
    assert_eq!(body["geofence"]["isWithinGeofence"], false);
}

#[actix_web::test]
async fn read_views_reflect_the_day() {
    let clock = TestClock::at(9, 0);
    let service = test_service(clock.clone());
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/check-in")
        .peer_addr(peer())
        .set_json(check_in_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/today")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/employee/1001/today")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["record"]["employeeId"], 1001);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/employee/9999/today")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["success"], true);
    assert!(body["record"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/date/2026-01-15")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/employee/1001")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["records"][0]["employeeName"], "Asha Rao");
}

#[actix_web::test]
async fn geofence_endpoint_classifies_a_raw_coordinate() {
    let service = test_service(TestClock::at(9, 0));
    let app = app!(service);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/geofence?latitude=21.1096&longitude=79.0598")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["isWithinGeofence"], true);
    assert_eq!(body["distanceFromOffice"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/geofence?latitude=19.0760&longitude=72.8777")
        .peer_addr(peer())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["isWithinGeofence"], false);
}
