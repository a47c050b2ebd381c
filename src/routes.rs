use crate::{api::attendance, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&format!("{}/v1/attendance", config.api_prefix))
            .wrap(build_limiter(config.rate_attendance_per_min))
            .service(
                web::resource("/check-in").route(web::post().to(attendance::check_in)),
            )
            .service(
                web::resource("/check-out").route(web::post().to(attendance::check_out)),
            )
            .service(web::resource("/today").route(web::get().to(attendance::today_records)))
            .service(
                web::resource("/geofence").route(web::get().to(attendance::geofence_check)),
            )
            .service(
                web::resource("/date/{date}")
                    .route(web::get().to(attendance::records_by_date)),
            )
            .service(
                web::resource("/employee/{employee_id}")
                    .route(web::get().to(attendance::employee_records)),
            )
            .service(
                web::resource("/employee/{employee_id}/today")
                    .route(web::get().to(attendance::employee_today)),
            ),
    );
}
