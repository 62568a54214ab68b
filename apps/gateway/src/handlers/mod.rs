//! HTTP handlers and route configuration.

mod health;
mod static_files;
mod weather;

pub use static_files::configure_static;

#[cfg(test)]
mod tests;

use actix_web::web;
use nimbus_core::domain::COORDS_REQUIRED;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Malformed query strings get the same answer as missing coordinates.
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|_, _| AppError::BadRequest(COORDS_REQUIRED.to_string()).into()),
    );

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/weather")
                    .route("/city/{city}", web::get().to(weather::weather_by_city))
                    .route("/coords", web::get().to(weather::weather_by_coords)),
            )
            .service(
                web::scope("/forecast")
                    .route("/city/{city}", web::get().to(weather::forecast_by_city))
                    .route("/coords", web::get().to(weather::forecast_by_coords)),
            ),
    );
}
