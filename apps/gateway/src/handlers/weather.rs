//! Weather and forecast proxy routes.
//!
//! Each route validates its input, forwards one lookup to the upstream
//! provider and relays the document unchanged.

use actix_web::{HttpResponse, web};

use nimbus_core::domain::Location;
use nimbus_shared::dto::CoordsQuery;

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn coords(query: &CoordsQuery) -> AppResult<Location> {
    Ok(Location::from_coords(
        query.lat.as_deref(),
        query.lon.as_deref(),
    )?)
}

/// GET /api/weather/city/{city}
pub async fn weather_by_city(
    state: web::Data<AppState>,
    city: web::Path<String>,
) -> AppResult<HttpResponse> {
    let location = Location::city(city.into_inner());
    let snapshot = state.weather.current(&location).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// GET /api/weather/coords?lat=..&lon=..
pub async fn weather_by_coords(
    state: web::Data<AppState>,
    query: web::Query<CoordsQuery>,
) -> AppResult<HttpResponse> {
    let location = coords(&query)?;
    let snapshot = state.weather.current(&location).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// GET /api/forecast/city/{city}
pub async fn forecast_by_city(
    state: web::Data<AppState>,
    city: web::Path<String>,
) -> AppResult<HttpResponse> {
    let location = Location::city(city.into_inner());
    let series = state.weather.forecast(&location).await?;
    Ok(HttpResponse::Ok().json(series))
}

/// GET /api/forecast/coords?lat=..&lon=..
pub async fn forecast_by_coords(
    state: web::Data<AppState>,
    query: web::Query<CoordsQuery>,
) -> AppResult<HttpResponse> {
    let location = coords(&query)?;
    let series = state.weather.forecast(&location).await?;
    Ok(HttpResponse::Ok().json(series))
}
