use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use nimbus_core::UpstreamError;
use nimbus_core::domain::Location;
use nimbus_core::ports::WeatherProvider;
use nimbus_infra::{InMemoryRateLimiter, OpenWeatherClient, OpenWeatherConfig, RateLimitConfig};

use super::configure_routes;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

/// Upstream stand-in that records every lookup it serves.
struct StubProvider {
    calls: AtomicUsize,
    locations: Mutex<Vec<Location>>,
    current: Result<Value, UpstreamError>,
    forecast: Result<Value, UpstreamError>,
}

impl StubProvider {
    fn ok(current: Value, forecast: Value) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            locations: Mutex::new(Vec::new()),
            current: Ok(current),
            forecast: Ok(forecast),
        }
    }

    fn failing(err: UpstreamError) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            locations: Mutex::new(Vec::new()),
            current: Err(err.clone()),
            forecast: Err(err),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, location: &Location) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.locations.lock().unwrap().push(location.clone());
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn current(&self, location: &Location) -> Result<Value, UpstreamError> {
        self.record(location);
        self.current.clone()
    }

    async fn forecast(&self, location: &Location) -> Result<Value, UpstreamError> {
        self.record(location);
        self.forecast.clone()
    }
}

fn london_snapshot() -> Value {
    json!({
        "name": "London",
        "weather": [{"description": "clear sky", "icon": "01d"}],
        "main": {
            "temp": 18, "humidity": 60, "temp_min": 15, "temp_max": 20,
            "pressure": 1012, "feels_like": 17
        },
        "wind": {"speed": 3, "deg": 200},
        "sys": {"country": "GB", "sunrise": 0, "sunset": 0},
        "visibility": 10000,
        "clouds": {"all": 5}
    })
}

fn forecast_series() -> Value {
    json!({
        "cod": "200",
        "cnt": 2,
        "list": [
            {"dt": 1, "dt_txt": "2025-08-10 09:00:00", "main": {"temp": 16}, "wind": {"speed": 2}},
            {"dt": 2, "dt_txt": "2025-08-10 12:00:00", "main": {"temp": 19}, "wind": {"speed": 3}}
        ],
        "city": {"name": "London", "country": "GB"}
    })
}

fn limiter(max_requests: u32, window: Duration) -> Arc<InMemoryRateLimiter> {
    Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests,
        window,
    }))
}

fn state_with(provider: Arc<StubProvider>) -> AppState {
    AppState::from_parts(provider, limiter(100, Duration::from_secs(900)))
}

fn peer(ip: &str) -> SocketAddr {
    format!("{}:40000", ip).parse().unwrap()
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri).peer_addr(peer("10.0.0.1"))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new($state.limiter.clone()))
                .wrap(crate::cors_headers())
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_weather_by_city_relays_body_unchanged() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/weather/city/London").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, london_snapshot());
    assert_eq!(
        provider.locations.lock().unwrap().as_slice(),
        [Location::city("London")]
    );
}

#[actix_web::test]
async fn test_forecast_by_city_relays_series() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app!(state);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/forecast/city/London").to_request()).await;

    assert_eq!(body, forecast_series());
}

#[actix_web::test]
async fn test_coords_routes_forward_both_values() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        get("/api/weather/coords?lat=51.5&lon=-0.12").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        get("/api/forecast/coords?lat=51.5&lon=-0.12").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let expected = Location::from_coords(Some("51.5"), Some("-0.12")).unwrap();
    assert_eq!(
        provider.locations.lock().unwrap().as_slice(),
        [expected.clone(), expected]
    );
}

#[actix_web::test]
async fn test_forecast_coords_missing_lon_is_400() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/forecast/coords?lat=10").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Latitude and longitude are required"}));
    assert_eq!(provider.calls(), 0);
}

#[actix_web::test]
async fn test_weather_coords_missing_values_are_400() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app!(state);

    for uri in [
        "/api/weather/coords?lat=10",
        "/api/weather/coords?lon=20",
        "/api/weather/coords",
        "/api/weather/coords?lat=&lon=20",
        "/api/forecast/coords?lon=20",
        "/api/forecast/coords",
    ] {
        let resp = test::call_service(&app, get(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }

    assert_eq!(provider.calls(), 0);
}

#[actix_web::test]
async fn test_upstream_not_found_is_relayed() {
    let provider = Arc::new(StubProvider::failing(UpstreamError::new(
        Some(404),
        "city not found",
    )));
    let state = state_with(provider);
    let app = init_app!(state);

    for uri in ["/api/weather/city/Atlantis", "/api/forecast/city/Atlantis"] {
        let resp = test::call_service(&app, get(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "city not found"}));
    }
}

#[actix_web::test]
async fn test_unreachable_upstream_is_500() {
    let provider = Arc::new(StubProvider::failing(UpstreamError::unreachable()));
    let state = state_with(provider);
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/weather/city/Paris").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Something went wrong"}));
}

#[actix_web::test]
async fn test_101st_request_is_throttled_without_upstream_call() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app!(state);

    for i in 0..100 {
        let resp = test::call_service(&app, get("/api/weather/city/London").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "request {}", i + 1);
    }
    assert_eq!(provider.calls(), 100);

    let resp = test::call_service(&app, get("/api/weather/city/London").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(provider.calls(), 100);

    let headers = resp.headers();
    assert_eq!(headers.get("ratelimit-limit").unwrap(), "100");
    assert_eq!(headers.get("ratelimit-remaining").unwrap(), "0");
    assert!(headers.contains_key("ratelimit-reset"));
    assert!(headers.contains_key("retry-after"));

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    let other = test::TestRequest::get()
        .uri("/api/weather/city/London")
        .peer_addr(peer("10.0.0.2"))
        .to_request();
    let resp = test::call_service(&app, other).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 101);
}

#[actix_web::test]
async fn test_throttled_address_recovers_after_window() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = AppState::from_parts(provider, limiter(1, Duration::from_millis(200)));
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, get("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(250)).await;

    let resp = test::call_service(&app, get("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_every_response_carries_rate_limit_headers() {
    let provider = Arc::new(StubProvider::failing(UpstreamError::new(
        Some(401),
        "Invalid API key",
    )));
    let state = state_with(provider);
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/weather/city/Oslo").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let headers = resp.headers();
    assert_eq!(headers.get("ratelimit-limit").unwrap(), "100");
    assert_eq!(headers.get("ratelimit-remaining").unwrap(), "99");
    assert_eq!(headers.get("ratelimit-reset").unwrap(), "900");
    assert_eq!(headers.get("ratelimit-policy").unwrap(), "100;w=900");
}

#[actix_web::test]
async fn test_cors_and_request_id_headers() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider);
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/health").to_request()).await;
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert!(resp.headers().contains_key("x-request-id"));

    let req = get("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
}

#[actix_web::test]
async fn test_health_reports_ok() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider);
    let app = init_app!(state);

    let body: Value = test::call_and_read_body_json(&app, get("/api/health").to_request()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_end_to_end_through_openweather_client() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "server-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_snapshot()))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&upstream)
        .await;

    let client = OpenWeatherClient::new(
        OpenWeatherConfig::new("server-key").with_base_url(upstream.uri()),
    )
    .unwrap();
    let state = AppState::from_parts(Arc::new(client), limiter(100, Duration::from_secs(900)));
    let app = init_app!(state);

    let resp = test::call_service(&app, get("/api/weather/city/London").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, london_snapshot());

    let resp = test::call_service(&app, get("/api/forecast/city/Nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "city not found"}));
}

#[actix_web::test]
async fn test_trusted_proxy_keys_by_forwarded_address() {
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = AppState::from_parts(provider, limiter(1, Duration::from_secs(900)));
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::new(state.limiter.clone()).trust_proxy(true))
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    // Same proxy socket, different forwarded clients.
    for client in ["203.0.113.1", "203.0.113.2"] {
        let req = get("/api/health")
            .insert_header(("X-Forwarded-For", client))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", client);
    }

    let req = get("/api/health")
        .insert_header(("X-Forwarded-For", "203.0.113.1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

fn dashboard_bundle() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>nimbus</html>").unwrap();
    std::fs::create_dir(dir.path().join("static")).unwrap();
    std::fs::write(dir.path().join("static").join("app.js"), "console.log(1);").unwrap();
    dir
}

macro_rules! init_app_with_bundle {
    ($state:expr, $dir:expr) => {
        test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new($state.limiter.clone()))
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes)
                .configure(|cfg| super::configure_static(cfg, $dir)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_bundle_serves_assets_and_index() {
    let bundle = dashboard_bundle();
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider);
    let app = init_app_with_bundle!(state, bundle.path());

    let resp = test::call_service(&app, get("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "<html>nimbus</html>");

    let resp = test::call_service(&app, get("/static/app.js").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "console.log(1);");
}

#[actix_web::test]
async fn test_bundle_falls_back_to_index_for_client_routes() {
    let bundle = dashboard_bundle();
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider);
    let app = init_app_with_bundle!(state, bundle.path());

    let resp = test::call_service(&app, get("/map/oslo").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("ratelimit-remaining"));
    assert_eq!(test::read_body(resp).await, "<html>nimbus</html>");
}

#[actix_web::test]
async fn test_bundle_does_not_shadow_api_routes() {
    let bundle = dashboard_bundle();
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = state_with(provider.clone());
    let app = init_app_with_bundle!(state, bundle.path());

    let resp = test::call_service(&app, get("/api/weather/city/London").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, london_snapshot());
    assert_eq!(provider.calls(), 1);
}

#[actix_web::test]
async fn test_bundle_requests_count_against_the_limit() {
    let bundle = dashboard_bundle();
    let provider = Arc::new(StubProvider::ok(london_snapshot(), forecast_series()));
    let state = AppState::from_parts(provider, limiter(1, Duration::from_secs(900)));
    let app = init_app_with_bundle!(state, bundle.path());

    let resp = test::call_service(&app, get("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, get("/static/app.js").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
