//! # Nimbus Gateway
//!
//! Actix-web server that proxies weather lookups to the upstream provider
//! and rate limits callers by address.

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;

    tracing::info!(
        "Starting Nimbus gateway on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;

    #[cfg(feature = "scheduler")]
    let mut scheduler = {
        use background::scheduler::{Scheduler, SchedulerConfig};

        let scheduler = Scheduler::new(SchedulerConfig::from_env()).await?;
        scheduler.add_rate_limit_sweep(state.limiter.clone()).await?;
        scheduler.start().await?;
        scheduler
    };

    let trust_proxy = config.trust_proxy;
    let static_dir = config.static_dir.clone();
    if let Some(dir) = &static_dir {
        tracing::info!(dir = %dir.display(), "Serving dashboard bundle");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(RateLimitMiddleware::new(state.limiter.clone()).trust_proxy(trust_proxy))
            .wrap(cors_headers())
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .configure(|cfg| {
                if let Some(dir) = &static_dir {
                    handlers::configure_static(cfg, dir);
                }
            })
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Scheduler shutdown failed");
    }

    Ok(())
}

/// Open CORS for the browser dashboard. Every route is a simple GET, so
/// no preflight handling is needed.
pub(crate) fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*"))
}
