pub mod api;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod services;
pub mod utils;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::{BoxError, Extension, Router, ServiceExt};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use tower::{Layer, ServiceBuilder};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::SqliteDatabase;
use api::{
    achievement_controller::AchievementController, analytics_controller::AnalyticsController,
    health_controller::health_endpoint, library_controller::LibraryController,
    review_controller::ReviewController,
};
use services::app_services::AppServices;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub struct ApplicationServer;

impl ApplicationServer {
    /// every route under /api/v1, without the outer middleware. split out so it can be driven
    /// directly with tower's oneshot
    pub fn api_router(services: AppServices) -> Router {
        Router::new()
            .nest(
                "/api/v1",
                Router::new()
                    .route("/health", get(health_endpoint))
                    .nest("/reviews", ReviewController::app())
                    .nest("/achievements", AchievementController::app())
                    .nest("/analytics", AnalyticsController::app())
                    .nest("/library", LibraryController::app()),
            )
            .layer(Extension(services))
    }

    pub async fn serve(config: Arc<AppConfig>, database: SqliteDatabase) -> anyhow::Result<()> {
        Lazy::force(&START_TIME);

        let metrics_handle = PrometheusBuilder::new()
            .install_recorder()
            .context("could not install prometheus recorder")?;

        let services = AppServices::new(database, config.clone());

        let router = Self::api_router(services)
            .route(
                "/metrics",
                get(move || std::future::ready(metrics_handle.render())),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(HandleErrorLayer::new(Self::handle_timeout_error))
                    .timeout(Duration::from_secs(config.request_timeout_secs)),
            )
            .layer(Self::cors_layer(&config.cors_origin));

        // trailing slashes get stripped before routing so /reviews/ and /reviews are the same
        let app = NormalizePathLayer::trim_trailing_slash().layer(router);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("could not bind to {}", addr))?;

        info!("listening on {}", addr);

        axum::serve(
            listener,
            ServiceExt::<axum::extract::Request>::into_make_service(app),
        )
        .with_graceful_shutdown(Self::shutdown_signal())
        .await
        .context("error while serving")?;

        info!("server shut down");
        Ok(())
    }

    fn cors_layer(cors_origin: &str) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if cors_origin.trim() == "*" {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = cors_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("ignoring invalid cors origin {}", o);
                    None
                }
            })
            .collect();

        layer.allow_origin(AllowOrigin::list(origins))
    }

    async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
        if err.is::<tower::timeout::error::Elapsed>() {
            (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("unhandled internal error: {}", err),
            )
        }
    }

    async fn shutdown_signal() {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    }
}
