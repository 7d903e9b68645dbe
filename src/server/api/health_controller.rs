use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::error;

use crate::server::dtos::health_dto::{
    DatabaseHealth, HealthResponse, HealthStatus, ServiceHealthDetails,
};
use crate::server::services::app_services::AppServices;
use crate::server::{get_app_version, get_uptime_seconds};

/// anything slower than this is reported as degraded
const SLOW_DATABASE_MS: f64 = 500.0;

pub async fn health_endpoint(
    Extension(services): Extension<AppServices>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_health = check_database_health(&services).await;
    let overall_status = db_health.status;

    let response = HealthResponse {
        status: overall_status,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: format!("{:?}", services.config.cargo_env).to_lowercase(),
        services: ServiceHealthDetails {
            database: db_health,
        },
    };

    let http_status = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

async fn check_database_health(services: &AppServices) -> DatabaseHealth {
    let pool = &services.database.pool;

    match services.database.health_check().await {
        Ok(response_time) => DatabaseHealth {
            status: if response_time > SLOW_DATABASE_MS {
                HealthStatus::Degraded
            } else {
                HealthStatus::Healthy
            },
            response_time_ms: response_time,
            pool_size: pool.size(),
            pool_idle: pool.num_idle(),
        },
        Err(e) => {
            error!("Database health check failed: {:?}", e);
            DatabaseHealth {
                status: HealthStatus::Unhealthy,
                response_time_ms: 0.0,
                pool_size: pool.size(),
                pool_idle: pool.num_idle(),
            }
        }
    }
}
