//! HTTP handler functions for the heatmap API.

use actix_web::{HttpResponse, web};
use heatmap_analytics::{AnalyticsError, DEFAULT_CLUSTER_COUNT};
use heatmap_server_models::{ApiError, ApiHealth, ApiStatus, ClusterQueryParams};

use crate::{AppState, views};

/// `GET /`
pub async fn root(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiStatus {
        message: state.config.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/store/heatmap`
///
/// Generates a fresh store point set and clusters it into `k` zones.
pub async fn store_heatmap(params: web::Query<ClusterQueryParams>) -> HttpResponse {
    let k = params.k.unwrap_or(DEFAULT_CLUSTER_COUNT);
    match views::store_heatmap(&mut rand::thread_rng(), k) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => bad_request("store heatmap", &e),
    }
}

/// `GET /api/city/locations`
///
/// Returns ranked candidate sites and projections for the top three.
pub async fn city_locations() -> HttpResponse {
    HttpResponse::Ok().json(views::city_locations())
}

/// `GET /api/analytics/summary`
///
/// Returns sampled counters with zones clustered from a fresh point set.
pub async fn analytics_summary(params: web::Query<ClusterQueryParams>) -> HttpResponse {
    let k = params.k.unwrap_or(DEFAULT_CLUSTER_COUNT);
    match views::analytics_summary(&mut rand::thread_rng(), k) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => bad_request("analytics summary", &e),
    }
}

/// `POST /api/export/report`
///
/// Builds a combined store, city, and counter report.
pub async fn export_report() -> HttpResponse {
    match views::export_report(&mut rand::thread_rng()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            log::error!("Failed to build export report: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to build report".to_string(),
            })
        }
    }
}

fn bad_request(what: &str, e: &AnalyticsError) -> HttpResponse {
    log::warn!("Rejected {what} request: {e}");
    HttpResponse::BadRequest().json(ApiError {
        error: e.to_string(),
    })
}
