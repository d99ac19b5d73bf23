#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the heatmap server.
//!
//! Field names are `snake_case` on the wire, matching the field names of
//! the existing heatmap API.

use chrono::{DateTime, Utc};
use heatmap_models::{AnalyticsSummary, Candidate, RoiProjection, SpatialPoint, ZoneCluster};
use serde::{Deserialize, Serialize};

/// Root status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    /// Service name.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Always `"running"`.
    pub status: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

/// Query parameters for endpoints that cluster store traffic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterQueryParams {
    /// Number of zones to produce (defaults to 4).
    pub k: Option<usize>,
}

/// `GET /api/store/heatmap` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHeatmapResponse {
    /// Generated traffic points.
    pub data: Vec<SpatialPoint>,
    /// Zone clusters, busiest first.
    pub clusters: Vec<ZoneCluster>,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/city/locations` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityLocationsResponse {
    /// All candidates, highest score first.
    pub cities: Vec<Candidate>,
    /// Top-ranked candidates.
    pub recommendations: Vec<Candidate>,
    /// One projection per recommended candidate.
    pub roi_projections: Vec<RoiProjection>,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/analytics/summary` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummaryResponse {
    /// Sampled store counters.
    pub analytics: AnalyticsSummary,
    /// Zones computed from a fresh point set.
    pub clusters: Vec<ZoneCluster>,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// Store section of an exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAnalysis {
    /// Number of points the clusters were computed from.
    pub total_points: usize,
    /// Zone clusters, busiest first.
    pub clusters: Vec<ZoneCluster>,
}

/// City section of an exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityAnalysis {
    /// All candidates, highest score first.
    pub locations: Vec<Candidate>,
    /// Top-ranked candidates.
    pub top_recommendations: Vec<Candidate>,
}

/// `POST /api/export/report` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Store traffic section.
    pub store_analysis: StoreAnalysis,
    /// City placement section.
    pub city_analysis: CityAnalysis,
    /// Sampled store counters.
    pub analytics: AnalyticsSummary,
}

/// Message pushed to realtime subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// Periodic snapshot of fresh traffic and counters.
    Update {
        /// Leading slice of a freshly generated point set.
        store_data: Vec<SpatialPoint>,
        /// Freshly sampled counters.
        analytics: AnalyticsSummary,
        /// When the snapshot was produced.
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_models::PeakHour;

    #[test]
    fn push_update_is_tagged() {
        let msg = PushMessage::Update {
            store_data: Vec::new(),
            analytics: AnalyticsSummary {
                total_visitors: 1200,
                avg_dwell_time: 18.5,
                conversion_rate: 34.8,
                peak_hours: vec![PeakHour {
                    hour: "12-1 PM".to_string(),
                    visitors: 198,
                }],
            },
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "update");
        assert_eq!(json["analytics"]["total_visitors"], 1200);
        assert_eq!(json["analytics"]["peak_hours"][0]["hour"], "12-1 PM");
        assert!(json["store_data"].as_array().unwrap().is_empty());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn roi_without_break_even_serializes_null() {
        let roi = RoiProjection {
            location: "Empty Lot".to_string(),
            investment: 5_000_000.0,
            projected_monthly_revenue: 0.0,
            break_even_months: None,
            yearly_roi: -100.0,
        };
        let json = serde_json::to_value(&roi).unwrap();
        assert!(json["break_even_months"].is_null());
    }
}
