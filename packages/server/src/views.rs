//! Response builders shared by the HTTP handlers and the push ticker.
//!
//! Each builder regenerates its inputs from scratch; nothing is cached
//! between calls.

use chrono::Utc;
use heatmap_analytics::{AnalyticsError, DEFAULT_CLUSTER_COUNT, DEFAULT_TOP_N};
use heatmap_generate::{
    DEFAULT_POINT_COUNT, STORE_HEIGHT, STORE_WIDTH, generate_candidates, generate_points,
    generate_summary,
};
use heatmap_models::SpatialPoint;
use heatmap_server_models::{
    AnalyticsSummaryResponse, CityAnalysis, CityLocationsResponse, ExportReport, PushMessage,
    StoreAnalysis, StoreHeatmapResponse,
};
use rand::Rng;

fn store_points<R: Rng + ?Sized>(rng: &mut R) -> Vec<SpatialPoint> {
    generate_points(rng, STORE_WIDTH, STORE_HEIGHT, DEFAULT_POINT_COUNT)
}

/// Fresh store points with their zone clusters.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if `k` is not a usable cluster count.
pub fn store_heatmap<R: Rng + ?Sized>(
    rng: &mut R,
    k: usize,
) -> Result<StoreHeatmapResponse, AnalyticsError> {
    let data = store_points(rng);
    let clusters = heatmap_analytics::cluster(&data, k)?;

    Ok(StoreHeatmapResponse {
        data,
        clusters,
        timestamp: Utc::now(),
    })
}

/// Ranked candidate sites with projections for the top picks.
#[must_use]
pub fn city_locations() -> CityLocationsResponse {
    let cities = generate_candidates();
    let recommendations = heatmap_analytics::top_n(&cities, DEFAULT_TOP_N);
    let roi_projections = recommendations
        .iter()
        .map(heatmap_analytics::project_roi)
        .collect();

    CityLocationsResponse {
        cities,
        recommendations,
        roi_projections,
        timestamp: Utc::now(),
    }
}

/// Sampled counters plus clusters from a fresh point set.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if `k` is not a usable cluster count.
pub fn analytics_summary<R: Rng + ?Sized>(
    rng: &mut R,
    k: usize,
) -> Result<AnalyticsSummaryResponse, AnalyticsError> {
    let points = store_points(rng);
    let clusters = heatmap_analytics::cluster(&points, k)?;

    Ok(AnalyticsSummaryResponse {
        analytics: generate_summary(rng),
        clusters,
        timestamp: Utc::now(),
    })
}

/// Combined store, city, and counter report.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if clustering the store points fails.
pub fn export_report<R: Rng + ?Sized>(rng: &mut R) -> Result<ExportReport, AnalyticsError> {
    let points = store_points(rng);
    let clusters = heatmap_analytics::cluster(&points, DEFAULT_CLUSTER_COUNT)?;
    let locations = generate_candidates();
    let top_recommendations = heatmap_analytics::top_n(&locations, DEFAULT_TOP_N);

    Ok(ExportReport {
        generated_at: Utc::now(),
        store_analysis: StoreAnalysis {
            total_points: points.len(),
            clusters,
        },
        city_analysis: CityAnalysis {
            locations,
            top_recommendations,
        },
        analytics: generate_summary(rng),
    })
}

/// Realtime snapshot holding at most `point_limit` fresh points.
#[must_use]
pub fn push_update<R: Rng + ?Sized>(rng: &mut R, point_limit: usize) -> PushMessage {
    let mut store_data = store_points(rng);
    store_data.truncate(point_limit);

    PushMessage::Update {
        store_data,
        analytics: generate_summary(rng),
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn store_heatmap_clusters_every_point() {
        let resp = store_heatmap(&mut ChaCha8Rng::seed_from_u64(1), 4).unwrap();
        assert_eq!(resp.data.len(), DEFAULT_POINT_COUNT);
        assert_eq!(resp.clusters.len(), 4);
        let total: usize = resp.clusters.iter().map(|c| c.member_count).sum();
        assert_eq!(total, DEFAULT_POINT_COUNT);
    }

    #[test]
    fn store_heatmap_rejects_zero_clusters() {
        assert_eq!(
            store_heatmap(&mut ChaCha8Rng::seed_from_u64(1), 0).unwrap_err(),
            AnalyticsError::InvalidClusterCount
        );
    }

    #[test]
    fn city_locations_projects_each_recommendation() {
        let resp = city_locations();
        assert_eq!(resp.cities.len(), 8);
        assert_eq!(resp.recommendations.len(), DEFAULT_TOP_N);
        assert_eq!(resp.recommendations[..], resp.cities[..DEFAULT_TOP_N]);
        let names: Vec<&str> = resp
            .roi_projections
            .iter()
            .map(|r| r.location.as_str())
            .collect();
        assert_eq!(names, ["Central Square", "Downtown", "South Hub"]);
    }

    #[test]
    fn export_report_sections_are_consistent() {
        let report = export_report(&mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(report.store_analysis.total_points, DEFAULT_POINT_COUNT);
        assert_eq!(report.store_analysis.clusters.len(), DEFAULT_CLUSTER_COUNT);
        assert_eq!(report.city_analysis.locations.len(), 8);
        assert_eq!(
            report.city_analysis.top_recommendations[..],
            report.city_analysis.locations[..DEFAULT_TOP_N]
        );
    }

    #[test]
    fn push_update_respects_point_limit() {
        let PushMessage::Update { store_data, .. } =
            push_update(&mut ChaCha8Rng::seed_from_u64(2), 100);
        assert_eq!(store_data.len(), 100);
    }
}
