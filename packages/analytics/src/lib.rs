#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine for the heatmap service.
//!
//! Groups store traffic points into named zones with a seeded k-means,
//! accumulates intensity into a heat grid, ranks candidate sites by score,
//! and projects the return on investment for a site.

pub mod kmeans;

use heatmap_models::{Candidate, RoiProjection, SpatialPoint, StoreZone, ZoneCluster, round_dp};

pub use kmeans::KMeansConfig;

/// Number of zones produced when the caller does not ask for a specific count.
pub const DEFAULT_CLUSTER_COUNT: usize = 4;

/// Number of recommended candidates returned by the city endpoints.
pub const DEFAULT_TOP_N: usize = 3;

/// Up-front investment assumed for every candidate site.
pub const BASE_INVESTMENT: f64 = 5_000_000.0;

/// Monthly revenue per unit of demand (1000 customers at 0.3 each).
pub const REVENUE_PER_DEMAND: f64 = 1000.0 * 0.3;

const FALLBACK_RECOMMENDATION: &str = "Optimize layout";

/// Errors produced by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// Zero clusters were requested.
    #[error("Cluster count must be at least 1")]
    InvalidClusterCount,

    /// More clusters were requested than there are distinct points.
    #[error("Cannot form {k} clusters from {distinct} distinct points")]
    TooFewPoints {
        /// Requested cluster count.
        k: usize,
        /// Distinct `(x, y)` positions in the input.
        distinct: usize,
    },
}

/// Clusters `points` into `k` zones using the default seeded k-means.
///
/// See [`cluster_with`].
///
/// # Errors
///
/// * [`AnalyticsError::InvalidClusterCount`] if `k` is zero
/// * [`AnalyticsError::TooFewPoints`] if `k` exceeds the number of distinct
///   point positions
pub fn cluster(points: &[SpatialPoint], k: usize) -> Result<Vec<ZoneCluster>, AnalyticsError> {
    cluster_with(points, k, &KMeansConfig::default())
}

/// Clusters `points` into `k` zones by `(x, y)` position only.
///
/// Zone `i` is labelled with the `i`-th [`StoreZone`] cluster label and
/// recommendation, falling back to `"Zone {i+1}"` past the end of the list.
/// The result is sorted by descending member count; ties keep zone order.
/// An empty input yields an empty list.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidClusterCount`] if `k` is zero
/// * [`AnalyticsError::TooFewPoints`] if `k` exceeds the number of distinct
///   point positions
#[allow(clippy::cast_precision_loss)]
pub fn cluster_with(
    points: &[SpatialPoint],
    k: usize,
    config: &KMeansConfig,
) -> Result<Vec<ZoneCluster>, AnalyticsError> {
    if k == 0 {
        return Err(AnalyticsError::InvalidClusterCount);
    }
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let coords: Vec<kmeans::Coord> = points.iter().map(|p| [p.x, p.y]).collect();
    let fit = kmeans::fit(&coords, k, config)?;
    log::debug!(
        "Clustered {} points into {k} zones (inertia {:.3})",
        coords.len(),
        fit.inertia
    );

    let mut sums = vec![[0.0, 0.0]; k];
    let mut counts = vec![0usize; k];
    for (c, &label) in coords.iter().zip(&fit.labels) {
        sums[label][0] += c[0];
        sums[label][1] += c[1];
        counts[label] += 1;
    }

    let mut clusters: Vec<ZoneCluster> = (0..k)
        .map(|i| {
            let [center_x, center_y] = if counts[i] == 0 {
                fit.centroids[i]
            } else {
                let n = counts[i] as f64;
                [sums[i][0] / n, sums[i][1] / n]
            };
            let (zone, recommendation) = StoreZone::all().get(i).map_or_else(
                || (format!("Zone {}", i + 1), FALLBACK_RECOMMENDATION.to_string()),
                |z| (z.cluster_label().to_string(), z.recommendation().to_string()),
            );

            ZoneCluster {
                zone,
                center_x,
                center_y,
                member_count: counts[i],
                recommendation,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.member_count.cmp(&a.member_count));
    Ok(clusters)
}

/// Accumulates point intensity into a `height` x `width` grid indexed as
/// `grid[row][col]` with `row = trunc(y)` and `col = trunc(x)`.
///
/// Points whose truncated coordinates fall outside the grid are dropped.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn heat_grid(points: &[SpatialPoint], width: usize, height: usize) -> Vec<Vec<f64>> {
    let mut grid = vec![vec![0.0; width]; height];

    for p in points {
        let col = p.x.trunc();
        let row = p.y.trunc();
        if col >= 0.0 && row >= 0.0 && col < width as f64 && row < height as f64 {
            grid[row as usize][col as usize] += p.intensity;
        }
    }

    grid
}

/// Returns the `n` highest-scoring candidates. Equal scores keep their
/// input order.
#[must_use]
pub fn top_n(candidates: &[Candidate], n: usize) -> Vec<Candidate> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(n);
    sorted
}

/// Projects monthly revenue, break-even period, and first-year return for
/// a candidate.
///
/// A zero-demand candidate has no revenue, so `break_even_months` is `None`
/// and the yearly return is -100%.
#[must_use]
pub fn project_roi(candidate: &Candidate) -> RoiProjection {
    let monthly_revenue = f64::from(candidate.demand) * REVENUE_PER_DEMAND;
    let break_even_months =
        (monthly_revenue > 0.0).then(|| round_dp(BASE_INVESTMENT / monthly_revenue, 1));
    let yearly_roi = monthly_revenue.mul_add(12.0, -BASE_INVESTMENT) / BASE_INVESTMENT * 100.0;

    RoiProjection {
        location: candidate.name.clone(),
        investment: BASE_INVESTMENT,
        projected_monthly_revenue: round_dp(monthly_revenue, 2),
        break_even_months,
        yearly_roi: round_dp(yearly_roi, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use heatmap_generate::{STORE_HEIGHT, STORE_WIDTH, generate_candidates, generate_points};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn point(id: usize, x: f64, y: f64, intensity: f64) -> SpatialPoint {
        SpatialPoint {
            id,
            x,
            y,
            intensity,
            timestamp: Utc::now(),
            zone: StoreZone::Entrance,
        }
    }

    fn store_points(seed: u64, count: usize) -> Vec<SpatialPoint> {
        generate_points(
            &mut ChaCha8Rng::seed_from_u64(seed),
            STORE_WIDTH,
            STORE_HEIGHT,
            count,
        )
    }

    #[test]
    fn cluster_counts_sum_to_input_size() {
        let points = store_points(42, 500);
        for k in 1..=6 {
            let clusters = cluster(&points, k).unwrap();
            assert_eq!(clusters.len(), k);
            let total: usize = clusters.iter().map(|c| c.member_count).sum();
            assert_eq!(total, points.len());
        }
    }

    #[test]
    fn clusters_sorted_by_descending_count() {
        let clusters = cluster(&store_points(9, 500), DEFAULT_CLUSTER_COUNT).unwrap();
        for pair in clusters.windows(2) {
            assert!(pair[0].member_count >= pair[1].member_count);
        }
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        assert_eq!(cluster(&[], DEFAULT_CLUSTER_COUNT).unwrap(), Vec::new());
    }

    #[test]
    fn zero_clusters_rejected() {
        assert_eq!(
            cluster(&store_points(1, 10), 0),
            Err(AnalyticsError::InvalidClusterCount)
        );
        assert_eq!(cluster(&[], 0), Err(AnalyticsError::InvalidClusterCount));
    }

    #[test]
    fn more_clusters_than_distinct_points_rejected() {
        let points = vec![
            point(0, 1.0, 1.0, 1.0),
            point(1, 1.0, 1.0, 1.0),
            point(2, 4.0, 4.0, 1.0),
        ];
        assert_eq!(
            cluster(&points, 3),
            Err(AnalyticsError::TooFewPoints { k: 3, distinct: 2 })
        );
        assert_eq!(cluster(&points, 2).unwrap().len(), 2);
    }

    #[test]
    fn clustering_is_reproducible() {
        let points = store_points(77, 300);
        assert_eq!(cluster(&points, 4).unwrap(), cluster(&points, 4).unwrap());
    }

    #[test]
    fn centroids_are_member_means() {
        let mut points = Vec::new();
        for i in 0..6 {
            points.push(point(i, if i % 2 == 0 { 2.0 } else { 3.0 }, 2.0, 1.0));
        }
        for i in 6..9 {
            points.push(point(i, 40.0, if i % 2 == 0 { 20.0 } else { 21.0 }, 1.0));
        }

        let clusters = cluster(&points, 2).unwrap();
        assert_eq!(clusters[0].member_count, 6);
        assert!((clusters[0].center_x - 2.5).abs() < 1e-9);
        assert!((clusters[0].center_y - 2.0).abs() < 1e-9);
        assert_eq!(clusters[1].member_count, 3);
        assert!((clusters[1].center_x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn labels_fall_back_past_known_zones() {
        let clusters = cluster(&store_points(5, 500), 6).unwrap();
        let mut labels: Vec<&str> = clusters.iter().map(|c| c.zone.as_str()).collect();
        labels.sort_unstable();
        assert_eq!(
            labels,
            [
                "Checkout Area",
                "Electronics Section",
                "Entrance Zone",
                "Grocery Aisle",
                "Zone 5",
                "Zone 6"
            ]
        );
        let fallback = clusters.iter().find(|c| c.zone == "Zone 6").unwrap();
        assert_eq!(fallback.recommendation, "Optimize layout");
        let entrance = clusters.iter().find(|c| c.zone == "Entrance Zone").unwrap();
        assert_eq!(
            entrance.recommendation,
            "Place promotional items and seasonal products"
        );
    }

    #[test]
    fn heat_grid_accumulates_intensity() {
        let points = vec![
            point(0, 3.0, 4.0, 2.0),
            point(1, 3.7, 4.2, 0.5),
            point(2, 9.0, 0.0, 1.0),
        ];
        let grid = heat_grid(&points, 10, 10);
        assert_eq!(grid.len(), 10);
        assert!(grid.iter().all(|row| row.len() == 10));
        assert!((grid[4][3] - 2.5).abs() < f64::EPSILON);
        assert!((grid[0][9] - 1.0).abs() < f64::EPSILON);

        let total: f64 = grid.iter().flatten().sum();
        assert!((total - 3.5).abs() < 1e-12);
    }

    #[test]
    fn heat_grid_drops_out_of_bounds_points() {
        let points = vec![
            point(0, 10.0, 5.0, 1.0),
            point(1, 5.0, 10.0, 1.0),
            point(2, -1.5, 2.0, 1.0),
            point(3, f64::NAN, 2.0, 1.0),
        ];
        let grid = heat_grid(&points, 10, 10);
        assert!(grid.iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn heat_grid_truncates_small_negatives_into_first_cell() {
        let grid = heat_grid(&[point(0, -0.5, 0.2, 1.0)], 2, 2);
        assert!((grid[0][0] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_n_is_prefix_of_sorted_input() {
        let mut candidates = generate_candidates();
        candidates.reverse();

        let top = top_n(&candidates, 3);
        let mut sorted = candidates.clone();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        assert_eq!(top, sorted[..3]);
        assert_eq!(top_n(&candidates, 50).len(), candidates.len());
        assert!(top_n(&candidates, 0).is_empty());
    }

    #[test]
    fn top_n_ties_keep_input_order() {
        let candidates = vec![
            Candidate::new("First", 0.0, 0.0, 100, 10_000),
            Candidate::new("Best", 0.0, 0.0, 500, 10_000),
            Candidate::new("Second", 0.0, 0.0, 100, 10_000),
        ];
        let names: Vec<String> = top_n(&candidates, 3).into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Best", "First", "Second"]);
    }

    #[test]
    fn roi_projection_for_central_square() {
        let roi = project_roi(&Candidate::new("Central Square", 0.0, 0.0, 920, 140_000));
        assert_eq!(roi.location, "Central Square");
        assert!((roi.investment - 5_000_000.0).abs() < f64::EPSILON);
        assert!((roi.projected_monthly_revenue - 276_000.0).abs() < 1e-9);
        assert!((roi.break_even_months.unwrap() - 18.1).abs() < 1e-9);
        assert!((roi.yearly_roi - -33.8).abs() < 1e-9);
    }

    #[test]
    fn roi_projection_zero_demand_has_no_break_even() {
        let roi = project_roi(&Candidate::new("Empty Lot", 0.0, 0.0, 0, 1_000));
        assert!(roi.projected_monthly_revenue.abs() < f64::EPSILON);
        assert_eq!(roi.break_even_months, None);
        assert!((roi.yearly_roi - -100.0).abs() < 1e-9);
    }
}
