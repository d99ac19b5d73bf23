//! Seeded k-means over 2D coordinates.
//!
//! Each initialisation seeds centroids with k-means++ and then runs Lloyd
//! iterations until the centroid shift drops under a tolerance scaled by
//! the data variance. Several initialisations are drawn from a single
//! `ChaCha8` stream and the one with the lowest inertia is kept, so a fixed
//! seed always produces the same partition for the same input.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::AnalyticsError;

/// A 2D coordinate.
pub type Coord = [f64; 2];

/// Tuning knobs for [`fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansConfig {
    /// Number of independent initialisations.
    pub n_init: usize,
    /// Maximum Lloyd iterations per initialisation.
    pub max_iter: usize,
    /// Convergence tolerance relative to the mean per-axis variance.
    pub tolerance: f64,
    /// Seed for the initialisation stream.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Final centroid per group.
    pub centroids: Vec<Coord>,
    /// Group index for each input point.
    pub labels: Vec<usize>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
}

/// Partitions `points` into `k` groups.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidClusterCount`] if `k` is zero
/// * [`AnalyticsError::TooFewPoints`] if `k` exceeds the number of distinct
///   positions in `points`, including when `points` is empty
pub fn fit(
    points: &[Coord],
    k: usize,
    config: &KMeansConfig,
) -> Result<KMeansFit, AnalyticsError> {
    if k == 0 {
        return Err(AnalyticsError::InvalidClusterCount);
    }
    let distinct = distinct_positions(points);
    if k > distinct {
        return Err(AnalyticsError::TooFewPoints { k, distinct });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let threshold = config.tolerance * mean_variance(points);

    let mut best = run_once(points, k, config.max_iter, threshold, &mut rng);
    for run in 1..config.n_init {
        let candidate = run_once(points, k, config.max_iter, threshold, &mut rng);
        if candidate.inertia < best.inertia {
            log::trace!(
                "k-means init {run} improved inertia {:.3} -> {:.3}",
                best.inertia,
                candidate.inertia
            );
            best = candidate;
        }
    }

    Ok(best)
}

/// Number of distinct `(x, y)` positions in `points`.
fn distinct_positions(points: &[Coord]) -> usize {
    // `+ 0.0` folds -0.0 into 0.0 so both hash to the same bits.
    points
        .iter()
        .map(|c| ((c[0] + 0.0).to_bits(), (c[1] + 0.0).to_bits()))
        .collect::<BTreeSet<_>>()
        .len()
}

fn run_once<R: Rng + ?Sized>(
    points: &[Coord],
    k: usize,
    max_iter: usize,
    threshold: f64,
    rng: &mut R,
) -> KMeansFit {
    let mut centroids = init_centroids(points, k, rng);
    let mut labels = vec![0; points.len()];

    for _ in 0..max_iter {
        assign(points, &centroids, &mut labels);
        let updated = update_centroids(points, &mut labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(a, b)| dist2(a, b))
            .sum();
        centroids = updated;
        if shift <= threshold {
            break;
        }
    }

    assign(points, &centroids, &mut labels);
    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &l)| dist2(p, &centroids[l]))
        .sum();

    KMeansFit {
        centroids,
        labels,
        inertia,
    }
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen centroid.
fn init_centroids<R: Rng + ?Sized>(points: &[Coord], k: usize, rng: &mut R) -> Vec<Coord> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    let mut closest: Vec<f64> = points.iter().map(|p| dist2(p, &centroids[0])).collect();

    while centroids.len() < k {
        let next = points[sample_weighted(&closest, rng)];
        for (d, p) in closest.iter_mut().zip(points) {
            *d = d.min(dist2(p, &next));
        }
        centroids.push(next);
    }

    centroids
}

fn sample_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.gen_range(0..weights.len());
    }

    let mut target = rng.gen_range(0.0..total);
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        last_positive = i;
        if target < w {
            return i;
        }
        target -= w;
    }
    last_positive
}

fn assign(points: &[Coord], centroids: &[Coord], labels: &mut [usize]) {
    for (p, label) in points.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (j, c) in centroids.iter().enumerate() {
            let d = dist2(p, c);
            if d < best_dist {
                best_dist = d;
                best = j;
            }
        }
        *label = best;
    }
}

/// Recomputes centroids as member means. A group left empty takes over the
/// point farthest from its current centroid, provided that point's group
/// keeps at least one member.
#[allow(clippy::cast_precision_loss)]
fn update_centroids(points: &[Coord], labels: &mut [usize], centroids: &[Coord]) -> Vec<Coord> {
    let k = centroids.len();
    let mut sums = vec![[0.0, 0.0]; k];
    let mut counts = vec![0usize; k];

    for (p, &l) in points.iter().zip(labels.iter()) {
        sums[l][0] += p[0];
        sums[l][1] += p[1];
        counts[l] += 1;
    }

    let mut distances: Vec<f64> = points
        .iter()
        .zip(labels.iter())
        .map(|(p, &l)| dist2(p, &centroids[l]))
        .collect();

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let Some(far) = (0..points.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| distances[a].total_cmp(&distances[b]))
        else {
            continue;
        };

        let from = labels[far];
        let p = points[far];
        sums[from][0] -= p[0];
        sums[from][1] -= p[1];
        counts[from] -= 1;
        sums[empty] = p;
        counts[empty] = 1;
        labels[far] = empty;
        distances[far] = 0.0;
    }

    (0..k)
        .map(|j| {
            if counts[j] == 0 {
                centroids[j]
            } else {
                let n = counts[j] as f64;
                [sums[j][0] / n, sums[j][1] / n]
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean_variance(points: &[Coord]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let var_x = points.iter().map(|p| (p[0] - mean_x).powi(2)).sum::<f64>() / n;
    let var_y = points.iter().map(|p| (p[1] - mean_y).powi(2)).sum::<f64>() / n;
    f64::midpoint(var_x, var_y)
}

fn dist2(a: &Coord, b: &Coord) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}
