//! Store foot-traffic generation.

use std::f64::consts::TAU;

use chrono::{TimeDelta, Utc};
use heatmap_models::{SpatialPoint, StoreZone};
use rand::Rng;

/// Width of the store floor grid.
pub const STORE_WIDTH: u32 = 50;

/// Height of the store floor grid.
pub const STORE_HEIGHT: u32 = 30;

/// Number of points produced per store snapshot.
pub const DEFAULT_POINT_COUNT: usize = 500;

/// Upper bound (exclusive) of the jitter radius around a hotspot.
pub const MAX_SPREAD: f64 = 5.0;

/// Maximum age of a generated observation, in seconds.
const MAX_AGE_SECS: i64 = 3600;

/// A fixed anchor that synthetic traffic clusters around.
#[derive(Debug, Clone, Copy)]
pub struct Hotspot {
    /// Zone the anchor belongs to.
    pub zone: StoreZone,
    /// Anchor x coordinate.
    pub x: f64,
    /// Anchor y coordinate.
    pub y: f64,
    /// Base intensity before random scaling.
    pub intensity: f64,
}

/// Hotspots on the default store floor.
pub const HOTSPOTS: [Hotspot; 4] = [
    Hotspot {
        zone: StoreZone::Entrance,
        x: 10.0,
        y: 8.0,
        intensity: 0.9,
    },
    Hotspot {
        zone: StoreZone::Electronics,
        x: 40.0,
        y: 12.0,
        intensity: 0.8,
    },
    Hotspot {
        zone: StoreZone::Groceries,
        x: 25.0,
        y: 20.0,
        intensity: 0.7,
    },
    Hotspot {
        zone: StoreZone::Checkout,
        x: 15.0,
        y: 25.0,
        intensity: 0.6,
    },
];

/// Generates `count` traffic points on a `width` x `height` grid.
///
/// Each point picks a hotspot uniformly, is offset by a random radius in
/// `[0, 5)` at a random angle, and is clamped into `[0, width] x [0, height]`.
/// Intensity is the hotspot's base intensity scaled by a factor in
/// `[0.5, 1.0)`.
pub fn generate_points<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    count: usize,
) -> Vec<SpatialPoint> {
    let now = Utc::now();
    let max_x = f64::from(width);
    let max_y = f64::from(height);

    let points: Vec<SpatialPoint> = (0..count)
        .map(|id| {
            let hotspot = HOTSPOTS[rng.gen_range(0..HOTSPOTS.len())];
            let spread = rng.gen_range(0.0..MAX_SPREAD);
            let angle = rng.gen_range(0.0..TAU);

            let x = angle.cos().mul_add(spread, hotspot.x).clamp(0.0, max_x);
            let y = angle.sin().mul_add(spread, hotspot.y).clamp(0.0, max_y);

            SpatialPoint {
                id,
                x,
                y,
                intensity: hotspot.intensity * rng.gen_range(0.5..1.0),
                timestamp: now - TimeDelta::seconds(rng.gen_range(0..=MAX_AGE_SECS)),
                zone: hotspot.zone,
            }
        })
        .collect();

    log::debug!("Generated {} store points on a {width}x{height} grid", points.len());
    points
}
