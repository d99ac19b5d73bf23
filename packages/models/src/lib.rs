#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared domain types for the heatmap analysis service.
//!
//! Covers the in-store traffic scenario (spatial points grouped into zone
//! clusters) and the city placement scenario (candidate sites ranked by a
//! composite score). Nothing here is persisted; every value is regenerated
//! per request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Weight of demand in the candidate suitability score.
pub const DEMAND_WEIGHT: f64 = 0.6;

/// Weight of population (in thousands) in the candidate suitability score.
pub const POPULATION_WEIGHT: f64 = 0.4;

/// Named store area a synthetic traffic point was generated around.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StoreZone {
    /// Store entrance, the busiest area.
    Entrance,
    /// Electronics department.
    Electronics,
    /// Grocery aisles.
    Groceries,
    /// Checkout lanes.
    Checkout,
}

impl StoreZone {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Entrance,
            Self::Electronics,
            Self::Groceries,
            Self::Checkout,
        ]
    }

    /// Label used for the zone cluster at the same position.
    #[must_use]
    pub const fn cluster_label(self) -> &'static str {
        match self {
            Self::Entrance => "Entrance Zone",
            Self::Electronics => "Electronics Section",
            Self::Groceries => "Grocery Aisle",
            Self::Checkout => "Checkout Area",
        }
    }

    /// Static merchandising recommendation for the zone.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Entrance => "Place promotional items and seasonal products",
            Self::Electronics => "High-value items with security measures",
            Self::Groceries => "Essential items with high turnover rate",
            Self::Checkout => "Impulse purchase items and small goods",
        }
    }
}

/// A single synthetic foot-traffic observation inside the store grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialPoint {
    /// Sequential id within the generated batch.
    pub id: usize,
    /// Horizontal grid coordinate.
    pub x: f64,
    /// Vertical grid coordinate.
    pub y: f64,
    /// Traffic weight, never negative. Defaults to `1.0` when absent.
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    /// When the observation was recorded.
    pub timestamp: DateTime<Utc>,
    /// Hotspot the point was generated around.
    pub zone: StoreZone,
}

const fn default_intensity() -> f64 {
    1.0
}

/// A group of spatial points produced by the clustering pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCluster {
    /// Human-readable zone label.
    pub zone: String,
    /// Mean x of the member points.
    pub center_x: f64,
    /// Mean y of the member points.
    pub center_y: f64,
    /// Number of member points.
    #[serde(rename = "avg_traffic")]
    pub member_count: usize,
    /// Static layout recommendation for the zone.
    pub recommendation: String,
}

/// A named city location considered for a new store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Location name.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Estimated demand.
    pub demand: u32,
    /// Resident population.
    pub population: u32,
    /// Composite suitability score.
    pub score: f64,
    /// Demand per thousand residents.
    pub traffic_density: f64,
}

impl Candidate {
    /// Builds a candidate and derives its score and traffic density.
    ///
    /// This is the only place the derived fields are computed, so every
    /// candidate list in the service agrees on them.
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, demand: u32, population: u32) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            demand,
            population,
            score: Self::score_for(demand, population),
            traffic_density: Self::density_for(demand, population),
        }
    }

    /// `0.6 * demand + 0.4 * population / 1000`, rounded to two decimals.
    #[must_use]
    pub fn score_for(demand: u32, population: u32) -> f64 {
        round_dp(
            f64::from(demand).mul_add(
                DEMAND_WEIGHT,
                f64::from(population) / 1000.0 * POPULATION_WEIGHT,
            ),
            2,
        )
    }

    /// `demand / (population / 1000)`, rounded to two decimals.
    ///
    /// A zero population yields `0.0`.
    #[must_use]
    pub fn density_for(demand: u32, population: u32) -> f64 {
        if population == 0 {
            return 0.0;
        }
        round_dp(f64::from(demand) / (f64::from(population) / 1000.0), 2)
    }
}

/// Financial projection for opening a store at a candidate location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiProjection {
    /// Candidate name.
    pub location: String,
    /// Up-front investment.
    pub investment: f64,
    /// Projected revenue per month.
    pub projected_monthly_revenue: f64,
    /// Months until the investment is recovered. `None` when revenue is zero.
    pub break_even_months: Option<f64>,
    /// First-year return as a percentage of the investment.
    pub yearly_roi: f64,
}

/// Visitor counts for one hour range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHour {
    /// Hour range label, e.g. `"12-1 PM"`.
    pub hour: String,
    /// Visitors in that range.
    pub visitors: u32,
}

/// Store-level counters sampled for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Visitors today.
    pub total_visitors: u32,
    /// Average dwell time in minutes.
    pub avg_dwell_time: f64,
    /// Conversion rate in percent.
    pub conversion_rate: f64,
    /// Busiest hour ranges.
    pub peak_hours: Vec<PeakHour>,
}

/// Rounds `value` to `decimals` places, half away from zero.
#[must_use]
pub fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_score_and_density() {
        let c = Candidate::new("Downtown", 28.6139, 77.2090, 850, 125_000);
        assert!((c.score - 560.0).abs() < 1e-9);
        assert!((c.traffic_density - 6.8).abs() < 1e-9);
    }

    #[test]
    fn derived_fields_are_stable() {
        let a = Candidate::new("A", 0.0, 0.0, 620, 89_000);
        let b = Candidate::new("B", 1.0, 1.0, 620, 89_000);
        assert!((a.score - b.score).abs() < f64::EPSILON);
        assert!((a.traffic_density - b.traffic_density).abs() < f64::EPSILON);
        assert!((a.score - 407.6).abs() < 1e-9);
        assert!((a.traffic_density - 6.97).abs() < 1e-9);
    }

    #[test]
    fn zero_population_density_is_zero() {
        assert!(Candidate::density_for(100, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn cluster_serializes_member_count_as_avg_traffic() {
        let cluster = ZoneCluster {
            zone: "Entrance Zone".to_string(),
            center_x: 10.0,
            center_y: 8.0,
            member_count: 12,
            recommendation: StoreZone::Entrance.recommendation().to_string(),
        };
        let json = serde_json::to_value(&cluster).unwrap();
        assert_eq!(json["avg_traffic"], 12);
        assert!(json.get("member_count").is_none());
    }

    #[test]
    fn point_intensity_defaults_to_one() {
        let point: SpatialPoint = serde_json::from_str(
            r#"{"id":1,"x":3.0,"y":4.0,"timestamp":"2024-01-15T14:30:00Z","zone":"Checkout"}"#,
        )
        .unwrap();
        assert!((point.intensity - 1.0).abs() < f64::EPSILON);
        assert_eq!(point.zone, StoreZone::Checkout);
    }

    #[test]
    fn zone_labels_follow_variant_order() {
        let labels: Vec<&str> = StoreZone::all()
            .iter()
            .map(|z| z.cluster_label())
            .collect();
        assert_eq!(
            labels,
            [
                "Entrance Zone",
                "Electronics Section",
                "Grocery Aisle",
                "Checkout Area"
            ]
        );
    }

    #[test]
    fn round_dp_rounds_half_away_from_zero() {
        assert!((round_dp(18.115_942, 1) - 18.1).abs() < 1e-9);
        assert!((round_dp(-33.76, 1) - -33.8).abs() < 1e-9);
    }
}
