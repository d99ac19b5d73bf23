#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic data source for the heatmap service.
//!
//! Produces store foot-traffic points jittered around fixed hotspots, the
//! fixed catalogue of candidate city sites, and randomly sampled visitor
//! counters. Every generator that needs randomness takes the generator as
//! an argument so callers control reproducibility.

pub mod city;
pub mod store;
pub mod summary;

pub use city::{CANDIDATE_SITES, CandidateSite, generate_candidates};
pub use store::{
    DEFAULT_POINT_COUNT, HOTSPOTS, Hotspot, MAX_SPREAD, STORE_HEIGHT, STORE_WIDTH,
    generate_points,
};
pub use summary::generate_summary;
