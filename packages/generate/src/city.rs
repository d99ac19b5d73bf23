//! Candidate city site catalogue.

use heatmap_models::Candidate;

/// Fixed inputs for one candidate site.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSite {
    /// Site name.
    pub name: &'static str,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Estimated demand.
    pub demand: u32,
    /// Resident population.
    pub population: u32,
}

/// Sites evaluated by the city placement scenario.
pub const CANDIDATE_SITES: [CandidateSite; 8] = [
    CandidateSite {
        name: "Downtown",
        lat: 28.6139,
        lon: 77.2090,
        demand: 850,
        population: 125_000,
    },
    CandidateSite {
        name: "North District",
        lat: 28.7041,
        lon: 77.1025,
        demand: 620,
        population: 89_000,
    },
    CandidateSite {
        name: "South Hub",
        lat: 28.5355,
        lon: 77.3910,
        demand: 780,
        population: 105_000,
    },
    CandidateSite {
        name: "East Market",
        lat: 28.6328,
        lon: 77.2773,
        demand: 540,
        population: 72_000,
    },
    CandidateSite {
        name: "West Plaza",
        lat: 28.6692,
        lon: 77.1178,
        demand: 690,
        population: 95_000,
    },
    CandidateSite {
        name: "Central Square",
        lat: 28.6289,
        lon: 77.2065,
        demand: 920,
        population: 140_000,
    },
    CandidateSite {
        name: "Tech Park",
        lat: 28.5672,
        lon: 77.3250,
        demand: 450,
        population: 58_000,
    },
    CandidateSite {
        name: "Old Town",
        lat: 28.6562,
        lon: 77.2410,
        demand: 380,
        population: 45_000,
    },
];

/// Returns the candidate catalogue with derived score and density, sorted
/// by descending score.
#[must_use]
pub fn generate_candidates() -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = CANDIDATE_SITES
        .iter()
        .map(|s| Candidate::new(s.name, s.lat, s.lon, s.demand, s.population))
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_sorted_by_score() {
        let candidates = generate_candidates();
        assert_eq!(candidates.len(), CANDIDATE_SITES.len());
        for pair in candidates.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(candidates[0].name, "Central Square");
        assert_eq!(candidates.last().unwrap().name, "Old Town");
    }

    #[test]
    fn derived_fields_match_model_formula() {
        for c in generate_candidates() {
            let expected = Candidate::new(c.name.clone(), c.lat, c.lon, c.demand, c.population);
            assert_eq!(c, expected);
        }
    }
}
