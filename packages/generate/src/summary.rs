//! Visitor summary sampling.

use heatmap_models::{AnalyticsSummary, PeakHour, round_dp};
use rand::Rng;

/// Hour ranges and the inclusive visitor bounds sampled for each.
const PEAK_HOUR_RANGES: [(&str, u32, u32); 5] = [
    ("10-11 AM", 120, 160),
    ("12-1 PM", 180, 220),
    ("2-3 PM", 150, 180),
    ("5-6 PM", 200, 240),
    ("7-8 PM", 170, 200),
];

/// Samples store counters within fixed bounds. Independent of any point data.
pub fn generate_summary<R: Rng + ?Sized>(rng: &mut R) -> AnalyticsSummary {
    AnalyticsSummary {
        total_visitors: rng.gen_range(1000..=1500),
        avg_dwell_time: round_dp(rng.gen_range(15.0..=25.0), 1),
        conversion_rate: round_dp(rng.gen_range(30.0..=40.0), 1),
        peak_hours: PEAK_HOUR_RANGES
            .iter()
            .map(|&(hour, lo, hi)| PeakHour {
                hour: hour.to_string(),
                visitors: rng.gen_range(lo..=hi),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn counters_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let s = generate_summary(&mut rng);
            assert!((1000..=1500).contains(&s.total_visitors));
            assert!((15.0..=25.0).contains(&s.avg_dwell_time));
            assert!((30.0..=40.0).contains(&s.conversion_rate));
            assert_eq!(s.peak_hours.len(), PEAK_HOUR_RANGES.len());
            for (peak, (hour, lo, hi)) in s.peak_hours.iter().zip(PEAK_HOUR_RANGES) {
                assert_eq!(peak.hour, hour);
                assert!((lo..=hi).contains(&peak.visitors));
            }
        }
    }

    #[test]
    fn rates_have_one_decimal() {
        let s = generate_summary(&mut ChaCha8Rng::seed_from_u64(4));
        assert!((s.avg_dwell_time * 10.0 - (s.avg_dwell_time * 10.0).round()).abs() < 1e-9);
        assert!((s.conversion_rate * 10.0 - (s.conversion_rate * 10.0).round()).abs() < 1e-9);
    }
}
