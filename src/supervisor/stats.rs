use serde::Serialize;

/// Aggregate results of one simulation run, reported verbatim as the
/// stdout lines the CLI contract requires.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub total_requests: usize,
    pub successful_lookups: usize,
    pub total_hops: u64,
    pub duration_ms: u128,
}

impl SimulationStats {
    pub fn avg_hops(&self) -> f64 {
        if self.successful_lookups == 0 {
            0.0
        } else {
            self.total_hops as f64 / self.successful_lookups as f64
        }
    }

    pub fn verdict(&self, theoretical_hops: f64) -> &'static str {
        if self.successful_lookups == 0 {
            return "no successful lookups";
        }
        if self.avg_hops() <= 1.5 * theoretical_hops {
            "scales logarithmically"
        } else {
            "may not be optimal"
        }
    }
}

/// log2(N) as a floating-point baseline. `N = 0` never occurs (argument
/// validation rejects it); `N = 1` yields `0.0`.
pub fn theoretical_hops(participant_count: usize) -> f64 {
    if participant_count <= 1 {
        0.0
    } else {
        (participant_count as f64).log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avg_hops_zero_when_nothing_succeeded() {
        let stats = SimulationStats {
            total_requests: 10,
            successful_lookups: 0,
            total_hops: 0,
            duration_ms: 5,
        };
        assert_eq!(stats.avg_hops(), 0.0);
        assert_eq!(stats.verdict(3.0), "no successful lookups");
    }

    #[test]
    fn verdict_flags_logarithmic_scaling() {
        let good = SimulationStats {
            total_requests: 100,
            successful_lookups: 100,
            total_hops: 700,
            duration_ms: 5,
        };
        assert_eq!(good.avg_hops(), 7.0);
        assert_eq!(good.verdict(theoretical_hops(100)), "scales logarithmically");

        let bad = SimulationStats {
            total_requests: 100,
            successful_lookups: 100,
            total_hops: 10000,
            duration_ms: 5,
        };
        assert_eq!(bad.verdict(theoretical_hops(100)), "may not be optimal");
    }

    #[test]
    fn theoretical_hops_matches_known_values() {
        assert_eq!(theoretical_hops(1), 0.0);
        assert!((theoretical_hops(1024) - 10.0).abs() < 1e-9);
    }
}
