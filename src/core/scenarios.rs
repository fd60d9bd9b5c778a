use crate::domain::model::{round_to, ScenarioResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Demo estimates for named reduction scenarios. The figures are drawn from
/// fixed ranges, not modelled from the footprint.
pub struct ScenarioSimulator {
    seed: u64,
}

impl ScenarioSimulator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn simulate(&self, names: &[String]) -> Vec<ScenarioResult> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        names
            .iter()
            .map(|name| ScenarioResult {
                scenario_name: name.clone(),
                emissions_reduction: round_to(rng.gen_range(5.0..30.0), 1),
                cbam_tax_saving: round_to(rng.gen_range(1000.0..50000.0), 2),
                roi_years: round_to(rng.gen_range(2.0..8.0), 1),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_within_ranges() {
        let names: Vec<String> = (1..=20).map(|i| format!("方案{}", i)).collect();
        let results = ScenarioSimulator::new(42).simulate(&names);
        assert_eq!(results.len(), 20);
        for r in &results {
            assert!((5.0..=30.0).contains(&r.emissions_reduction));
            assert!((1000.0..=50000.0).contains(&r.cbam_tax_saving));
            assert!((2.0..=8.0).contains(&r.roi_years));
        }
        assert_eq!(results[0].scenario_name, "方案1");
    }

    #[test]
    fn test_seeded_results_repeat() {
        let names = vec!["光伏自发自用".to_string(), "余热回收".to_string()];
        assert_eq!(
            ScenarioSimulator::new(3).simulate(&names),
            ScenarioSimulator::new(3).simulate(&names)
        );
    }

    #[test]
    fn test_no_scenarios() {
        assert!(ScenarioSimulator::new(1).simulate(&[]).is_empty());
    }
}
