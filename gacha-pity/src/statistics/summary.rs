use serde::{Deserialize, Serialize};

use crate::statistics::result::ProbabilityResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullSummary {
    /// Mean roll of the first success.
    pub expected_pulls: f64,
    /// Roll with the highest first-success probability (earliest on ties).
    pub most_likely_roll: u32,
    pub pulls_for_50: u32,
    pub pulls_for_90: u32,
    pub pulls_for_99: u32,
}

impl PullSummary {
    pub fn from_result(result: &ProbabilityResult) -> Self {
        let first_success = result.first_success_probabilities();

        let total: f64 = first_success.iter().sum();
        let weighted: f64 = first_success
            .iter()
            .enumerate()
            .map(|(i, &p)| (i + 1) as f64 * p)
            .sum();
        let expected_pulls = if total > 0.0 { weighted / total } else { 0.0 };

        let most_likely_roll = first_success
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((i, p)),
            })
            .map_or(0, |(i, _)| i as u32 + 1);

        // Cumulative probability always reaches 1 at hard pity, so the
        // fallback only applies to an empty result.
        let last_roll = result.len() as u32;
        let pulls_for = |q: f64| result.pulls_for_probability(q).unwrap_or(last_roll);

        Self {
            expected_pulls,
            most_likely_roll,
            pulls_for_50: pulls_for(0.5),
            pulls_for_90: pulls_for(0.9),
            pulls_for_99: pulls_for(0.99),
        }
    }

    pub fn print_summary(&self) {
        println!("Expected pulls: {:.2}", self.expected_pulls);
        println!("Most likely roll: {}", self.most_likely_roll);
        println!("50% chance at pull: {}", self.pulls_for_50);
        println!("90% chance at pull: {}", self.pulls_for_90);
        println!("99% chance at pull: {}", self.pulls_for_99);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{banner::BannerConfigBuilder, statistics::engine::calculate};

    #[test]
    fn test_zero_width_window_summary() -> anyhow::Result<()> {
        let config = BannerConfigBuilder::new("Game", "Banner")
            .base_rate(0.1)
            .soft_pity_start(5)
            .hard_pity(5)
            .rate_increase(0.1)
            .build()?;
        let summary = PullSummary::from_result(&calculate(&config)?);
        assert!((summary.expected_pulls - 4.0951).abs() < 1e-9);
        assert_eq!(summary.most_likely_roll, 5);
        assert_eq!(summary.pulls_for_50, 5);
        assert_eq!(summary.pulls_for_99, 5);
        Ok(())
    }

    #[test]
    fn test_single_roll_summary() -> anyhow::Result<()> {
        let config = BannerConfigBuilder::new("Game", "Banner")
            .base_rate(0.5)
            .soft_pity_start(1)
            .hard_pity(1)
            .build()?;
        let summary = PullSummary::from_result(&calculate(&config)?);
        assert_eq!(summary.expected_pulls, 1.0);
        assert_eq!(summary.most_likely_roll, 1);
        assert_eq!(summary.pulls_for_90, 1);
        Ok(())
    }

    #[test]
    fn test_soft_pity_pulls_mode_into_window() -> anyhow::Result<()> {
        let config = BannerConfigBuilder::new("Star Rail", "Limited")
            .base_rate(0.006)
            .soft_pity_start(73)
            .hard_pity(90)
            .rate_increase(0.07)
            .build()?;
        let summary = PullSummary::from_result(&calculate(&config)?);
        assert!(summary.most_likely_roll >= 73 && summary.most_likely_roll < 90);
        assert!(summary.expected_pulls > 50.0 && summary.expected_pulls < 80.0);
        assert!(summary.pulls_for_50 <= summary.pulls_for_90);
        assert!(summary.pulls_for_90 <= summary.pulls_for_99);
        assert!(summary.pulls_for_99 <= 90);
        Ok(())
    }
}
