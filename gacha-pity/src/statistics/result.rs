use serde::{Deserialize, Serialize};

use crate::{
    banner::BannerId,
    error::{Error, Result},
};

/// Tolerance for the first-success distribution summing to one.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-5;

/// Tolerance for the final cumulative probability reaching one.
pub const CERTAINTY_TOLERANCE: f64 = 1e-9;

/// One roll's worth of results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollRow {
    pub roll: u32,
    pub raw: f64,
    pub first_success: f64,
    pub cumulative: f64,
}

/// The three per-roll series for one banner. Index `i` describes roll `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    banner: BannerId,
    raw_probabilities: Vec<f64>,
    first_success_probabilities: Vec<f64>,
    cumulative_probabilities: Vec<f64>,
}

impl ProbabilityResult {
    pub fn new(
        banner: BannerId,
        raw_probabilities: Vec<f64>,
        first_success_probabilities: Vec<f64>,
        cumulative_probabilities: Vec<f64>,
    ) -> Self {
        Self {
            banner,
            raw_probabilities,
            first_success_probabilities,
            cumulative_probabilities,
        }
    }

    pub fn banner(&self) -> &BannerId {
        &self.banner
    }

    pub fn raw_probabilities(&self) -> &[f64] {
        &self.raw_probabilities
    }

    pub fn first_success_probabilities(&self) -> &[f64] {
        &self.first_success_probabilities
    }

    pub fn cumulative_probabilities(&self) -> &[f64] {
        &self.cumulative_probabilities
    }

    pub fn len(&self) -> usize {
        self.raw_probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_probabilities.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RollRow> + '_ {
        self.raw_probabilities
            .iter()
            .zip(&self.first_success_probabilities)
            .zip(&self.cumulative_probabilities)
            .enumerate()
            .map(|(i, ((&raw, &first_success), &cumulative))| RollRow {
                roll: i as u32 + 1,
                raw,
                first_success,
                cumulative,
            })
    }

    /// First roll by which the chance of at least one success has reached
    /// `probability`.
    pub fn pulls_for_probability(&self, probability: f64) -> Option<u32> {
        self.cumulative_probabilities
            .iter()
            .position(|&c| c >= probability)
            .map(|i| i as u32 + 1)
    }

    /// Checks the shape of a computed result against the banner's hard pity.
    pub fn validate(&self, hard_pity: u32) -> Result<()> {
        let expected = hard_pity as usize;
        let series = [
            ("raw", &self.raw_probabilities),
            ("first success", &self.first_success_probabilities),
            ("cumulative", &self.cumulative_probabilities),
        ];

        for (name, values) in series {
            if values.len() != expected {
                return Err(self.invalid(format!(
                    "{name} probabilities have length {} but hard pity is {hard_pity}",
                    values.len()
                )));
            }
            if let Some(index) = values.iter().position(|p| !(0.0..=1.0).contains(p)) {
                return Err(self.invalid(format!(
                    "{name} probability for roll {} is outside [0, 1]: {}",
                    index + 1,
                    values[index]
                )));
            }
        }

        if let Some(index) = self
            .cumulative_probabilities
            .windows(2)
            .position(|w| w[1] < w[0])
        {
            return Err(self.invalid(format!(
                "cumulative probability decreases after roll {}",
                index + 1
            )));
        }

        if let Some(&last) = self.cumulative_probabilities.last() {
            if (last - 1.0).abs() > CERTAINTY_TOLERANCE {
                return Err(self.invalid(format!(
                    "cumulative probability at hard pity is {last}, expected 1"
                )));
            }
        }

        let total: f64 = self.first_success_probabilities.iter().sum();
        if !self.is_empty() && (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(self.invalid(format!(
                "first success probabilities sum to {total}, expected 1"
            )));
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> Error {
        Error::Validation {
            banner: self.banner.clone(),
            reason,
        }
    }
}
