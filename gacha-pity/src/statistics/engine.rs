//! Closed-form pity probabilities.
//!
//! Every roll is an independent Bernoulli trial whose success rate depends
//! only on its position since the last success, so the whole distribution
//! over "which roll brings the first success" follows from one pass over the
//! per-roll rates.

use crate::{
    banner::BannerConfig,
    error::{Error, Result},
    statistics::result::ProbabilityResult,
};

/// Success probability of each roll `1..=hard_pity`, assuming no success on
/// any earlier roll.
///
/// The soft pity formula saturates at 1.0, and the hard pity roll is always
/// exactly 1.0 regardless of what the formula would give.
pub fn compute_raw_probabilities(config: &BannerConfig) -> Result<Vec<f64>> {
    config.validate()?;

    let base_rate = config.base_rate();
    let soft_pity_start = config.soft_pity_start();
    let hard_pity = config.hard_pity();
    let rate_increase = config.rate_increase();
    let offset = config.increment_offset();

    let probabilities = (1..=hard_pity)
        .map(|roll| {
            if roll == hard_pity {
                1.0
            } else if roll < soft_pity_start {
                base_rate
            } else {
                let increments = offset.increments(roll, soft_pity_start) as f64;
                (base_rate + increments * rate_increase).clamp(0.0, 1.0)
            }
        })
        .collect();

    Ok(probabilities)
}

/// Probability that the first success lands exactly on each roll.
pub fn compute_first_success_probabilities(raw: &[f64]) -> Vec<f64> {
    let mut no_success_yet = 1.0;
    raw.iter()
        .map(|&p| {
            let first = no_success_yet * p;
            no_success_yet *= 1.0 - p;
            first
        })
        .collect()
}

/// Probability of at least one success by each roll, as the complement of
/// the inclusive running product of failure probabilities.
pub fn compute_cumulative_probabilities(raw: &[f64]) -> Vec<f64> {
    let mut no_success_at_all = 1.0;
    raw.iter()
        .map(|&p| {
            no_success_at_all *= 1.0 - p;
            (1.0 - no_success_at_all).clamp(0.0, 1.0)
        })
        .collect()
}

/// Cumulative probabilities as the running sum of first-success
/// probabilities. Agrees with [`compute_cumulative_probabilities`] up to
/// rounding.
pub fn cumulative_from_first_success(first_success: &[f64]) -> Vec<f64> {
    first_success
        .iter()
        .scan(0.0, |total, &p| {
            *total += p;
            Some(total.min(1.0))
        })
        .collect()
}

/// Runs the full pipeline for one banner and checks the result before
/// handing it back.
pub fn calculate(config: &BannerConfig) -> Result<ProbabilityResult> {
    let raw = compute_raw_probabilities(config)?;
    let first_success = compute_first_success_probabilities(&raw);
    let cumulative = compute_cumulative_probabilities(&raw);

    let series = [
        ("raw", &raw),
        ("first success", &first_success),
        ("cumulative", &cumulative),
    ];
    for (name, values) in series {
        if let Some(index) = values.iter().position(|p| !p.is_finite()) {
            return Err(Error::Calculation {
                banner: config.id().clone(),
                reason: format!("{name} probability for roll {} is not finite", index + 1),
            });
        }
    }

    let result = ProbabilityResult::new(config.id().clone(), raw, first_success, cumulative);
    result.validate(config.hard_pity())?;

    log::debug!(
        "Calculated {} rolls for {} (soft pity {}, hard pity {})",
        result.len(),
        config.id(),
        config.soft_pity_start(),
        config.hard_pity()
    );

    Ok(result)
}
