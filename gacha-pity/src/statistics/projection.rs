use serde::{Deserialize, Serialize};

use crate::{
    banner::{BannerConfig, BannerId},
    error::{ConfigViolation, Error, Result},
    statistics::engine::compute_raw_probabilities,
};

/// Odds for a player partway into a banner's pity cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullProjection {
    pub banner: BannerId,
    pub current_pity: u32,
    pub planned_pulls: u32,
    /// At least one success within the planned pulls.
    pub success_probability: f64,
    /// At least one success, and that success being the rate-up item.
    pub rate_up_probability: f64,
}

/// Projects `planned_pulls` more rolls from `current_pity` failed rolls.
///
/// `lost_previous` marks that the player's last success was not the rate-up
/// item; on banners with a rate-up guarantee the next success is then
/// certain to be rate-up.
pub fn project_pulls(
    config: &BannerConfig,
    current_pity: u32,
    planned_pulls: u32,
    lost_previous: bool,
) -> Result<PullProjection> {
    let hard_pity = config.hard_pity();
    let reject = |violation| Error::Configuration {
        banner: config.id().clone(),
        violation,
    };
    if current_pity >= hard_pity {
        return Err(reject(ConfigViolation::PityBeyondHardPity {
            current_pity,
            hard_pity,
        }));
    }
    if planned_pulls == 0 {
        return Err(reject(ConfigViolation::NoPlannedPulls));
    }

    let raw = compute_raw_probabilities(config)?;
    let start = current_pity as usize;
    let end = (current_pity.saturating_add(planned_pulls)).min(hard_pity) as usize;
    let no_success: f64 = raw[start..end].iter().map(|p| 1.0 - p).product();
    let success_probability = (1.0 - no_success).clamp(0.0, 1.0);

    let rate_up_probability = if lost_previous && config.guaranteed_rate_up() {
        success_probability
    } else {
        success_probability * config.rate_up_chance().unwrap_or(1.0)
    };

    Ok(PullProjection {
        banner: config.id().clone(),
        current_pity,
        planned_pulls,
        success_probability,
        rate_up_probability,
    })
}
