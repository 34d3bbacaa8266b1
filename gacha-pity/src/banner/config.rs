use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigViolation, Error, Result};

/// Highest hard pity a banner may declare.
pub const MAX_HARD_PITY: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("{game} {banner_type}")]
pub struct BannerId {
    pub game: String,
    pub banner_type: String,
}

impl BannerId {
    pub fn new(game: impl Into<String>, banner_type: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            banner_type: banner_type.into(),
        }
    }
}

/// How many rate increments the first roll of the soft pity window receives.
///
/// `Inclusive` counts the threshold roll itself (`n - soft_pity_start + 1`),
/// `Exclusive` starts counting on the roll after it (`n - soft_pity_start`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftPityOffset {
    #[default]
    Inclusive,
    Exclusive,
}

impl SoftPityOffset {
    /// Number of increments applied on roll `roll`, which must be at or past
    /// `soft_pity_start`.
    pub fn increments(self, roll: u32, soft_pity_start: u32) -> u32 {
        let past = roll.saturating_sub(soft_pity_start);
        match self {
            SoftPityOffset::Inclusive => past + 1,
            SoftPityOffset::Exclusive => past,
        }
    }
}

/// A validated pity configuration for one banner.
///
/// Instances only come out of [`BannerConfigBuilder::build`] (JSON goes
/// through the builder as well), so every field is within its legal range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BannerConfigBuilder", into = "BannerConfigBuilder")]
pub struct BannerConfig {
    id: BannerId,
    base_rate: f64,
    four_star_rate: Option<f64>,
    soft_pity_start: u32,
    hard_pity: u32,
    rate_increase: f64,
    guaranteed_rate_up: bool,
    rate_up_chance: Option<f64>,
    increment_offset: SoftPityOffset,
}

impl BannerConfig {
    pub fn id(&self) -> &BannerId {
        &self.id
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    pub fn four_star_rate(&self) -> Option<f64> {
        self.four_star_rate
    }

    pub fn soft_pity_start(&self) -> u32 {
        self.soft_pity_start
    }

    pub fn hard_pity(&self) -> u32 {
        self.hard_pity
    }

    pub fn rate_increase(&self) -> f64 {
        self.rate_increase
    }

    pub fn guaranteed_rate_up(&self) -> bool {
        self.guaranteed_rate_up
    }

    pub fn rate_up_chance(&self) -> Option<f64> {
        self.rate_up_chance
    }

    pub fn increment_offset(&self) -> SoftPityOffset {
        self.increment_offset
    }

    /// Checks every range and ordering rule, returning the first one broken.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|violation| Error::Configuration {
            banner: self.id.clone(),
            violation,
        })
    }

    fn check(&self) -> std::result::Result<(), ConfigViolation> {
        if self.id.game.trim().is_empty() {
            return Err(ConfigViolation::EmptyIdentifier { field: "game" });
        }
        if self.id.banner_type.trim().is_empty() {
            return Err(ConfigViolation::EmptyIdentifier {
                field: "banner type",
            });
        }

        check_rate("base rate", self.base_rate)?;
        if let Some(rate) = self.four_star_rate {
            check_rate("four star rate", rate)?;
        }
        check_rate("rate increase", self.rate_increase)?;
        if let Some(chance) = self.rate_up_chance {
            check_rate("rate up chance", chance)?;
        }

        if self.soft_pity_start < 1 {
            return Err(ConfigViolation::SoftPityBelowOne(self.soft_pity_start));
        }
        if self.soft_pity_start > self.hard_pity {
            return Err(ConfigViolation::SoftPityAfterHardPity {
                soft_pity_start: self.soft_pity_start,
                hard_pity: self.hard_pity,
            });
        }
        if self.hard_pity > MAX_HARD_PITY {
            return Err(ConfigViolation::HardPityAboveMax {
                hard_pity: self.hard_pity,
                max: MAX_HARD_PITY,
            });
        }
        Ok(())
    }
}

fn check_rate(field: &'static str, value: f64) -> std::result::Result<(), ConfigViolation> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigViolation::RateOutOfRange { field, value })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerConfigBuilder {
    game: String,
    banner_type: String,
    base_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    four_star_rate: Option<f64>,
    soft_pity_start: u32,
    hard_pity: u32,
    #[serde(default)]
    rate_increase: f64,
    #[serde(default)]
    guaranteed_rate_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate_up_chance: Option<f64>,
    #[serde(default)]
    increment_offset: SoftPityOffset,
}

impl BannerConfigBuilder {
    /// Starts from the Star Rail standard banner's pity parameters.
    pub fn new(game: &str, banner_type: &str) -> Self {
        Self {
            game: game.to_string(),
            banner_type: banner_type.to_string(),
            base_rate: 0.006,
            four_star_rate: None,
            soft_pity_start: 73,
            hard_pity: 90,
            rate_increase: 0.07,
            guaranteed_rate_up: false,
            rate_up_chance: None,
            increment_offset: SoftPityOffset::Inclusive,
        }
    }

    pub fn banner_type(mut self, banner_type: &str) -> Self {
        self.banner_type = banner_type.to_string();
        self
    }

    pub fn base_rate(mut self, base_rate: f64) -> Self {
        self.base_rate = base_rate;
        self
    }

    pub fn four_star_rate(mut self, four_star_rate: f64) -> Self {
        self.four_star_rate = Some(four_star_rate);
        self
    }

    pub fn soft_pity_start(mut self, soft_pity_start: u32) -> Self {
        self.soft_pity_start = soft_pity_start;
        self
    }

    pub fn hard_pity(mut self, hard_pity: u32) -> Self {
        self.hard_pity = hard_pity;
        self
    }

    pub fn rate_increase(mut self, rate_increase: f64) -> Self {
        self.rate_increase = rate_increase;
        self
    }

    pub fn guaranteed_rate_up(mut self, guaranteed: bool) -> Self {
        self.guaranteed_rate_up = guaranteed;
        self
    }

    pub fn rate_up_chance(mut self, chance: f64) -> Self {
        self.rate_up_chance = Some(chance);
        self
    }

    pub fn increment_offset(mut self, offset: SoftPityOffset) -> Self {
        self.increment_offset = offset;
        self
    }

    pub fn build(self) -> Result<BannerConfig> {
        let config = BannerConfig {
            id: BannerId::new(self.game, self.banner_type),
            base_rate: self.base_rate,
            four_star_rate: self.four_star_rate,
            soft_pity_start: self.soft_pity_start,
            hard_pity: self.hard_pity,
            rate_increase: self.rate_increase,
            guaranteed_rate_up: self.guaranteed_rate_up,
            rate_up_chance: self.rate_up_chance,
            increment_offset: self.increment_offset,
        };
        config.validate()?;

        if let Some(chance) = config.rate_up_chance {
            if chance > 0.0 && !config.guaranteed_rate_up {
                log::warn!(
                    "Rate-up chance is set ({}) but guaranteed rate-up is off for {}",
                    chance,
                    config.id
                );
            }
        }

        Ok(config)
    }
}

impl TryFrom<BannerConfigBuilder> for BannerConfig {
    type Error = Error;

    fn try_from(builder: BannerConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<BannerConfig> for BannerConfigBuilder {
    fn from(config: BannerConfig) -> Self {
        Self {
            game: config.id.game,
            banner_type: config.id.banner_type,
            base_rate: config.base_rate,
            four_star_rate: config.four_star_rate,
            soft_pity_start: config.soft_pity_start,
            hard_pity: config.hard_pity,
            rate_increase: config.rate_increase,
            guaranteed_rate_up: config.guaranteed_rate_up,
            rate_up_chance: config.rate_up_chance,
            increment_offset: config.increment_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(result: Result<BannerConfig>) -> ConfigViolation {
        match result {
            Err(Error::Configuration { violation, .. }) => violation,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_accepts_live_banner() -> anyhow::Result<()> {
        let config = BannerConfigBuilder::new("Genshin Impact", "Weapon")
            .base_rate(0.007)
            .four_star_rate(0.066)
            .soft_pity_start(62)
            .hard_pity(80)
            .rate_increase(0.07)
            .guaranteed_rate_up(true)
            .rate_up_chance(0.75)
            .build()?;
        assert_eq!(config.id().to_string(), "Genshin Impact Weapon");
        assert_eq!(config.hard_pity(), 80);
        assert_eq!(config.rate_up_chance(), Some(0.75));
        assert_eq!(config.increment_offset(), SoftPityOffset::Inclusive);
        Ok(())
    }

    #[test]
    fn test_rates_out_of_range_are_rejected() {
        let err = violation(BannerConfigBuilder::new("g", "b").base_rate(1.5).build());
        assert_eq!(
            err,
            ConfigViolation::RateOutOfRange {
                field: "base rate",
                value: 1.5
            }
        );

        let err = violation(BannerConfigBuilder::new("g", "b").rate_increase(-0.1).build());
        assert!(matches!(
            err,
            ConfigViolation::RateOutOfRange {
                field: "rate increase",
                ..
            }
        ));

        let err = violation(BannerConfigBuilder::new("g", "b").rate_up_chance(2.0).build());
        assert!(matches!(
            err,
            ConfigViolation::RateOutOfRange {
                field: "rate up chance",
                ..
            }
        ));

        let err = violation(BannerConfigBuilder::new("g", "b").four_star_rate(-1.0).build());
        assert!(matches!(
            err,
            ConfigViolation::RateOutOfRange {
                field: "four star rate",
                ..
            }
        ));
    }

    #[test]
    fn test_nan_rate_is_rejected() {
        let err = violation(BannerConfigBuilder::new("g", "b").base_rate(f64::NAN).build());
        assert!(matches!(err, ConfigViolation::RateOutOfRange { .. }));
    }

    #[test]
    fn test_pity_ordering_rules() {
        let err = violation(
            BannerConfigBuilder::new("g", "b")
                .soft_pity_start(91)
                .hard_pity(90)
                .build(),
        );
        assert_eq!(
            err,
            ConfigViolation::SoftPityAfterHardPity {
                soft_pity_start: 91,
                hard_pity: 90
            }
        );

        let err = violation(BannerConfigBuilder::new("g", "b").soft_pity_start(0).build());
        assert_eq!(err, ConfigViolation::SoftPityBelowOne(0));

        let err = violation(
            BannerConfigBuilder::new("g", "b")
                .soft_pity_start(150)
                .hard_pity(201)
                .build(),
        );
        assert_eq!(
            err,
            ConfigViolation::HardPityAboveMax {
                hard_pity: 201,
                max: MAX_HARD_PITY
            }
        );
    }

    #[test]
    fn test_soft_pity_may_equal_hard_pity() {
        let config = BannerConfigBuilder::new("g", "b")
            .soft_pity_start(5)
            .hard_pity(5)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_empty_game_is_rejected() {
        let err = violation(BannerConfigBuilder::new("  ", "Standard").build());
        assert_eq!(err, ConfigViolation::EmptyIdentifier { field: "game" });
    }

    #[test]
    fn test_json_goes_through_validation() {
        let json = r#"{
            "game": "Star Rail",
            "banner_type": "Light Cone",
            "base_rate": 0.008,
            "soft_pity_start": 65,
            "hard_pity": 80,
            "rate_increase": 0.07,
            "guaranteed_rate_up": true,
            "rate_up_chance": 0.75,
            "increment_offset": "exclusive"
        }"#;
        let config: BannerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.soft_pity_start(), 65);
        assert_eq!(config.increment_offset(), SoftPityOffset::Exclusive);
        assert_eq!(config.four_star_rate(), None);

        let bad = r#"{
            "game": "Star Rail",
            "banner_type": "Light Cone",
            "base_rate": 0.008,
            "soft_pity_start": 81,
            "hard_pity": 80
        }"#;
        let err = serde_json::from_str::<BannerConfig>(bad).unwrap_err();
        assert!(err.to_string().contains("must not exceed hard pity"));
    }

    #[test]
    fn test_serialize_uses_flat_field_names() {
        let config = BannerConfigBuilder::new("Zenless Zone Zero", "Bangboo")
            .build()
            .unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["game"], "Zenless Zone Zero");
        assert_eq!(value["hard_pity"], 90);
        assert_eq!(value["increment_offset"], "inclusive");
        assert!(value.get("rate_up_chance").is_none());
    }

    #[test]
    fn test_builder_defaults_match_builtin_standard() -> anyhow::Result<()> {
        let defaults = BannerConfigBuilder::new("Star Rail", "Standard").build()?;
        let table = crate::banner::BannerTable::builtin()?;
        let standard = table.find("Star Rail", "Standard").unwrap();
        assert_eq!(defaults.base_rate(), standard.base_rate());
        assert_eq!(defaults.soft_pity_start(), standard.soft_pity_start());
        assert_eq!(defaults.hard_pity(), standard.hard_pity());
        assert_eq!(defaults.rate_increase(), standard.rate_increase());
        Ok(())
    }

    #[test]
    fn test_offset_increments() {
        assert_eq!(SoftPityOffset::Inclusive.increments(73, 73), 1);
        assert_eq!(SoftPityOffset::Exclusive.increments(73, 73), 0);
        assert_eq!(SoftPityOffset::Inclusive.increments(80, 73), 8);
        assert_eq!(SoftPityOffset::Exclusive.increments(80, 73), 7);
    }
}
