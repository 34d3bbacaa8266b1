use std::path::Path;

use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};

use crate::{
    banner::config::{BannerConfig, BannerConfigBuilder},
    error::{Error, Result},
};

/// The set of banners a run works through, in declaration order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, IntoIterator)]
#[serde(transparent)]
#[into_iterator(owned, ref)]
pub struct BannerTable {
    banners: Vec<BannerConfig>,
}

impl BannerTable {
    pub fn new(banners: Vec<BannerConfig>) -> Self {
        Self { banners }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a JSON array of banners, keeping every entry that validates.
    ///
    /// Malformed JSON is still an error; entries that parse but break a
    /// configuration rule are returned alongside the table so the caller can
    /// report them and carry on with the rest.
    pub fn from_json_str_lenient(json: &str) -> Result<(Self, Vec<Error>)> {
        let entries: Vec<BannerConfigBuilder> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<BannerConfigBuilder>) -> (Self, Vec<Error>) {
        let mut banners = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();
        for entry in entries {
            match entry.build() {
                Ok(config) => banners.push(config),
                Err(err) => {
                    log::error!("Skipping banner: {}", err);
                    rejected.push(err);
                }
            }
        }
        (Self { banners }, rejected)
    }

    pub fn load(path: &Path) -> Result<(Self, Vec<Error>)> {
        let json = std::fs::read_to_string(path)?;
        let (table, rejected) = Self::from_json_str_lenient(&json)?;
        log::debug!(
            "Loaded {} banners from {} ({} rejected)",
            table.banners.len(),
            path.display(),
            rejected.len()
        );
        Ok((table, rejected))
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    pub fn banners(&self) -> &[BannerConfig] {
        &self.banners
    }

    /// Game names in the order they first appear.
    pub fn games(&self) -> Vec<&str> {
        let mut games: Vec<&str> = Vec::new();
        for banner in &self.banners {
            let game = banner.id().game.as_str();
            if !games.contains(&game) {
                games.push(game);
            }
        }
        games
    }

    pub fn banners_for<'a>(
        &'a self,
        game: &'a str,
    ) -> impl Iterator<Item = &'a BannerConfig> + 'a {
        self.banners.iter().filter(move |b| b.id().game == game)
    }

    /// Looks a banner up by name, ignoring case, spaces, and underscores, so
    /// `("star_rail", "light_cone")` finds `Star Rail Light Cone`.
    pub fn find(&self, game: &str, banner_type: &str) -> Option<&BannerConfig> {
        let game = normalize(game);
        let banner_type = normalize(banner_type);
        self.banners.iter().find(|b| {
            normalize(&b.id().game) == game && normalize(&b.id().banner_type) == banner_type
        })
    }

    /// Published pity parameters for Star Rail, Genshin Impact and Zenless
    /// Zone Zero.
    pub fn builtin() -> Result<Self> {
        let standard = |game: &str| {
            BannerConfigBuilder::new(game, "Standard")
                .base_rate(0.006)
                .four_star_rate(0.051)
                .soft_pity_start(73)
                .hard_pity(90)
                .rate_increase(0.07)
                .guaranteed_rate_up(false)
                .rate_up_chance(0.5)
        };
        let limited = |game: &str| standard(game).banner_type("Limited").guaranteed_rate_up(true);
        let secondary =
            |game: &str, banner_type: &str, base_rate: f64, four_star: f64, soft_pity: u32| {
                BannerConfigBuilder::new(game, banner_type)
                    .base_rate(base_rate)
                    .four_star_rate(four_star)
                    .soft_pity_start(soft_pity)
                    .hard_pity(80)
                    .rate_increase(0.07)
                    .guaranteed_rate_up(true)
                    .rate_up_chance(0.75)
            };

        let builders = vec![
            standard("Star Rail"),
            limited("Star Rail"),
            secondary("Star Rail", "Light Cone", 0.008, 0.066, 65),
            standard("Genshin Impact"),
            limited("Genshin Impact"),
            secondary("Genshin Impact", "Weapon", 0.007, 0.066, 62),
            standard("Zenless Zone Zero"),
            limited("Zenless Zone Zero"),
            secondary("Zenless Zone Zero", "W-Engine", 0.01, 0.08, 64),
            secondary("Zenless Zone Zero", "Bangboo", 0.01, 0.051, 64).rate_up_chance(1.0),
        ];

        let banners = builders
            .into_iter()
            .map(BannerConfigBuilder::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { banners })
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
