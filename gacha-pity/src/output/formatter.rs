use crate::{
    banner::BannerConfig,
    error::{Error, Result},
    statistics::{result::ProbabilityResult, summary::PullSummary},
};

pub const DECIMAL_PLACES: usize = 6;

pub const COLUMN_HEADERS: [&str; 6] = [
    "Game",
    "Banner Type",
    "Roll Number",
    "Probability per Roll",
    "Cumulative Probability",
    "First 5 Star Probability",
];

/// Turns one banner's results into string rows for export.
#[derive(Debug, Clone, Copy)]
pub struct RowFormatter<'a> {
    config: &'a BannerConfig,
}

impl<'a> RowFormatter<'a> {
    pub fn new(config: &'a BannerConfig) -> Self {
        Self { config }
    }

    pub fn header() -> Vec<String> {
        COLUMN_HEADERS.iter().map(|s| s.to_string()).collect()
    }

    pub fn format_probability(value: f64) -> String {
        format!("{:.*}", DECIMAL_PLACES, value)
    }

    pub fn format_rows(&self, result: &ProbabilityResult) -> Result<Vec<Vec<String>>> {
        if result.banner() != self.config.id() {
            return Err(Error::Validation {
                banner: self.config.id().clone(),
                reason: format!("result belongs to {}", result.banner()),
            });
        }
        result.validate(self.config.hard_pity())?;

        let id = self.config.id();
        let rows = result
            .rows()
            .map(|row| {
                vec![
                    id.game.clone(),
                    id.banner_type.clone(),
                    row.roll.to_string(),
                    Self::format_probability(row.raw),
                    Self::format_probability(row.cumulative),
                    Self::format_probability(row.first_success),
                ]
            })
            .collect();
        Ok(rows)
    }

    pub fn metadata_lines(&self) -> Vec<String> {
        let config = self.config;
        let mut lines = vec![
            format!("Game: {}", config.id().game),
            format!("Banner Type: {}", config.id().banner_type),
            format!("Base Rate: {}", config.base_rate()),
            format!("Soft Pity Start: {}", config.soft_pity_start()),
            format!("Hard Pity: {}", config.hard_pity()),
            format!("Rate Increase: {}", config.rate_increase()),
        ];
        if let Some(rate) = config.four_star_rate() {
            lines.push(format!("Four Star Rate: {rate}"));
        }
        if let Some(chance) = config.rate_up_chance() {
            lines.push(format!("Rate Up Chance: {chance}"));
        }
        lines.push(format!("Guaranteed Rate Up: {}", config.guaranteed_rate_up()));
        lines
    }

    pub fn summary_rows(summary: &PullSummary) -> Vec<Vec<String>> {
        let row = |label: &str, value: String| vec![label.to_string(), value];
        vec![
            vec!["Summary Statistics".to_string()],
            row(
                "Average 5 Star pulls",
                Self::format_probability(summary.expected_pulls),
            ),
            row("Most likely pull", summary.most_likely_roll.to_string()),
            row("50% chance at pull", summary.pulls_for_50.to_string()),
            row("90% chance at pull", summary.pulls_for_90.to_string()),
            row("99% chance at pull", summary.pulls_for_99.to_string()),
        ]
    }
}
