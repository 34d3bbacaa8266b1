use std::path::{Path, PathBuf};

use crate::{
    banner::{BannerConfig, BannerId, BannerTable},
    error::{Error, Result},
    output::{CsvWriter, RowFormatter, WriteMode},
    statistics::{ProbabilityResult, calculate},
};

pub type Timestamp = chrono::DateTime<chrono::Utc>;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub mode: WriteMode,
    /// Prefix each game's file with `# ` metadata lines.
    pub include_metadata: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("csv_output"),
            mode: WriteMode::Overwrite,
            include_metadata: false,
        }
    }
}

/// Something a run could not finish.
///
/// `Banner` carries calculation and result-validation errors. Configuration
/// errors never reach `run`, because a [`BannerConfig`] is validated when it
/// is built; a lenient [`BannerTable::load`] reports those entries instead.
#[derive(Debug)]
pub enum Failure {
    Banner { banner: BannerId, error: Error },
    Game { game: String, error: Error },
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Banner { banner, error } => write!(f, "{banner}: {error}"),
            Failure::Game { game, error } => write!(f, "{game}: {error}"),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<ProbabilityResult>,
    pub files: Vec<PathBuf>,
    pub failures: Vec<Failure>,
    pub started: Timestamp,
    pub elapsed: chrono::Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lowercase name with every non-alphanumeric character replaced by `_`.
pub fn game_slug(game: &str) -> String {
    game.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn output_path(output_dir: &Path, game: &str) -> PathBuf {
    output_dir.join(format!("{}_all_banners.csv", game_slug(game)))
}

/// Calculates and formats a single banner.
pub fn process_banner(config: &BannerConfig) -> Result<(ProbabilityResult, Vec<Vec<String>>)> {
    let result = calculate(config)?;
    let rows = RowFormatter::new(config).format_rows(&result)?;
    Ok((result, rows))
}

/// Works through every game in `table`, writing one CSV per game.
///
/// A banner that fails is logged and skipped; the rest of its game still
/// gets written.
pub fn run(table: &BannerTable, options: &RunOptions) -> RunReport {
    let started = chrono::Utc::now();
    let writer = CsvWriter::new(options.mode);
    let header = RowFormatter::header();

    let mut results = Vec::new();
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for game in table.games() {
        let mut rows = Vec::new();
        let mut metadata = vec![format!("Generated: {}", started.to_rfc3339())];

        for config in table.banners_for(game) {
            log::info!("Calculating probabilities for {}", config.id());
            match process_banner(config) {
                Ok((result, banner_rows)) => {
                    rows.extend(banner_rows);
                    metadata.extend(RowFormatter::new(config).metadata_lines());
                    results.push(result);
                }
                Err(error) => {
                    log::error!("Error processing {}: {}", config.id(), error);
                    failures.push(Failure::Banner {
                        banner: config.id().clone(),
                        error,
                    });
                }
            }
        }

        if rows.is_empty() {
            log::warn!("No banners succeeded for {}, skipping output", game);
            continue;
        }

        let path = output_path(&options.output_dir, game);
        if !options.include_metadata {
            metadata.clear();
        }

        match writer.write(&path, &header, rows, &metadata) {
            Ok(count) => {
                log::info!("Wrote {} rows to {}", count, path.display());
                files.push(path);
            }
            Err(error) => {
                log::error!("Failed to write {}: {}", path.display(), error);
                failures.push(Failure::Game {
                    game: game.to_string(),
                    error,
                });
            }
        }
    }

    RunReport {
        results,
        files,
        failures,
        started,
        elapsed: chrono::Utc::now() - started,
    }
}
