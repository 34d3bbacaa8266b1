pub mod banner;
pub mod error;
pub mod output;
pub mod runner;
pub mod statistics;

pub use error::{ConfigViolation, Error, Result};

pub mod prelude {
    pub use crate::banner::{
        BannerConfig, BannerConfigBuilder, BannerId, BannerTable, MAX_HARD_PITY, SoftPityOffset,
    };
    pub use crate::error::{ConfigViolation, Error, Result};
    pub use crate::output::{CsvWriter, RowFormatter, WriteMode};
    pub use crate::runner::{Failure, RunOptions, RunReport, run};
    pub use crate::statistics::{
        ProbabilityResult, PullProjection, PullSummary, RollRow, calculate,
        compute_cumulative_probabilities, compute_first_success_probabilities,
        compute_raw_probabilities, cumulative_from_first_success, project_pulls,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_demo() -> anyhow::Result<()> {
        let table = BannerTable::builtin()?;

        for config in &table {
            let result = calculate(config)?;
            let summary = PullSummary::from_result(&result);
            println!("{}:", config.id());
            summary.print_summary();

            assert_eq!(result.len(), config.hard_pity() as usize);
            assert!(summary.pulls_for_99 <= config.hard_pity());
        }

        let limited = table.find("Genshin Impact", "Limited").unwrap();
        let projection = project_pulls(limited, 60, 20, false)?;
        println!(
            "Chance of the featured character within 20 pulls from pity 60: {:.2}%",
            projection.rate_up_probability * 100.0
        );
        assert!(projection.rate_up_probability < projection.success_probability);

        Ok(())
    }
}
