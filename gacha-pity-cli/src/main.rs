use std::path::PathBuf;

use clap::Parser;
use gacha_pity::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Banner table JSON file; the built-in table is used when omitted
    #[arg(short, long, value_name = "FILE")]
    banners: Option<PathBuf>,

    /// Directory the per-game CSV files are written to
    #[arg(short, long, default_value = "csv_output", value_name = "DIR")]
    output_dir: PathBuf,

    /// Append to existing CSV files instead of overwriting them
    #[arg(long, default_value_t = false)]
    append: bool,

    /// Prefix each CSV with commented metadata lines
    #[arg(long, default_value_t = false)]
    metadata: bool,

    /// Log summary statistics for every banner
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Also write every result as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Write the built-in banner table to this file and exit
    #[arg(long, value_name = "FILE", conflicts_with = "banners")]
    dump_builtin: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::info!("Starting with args: {:?}", args);

    if let Some(path) = &args.dump_builtin {
        BannerTable::builtin()?.write_json(path)?;
        log::info!("Wrote built-in banner table to {}", path.display());
        return Ok(());
    }

    let (table, rejected) = match &args.banners {
        Some(path) => {
            log::info!("Loading banner table from {}", path.display());
            BannerTable::load(path)?
        }
        None => {
            log::info!("Using built-in banner table");
            (BannerTable::builtin()?, Vec::new())
        }
    };

    let options = RunOptions {
        output_dir: args.output_dir.clone(),
        mode: if args.append {
            WriteMode::Append
        } else {
            WriteMode::Overwrite
        },
        include_metadata: args.metadata,
    };

    log::info!(
        "Processing {} banners across {} games...",
        table.len(),
        table.games().len()
    );
    let report = run(&table, &options);

    if args.summary {
        for result in &report.results {
            let summary = PullSummary::from_result(result);
            for row in RowFormatter::summary_rows(&summary) {
                log::info!("{}: {}", result.banner(), row.join(": "));
            }
        }
    }

    if let Some(path) = &args.json {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer(writer, &report.results)?;
        log::info!("Results written to {}", path.display());
    }

    log::info!(
        "Finished: {} banners calculated, {} files written in {} ms",
        report.results.len(),
        report.files.len(),
        report.elapsed.num_milliseconds()
    );

    let failures = rejected.len() + report.failures.len();
    if failures > 0 {
        for error in &rejected {
            log::error!("Rejected: {}", error);
        }
        for failure in &report.failures {
            log::error!("Failed: {}", failure);
        }
        anyhow::bail!("{} banner configuration(s) or output file(s) failed", failures);
    }

    Ok(())
}
