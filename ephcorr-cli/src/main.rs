mod cli;

use clap::Parser;
use cli::{progress, Cli};
use log::{error, info, warn};

use ephcorr::{
    calendar::days,
    prelude::{DayStatus, Pipeline},
};

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let cfg = cli.config();

    let pipeline = match Pipeline::new(cfg.clone()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        },
    };

    let (mut processed, mut failed) = (0, 0);

    if !cli.merge_only {
        let systems = cfg.systems.systems();
        for day in days(cfg.start, cfg.end) {
            for system in systems.iter() {
                let report = pipeline.process_day(&day, *system);
                if let Some(line) = progress(&report) {
                    println!("{}", line);
                }
                match report.status {
                    DayStatus::Processed(_) => processed += 1,
                    DayStatus::Failed(_) => failed += 1,
                    DayStatus::MissingInput(_) => {},
                }
            }
        }
        info!("{} daily files processed, {} failed", processed, failed);
    }

    let report = pipeline.merge_all();

    for merge in report.merges.iter() {
        info!(
            "{}: {} satellite rows, {} lags, {} dropped -> \"{}\"",
            merge.system,
            merge.satellites,
            merge.lags,
            merge.dropped,
            merge.path.display()
        );
        if merge.failed_files > 0 {
            warn!(
                "{}: {} daily summaries could not be read",
                merge.system, merge.failed_files
            );
        }
    }

    let incomplete = report.merges.iter().any(|merge| merge.failed_files > 0);

    if !report.failed_merges.is_empty() || failed > 0 || incomplete {
        warn!("run completed with errors");
        std::process::exit(2);
    }
}
