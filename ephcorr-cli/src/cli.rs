use clap::Parser;
use std::path::PathBuf;

use ephcorr::{
    calendar::parse_date,
    prelude::{Config, DayReport, DayStatus, Epoch, MedianPolicy, Systems},
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ephcorr",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compare broadcast and precise ephemeris corrections"
)]
pub struct Cli {
    /// Directory holding the daily comparison files
    #[arg(short, long)]
    pub path: PathBuf,

    /// Sampling interval, in seconds: duration of one reference window
    #[arg(short, long)]
    pub interval: u32,

    /// Constellation: GPS, BDS, GAL, GLO or ALL
    #[arg(short, long, default_value = "ALL")]
    pub sys: Systems,

    /// First day to process (YYYYMMDD)
    #[arg(long, value_parser = parse_epoch)]
    pub start: Epoch,

    /// Last day to process, included (YYYYMMDD)
    #[arg(long, value_parser = parse_epoch)]
    pub end: Epoch,

    /// Use the textbook median (instead of the historical formula)
    #[arg(long)]
    pub true_median: bool,

    /// Skip the daily passes, only merge existing daily summaries
    #[arg(long)]
    pub merge_only: bool,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_epoch(s: &str) -> Result<Epoch, String> {
    parse_date(s).map_err(|e| e.to_string())
}

impl Cli {
    /// Builds the processing [Config]
    pub fn config(&self) -> Config {
        let policy = if self.true_median {
            MedianPolicy::Midpoint
        } else {
            MedianPolicy::Legacy
        };

        Config::new(&self.path, self.start, self.end, self.interval)
            .with_systems(self.sys)
            .with_median_policy(policy)
    }
}

/// Progress line of a processed day: `YYYY-MM-DD SYS`.
/// None for days that were skipped or failed.
pub fn progress(report: &DayReport) -> Option<String> {
    match report.status {
        DayStatus::Processed(_) => Some(format!("{} {}", report.day, report.system)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::{progress, Cli};
    use clap::Parser;
    use ephcorr::{
        calendar::Day,
        prelude::{DayReport, DayStatus, DiffReport, Epoch, MedianPolicy, System, Systems},
    };
    use std::path::PathBuf;

    #[test]
    fn arguments() {
        let cli = Cli::try_parse_from([
            "ephcorr",
            "-p",
            "/data",
            "-i",
            "30",
            "-s",
            "GAL",
            "--start",
            "20240101",
            "--end",
            "20240107",
            "--true-median",
        ])
        .unwrap();

        let cfg = cli.config();
        assert_eq!(cfg.interval, 30);
        assert_eq!(cfg.systems, Systems::Single(System::GAL));
        assert_eq!(cfg.start, Epoch::from_gregorian_utc_at_midnight(2024, 1, 1));
        assert_eq!(cfg.end, Epoch::from_gregorian_utc_at_midnight(2024, 1, 7));
        assert_eq!(cfg.filter.policy, MedianPolicy::Midpoint);
        assert!(!cli.merge_only);
    }

    #[test]
    fn invalid_arguments() {
        for args in [
            vec!["ephcorr", "-p", "/data", "-i", "30", "--start", "2024-01-01", "--end", "20240107"],
            vec!["ephcorr", "-p", "/data", "-i", "30", "-s", "QZS", "--start", "20240101", "--end", "20240107"],
            vec!["ephcorr", "-p", "/data", "--start", "20240101", "--end", "20240107"],
        ] {
            assert!(Cli::try_parse_from(args).is_err());
        }
    }

    #[test]
    fn progress_lines() {
        let day = Day::from_epoch(Epoch::from_gregorian_utc_at_midnight(2024, 1, 9));

        let processed = DayReport {
            day,
            system: System::GAL,
            status: DayStatus::Processed(DiffReport::default()),
        };
        assert_eq!(progress(&processed), Some("2024-01-09 GAL".to_string()));

        let missing = DayReport {
            day,
            system: System::GPS,
            status: DayStatus::MissingInput(PathBuf::from("cmp0090_24_GPS.txt")),
        };
        assert_eq!(progress(&missing), None);

        let failed = DayReport {
            day,
            system: System::GPS,
            status: DayStatus::Failed("i/o error".to_string()),
        };
        assert_eq!(progress(&failed), None);
    }
}
