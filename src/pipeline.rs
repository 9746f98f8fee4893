//! Day by day processing and multi-day merge
use crate::{
    calendar::{days, Day},
    config::Config,
    constellation::System,
    differencer::{Differencer, Step},
    errors::{Error, ParsingError},
    layout::Layout,
    prelude::{CorrectionRecord, DailySummary, DiffRecord, FinalSummary, SatelliteSummary},
};

use log::{debug, error, info, warn};

use std::{
    fs::{create_dir_all, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Parses every non empty line of a text file.
/// Lines that do not parse are logged, skipped and counted.
fn read_lines<T, F>(path: &Path, mut parse: F) -> Result<(Vec<T>, usize), Error>
where
    F: FnMut(&str) -> Result<T, ParsingError>,
{
    let reader = BufReader::new(File::open(path)?);

    let mut items = Vec::with_capacity(1024);
    let mut malformed = 0;

    for (nth, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse(&line) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!("{}:{} - {}", path.display(), nth + 1, e);
                malformed += 1;
            },
        }
    }

    Ok((items, malformed))
}

/// Reads a raw difference file (`SV lag dr dt dn dclk` lines).
/// Returns the records and the number of malformed lines.
pub fn read_diff_file<P: AsRef<Path>>(path: P) -> Result<(Vec<DiffRecord>, usize), Error> {
    read_lines(path.as_ref(), DiffRecord::from_str)
}

/// Reads a daily summary file. Returns the rows and the number of malformed lines.
pub fn read_daily_file<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<SatelliteSummary>, usize), Error> {
    read_lines(path.as_ref(), SatelliteSummary::from_str)
}

/// Counters of one processed day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    /// Parsed comparison records
    pub records: usize,
    /// Lines that failed to parse
    pub malformed: usize,
    /// Records of another constellation, ignored
    pub foreign: usize,
    /// Emitted differences
    pub differences: usize,
    /// Records without a reference in their window
    pub unmatched: usize,
    /// Windows restarted on a data gap or out of order epoch
    pub resyncs: usize,
    /// Rows in the daily summary
    pub groups: usize,
    /// Groups dropped because a channel was emptied by the filter
    pub dropped: usize,
    /// Rejected samples
    pub rejected: usize,
}

/// Status of one (day, constellation) job.
#[derive(Debug, Clone, PartialEq)]
pub enum DayStatus {
    /// Difference and daily summary files produced
    Processed(DiffReport),
    /// No comparison file for that day: skipped
    MissingInput(PathBuf),
    /// I/O failure: this file was aborted
    Failed(String),
}

/// [DayReport] of one (day, constellation) job.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    /// Processed [Day]
    pub day: Day,
    /// Processed [System]
    pub system: System,
    /// [DayStatus]
    pub status: DayStatus,
}

/// [MergeReport] of one multi-day merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    /// Merged [System]
    pub system: System,
    /// Output file
    pub path: PathBuf,
    /// Number of daily summaries found
    pub files: usize,
    /// Daily summary lines that failed to parse
    pub malformed: usize,
    /// Daily summaries that could not be read, left out of the merge
    pub failed_files: usize,
    /// Rows in the per satellite blocks
    pub satellites: usize,
    /// Rows in the pooled block
    pub lags: usize,
    /// Dropped rows, per satellite and pooled
    pub dropped: usize,
    /// Rejected daily values
    pub rejected: usize,
}

/// [Report] of a complete run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// One entry per (day, constellation)
    pub days: Vec<DayReport>,
    /// One entry per successful merge
    pub merges: Vec<MergeReport>,
    /// Merges that could not be completed
    pub failed_merges: Vec<(System, String)>,
}

/// [Pipeline] runs the differencing, daily aggregation
/// and multi-day merge over the configured date range.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    layout: Layout,
}

impl Pipeline {
    /// Creates a new [Pipeline] from a valid [Config].
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let layout = Layout::new(&config.root);
        Ok(Self { config, layout })
    }

    /// [Layout] in use.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Processes every day then merges, for every selected constellation.
    pub fn run(&self) -> Report {
        let days = self.process_days();
        let mut report = self.merge_all();
        report.days = days;
        report
    }

    /// Processes every (day, constellation) of the range, day by day.
    pub fn process_days(&self) -> Vec<DayReport> {
        let systems = self.config.systems.systems();
        let mut reports = Vec::new();

        for day in days(self.config.start, self.config.end) {
            for system in systems.iter() {
                reports.push(self.process_day(&day, *system));
            }
        }

        reports
    }

    /// Runs the multi-day merge of every selected constellation.
    /// Daily summaries must have been produced already.
    pub fn merge_all(&self) -> Report {
        let mut report = Report::default();

        for system in self.config.systems.systems() {
            match self.merge(system) {
                Ok(merge) => report.merges.push(merge),
                Err(e) => {
                    error!("{} - merge failed: {}", system, e);
                    report.failed_merges.push((system, e.to_string()));
                },
            }
        }

        report
    }

    /// Differences one comparison file and writes its daily summary.
    pub fn process_day(&self, day: &Day, system: System) -> DayReport {
        let path = self.layout.comparison_file(day, system);

        let status = if !path.exists() {
            info!("{} {} - missing \"{}\"", day, system, path.display());
            DayStatus::MissingInput(path)
        } else {
            match self.difference_file(&path, day, system) {
                Ok(report) => {
                    debug!("{} {} - {} differences", day, system, report.differences);
                    DayStatus::Processed(report)
                },
                Err(e) => {
                    error!("{} {} - \"{}\": {}", day, system, path.display(), e);
                    DayStatus::Failed(e.to_string())
                },
            }
        };

        DayReport {
            day: *day,
            system,
            status,
        }
    }

    fn difference_file(&self, path: &Path, day: &Day, system: System) -> Result<DiffReport, Error> {
        let (records, malformed) = read_lines(path, CorrectionRecord::parse)?;

        let mut report = DiffReport {
            malformed,
            records: records.len(),
            ..Default::default()
        };

        let constellation = system.constellation();
        let mut differencer = Differencer::new(self.config.interval);
        let mut differences = Vec::with_capacity(records.len());

        for (t, record) in records {
            if record.sv.constellation != constellation {
                debug!("{}({}) - not a {} satellite", t, record.sv, system);
                report.foreign += 1;
                continue;
            }
            match differencer.push(t, record) {
                Step::Difference(diff) => differences.push(diff),
                Step::Unmatched { .. } => report.unmatched += 1,
                Step::Resync { .. } => report.resyncs += 1,
                Step::Seeded | Step::Buffered | Step::NewWindow => {},
            }
        }

        report.differences = differences.len();

        create_dir_all(self.layout.diff_dir())?;
        let mut writer = BufWriter::new(File::create(self.layout.diff_file(day, system))?);
        for diff in differences.iter() {
            writeln!(writer, "{}", diff)?;
        }
        writer.flush()?;

        let summary = DailySummary::from_records(differences, &self.config.filter);

        report.groups = summary.rows.len();
        report.dropped = summary.dropped.len();
        report.rejected = summary.rejected;

        create_dir_all(self.layout.daily_dir())?;
        let mut writer = BufWriter::new(File::create(self.layout.daily_file(day, system))?);
        summary.format(&mut writer)?;
        writer.flush()?;

        Ok(report)
    }

    /// Merges every daily summary of the range for this constellation
    /// and writes the final summary.
    pub fn merge(&self, system: System) -> Result<MergeReport, Error> {
        let mut rows = Vec::new();
        let (mut files, mut malformed, mut failed_files) = (0, 0, 0);

        for day in days(self.config.start, self.config.end) {
            let path = self.layout.daily_file(&day, system);
            if !path.exists() {
                debug!("{} {} - no daily summary", day, system);
                continue;
            }

            let (daily, nb_malformed) = match read_daily_file(&path) {
                Ok(content) => content,
                Err(e) => {
                    error!("{} {} - \"{}\": {}", day, system, path.display(), e);
                    failed_files += 1;
                    continue;
                },
            };

            rows.extend(daily);
            malformed += nb_malformed;
            files += 1;
        }

        if files == 0 {
            warn!("{} - no daily summary in range", system);
        }

        let summary = FinalSummary::from_daily(rows, &self.config.filter);

        let path = self.layout.final_file(system);
        let mut writer = BufWriter::new(File::create(&path)?);
        summary.format(&mut writer)?;
        writer.flush()?;

        info!(
            "{} - merged {} daily summaries into \"{}\"",
            system,
            files,
            path.display()
        );

        Ok(MergeReport {
            system,
            path,
            files,
            malformed,
            failed_files,
            satellites: summary.satellites.len(),
            lags: summary.lags.len(),
            dropped: summary.dropped.len() + summary.dropped_lags.len(),
            rejected: summary.rejected,
        })
    }
}
