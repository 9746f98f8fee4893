use crate::{
    aggregate::{GroupedSamples, LagKey},
    errors::ParsingError,
    filter::OutlierFilter,
    prelude::{Channel, CorrectionVector, DiffRecord, SV},
};

use strum::IntoEnumIterator;

use std::{
    io::{BufWriter, Write},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Writes one value, honoring the formatter precision if any.
pub(crate) fn write_value(f: &mut std::fmt::Formatter, value: f64) -> std::fmt::Result {
    match f.precision() {
        Some(precision) => write!(f, " {:.*}", precision, value),
        None => write!(f, " {}", value),
    }
}

/// [SatelliteSummary] is the mean of one satellite at one lag.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteSummary {
    /// Satellite
    pub sv: SV,
    /// Lag (s)
    pub lag: u32,
    /// Mean of each channel
    pub mean: CorrectionVector,
}

impl SatelliteSummary {
    /// [LagKey] of this row.
    pub fn key(&self) -> LagKey {
        LagKey {
            sv: self.sv,
            lag: self.lag,
        }
    }

    /// Converts this row into a [DiffRecord], so it can be aggregated again.
    pub fn to_diff_record(&self) -> DiffRecord {
        DiffRecord {
            sv: self.sv,
            lag: self.lag,
            vector: self.mean,
        }
    }
}

impl From<(LagKey, CorrectionVector)> for SatelliteSummary {
    fn from(row: (LagKey, CorrectionVector)) -> Self {
        let (key, mean) = row;
        Self {
            sv: key.sv,
            lag: key.lag,
            mean,
        }
    }
}

impl FromStr for SatelliteSummary {
    type Err = ParsingError;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let record = DiffRecord::from_str(line)?;
        Ok(Self {
            sv: record.sv,
            lag: record.lag,
            mean: record.vector,
        })
    }
}

impl std::fmt::Display for SatelliteSummary {
    /// Formats `SV lag dr dt dn dclk`. `{:.3}` formats every mean with 3 decimals.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.sv, self.lag)?;
        for channel in Channel::iter() {
            write_value(f, self.mean[channel])?;
        }
        Ok(())
    }
}

/// [DailySummary] reduces one day of [DiffRecord]s.
#[derive(Debug, Clone, Default)]
pub struct DailySummary {
    /// One row per (satellite, lag), in that order
    pub rows: Vec<SatelliteSummary>,
    /// Groups dropped because a channel was emptied by the filter
    pub dropped: Vec<LagKey>,
    /// Number of rejected samples
    pub rejected: usize,
}

impl DailySummary {
    /// Groups [DiffRecord]s per (satellite, lag), filters each channel
    /// and averages the survivors.
    pub fn from_records<I: IntoIterator<Item = DiffRecord>>(
        records: I,
        filter: &OutlierFilter,
    ) -> Self {
        let filtered = records
            .into_iter()
            .collect::<GroupedSamples>()
            .filter(filter);

        let (rows, dropped) = filtered.means();

        Self {
            rows: rows.into_iter().map(SatelliteSummary::from).collect(),
            dropped,
            rejected: filtered.rejected,
        }
    }

    /// Formats this [DailySummary], one row per line.
    pub fn format<W: Write>(&self, writer: &mut BufWriter<W>) -> std::io::Result<()> {
        for row in self.rows.iter() {
            writeln!(writer, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{DailySummary, SatelliteSummary};
    use crate::prelude::{Constellation, CorrectionVector, DiffRecord, OutlierFilter, SV};
    use std::io::BufWriter;
    use std::str::FromStr;

    fn diff(prn: u8, lag: u32, values: [f64; 4]) -> DiffRecord {
        DiffRecord {
            sv: SV::new(Constellation::BeiDou, prn),
            lag,
            vector: CorrectionVector(values),
        }
    }

    #[test]
    fn summary_formatting() {
        let row = SatelliteSummary {
            sv: SV::new(Constellation::BeiDou, 7),
            lag: 300,
            mean: CorrectionVector([0.5, 1.0 / 3.0, 2.0, 0.0626]),
        };
        assert_eq!(
            row.to_string(),
            "C07 300 0.5 0.3333333333333333 2 0.0626"
        );
        assert_eq!(format!("{:.3}", row), "C07 300 0.500 0.333 2.000 0.063");

        let parsed = SatelliteSummary::from_str(&row.to_string()).unwrap();
        assert_eq!(parsed, row);
    }

    #[test]
    fn daily_reduction() {
        let records = vec![
            diff(1, 5, [1.0, 1.0, 1.0, 1.0]),
            diff(1, 5, [1.1, 1.1, 1.1, 1.1]),
            diff(1, 5, [0.9, 0.9, 0.9, 0.9]),
            diff(1, 5, [1.05, 1.05, 1.05, 1.05]),
            diff(1, 5, [0.95, 0.95, 0.95, 0.95]),
            diff(1, 5, [10.0, 1.0, 1.0, 1.0]),
            diff(1, 10, [2.0, 2.0, 2.0, 2.0]),
            diff(1, 10, [2.0, 2.0, 2.0, 2.0]),
        ];

        let summary = DailySummary::from_records(records, &OutlierFilter::default());

        // the 10.0 spike is rejected, the lag=10 group has zero MAD
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].lag, 5);
        assert!((summary.rows[0].mean.0[0] - 1.0).abs() < 1.0E-12);
        assert_eq!(summary.dropped.len(), 1);
        assert_eq!(summary.dropped[0].lag, 10);

        let mut buf = BufWriter::new(Vec::new());
        summary.format(&mut buf).unwrap();
        let content = String::from_utf8(buf.into_inner().unwrap()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("C01 5 "));
    }
}
