//! Multi-day merge of daily summaries
use crate::{
    aggregate::{daily::write_value, samples::complete, GroupedSamples, LagKey, SatelliteSummary},
    filter::OutlierFilter,
    prelude::{Channel, CorrectionVector},
};

use itertools::Itertools;
use log::warn;
use strum::IntoEnumIterator;

use std::io::{BufWriter, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [LagSummary] pools every satellite and every day sharing one lag.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LagSummary {
    /// Lag (s)
    pub lag: u32,
    /// Mean of each channel
    pub mean: CorrectionVector,
    /// Largest value of each channel
    pub max: CorrectionVector,
}

impl std::fmt::Display for LagSummary {
    /// Formats `lag dr dt dn dclk max_dr max_dt max_dn max_dclk`.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.lag)?;
        for channel in Channel::iter() {
            write_value(f, self.mean[channel])?;
        }
        for channel in Channel::iter() {
            write_value(f, self.max[channel])?;
        }
        Ok(())
    }
}

/// [FinalSummary] merges the daily summaries of a date range.
#[derive(Debug, Clone, Default)]
pub struct FinalSummary {
    /// Mean over all days, per satellite and lag
    pub satellites: Vec<SatelliteSummary>,
    /// Pooled statistics per lag, in ascending lag order
    pub lags: Vec<LagSummary>,
    /// (satellite, lag) rows dropped because a channel was emptied by the filter
    pub dropped: Vec<LagKey>,
    /// Lags for which a pooled channel ended up empty
    pub dropped_lags: Vec<u32>,
    /// Number of rejected daily values
    pub rejected: usize,
}

impl FinalSummary {
    /// Merges daily [SatelliteSummary] rows.
    ///
    /// Each (satellite, lag) channel is filtered once across days and averaged.
    /// Survivors of all satellites are then pooled per lag, from which the
    /// mean and maximum of each channel are computed.
    pub fn from_daily<I: IntoIterator<Item = SatelliteSummary>>(
        rows: I,
        filter: &OutlierFilter,
    ) -> Self {
        let filtered = rows
            .into_iter()
            .map(|row| row.to_diff_record())
            .collect::<GroupedSamples>()
            .filter(filter);

        let (means, dropped) = filtered.means();

        let mut lags = Vec::new();
        let mut dropped_lags = Vec::new();

        for (lag, pooled) in filtered.pool_by_lag() {
            match (complete(pooled.means()), complete(pooled.maxima())) {
                (Some(mean), Some(max)) => lags.push(LagSummary { lag, mean, max }),
                _ => {
                    warn!("lag={}s - pooled channel is empty, lag dropped", lag);
                    dropped_lags.push(lag);
                },
            }
        }

        Self {
            satellites: means.into_iter().map(SatelliteSummary::from).collect(),
            lags,
            dropped,
            dropped_lags,
            rejected: filtered.rejected,
        }
    }

    /// Formats this [FinalSummary]: one block per satellite, each followed
    /// by a blank line, then the pooled per-lag block. 3 decimals.
    pub fn format<W: Write>(&self, writer: &mut BufWriter<W>) -> std::io::Result<()> {
        for (_, block) in &self.satellites.iter().chunk_by(|row| row.sv) {
            for row in block {
                writeln!(writer, "{:.3}", row)?;
            }
            writeln!(writer)?;
        }

        for row in self.lags.iter() {
            writeln!(writer, "{:.3}", row)?;
        }

        Ok(())
    }
}
